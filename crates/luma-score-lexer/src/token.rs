use serde::Serialize;

/// A position in source text.
///
/// `offset` is the 0-based character index into the source; `line` and
/// `column` are 1-based and only used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Loc {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Loc {
    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// The very beginning of a source text.
    pub const fn origin() -> Self {
        Self::new(1, 1, 0)
    }
}

impl std::fmt::Display for Loc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open source range: `end` is the position just past the last character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: Loc,
    pub end: Loc,
}

impl Span {
    pub const fn new(start: Loc, end: Loc) -> Self {
        Self { start, end }
    }

    /// A zero-width span at a single position.
    pub const fn point(loc: Loc) -> Self {
        Self::new(loc, loc)
    }

    /// The span covering `self` through `other`.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start, other.end)
    }

    /// Number of characters covered.
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The covered text, indexing `source` by character offset.
    pub fn slice(&self, source: &str) -> String {
        source
            .chars()
            .skip(self.start.offset)
            .take(self.len())
            .collect()
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.start)
    }
}

/// Token classification for score source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    // Structure
    Newline,
    Comment,

    // Literals
    Number,
    Identifier,
    HexColor,

    // Punctuation
    At,     // @bar
    Dash,   // @1-4
    LParen,
    RParen,
    Equals,

    // Tag operators
    And,      // &
    Or,       // |
    Xor,      // ^
    Not,      // ~
    Fallback, // >

    /// Any character the scanner does not recognise.
    Unknown,

    // End of input
    Eof,
}

impl TokenKind {
    /// Human-readable description used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Newline => "end of line",
            TokenKind::Comment => "comment",
            TokenKind::Number => "number",
            TokenKind::Identifier => "identifier",
            TokenKind::HexColor => "hex color",
            TokenKind::At => "'@'",
            TokenKind::Dash => "'-'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Equals => "'='",
            TokenKind::And => "'&'",
            TokenKind::Or => "'|'",
            TokenKind::Xor => "'^'",
            TokenKind::Not => "'~'",
            TokenKind::Fallback => "'>'",
            TokenKind::Unknown => "unrecognized character",
            TokenKind::Eof => "end of input",
        }
    }
}

/// A token produced by the score scanner.
///
/// `value` is the exact source lexeme, so `span` always slices back to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            value: value.into(),
            span,
        }
    }

    /// Whether this token is the identifier `word`.
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Identifier && self.value == word
    }
}

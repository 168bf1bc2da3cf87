use crate::token::{Loc, Span, Token, TokenKind};

/// Pattern score scanner.
///
/// Walks a `Vec<char>` copy of the source with a running
/// `(line, column, offset)` cursor and emits one token per lexeme.
/// Line breaks are significant and become `Newline` tokens; spaces
/// and tabs between tokens are dropped.
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl Scanner {
    /// Create a new scanner for the given source.
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the entire source into a vector of tokens ending in `Eof`.
    pub fn tokenize(source: &str) -> Vec<Token> {
        let mut scanner = Scanner::new(source);
        scanner.scan_tokens();
        scanner.tokens
    }

    fn scan_tokens(&mut self) {
        while !self.is_at_end() {
            self.scan_token();
        }

        let end = self.loc();
        self.tokens
            .push(Token::new(TokenKind::Eof, "", Span::point(end)));
    }

    /// Scan the next token.
    fn scan_token(&mut self) {
        let start = self.loc();
        let ch = self.peek();

        match ch {
            // Whitespace (skip)
            ' ' | '\t' => self.advance(),

            // Newlines
            '\n' => {
                self.advance();
                self.newline(start);
            }
            '\r' => {
                self.advance();
                // Handle \r\n as single newline
                if self.peek() == '\n' {
                    self.advance();
                }
                self.newline(start);
            }

            '/' if self.peek_next() == '/' => self.scan_comment(start),

            '0'..='9' => self.scan_number(start),

            '#' if self.peek_next().is_ascii_hexdigit() => self.scan_hex_color(start),

            '@' => self.single(TokenKind::At, start),
            '-' => self.single(TokenKind::Dash, start),
            '(' => self.single(TokenKind::LParen, start),
            ')' => self.single(TokenKind::RParen, start),
            '=' => self.single(TokenKind::Equals, start),

            // Tag operators
            '&' => self.single(TokenKind::And, start),
            '|' => self.single(TokenKind::Or, start),
            '^' => self.single(TokenKind::Xor, start),
            '~' => self.single(TokenKind::Not, start),
            '>' => self.single(TokenKind::Fallback, start),

            c if c.is_alphabetic() || c == '_' => self.scan_identifier(start),

            _ => self.single(TokenKind::Unknown, start),
        }
    }

    // --- Scanners ---

    /// Scan an identifier. Hyphens are allowed when followed by an
    /// alphanumeric character (`color-wash`, `front-left`).
    fn scan_identifier(&mut self, start: Loc) {
        self.advance();

        while self.peek().is_alphanumeric()
            || self.peek() == '_'
            || (self.peek() == '-' && self.peek_next().is_alphanumeric())
        {
            self.advance();
        }

        self.emit(TokenKind::Identifier, start);
    }

    /// Scan a number literal: digits with an optional `.digits` fraction.
    fn scan_number(&mut self, start: Loc) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance(); // consume `.`
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        self.emit(TokenKind::Number, start);
    }

    /// Scan a `#RRGGBB`-style colour. Digit count is left to consumers.
    fn scan_hex_color(&mut self, start: Loc) {
        self.advance(); // consume `#`

        while self.peek().is_ascii_hexdigit() {
            self.advance();
        }

        self.emit(TokenKind::HexColor, start);
    }

    /// Scan a line comment (`// ...`) up to, not including, the line break.
    fn scan_comment(&mut self, start: Loc) {
        while !self.is_at_end() && self.peek() != '\n' && self.peek() != '\r' {
            self.advance();
        }

        self.emit(TokenKind::Comment, start);
    }

    // --- Helpers ---

    fn single(&mut self, kind: TokenKind, start: Loc) {
        self.advance();
        self.emit(kind, start);
    }

    /// Emit a newline token ending at the current position, then move the
    /// cursor to the start of the next line.
    fn newline(&mut self, start: Loc) {
        self.emit(TokenKind::Newline, start);
        self.line += 1;
        self.column = 1;
    }

    /// Push a token covering `start` up to the current position.
    fn emit(&mut self, kind: TokenKind, start: Loc) {
        let value: String = self.chars[start.offset..self.pos].iter().collect();
        let span = Span::new(start, self.loc());
        self.tokens.push(Token::new(kind, value, span));
    }

    fn loc(&self) -> Loc {
        Loc::new(self.line, self.column, self.pos)
    }

    fn peek(&self) -> char {
        self.chars.get(self.pos).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.chars.get(self.pos + 1).copied().unwrap_or('\0')
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
            self.column += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }
}

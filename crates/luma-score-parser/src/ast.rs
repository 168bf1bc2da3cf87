//! Abstract Syntax Tree for pattern scores.
//!
//! A score is a list of bar blocks; each bar holds layers, and each pattern
//! layer carries a tag selection, arguments, and a blend mode. Union types
//! serialize with an internal `"type"` tag.

use luma_score_lexer::Span;
use serde::Serialize;

/// A complete parsed score.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pub bars: Vec<BarBlock>,
}

/// Inclusive bar range. A single bar has `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BarRange {
    pub start: u32,
    pub end: u32,
}

impl BarRange {
    pub fn single(bar: u32) -> Self {
        Self {
            start: bar,
            end: bar,
        }
    }
}

/// A timed section introduced by `@N` or `@N-M`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarBlock {
    pub range: BarRange,
    pub layers: Vec<Layer>,
    pub span: Span,
}

/// One line of a bar body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Layer {
    /// `hold` — carry the previous state through this bar.
    Hold { span: Span },

    /// A pattern invocation over a tag selection.
    Pattern(PatternLayer),
}

impl Layer {
    pub fn span(&self) -> Span {
        match self {
            Layer::Hold { span } => *span,
            Layer::Pattern(layer) => layer.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternLayer {
    pub pattern: String,
    pub selection: TagExpr,
    pub args: Vec<Arg>,
    pub blend: BlendMode,
    pub span: Span,
}

/// A `key=value` argument on a pattern layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arg {
    pub key: String,
    pub value: ArgValue,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArgValue {
    Color { hex: String },
    Number { value: f64 },
    Identifier { value: String },
}

impl ArgValue {
    /// Name of the value's kind, as used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ArgValue::Color { .. } => "color",
            ArgValue::Number { .. } => "number",
            ArgValue::Identifier { .. } => "identifier",
        }
    }
}

/// Boolean set expression over fixture tags.
///
/// `Group` keeps explicit parentheses distinct from their contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TagExpr {
    Tag { name: String },
    Not { operand: Box<TagExpr> },
    And { left: Box<TagExpr>, right: Box<TagExpr> },
    Or { left: Box<TagExpr>, right: Box<TagExpr> },
    Xor { left: Box<TagExpr>, right: Box<TagExpr> },
    Fallback { left: Box<TagExpr>, right: Box<TagExpr> },
    Group { inner: Box<TagExpr> },
}

impl TagExpr {
    pub fn tag(name: impl Into<String>) -> Self {
        TagExpr::Tag { name: name.into() }
    }

    pub fn not(operand: TagExpr) -> Self {
        TagExpr::Not {
            operand: Box::new(operand),
        }
    }

    pub fn and(left: TagExpr, right: TagExpr) -> Self {
        TagExpr::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn or(left: TagExpr, right: TagExpr) -> Self {
        TagExpr::Or {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn xor(left: TagExpr, right: TagExpr) -> Self {
        TagExpr::Xor {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn fallback(left: TagExpr, right: TagExpr) -> Self {
        TagExpr::Fallback {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn group(inner: TagExpr) -> Self {
        TagExpr::Group {
            inner: Box::new(inner),
        }
    }
}

/// Prints the canonical source form; binary operators are spaced and
/// groups keep their parentheses.
impl std::fmt::Display for TagExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagExpr::Tag { name } => write!(f, "{name}"),
            TagExpr::Not { operand } => write!(f, "~{operand}"),
            TagExpr::And { left, right } => write!(f, "{left} & {right}"),
            TagExpr::Or { left, right } => write!(f, "{left} | {right}"),
            TagExpr::Xor { left, right } => write!(f, "{left} ^ {right}"),
            TagExpr::Fallback { left, right } => write!(f, "{left} > {right}"),
            TagExpr::Group { inner } => write!(f, "({inner})"),
        }
    }
}

/// Compositing strategy for a layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BlendMode {
    #[default]
    Replace,
    Add,
    Multiply,
    Screen,
    Max,
    Min,
    Lighten,
    Value,
}

/// Every blend mode, in declaration order.
pub const BLEND_MODES: &[BlendMode] = &[
    BlendMode::Replace,
    BlendMode::Add,
    BlendMode::Multiply,
    BlendMode::Screen,
    BlendMode::Max,
    BlendMode::Min,
    BlendMode::Lighten,
    BlendMode::Value,
];

pub const DEFAULT_BLEND_MODE: BlendMode = BlendMode::Replace;

impl BlendMode {
    pub fn name(&self) -> &'static str {
        match self {
            BlendMode::Replace => "replace",
            BlendMode::Add => "add",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Max => "max",
            BlendMode::Min => "min",
            BlendMode::Lighten => "lighten",
            BlendMode::Value => "value",
        }
    }

    /// Exact, case-sensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        BLEND_MODES.iter().copied().find(|mode| mode.name() == name)
    }
}

impl std::fmt::Display for BlendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

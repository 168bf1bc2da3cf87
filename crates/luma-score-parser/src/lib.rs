//! Luma Score Parser
//!
//! Parses pattern score source into a [`Document`] of bar blocks and layers,
//! validating each layer against a [`PatternRegistry`].
//!
//! ```text
//! @1-4
//! pulse(front & ~left | back) color=#ff2200 speed=2 blend=screen
//! @5
//! hold
//! ```
//!
//! Parsing never aborts. Errors and warnings are collected as
//! [`DslError`]/[`DslWarning`] values; a result with any errors is a
//! [`ParseResult::Failure`] carrying the bars that did parse.

pub mod ast;
pub mod diagnostics;
pub mod parser;
pub mod registry;
pub mod render;
pub mod tag_expr;

pub use ast::{
    Arg, ArgValue, BarBlock, BarRange, BlendMode, Document, Layer, PatternLayer, TagExpr,
    BLEND_MODES, DEFAULT_BLEND_MODE,
};
pub use diagnostics::{DslError, DslWarning, ErrorCode, ParseResult, WarningCode};
pub use parser::Parser;
pub use registry::{ArgDef, ArgType, InMemoryRegistry, PatternDef, PatternRegistry, RegistryError};
pub use tag_expr::parse_tag_expr;

/// Parse `source`, validating patterns against `registry`.
pub fn parse(source: &str, registry: &dyn PatternRegistry) -> ParseResult {
    Parser::parse(source, registry)
}

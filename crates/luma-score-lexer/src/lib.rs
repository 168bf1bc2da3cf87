//! Luma Score Lexer
//!
//! Tokenizes pattern score source into a flat stream of tokens.
//! Handles bar headers (`@1-4`), pattern invocations, `key=value`
//! arguments, hex colours, line comments, and the tag operators
//! (`&` `|` `^` `~` `>`).
//!
//! Scanning never fails: characters the scanner does not recognise become
//! [`TokenKind::Unknown`] tokens and are reported by the parser.
//!
//! # Example
//!
//! ```
//! use luma_score_lexer::{tokenize, TokenKind};
//!
//! let tokens = tokenize("");
//! assert_eq!(tokens.len(), 1);
//! assert_eq!(tokens[0].kind, TokenKind::Eof);
//! ```

pub mod scanner;
pub mod token;

pub use scanner::Scanner;
pub use token::{Loc, Span, Token, TokenKind};

/// Tokenize `source`; the result always ends with a single `Eof` token.
pub fn tokenize(source: &str) -> Vec<Token> {
    Scanner::tokenize(source)
}

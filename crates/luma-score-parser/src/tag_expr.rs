//! Tag-expression parser.
//!
//! Selections are boolean formulas over fixture tags, parsed by precedence
//! climbing on the document parser's own token cursor. Loosest to tightest:
//!
//! ```text
//! fallback (>)  <  or (|)  <  xor (^)  <  and (&)  <  not (~)  <  primary
//! ```
//!
//! Binary operators are left-associative. `~` is prefix and may repeat.
//! Parsing never fails outright: a missing operand is reported as
//! `unexpected_token` and replaced by the tag `all`.

use crate::ast::TagExpr;
use crate::diagnostics::{DslError, ErrorCode};
use crate::parser::{describe, Parser};
use crate::registry::InMemoryRegistry;
use luma_score_lexer::TokenKind;

/// Tag substituted for an operand that could not be parsed.
pub const PLACEHOLDER_TAG: &str = "all";

/// Deepest `~`/`(` nesting accepted in one selection.
pub const MAX_SELECTION_DEPTH: usize = 128;

/// Parse a standalone selection such as `red & ~left`.
///
/// Returns the expression, or every error found; trailing tokens after a
/// complete expression are an error.
pub fn parse_tag_expr(source: &str) -> Result<TagExpr, Vec<DslError>> {
    let tokens = luma_score_lexer::tokenize(source);
    let registry = InMemoryRegistry::new();
    let mut parser = Parser::new(&tokens, &registry);

    parser.skip_trivia();
    let expr = parser.parse_tag_expr();
    parser.skip_trivia();

    if !parser.is_at_end() {
        let token = parser.peek();
        parser.error(
            ErrorCode::UnexpectedToken,
            format!("unexpected {} after selection", describe(token)),
            token.span,
        );
    }

    if parser.errors.is_empty() {
        Ok(expr)
    } else {
        Err(parser.errors)
    }
}

impl Parser<'_> {
    /// Parse a full tag expression at the current position.
    pub(crate) fn parse_tag_expr(&mut self) -> TagExpr {
        self.depth = 0;
        self.nesting_exceeded = false;
        self.parse_fallback()
    }

    /// Step one level deeper. Past [`MAX_SELECTION_DEPTH`] the rest of the
    /// line is dropped and the caller substitutes the placeholder.
    fn enter_nested(&mut self) -> bool {
        if self.depth < MAX_SELECTION_DEPTH {
            self.depth += 1;
            return true;
        }

        let token = self.peek();
        self.error(
            ErrorCode::UnexpectedToken,
            format!("selection nested too deeply (limit {MAX_SELECTION_DEPTH})"),
            token.span,
        );
        tracing::debug!(line = token.span.start.line, "selection nesting limit hit");
        self.nesting_exceeded = true;
        self.skip_to_line_end();
        false
    }

    fn parse_fallback(&mut self) -> TagExpr {
        let mut left = self.parse_or();
        while self.check(TokenKind::Fallback) {
            self.advance();
            let right = self.parse_or();
            left = TagExpr::fallback(left, right);
        }
        left
    }

    fn parse_or(&mut self) -> TagExpr {
        let mut left = self.parse_xor();
        while self.check(TokenKind::Or) {
            self.advance();
            let right = self.parse_xor();
            left = TagExpr::or(left, right);
        }
        left
    }

    fn parse_xor(&mut self) -> TagExpr {
        let mut left = self.parse_and();
        while self.check(TokenKind::Xor) {
            self.advance();
            let right = self.parse_and();
            left = TagExpr::xor(left, right);
        }
        left
    }

    fn parse_and(&mut self) -> TagExpr {
        let mut left = self.parse_unary();
        while self.check(TokenKind::And) {
            self.advance();
            let right = self.parse_unary();
            left = TagExpr::and(left, right);
        }
        left
    }

    fn parse_unary(&mut self) -> TagExpr {
        if self.check(TokenKind::Not) {
            self.advance();
            if !self.enter_nested() {
                return TagExpr::tag(PLACEHOLDER_TAG);
            }
            let operand = self.parse_unary();
            self.depth -= 1;
            return TagExpr::not(operand);
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> TagExpr {
        let token = self.peek();
        match token.kind {
            TokenKind::Identifier => {
                self.advance();
                TagExpr::tag(token.value.clone())
            }
            TokenKind::LParen => {
                self.advance();
                if !self.enter_nested() {
                    return TagExpr::tag(PLACEHOLDER_TAG);
                }
                let inner = self.parse_fallback();
                self.depth -= 1;
                if self.check(TokenKind::RParen) {
                    self.advance();
                } else if !self.nesting_exceeded {
                    let found = self.peek();
                    self.error(
                        ErrorCode::UnexpectedToken,
                        format!("expected ')' to close the group, found {}", describe(found)),
                        found.span,
                    );
                }
                TagExpr::group(inner)
            }
            _ => {
                self.error(
                    ErrorCode::UnexpectedToken,
                    format!("expected a tag name or '(', found {}", describe(token)),
                    token.span,
                );
                TagExpr::tag(PLACEHOLDER_TAG)
            }
        }
    }
}

//! Document parser for pattern scores.
//!
//! Parses the token stream from `luma-score-lexer` into a `Document`,
//! validating pattern names, arguments, and blend modes against a
//! [`PatternRegistry`]. Selections are handed to the tag-expression
//! parser in `tag_expr`, which shares this parser's cursor.
//!
//! Nothing here returns early on bad input. Errors and warnings are
//! collected and the parser recovers by skipping to the end of the line,
//! at the top level, per layer, and per argument.

use crate::ast::{
    Arg, ArgValue, BarBlock, BarRange, BlendMode, Document, Layer, PatternLayer, BLEND_MODES,
    DEFAULT_BLEND_MODE,
};
use crate::diagnostics::{DslError, DslWarning, ErrorCode, ParseResult, WarningCode};
use crate::registry::{ArgType, PatternDef, PatternRegistry};
use luma_score_lexer::{Loc, Span, Token, TokenKind};

/// Pattern score parser.
///
/// Holds a borrowed token slice, a cursor into it, and the diagnostics
/// collected so far.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    registry: &'a dyn PatternRegistry,
    previous: Span,
    /// Current `~`/`(` nesting inside a selection.
    pub(crate) depth: usize,
    /// Set once a selection hits the nesting limit; later `)` checks stay quiet.
    pub(crate) nesting_exceeded: bool,
    pub(crate) errors: Vec<DslError>,
    pub(crate) warnings: Vec<DslWarning>,
}

impl<'a> Parser<'a> {
    /// Create a new parser over already-scanned tokens.
    pub fn new(tokens: &'a [Token], registry: &'a dyn PatternRegistry) -> Self {
        Self {
            tokens,
            pos: 0,
            registry,
            previous: Span::point(Loc::origin()),
            depth: 0,
            nesting_exceeded: false,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Tokenize and parse `source`.
    pub fn parse(source: &str, registry: &dyn PatternRegistry) -> ParseResult {
        let tokens = luma_score_lexer::tokenize(source);
        let mut parser = Parser::new(&tokens, registry);
        let document = parser.parse_document();
        parser.finish(document)
    }

    /// Consume the parser, pairing `document` with the collected diagnostics.
    pub fn finish(self, document: Document) -> ParseResult {
        ParseResult::from_parts(document, self.errors, self.warnings)
    }

    /// Parse a full document.
    pub fn parse_document(&mut self) -> Document {
        let mut bars = Vec::new();

        loop {
            self.skip_trivia();
            if self.is_at_end() {
                break;
            }

            if self.check(TokenKind::At) {
                if let Some(bar) = self.parse_bar() {
                    bars.push(bar);
                }
            } else {
                let token = self.peek();
                self.error(
                    ErrorCode::UnexpectedToken,
                    format!("expected a bar header like `@1`, found {}", describe(token)),
                    token.span,
                );
                self.skip_line();
            }
        }

        Document { bars }
    }

    // =========================================================================
    // Bars
    // =========================================================================

    /// Parse `@N` or `@N-M`, then the layers up to the next `@` or EOF.
    /// Returns `None` when the header is malformed; the bar's body is
    /// discarded without further diagnostics.
    fn parse_bar(&mut self) -> Option<BarBlock> {
        let at = self.advance(); // consume `@`

        let start_token = self.peek();
        let start = self.expect_bar_number()?;

        let mut end_token = start_token;
        let mut end = start;
        if self.check(TokenKind::Dash) {
            self.advance();
            end_token = self.peek();
            end = self.expect_bar_number()?;
        }

        if end < start {
            self.errors.push(
                DslError::new(
                    ErrorCode::InvalidBarRange,
                    format!("bar range {start}-{end} ends before it starts"),
                    start_token.span.to(end_token.span),
                )
                .with_hint(format!("write the lower bar first: @{end}-{start}")),
            );
            self.skip_to_next_bar();
            return None;
        }

        let header = at.span.to(end_token.span);
        self.expect_header_end();

        let mut layers = Vec::new();
        loop {
            self.skip_trivia();
            if self.is_at_end() || self.check(TokenKind::At) {
                break;
            }

            let token = self.peek();
            match token.kind {
                TokenKind::Identifier if token.value == "hold" => {
                    self.advance();
                    self.skip_rest_of_line();
                    layers.push(Layer::Hold { span: token.span });
                }
                TokenKind::Identifier => {
                    if let Some(layer) = self.parse_pattern_layer() {
                        layers.push(Layer::Pattern(layer));
                    }
                }
                _ => {
                    self.error(
                        ErrorCode::UnexpectedToken,
                        format!("expected a pattern or `hold`, found {}", describe(token)),
                        token.span,
                    );
                    self.skip_line();
                }
            }
        }

        let last = layers.last().map(Layer::span).unwrap_or(header);
        tracing::trace!(start, end, layers = layers.len(), "parsed bar");

        Some(BarBlock {
            range: BarRange { start, end },
            layers,
            span: at.span.to(last),
        })
    }

    fn expect_bar_number(&mut self) -> Option<u32> {
        let token = self.peek();
        let message = match token.kind {
            TokenKind::Number => match token.value.parse::<u32>() {
                Ok(bar) => {
                    self.advance();
                    return Some(bar);
                }
                Err(_) => format!("bar number must be a whole number, found `{}`", token.value),
            },
            _ => format!("expected a bar number, found {}", describe(token)),
        };

        self.error(ErrorCode::UnexpectedToken, message, token.span);
        self.skip_to_next_bar();
        None
    }

    /// A header ends the line; a trailing comment is fine, and so is EOF.
    fn expect_header_end(&mut self) {
        if self.check(TokenKind::Comment) {
            self.advance();
        }

        match self.peek().kind {
            TokenKind::Newline => {
                self.advance();
            }
            TokenKind::Eof => {}
            _ => {
                let token = self.peek();
                self.error(
                    ErrorCode::UnexpectedToken,
                    format!("expected end of line after bar header, found {}", describe(token)),
                    token.span,
                );
                self.skip_line();
            }
        }
    }

    // =========================================================================
    // Pattern layers
    // =========================================================================

    /// Parse `name(selection) key=value ... // comment`.
    fn parse_pattern_layer(&mut self) -> Option<PatternLayer> {
        let name = self.advance();

        let registry = self.registry;
        let Some(def) = registry.get(&name.value) else {
            let known = registry.keys();
            let hint = if known.is_empty() {
                "no patterns are registered".to_string()
            } else {
                format!("available patterns: {}", known.join(", "))
            };
            self.errors.push(
                DslError::new(
                    ErrorCode::UnknownPattern,
                    format!("unknown pattern `{}`", name.value),
                    name.span,
                )
                .with_hint(hint),
            );
            self.skip_line();
            return None;
        };

        if !self.check(TokenKind::LParen) {
            self.errors.push(
                DslError::new(
                    ErrorCode::MissingSelection,
                    format!("pattern `{}` needs a selection", name.value),
                    name.span,
                )
                .with_hint(format!("select fixtures by tag, e.g. `{}(all)`", name.value)),
            );
            self.skip_line();
            return None;
        }
        self.advance(); // consume `(`

        let selection = self.parse_tag_expr();

        if self.check(TokenKind::RParen) {
            self.advance();
        } else if !self.nesting_exceeded {
            let token = self.peek();
            self.error(
                ErrorCode::UnexpectedToken,
                format!("expected ')' to close the selection, found {}", describe(token)),
                token.span,
            );
        }

        let mut args = Vec::new();
        let mut blend = DEFAULT_BLEND_MODE;

        while self.check(TokenKind::Identifier) && self.peek_next().kind == TokenKind::Equals {
            let key = self.advance();
            self.advance(); // consume `=`

            if key.value == "blend" {
                self.parse_blend(&mut blend);
                continue;
            }

            let Some((value, value_span)) = self.parse_value(&key.value) else {
                continue;
            };

            let arg = Arg {
                key: key.value.clone(),
                value,
                span: key.span.to(value_span),
            };
            self.check_arg(def, &arg, value_span);
            args.push(arg);
        }

        if self.check(TokenKind::Comment) {
            self.advance();
        }
        let span = name.span.to(self.previous);

        // One layer per line: free text is dropped, anything else is reported
        match self.peek().kind {
            TokenKind::Newline | TokenKind::Eof => {}
            TokenKind::Identifier => self.skip_rest_of_line(),
            _ => {
                let token = self.peek();
                self.error(
                    ErrorCode::UnexpectedToken,
                    format!("unexpected {} after layer", describe(token)),
                    token.span,
                );
                self.skip_line();
            }
        }

        Some(PatternLayer {
            pattern: name.value.clone(),
            selection,
            args,
            blend,
            span,
        })
    }

    /// Parse the value of `blend=`. On failure `blend` keeps its current value.
    fn parse_blend(&mut self, blend: &mut BlendMode) {
        let token = self.peek();
        let message = match token.kind {
            TokenKind::Identifier => {
                self.advance();
                match BlendMode::from_name(&token.value) {
                    Some(mode) => {
                        *blend = mode;
                        return;
                    }
                    None => format!("unknown blend mode `{}`", token.value),
                }
            }
            _ => {
                self.skip_value_token();
                format!("expected a blend mode name, found {}", describe(token))
            }
        };

        let modes: Vec<&str> = BLEND_MODES.iter().map(BlendMode::name).collect();
        self.errors.push(
            DslError::new(ErrorCode::InvalidBlendMode, message, token.span)
                .with_hint(format!("valid blend modes: {}", modes.join(", "))),
        );
    }

    /// Parse a single argument value: a hex colour, number, or identifier.
    fn parse_value(&mut self, key: &str) -> Option<(ArgValue, Span)> {
        let token = self.peek();
        let value = match token.kind {
            TokenKind::HexColor => Some(ArgValue::Color {
                hex: token.value.clone(),
            }),
            TokenKind::Number => token
                .value
                .parse::<f64>()
                .ok()
                .map(|value| ArgValue::Number { value }),
            TokenKind::Identifier => Some(ArgValue::Identifier {
                value: token.value.clone(),
            }),
            _ => None,
        };

        match value {
            Some(value) => {
                self.advance();
                Some((value, token.span))
            }
            None => {
                self.error(
                    ErrorCode::UnexpectedToken,
                    format!("expected a value for `{key}`, found {}", describe(token)),
                    token.span,
                );
                self.skip_value_token();
                None
            }
        }
    }

    /// Validate an argument against the pattern's declared arguments.
    /// The argument is kept by the caller whatever the outcome.
    fn check_arg(&mut self, def: &PatternDef, arg: &Arg, value_span: Span) {
        match def.arg(&arg.key) {
            None => self.warnings.push(DslWarning::new(
                WarningCode::UnknownArg,
                format!("pattern `{}` has no argument `{}`", def.name, arg.key),
                arg.span,
            )),
            Some(arg_def) if arg_def.arg_type == ArgType::Selection => {
                self.warnings.push(DslWarning::new(
                    WarningCode::SelectionAsArg,
                    format!(
                        "`{}` is a selection; pass it inside the parentheses instead",
                        arg.key
                    ),
                    arg.span,
                ))
            }
            Some(arg_def) if !arg_def.arg_type.accepts(&arg.value) => {
                self.error(
                    ErrorCode::TypeMismatch,
                    format!(
                        "argument `{}` expects {}, found {}",
                        arg.key,
                        arg_def.arg_type.describe(),
                        arg.value.kind_name()
                    ),
                    value_span,
                );
            }
            Some(_) => {}
        }
    }

    // =========================================================================
    // Token navigation helpers
    // =========================================================================

    pub(crate) fn peek(&self) -> &'a Token {
        static EOF: std::sync::LazyLock<Token> = std::sync::LazyLock::new(|| {
            Token::new(TokenKind::Eof, "", Span::point(Loc::origin()))
        });
        let tokens = self.tokens;
        tokens.get(self.pos).or(tokens.last()).unwrap_or(&EOF)
    }

    fn peek_next(&self) -> &'a Token {
        let tokens = self.tokens;
        tokens.get(self.pos + 1).unwrap_or_else(|| self.peek())
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Consume and return the current token. EOF is never consumed.
    pub(crate) fn advance(&mut self) -> &'a Token {
        let token = self.peek();
        if token.kind != TokenKind::Eof && self.pos < self.tokens.len() {
            self.pos += 1;
            self.previous = token.span;
        }
        token
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// Skip blank lines and comment-only lines.
    pub(crate) fn skip_trivia(&mut self) {
        while matches!(self.peek().kind, TokenKind::Newline | TokenKind::Comment) {
            self.advance();
        }
    }

    /// Discard tokens up to and including the next newline (recovery).
    fn skip_line(&mut self) {
        let line = self.peek().span.start.line;
        tracing::debug!(line, "recovering: skipping rest of line");
        self.skip_rest_of_line();
    }

    /// Discard tokens up to, not including, the next newline.
    pub(crate) fn skip_to_line_end(&mut self) {
        while !matches!(self.peek().kind, TokenKind::Newline | TokenKind::Eof) {
            self.advance();
        }
    }

    fn skip_rest_of_line(&mut self) {
        while !self.is_at_end() {
            if self.advance().kind == TokenKind::Newline {
                break;
            }
        }
    }

    /// Discard everything up to the next `@` (abandoned bar).
    fn skip_to_next_bar(&mut self) {
        let line = self.peek().span.start.line;
        tracing::debug!(line, "recovering: abandoning bar");
        while !self.is_at_end() && !self.check(TokenKind::At) {
            self.advance();
        }
    }

    /// Drop a bad value token unless it ends the line.
    fn skip_value_token(&mut self) {
        if !matches!(
            self.peek().kind,
            TokenKind::Newline | TokenKind::Comment | TokenKind::Eof
        ) {
            self.advance();
        }
    }

    pub(crate) fn error(&mut self, code: ErrorCode, message: String, span: Span) {
        tracing::debug!(%code, line = span.start.line, column = span.start.column, "{message}");
        self.errors.push(DslError::new(code, message, span));
    }
}

/// Describe a token for an error message: its text if it has any.
pub(crate) fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Newline | TokenKind::Eof => token.kind.describe().to_string(),
        TokenKind::Comment => "comment".to_string(),
        _ => format!("`{}`", token.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::TagExpr;
    use crate::registry::{ArgDef, InMemoryRegistry};
    use pretty_assertions::assert_eq;

    fn registry() -> InMemoryRegistry {
        InMemoryRegistry::new()
            .with_pattern(PatternDef::new(
                "pulse",
                vec![
                    ArgDef::new("color", ArgType::Color),
                    ArgDef::new("speed", ArgType::Scalar),
                    ArgDef::new("targets", ArgType::Selection),
                    ArgDef::new("shape", ArgType::Scalar),
                ],
            ))
            .with_pattern(PatternDef::new("chase", vec![]))
            .with_pattern(PatternDef::new("wash", vec![]))
    }

    fn parse(source: &str) -> ParseResult {
        Parser::parse(source, &registry())
    }

    fn codes(result: &ParseResult) -> Vec<ErrorCode> {
        result.errors().iter().map(|e| e.code).collect()
    }

    fn only_pattern(result: &ParseResult) -> &PatternLayer {
        let bars = &result.document().bars;
        assert_eq!(bars.len(), 1, "expected one bar");
        match bars[0].layers.as_slice() {
            [Layer::Pattern(layer)] => layer,
            other => panic!("Expected one pattern layer, got {other:?}"),
        }
    }

    // =========================================================================
    // Empty / simple
    // =========================================================================

    #[test]
    fn test_empty_source() {
        let result = parse("");
        assert!(result.is_success());
        assert!(result.document().bars.is_empty());
    }

    #[test]
    fn test_comments_and_blank_lines_only() {
        let result = parse("// intro\n\n   \n// more\n");
        assert!(result.is_success());
        assert!(result.document().bars.is_empty());
    }

    #[test]
    fn test_single_pattern_layer() {
        let result = parse("@1\npulse(all)\n");
        assert!(result.is_success());
        let layer = only_pattern(&result);
        assert_eq!(layer.pattern, "pulse");
        assert_eq!(layer.selection, TagExpr::tag("all"));
        assert_eq!(layer.blend, DEFAULT_BLEND_MODE);
        assert!(layer.args.is_empty());
    }

    // =========================================================================
    // Bar headers
    // =========================================================================

    #[test]
    fn test_bar_range() {
        let result = parse("@1-4\nhold\n@5\nhold");
        assert!(result.is_success());
        let ranges: Vec<BarRange> = result.document().bars.iter().map(|b| b.range).collect();
        assert_eq!(
            ranges,
            vec![BarRange { start: 1, end: 4 }, BarRange::single(5)]
        );
    }

    #[test]
    fn test_equal_range_is_valid() {
        let result = parse("@3-3\nhold");
        assert!(result.is_success());
        assert_eq!(result.document().bars[0].range, BarRange::single(3));
    }

    #[test]
    fn test_header_at_eof() {
        let result = parse("@7");
        assert!(result.is_success());
        assert_eq!(result.document().bars[0].range, BarRange::single(7));
        assert!(result.document().bars[0].layers.is_empty());
    }

    #[test]
    fn test_header_with_comment() {
        let result = parse("@2 // chorus\nhold\n");
        assert!(result.is_success());
        assert_eq!(result.document().bars[0].layers.len(), 1);
    }

    #[test]
    fn test_inverted_range_abandons_bar() {
        let result = parse("@5-3\npulse(all)\nhold\n@6\nhold\n");
        assert_eq!(codes(&result), vec![ErrorCode::InvalidBarRange]);
        let bars = &result.document().bars;
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].range, BarRange::single(6));

        let error = &result.errors()[0];
        assert_eq!(error.span.start.offset, 1);
        assert_eq!(error.span.end.offset, 4);
        assert_eq!(error.hint.as_deref(), Some("write the lower bar first: @3-5"));
    }

    #[test]
    fn test_missing_bar_number() {
        let result = parse("@\nhold\n@2\nhold");
        assert_eq!(codes(&result), vec![ErrorCode::UnexpectedToken]);
        assert_eq!(result.document().bars.len(), 1);
        assert_eq!(result.document().bars[0].range, BarRange::single(2));
    }

    #[test]
    fn test_fractional_bar_number() {
        let result = parse("@1.5\nhold");
        assert_eq!(codes(&result), vec![ErrorCode::UnexpectedToken]);
        assert!(result.errors()[0].message.contains("whole number"));
        assert!(result.document().bars.is_empty());
    }

    #[test]
    fn test_trailing_tokens_after_header_keep_bar() {
        let result = parse("@1 chase(all)\nwash(all)\n");
        assert_eq!(codes(&result), vec![ErrorCode::UnexpectedToken]);
        let bar = &result.document().bars[0];
        assert_eq!(bar.layers.len(), 1);
    }

    #[test]
    fn test_top_level_garbage_recovers() {
        let result = parse("pulse(all)\n@1\nhold\n");
        assert_eq!(codes(&result), vec![ErrorCode::UnexpectedToken]);
        assert_eq!(result.document().bars.len(), 1);
    }

    #[test]
    fn test_bar_span_covers_layers() {
        let source = "@1\nhold\nchase(all)\n";
        let result = parse(source);
        let bar = &result.document().bars[0];
        assert_eq!(bar.span.slice(source), "@1\nhold\nchase(all)");
    }

    #[test]
    fn test_empty_bar_span_is_header() {
        let source = "@1-2\n@3";
        let result = parse(source);
        assert_eq!(result.document().bars[0].span.slice(source), "@1-2");
    }

    // =========================================================================
    // Layers
    // =========================================================================

    #[test]
    fn test_hold_discards_rest_of_line() {
        let result = parse("@1\nhold everything ( here\nchase(all)");
        assert!(result.is_success());
        let layers = &result.document().bars[0].layers;
        assert_eq!(layers.len(), 2);
        assert!(matches!(layers[0], Layer::Hold { .. }));
    }

    #[test]
    fn test_unexpected_layer_token() {
        let result = parse("@1\n= nonsense\nchase(all)\n");
        assert_eq!(codes(&result), vec![ErrorCode::UnexpectedToken]);
        assert_eq!(result.document().bars[0].layers.len(), 1);
    }

    #[test]
    fn test_unknown_pattern_drops_layer_only() {
        let result = parse("@1\nstrobe(all)\nchase(all)\n");
        assert_eq!(codes(&result), vec![ErrorCode::UnknownPattern]);
        let error = &result.errors()[0];
        assert_eq!(
            error.hint.as_deref(),
            Some("available patterns: chase, pulse, wash")
        );
        assert_eq!(result.document().bars[0].layers.len(), 1);
    }

    #[test]
    fn test_unknown_pattern_with_empty_registry() {
        let result = Parser::parse("@1\nchase(all)", &InMemoryRegistry::new());
        assert_eq!(
            result.errors()[0].hint.as_deref(),
            Some("no patterns are registered")
        );
    }

    #[test]
    fn test_missing_selection() {
        let result = parse("@1\nchase all\nwash(all)");
        assert_eq!(codes(&result), vec![ErrorCode::MissingSelection]);
        assert_eq!(result.document().bars[0].layers.len(), 1);
    }

    #[test]
    fn test_missing_close_paren_keeps_layer() {
        let result = parse("@1\nchase(red & left\nwash(all)");
        assert_eq!(codes(&result), vec![ErrorCode::UnexpectedToken]);
        let layers = &result.document().bars[0].layers;
        assert_eq!(layers.len(), 2);
        match &layers[0] {
            Layer::Pattern(layer) => assert_eq!(
                layer.selection,
                TagExpr::and(TagExpr::tag("red"), TagExpr::tag("left"))
            ),
            other => panic!("Expected pattern layer, got {other:?}"),
        }
    }

    #[test]
    fn test_layer_span() {
        let source = "@1\n  pulse(all) speed=2 // fast\n";
        let result = parse(source);
        let layer = only_pattern(&result);
        assert_eq!(layer.span.slice(source), "pulse(all) speed=2 // fast");
    }

    // =========================================================================
    // Arguments
    // =========================================================================

    #[test]
    fn test_typed_args() {
        let source = "@1\npulse(all) color=#ff0000 speed=0.5 blend=screen";
        let result = parse(source);
        assert!(result.is_success(), "{:?}", result.errors());
        let layer = only_pattern(&result);
        assert_eq!(layer.blend, BlendMode::Screen);
        assert_eq!(
            layer.args.iter().map(|a| a.value.clone()).collect::<Vec<_>>(),
            vec![
                ArgValue::Color {
                    hex: "#ff0000".into()
                },
                ArgValue::Number { value: 0.5 },
            ]
        );
        assert_eq!(layer.args[0].span.slice(source), "color=#ff0000");
    }

    #[test]
    fn test_invalid_blend_mode_keeps_default() {
        let result = parse("@1\npulse(all) blend=bogus speed=1");
        assert_eq!(codes(&result), vec![ErrorCode::InvalidBlendMode]);
        assert_eq!(
            result.errors()[0].hint.as_deref(),
            Some("valid blend modes: replace, add, multiply, screen, max, min, lighten, value")
        );
        let layer = only_pattern(&result);
        assert_eq!(layer.blend, DEFAULT_BLEND_MODE);
        assert_eq!(layer.args.len(), 1);
    }

    #[test]
    fn test_invalid_blend_keeps_previous_mode() {
        let result = parse("@1\npulse(all) blend=add blend=nope");
        assert_eq!(codes(&result), vec![ErrorCode::InvalidBlendMode]);
        assert_eq!(only_pattern(&result).blend, BlendMode::Add);
    }

    #[test]
    fn test_numeric_blend_mode() {
        let result = parse("@1\npulse(all) blend=3 speed=1");
        assert_eq!(codes(&result), vec![ErrorCode::InvalidBlendMode]);
        assert_eq!(only_pattern(&result).args.len(), 1);
    }

    #[test]
    fn test_type_mismatch_keeps_arg() {
        let result = parse("@1\npulse(all) color=5");
        assert_eq!(codes(&result), vec![ErrorCode::TypeMismatch]);
        let layer = only_pattern(&result);
        assert_eq!(
            layer.args,
            vec![Arg {
                key: "color".into(),
                value: ArgValue::Number { value: 5.0 },
                span: layer.args[0].span,
            }]
        );
    }

    #[test]
    fn test_identifier_for_scalar_is_mismatch() {
        let result = parse("@1\npulse(all) shape=sine");
        assert_eq!(codes(&result), vec![ErrorCode::TypeMismatch]);
        assert!(result.errors()[0].message.contains("expects a number"));
    }

    #[test]
    fn test_unknown_arg_warns() {
        let result = parse("@1\nchase(all) speed=2");
        assert!(result.is_success());
        assert_eq!(result.warnings()[0].code, WarningCode::UnknownArg);
        assert_eq!(only_pattern(&result).args.len(), 1);
    }

    #[test]
    fn test_selection_as_arg_warns() {
        let result = parse("@1\npulse(all) targets=left");
        assert!(result.is_success());
        assert_eq!(result.warnings()[0].code, WarningCode::SelectionAsArg);
        assert_eq!(only_pattern(&result).args[0].key, "targets");
    }

    #[test]
    fn test_bad_value_continues_with_next_arg() {
        let result = parse("@1\npulse(all) speed=( color=#00ff00");
        assert_eq!(codes(&result), vec![ErrorCode::UnexpectedToken]);
        let layer = only_pattern(&result);
        assert_eq!(layer.args.len(), 1);
        assert_eq!(layer.args[0].key, "color");
    }

    #[test]
    fn test_missing_value_at_end_of_line() {
        let result = parse("@1\npulse(all) speed=\nchase(all)");
        assert_eq!(codes(&result), vec![ErrorCode::UnexpectedToken]);
        assert_eq!(result.document().bars[0].layers.len(), 2);
    }

    #[test]
    fn test_identifier_without_equals_ends_args() {
        let source = "@1\npulse(all) speed=1 fast and loud\n";
        let result = parse(source);
        assert!(result.is_success(), "{:?}", result.errors());
        let layer = only_pattern(&result);
        assert_eq!(layer.args.len(), 1);
        assert_eq!(layer.span.slice(source), "pulse(all) speed=1");
    }

    #[test]
    fn test_one_layer_per_line() {
        let result = parse("@1\nchase(all) wash(all)\n");
        assert!(result.is_success());
        let layer = only_pattern(&result);
        assert_eq!(layer.pattern, "chase");
    }

    #[test]
    fn test_hold_after_layer_is_free_text() {
        let result = parse("@1\nchase(all) hold\nwash(all)");
        assert!(result.is_success());
        let layers = &result.document().bars[0].layers;
        assert_eq!(layers.len(), 2);
        assert!(layers.iter().all(|l| matches!(l, Layer::Pattern(_))));
    }

    #[test]
    fn test_trailing_junk_after_layer() {
        let result = parse("@1\nchase(all) ) ( &\nwash(all)");
        assert_eq!(codes(&result), vec![ErrorCode::UnexpectedToken]);
        assert_eq!(result.errors()[0].message, "unexpected `)` after layer");
        assert_eq!(result.document().bars[0].layers.len(), 2);
    }
}

//! Diagnostics produced while parsing a score.
//!
//! Errors are fatal to the construct they occur in (a bar, a layer, or a
//! single argument) but never to the whole parse. Warnings never affect
//! the outcome. Both are plain data collected by the parser.

use crate::ast::Document;
use luma_score_lexer::Span;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    UnexpectedToken,
    InvalidBarRange,
    UnknownPattern,
    MissingSelection,
    InvalidBlendMode,
    TypeMismatch,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnexpectedToken => "unexpected_token",
            ErrorCode::InvalidBarRange => "invalid_bar_range",
            ErrorCode::UnknownPattern => "unknown_pattern",
            ErrorCode::MissingSelection => "missing_selection",
            ErrorCode::InvalidBlendMode => "invalid_blend_mode",
            ErrorCode::TypeMismatch => "type_mismatch",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCode {
    SelectionAsArg,
    UnknownArg,
}

impl WarningCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::SelectionAsArg => "selection_as_arg",
            WarningCode::UnknownArg => "unknown_arg",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A blocking diagnostic with position information.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{code} at {span}: {message}")]
pub struct DslError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl DslError {
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            message: message.into(),
            span,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// An advisory diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DslWarning {
    pub code: WarningCode,
    pub message: String,
    pub span: Span,
}

impl DslWarning {
    pub fn new(code: WarningCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            message: message.into(),
            span,
        }
    }
}

impl std::fmt::Display for DslWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}: {}", self.code, self.span, self.message)
    }
}

/// Outcome of a parse.
///
/// `Failure` is returned iff at least one error was recorded. Its `partial`
/// document holds every bar and layer that was built without error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParseResult {
    Success {
        document: Document,
        warnings: Vec<DslWarning>,
    },
    Failure {
        errors: Vec<DslError>,
        warnings: Vec<DslWarning>,
        partial: Document,
    },
}

impl ParseResult {
    pub(crate) fn from_parts(
        document: Document,
        errors: Vec<DslError>,
        warnings: Vec<DslWarning>,
    ) -> Self {
        if errors.is_empty() {
            ParseResult::Success { document, warnings }
        } else {
            ParseResult::Failure {
                errors,
                warnings,
                partial: document,
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ParseResult::Success { .. })
    }

    /// The full document on success, or the partial document on failure.
    pub fn document(&self) -> &Document {
        match self {
            ParseResult::Success { document, .. } => document,
            ParseResult::Failure { partial, .. } => partial,
        }
    }

    pub fn errors(&self) -> &[DslError] {
        match self {
            ParseResult::Success { .. } => &[],
            ParseResult::Failure { errors, .. } => errors,
        }
    }

    pub fn warnings(&self) -> &[DslWarning] {
        match self {
            ParseResult::Success { warnings, .. } | ParseResult::Failure { warnings, .. } => {
                warnings
            }
        }
    }
}

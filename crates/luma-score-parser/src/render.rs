//! Compiler-style rendering of diagnostics against their source.
//!
//! ```text
//! error[type_mismatch]: argument `color` expects a color, found number
//!  --> 2:18
//!   |
//! 2 | pulse(all) color=5
//!   |                  ^
//! ```

use crate::diagnostics::{DslError, DslWarning, ParseResult};
use luma_score_lexer::Span;

pub fn render_error(source: &str, error: &DslError) -> String {
    format_one(
        source,
        "error",
        error.code.as_str(),
        &error.message,
        error.span,
        error.hint.as_deref(),
    )
}

pub fn render_warning(source: &str, warning: &DslWarning) -> String {
    format_one(
        source,
        "warning",
        warning.code.as_str(),
        &warning.message,
        warning.span,
        None,
    )
}

/// Render every diagnostic in source order, followed by a summary line.
pub fn render_report(source: &str, result: &ParseResult) -> String {
    let mut entries: Vec<(usize, String)> = result
        .errors()
        .iter()
        .map(|e| (e.span.start.offset, render_error(source, e)))
        .chain(
            result
                .warnings()
                .iter()
                .map(|w| (w.span.start.offset, render_warning(source, w))),
        )
        .collect();
    // stable: errors stay ahead of warnings at the same offset
    entries.sort_by_key(|(offset, _)| *offset);

    let mut output: String = entries.into_iter().map(|(_, text)| text).collect();
    output.push_str(&summary(result.errors().len(), result.warnings().len()));
    output
}

fn summary(errors: usize, warnings: usize) -> String {
    let plural = |n: usize| if n == 1 { "" } else { "s" };
    format!(
        "{errors} error{}, {warnings} warning{}\n",
        plural(errors),
        plural(warnings)
    )
}

fn format_one(
    source: &str,
    severity: &str,
    code: &str,
    message: &str,
    span: Span,
    hint: Option<&str>,
) -> String {
    let mut out = format!("{severity}[{code}]: {message}\n");
    out.push_str(&format!(" --> {}\n", span.start));

    let line_no = span.start.line;
    if let Some(source_line) = source_line(source, line_no) {
        let width = line_no.to_string().len();
        let line_len = source_line.chars().count();
        let column = span.start.column.saturating_sub(1);

        // Underline to the end of the span, clipped to this line; at least one caret
        let underline = if span.end.line == line_no {
            span.len().max(1)
        } else {
            line_len.saturating_sub(column).max(1)
        };

        out.push_str(&format!("{:width$} |\n", ""));
        out.push_str(&format!("{line_no} | {source_line}\n"));
        out.push_str(&format!(
            "{:width$} | {}{}\n",
            "",
            " ".repeat(column),
            "^".repeat(underline)
        ));
    }

    if let Some(hint) = hint {
        out.push_str(&format!("  = help: {hint}\n"));
    }

    out
}

/// Line `line_no` (1-based), splitting on `\n`, `\r\n` and a lone `\r`
/// the same way the scanner counts lines.
fn source_line(source: &str, line_no: usize) -> Option<&str> {
    let mut rest = source;
    for _ in 1..line_no {
        let end = rest.find(['\n', '\r'])?;
        let next = if rest[end..].starts_with("\r\n") { end + 2 } else { end + 1 };
        rest = &rest[next..];
    }
    let end = rest.find(['\n', '\r']).unwrap_or(rest.len());
    Some(&rest[..end])
}

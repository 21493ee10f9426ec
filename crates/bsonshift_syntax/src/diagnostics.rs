//! Syntax diagnostics.
//!
//! Lexer and parser errors carry a byte [`Span`]. Line and column are filled in by [`SyntaxError::locate`] once the
//! source text is at hand, so the parser itself stays source-free.

use crate::ast::Span;

/// A lexing or parsing error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
#[error("{message}")]
#[diagnostic(code(bsonshift::syntax))]
pub struct SyntaxError {
    pub message: String,
    #[label("here")]
    pub span: Span,
    /// 1-based line, or 0 before [`SyntaxError::locate`] runs.
    pub line: usize,
    /// 1-based column in characters, or 0 before [`SyntaxError::locate`] runs.
    pub column: usize,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            line: 0,
            column: 0,
        }
    }

    /// Fill in line and column from `source`.
    pub fn locate(mut self, source: &str) -> Self {
        let (line, column) = line_col(source, self.span.start);
        self.line = line;
        self.column = column;
        self
    }
}

/// Return the 1-based line and column of byte `offset` in `source`.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

//! Transpiler error types.
//!
//! Every failure is fatal to the compile that raised it: there are no partial results and no warnings. The error
//! kinds mirror the classic script error taxonomy because that is what users of the source dialects expect to see
//! (`ReferenceError` for an unknown symbol, `TypeError` for calling a non-function, ...).

use bsonshift_syntax::ast::Span;
use bsonshift_syntax::diagnostics::SyntaxError;

/// Coarse error classification, stable across message wording changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Syntax,
    Reference,
    Attribute,
    Argument,
    Type,
    Runtime,
    Unimplemented,
    Internal,
}

impl ErrorKind {
    /// Machine-readable code (`SYNTAX_ERROR`, `REFERENCE_ERROR`, ...).
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Syntax => "SYNTAX_ERROR",
            ErrorKind::Reference => "REFERENCE_ERROR",
            ErrorKind::Attribute => "ATTRIBUTE_ERROR",
            ErrorKind::Argument => "ARGUMENT_ERROR",
            ErrorKind::Type => "TYPE_ERROR",
            ErrorKind::Runtime => "RUNTIME_ERROR",
            ErrorKind::Unimplemented => "UNIMPLEMENTED_ERROR",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Syntax => "SyntaxError",
            ErrorKind::Reference => "ReferenceError",
            ErrorKind::Attribute => "AttributeError",
            ErrorKind::Argument => "ArgumentError",
            ErrorKind::Type => "TypeError",
            ErrorKind::Runtime => "RuntimeError",
            ErrorKind::Unimplemented => "UnimplementedError",
            ErrorKind::Internal => "InternalError",
        };
        f.write_str(name)
    }
}

/// Error raised by a compile or value-mode evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum TranspileError {
    #[error("{message}")]
    #[diagnostic(code(bsonshift::syntax))]
    Syntax {
        message: String,
        line: usize,
        column: usize,
        #[label("here")]
        span: Span,
    },

    #[error("{0}")]
    #[diagnostic(code(bsonshift::reference))]
    Reference(String),

    #[error("{0}")]
    #[diagnostic(code(bsonshift::attribute))]
    Attribute(String),

    #[error("{0}")]
    #[diagnostic(code(bsonshift::argument))]
    Argument(String),

    #[error("{0}")]
    #[diagnostic(code(bsonshift::type_error))]
    Type(String),

    #[error("{0}")]
    #[diagnostic(code(bsonshift::runtime))]
    Runtime(String),

    #[error("{0}")]
    #[diagnostic(code(bsonshift::unimplemented))]
    Unimplemented(String),

    #[error("{0}")]
    #[diagnostic(code(bsonshift::internal))]
    Internal(String),
}

impl TranspileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranspileError::Syntax { .. } => ErrorKind::Syntax,
            TranspileError::Reference(_) => ErrorKind::Reference,
            TranspileError::Attribute(_) => ErrorKind::Attribute,
            TranspileError::Argument(_) => ErrorKind::Argument,
            TranspileError::Type(_) => ErrorKind::Type,
            TranspileError::Runtime(_) => ErrorKind::Runtime,
            TranspileError::Unimplemented(_) => ErrorKind::Unimplemented,
            TranspileError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// The message without the kind prefix.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// "'{name}' not yet implemented"
    pub fn not_implemented(name: &str) -> Self {
        TranspileError::Unimplemented(format!("'{name}' not yet implemented"))
    }
}

impl From<SyntaxError> for TranspileError {
    fn from(err: SyntaxError) -> Self {
        TranspileError::Syntax {
            message: err.message,
            line: err.line,
            column: err.column,
            span: err.span,
        }
    }
}

impl From<Vec<SyntaxError>> for TranspileError {
    /// Keep the first error; the frontend reports in source order.
    fn from(errors: Vec<SyntaxError>) -> Self {
        match errors.into_iter().next() {
            Some(err) => err.into(),
            None => TranspileError::Internal("syntax error reported without details".to_string()),
        }
    }
}

impl From<CatalogError> for TranspileError {
    fn from(err: CatalogError) -> Self {
        TranspileError::Internal(err.to_string())
    }
}

/// Error raised while loading catalog documents or parsing templates.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog document '{document}' is malformed: {source}")]
    Yaml {
        document: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("catalog document '{document}': {message}")]
    Invalid { document: String, message: String },

    #[error("template `{template}`: {message}")]
    Template { template: String, message: String },

    #[error("no catalog for {input} to {output}")]
    Unsupported { input: String, output: String },
}

impl CatalogError {
    pub fn invalid(document: &str, message: impl Into<String>) -> Self {
        CatalogError::Invalid {
            document: document.to_string(),
            message: message.into(),
        }
    }
}

pub type TranspileResult<T> = Result<T, TranspileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(TranspileError::Reference("x".into()).code(), "REFERENCE_ERROR");
        assert_eq!(
            TranspileError::Syntax {
                message: "m".into(),
                line: 1,
                column: 2,
                span: Span::default()
            }
            .code(),
            "SYNTAX_ERROR"
        );
        assert_eq!(ErrorKind::Unimplemented.to_string(), "UnimplementedError");
    }

    #[test]
    fn test_catalog_error_becomes_internal() {
        let err: TranspileError = CatalogError::invalid("basic", "missing types").into();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.to_string(), "catalog document 'basic': missing types");
    }

    #[test]
    fn test_not_implemented_message() {
        assert_eq!(
            TranspileError::not_implemented("ThisExpression").to_string(),
            "'ThisExpression' not yet implemented"
        );
    }
}

//! Token types for the bsonshift lexer.
//!
//! Vocabulary tokens carry registry ids from `bsonshift_core::lang` (`Keyword`, `Operator`, `Punctuation`). Literal
//! tokens keep enough of the source to render it back verbatim: numbers keep their text, strings keep the decoded
//! value while the quoted text stays reachable through the span.

use crate::ast::{NumberKind, Span};
use bsonshift_core::lang::keywords::{self, KeywordId};
use bsonshift_core::lang::operators::OperatorId;
use bsonshift_core::lang::punctuation::PunctuationId;
use bsonshift_core::lang::registry::SyntaxFamily;

// ============================================================================
// TOKEN TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ========== Keyword / operator / punctuation (ID-based) ==========
    Keyword(KeywordId),
    Operator(OperatorId),
    Punctuation(PunctuationId),

    // ========== Identifiers and Literals ==========
    Ident(String),
    Number { kind: NumberKind, text: String },
    String(String),
    Regex { pattern: String, flags: String },

    // ========== Special ==========
    Eof,
}

/// A token with its kind and source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Resolve an identifier spelling to a keyword id for `family`, if reserved.
pub fn keyword_id(name: &str, family: SyntaxFamily) -> Option<KeywordId> {
    keywords::from_str(name, family)
}

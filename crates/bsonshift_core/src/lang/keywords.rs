//! Define the reserved keyword vocabulary for the source dialects.
//!
//! This module is the single source of truth for reserved words: a stable identifier ([`KeywordId`]) plus a const
//! metadata table ([`KEYWORDS`]) recording the canonical spelling, the syntax family that reserves it, and its
//! category.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive** and **family-aware**: `true` is a keyword in JavaScript, `True` is
//!   a keyword in Python, and neither is reserved in the other family.
//! - `undefined` is an ordinary global in JavaScript; it is reserved here because the walker treats it as a literal.
//!
//! ## Examples
//! ```rust
//! use bsonshift_core::lang::keywords::{self, KeywordId};
//! use bsonshift_core::lang::registry::SyntaxFamily;
//!
//! assert_eq!(keywords::from_str("new", SyntaxFamily::JavaScript), Some(KeywordId::New));
//! assert_eq!(keywords::from_str("None", SyntaxFamily::Python), Some(KeywordId::None));
//! assert_eq!(keywords::from_str("None", SyntaxFamily::JavaScript), None);
//! ```

use super::registry::{Since, SyntaxFamily};

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Literals
    Null,
    Undefined,
    True,
    False,
    None,

    // Expression keywords
    New,
    Function,
    This,
    Delete,
    Void,
    Typeof,
    In,
    Instanceof,
    Lambda,

    // Word operators
    And,
    Or,
    Not,
    Is,
}

/// High-level grouping for documentation and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Literal,
    Expression,
    Operator,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub families: &'static [SyntaxFamily],
    pub category: KeywordCategory,
    pub since: Since,
}

const JS: &[SyntaxFamily] = &[SyntaxFamily::JavaScript];
const PY: &[SyntaxFamily] = &[SyntaxFamily::Python];
const BOTH: &[SyntaxFamily] = &[SyntaxFamily::JavaScript, SyntaxFamily::Python];

/// Registry of all keywords.
pub const KEYWORDS: &[KeywordInfo] = &[
    // Literals
    info(KeywordId::Null, "null", JS, KeywordCategory::Literal),
    info(KeywordId::Undefined, "undefined", JS, KeywordCategory::Literal),
    info(KeywordId::True, "true", JS, KeywordCategory::Literal),
    info(KeywordId::False, "false", JS, KeywordCategory::Literal),
    info(KeywordId::None, "None", PY, KeywordCategory::Literal),
    // Expressions
    info(KeywordId::New, "new", JS, KeywordCategory::Expression),
    info(KeywordId::Function, "function", JS, KeywordCategory::Expression),
    info(KeywordId::This, "this", JS, KeywordCategory::Expression),
    info(KeywordId::Delete, "delete", JS, KeywordCategory::Expression),
    info(KeywordId::Void, "void", JS, KeywordCategory::Expression),
    info(KeywordId::Typeof, "typeof", JS, KeywordCategory::Expression),
    info(KeywordId::In, "in", BOTH, KeywordCategory::Operator),
    info(KeywordId::Instanceof, "instanceof", JS, KeywordCategory::Operator),
    info(KeywordId::Lambda, "lambda", PY, KeywordCategory::Expression),
    // Word operators
    info(KeywordId::And, "and", PY, KeywordCategory::Operator),
    info(KeywordId::Or, "or", PY, KeywordCategory::Operator),
    info(KeywordId::Not, "not", PY, KeywordCategory::Operator),
    info(KeywordId::Is, "is", PY, KeywordCategory::Operator),
];

/// Python spellings of the boolean literals; they share ids with the JavaScript spellings.
const PY_BOOLEANS: &[(&str, KeywordId)] = &[("True", KeywordId::True), ("False", KeywordId::False)];

/// Return the canonical spelling for a keyword.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for a keyword.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS.iter().find(|k| k.id == id).expect("keyword info missing")
}

/// Lookup by spelling within one syntax family.
///
/// ## Returns
/// - `Some(KeywordId)` if the spelling is reserved in `family`.
/// - `None` otherwise.
pub fn from_str(s: &str, family: SyntaxFamily) -> Option<KeywordId> {
    if family == SyntaxFamily::Python {
        if let Some((_, id)) = PY_BOOLEANS.iter().find(|(spelling, _)| *spelling == s) {
            return Some(*id);
        }
    }
    KEYWORDS
        .iter()
        .find(|k| k.canonical == s && k.families.contains(&family))
        .map(|k| k.id)
}

const fn info(
    id: KeywordId,
    canonical: &'static str,
    families: &'static [SyntaxFamily],
    category: KeywordCategory,
) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        families,
        category,
        since: Since(0, 1),
    }
}

//! Operator vocabulary.
//!
//! The source dialects are restricted to side-effect-free expressions, so most operators are only *recognized*:
//! the parser builds nodes for them and the walker rejects them as unimplemented. Equality operators are the
//! exception and are rendered through the target's equality template.
//!
//! ## Examples
//! ```rust
//! use bsonshift_core::lang::operators::{self, OperatorCategory, OperatorId};
//!
//! assert_eq!(operators::from_str("==="), Some(OperatorId::EqEqEq));
//! assert_eq!(operators::category(OperatorId::NotEq), OperatorCategory::Equality);
//! ```

use super::registry::Since;

/// Stable identifier for operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    StarStar,

    // Equality
    EqEq,
    EqEqEq,
    NotEq,
    NotEqEq,

    // Relational
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    AndAnd,
    OrOr,
    Bang,

    // Assignment
    Eq,
}

/// Broad grouping for operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorCategory {
    Arithmetic,
    Equality,
    Relational,
    Logical,
    Assignment,
}

/// Metadata for an operator.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub canonical: &'static str,
    pub category: OperatorCategory,
    pub since: Since,
}

/// Registry of all operators.
pub const OPERATORS: &[OperatorInfo] = &[
    info(OperatorId::Plus, "+", OperatorCategory::Arithmetic),
    info(OperatorId::Minus, "-", OperatorCategory::Arithmetic),
    info(OperatorId::Star, "*", OperatorCategory::Arithmetic),
    info(OperatorId::Slash, "/", OperatorCategory::Arithmetic),
    info(OperatorId::Percent, "%", OperatorCategory::Arithmetic),
    info(OperatorId::StarStar, "**", OperatorCategory::Arithmetic),
    info(OperatorId::EqEq, "==", OperatorCategory::Equality),
    info(OperatorId::EqEqEq, "===", OperatorCategory::Equality),
    info(OperatorId::NotEq, "!=", OperatorCategory::Equality),
    info(OperatorId::NotEqEq, "!==", OperatorCategory::Equality),
    info(OperatorId::Lt, "<", OperatorCategory::Relational),
    info(OperatorId::LtEq, "<=", OperatorCategory::Relational),
    info(OperatorId::Gt, ">", OperatorCategory::Relational),
    info(OperatorId::GtEq, ">=", OperatorCategory::Relational),
    info(OperatorId::AndAnd, "&&", OperatorCategory::Logical),
    info(OperatorId::OrOr, "||", OperatorCategory::Logical),
    info(OperatorId::Bang, "!", OperatorCategory::Logical),
    info(OperatorId::Eq, "=", OperatorCategory::Assignment),
];

/// Return the canonical spelling for an operator.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).canonical
}

/// Return the category for an operator.
pub fn category(id: OperatorId) -> OperatorCategory {
    info_for(id).category
}

/// Return the full metadata entry for an operator.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    OPERATORS.iter().find(|o| o.id == id).expect("operator info missing")
}

/// Resolve an operator spelling to its identifier.
pub fn from_str(s: &str) -> Option<OperatorId> {
    OPERATORS.iter().find(|o| o.canonical == s).map(|o| o.id)
}

const fn info(id: OperatorId, canonical: &'static str, category: OperatorCategory) -> OperatorInfo {
    OperatorInfo {
        id,
        canonical,
        category,
        since: Since(0, 1),
    }
}

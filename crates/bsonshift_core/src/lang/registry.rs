//! Shareable metadata for `bsonshift_core::lang` registries.
//!
//! Every vocabulary in `lang` is **registry-first**: an id enum plus a `const` table of info structs. This submodule
//! provides the small metadata types reused across those tables.
//!
//! ## Notes
//! - These types are `Copy` so registries can live in `const` tables.
//! - Metadata is meant for tooling/docs/diagnostics; enforcement still lives in the lexer, parser and walker.
//!
//! ## See also
//! - [`crate::lang::keywords`]
//! - [`crate::lang::types`]

/// Version a vocabulary item is available since, as `(major, minor)`.
///
/// ## Examples
/// ```rust
/// use bsonshift_core::lang::registry::Since;
///
/// let since = Since(0, 1);
/// assert_eq!(since.to_string(), "0.1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Since(pub u16, pub u16);

impl std::fmt::Display for Since {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.0, self.1)
    }
}

/// Describe the lifecycle status of a vocabulary item.
///
/// ## Examples
/// ```rust
/// use bsonshift_core::lang::registry::Stability;
///
/// let s = Stability::Stable;
/// assert_eq!(format!("{s:?}"), "Stable");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stability {
    Stable,
    Draft,
    Deprecated,
}

/// Syntax family a source vocabulary item belongs to.
///
/// The shell dialect shares the JavaScript token grammar, so it has no separate entry here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxFamily {
    JavaScript,
    Python,
}

/// Represent a small example snippet for documentation.
#[derive(Debug, Clone, Copy)]
pub struct Example {
    pub code: &'static str,
    pub note: Option<&'static str>,
}

//! Provide the canonical vocabulary and pure string helpers shared by the bsonshift syntax frontend and transpiler.
//!
//! This crate is intentionally small and dependency-free. It contains:
//! - registry-backed vocabularies (languages, type keys, import codes, keywords, operators, punctuation, regex flags),
//! - numeric literal text helpers (octal spellings, integer parsing),
//! - quoting helpers used by templates and by the walker when it needs raw source text as a string literal.
//!
//! ## Notes
//!
//! - This is a "vocabulary" crate: **no IO**, no global state, and no AST types.
//! - The catalog YAML refers to type ids by spelling; [`lang::types`] is where those spellings become stable ids.
//!
//! ## Examples
//! ```rust
//! use bsonshift_core::lang::types::{self, TypeKey};
//! use bsonshift_core::strings::double_quote_stringify;
//!
//! assert_eq!(types::from_str("_long"), Some(TypeKey::Long));
//! assert_eq!(double_quote_stringify("'abc'"), "\"abc\"");
//! ```

pub mod lang;
pub mod numbers;
pub mod strings;

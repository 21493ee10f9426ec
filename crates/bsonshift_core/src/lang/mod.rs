//! bsonshift vocabulary registries.
//!
//! This module is the "front door" for vocabulary: source keywords, operators, punctuation, supported languages,
//! catalog type keys, import codes, and regular-expression flags.
//!
//! The design goal is to avoid stringly-typed checks scattered across the lexer, walker and targets. Callers work
//! with **stable IDs** (e.g. `TypeKey`, `LanguageId`) and look up spellings/metadata via registry tables.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no AST types, no IO, no side effects.
//! - The lexer/parser enforce syntax; registries provide spellings and metadata.
//!
//! ## Examples
//! ```rust
//! use bsonshift_core::lang::languages::{self, LanguageId};
//!
//! assert_eq!(languages::from_str("mongosh"), Some(LanguageId::Shell));
//! assert_eq!(languages::as_str(LanguageId::CSharp), "csharp");
//! ```

pub mod import_codes;
pub mod keywords;
pub mod languages;
pub mod operators;
pub mod punctuation;
pub mod regex_flags;
pub mod registry;
pub mod types;

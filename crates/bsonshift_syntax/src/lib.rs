//! Shared syntax frontend for the bsonshift source dialects: lexer, parser, AST, diagnostics.
//!
//! JavaScript (Node driver syntax), the MongoDB shell and Python all parse into the same [`ast::Program`] shape.
//! The [`SyntaxFamily`](bsonshift_core::lang::registry::SyntaxFamily) picks the keyword set and the handful of
//! grammar differences (regex literals, `===`, dicts, tuples, keyword arguments).
//!
//! ## Notes
//! - This crate is "syntax-only": it does not resolve symbols or types. That is the transpiler's walker.
//! - Vocabulary identity (keywords/operators/punctuation) comes from `bsonshift_core::lang` registries.
//!
//! ## Examples
//! ```rust
//! use bsonshift_core::lang::registry::SyntaxFamily;
//! use bsonshift_syntax::parser;
//!
//! let program = parser::parse_source("{'x': True}", SyntaxFamily::Python).unwrap();
//! assert_eq!(program.statements.len(), 1);
//! ```

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod token_helpers;

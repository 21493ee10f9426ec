//! Parser for the bsonshift source dialects.
//!
//! Converts a token stream into a [`Program`]: a run of expression statements. JavaScript and shell share one
//! grammar; Python differs in literals (dicts, tuples), keyword arguments and word operators, and the parser switches
//! on the [`SyntaxFamily`] it was built for.
//!
//! ## Examples
//!
//! ```rust
//! use bsonshift_core::lang::registry::SyntaxFamily;
//! use bsonshift_syntax::{lexer, parser};
//!
//! let tokens = lexer::lex("{x: ObjectId()}", SyntaxFamily::JavaScript).unwrap();
//! let program = parser::parse(&tokens, SyntaxFamily::JavaScript).unwrap();
//! assert_eq!(program.statements.len(), 1);
//! ```

use crate::ast::*;
use crate::diagnostics::SyntaxError;
use crate::lexer::{Token, TokenKind};
use bsonshift_core::lang::keywords::{self, KeywordId};
use bsonshift_core::lang::operators::{self, OperatorId};
use bsonshift_core::lang::punctuation::{self, PunctuationId};
use bsonshift_core::lang::registry::SyntaxFamily;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/expr.rs");
include!("parser/literals.rs");
include!("parser/api.rs");
include!("parser/tests.rs");

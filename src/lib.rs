#![forbid(unsafe_code)]
//! bsonshift: translate BSON-bearing expressions between languages.
//!
//! Source expressions written in JavaScript, the MongoDB shell dialect or Python are parsed, typed against a catalog
//! of literal and BSON types, and rendered as Java, C#, Python, JavaScript or shell source. An `object` target
//! evaluates the expression instead and yields a [`Value`].
//!
//! ## Layout
//!
//! - [`catalog`]: types, symbols, templates and import lines, loaded from embedded YAML per language pair.
//! - [`walker`]: the typed tree walker that renders a parsed program.
//! - [`targets`]: per-target overrides for what templates cannot express.
//! - [`sandbox`]: the restricted evaluator for constructor arguments and value mode.
//! - [`transpiler`]: the [`Transpiler`] entry point.
//!
//! ## Panic Policy
//!
//! - **Library code**: returns [`TranspileResult`]; no `.unwrap()` outside tests. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod errors;
pub mod sandbox;
pub mod targets;
pub mod transpiler;
pub mod value;
pub mod walker;

pub use catalog::Catalog;
pub use config::TranspileConfig;
pub use errors::{ErrorKind, TranspileError, TranspileResult};
pub use transpiler::Transpiler;
pub use value::Value;

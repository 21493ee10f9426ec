//! Per-target overrides for constructs templates cannot express.
//!
//! Each target exposes a closed table from [`TypeKey`] to an [`EmitFn`]. The walker consults the table before it
//! falls back to the catalog templates, both when a call is first visited (raw argument text only) and when a
//! process hook has prepared its arguments.
//!
//! Java additionally owns idiomatic forms for top-level documents (`Filters` builders, see [`java::filters`]) and
//! top-level arrays (aggregation pipelines, see [`java::pipeline`]).

pub mod csharp;
pub mod java;
pub mod javascript;
pub mod python;
pub mod shell;

use bsonshift_core::lang::languages::LanguageId;
use bsonshift_core::lang::types::TypeKey;
use bsonshift_syntax::ast::{Expr, Property};
use chrono::{DateTime, Utc};

use crate::errors::TranspileResult;
use crate::walker::Walker;

/// A date constructor call, after evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateArg {
    /// `None` for "the current time".
    pub date: Option<DateTime<Utc>>,
    /// `Date()` called without `new` yields a string in the source dialect.
    pub as_string: bool,
}

/// Inputs of an override.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmitCall<'a> {
    /// Arguments as prepared for the templates (rendered text, or values produced by a process hook).
    pub args: &'a [String],
    /// Raw source text of the call's arguments.
    pub raw: &'a [&'a str],
    pub date: Option<&'a DateArg>,
}

impl<'a> EmitCall<'a> {
    pub fn arg(&self, index: usize) -> Option<&'a str> {
        self.args.get(index).map(String::as_str)
    }

    pub fn raw(&self, index: usize) -> Option<&'a str> {
        self.raw.get(index).copied()
    }
}

pub type EmitFn = fn(&EmitCall<'_>) -> TranspileResult<String>;

/// Override table of one target.
pub fn emits(output: LanguageId) -> &'static [(TypeKey, EmitFn)] {
    match output {
        LanguageId::Java => java::EMITS,
        LanguageId::CSharp => csharp::EMITS,
        LanguageId::Python => python::EMITS,
        LanguageId::JavaScript => javascript::EMITS,
        LanguageId::Shell => shell::EMITS,
        LanguageId::Object => &[],
    }
}

pub fn emit_for(output: LanguageId, key: TypeKey) -> Option<EmitFn> {
    emits(output).iter().find(|(k, _)| *k == key).map(|(_, f)| *f)
}

/// Native rendering of a top-level document; `Ok(None)` falls back to the generic document form.
pub type ObjectFn = fn(&mut Walker<'_>, &[Property]) -> TranspileResult<Option<String>>;

pub fn idiomatic_object(output: LanguageId) -> Option<ObjectFn> {
    match output {
        LanguageId::Java => Some(java::filters),
        _ => None,
    }
}

/// Native rendering of a top-level array; `Ok(None)` falls back to the generic array form.
pub type ArrayFn = fn(&mut Walker<'_>, &[Option<Expr>]) -> TranspileResult<Option<String>>;

pub fn idiomatic_array(output: LanguageId) -> Option<ArrayFn> {
    match output {
        LanguageId::Java => Some(java::pipeline),
        _ => None,
    }
}

/// Milliseconds since the epoch.
pub(crate) fn millis(date: &DateTime<Utc>) -> i64 {
    date.timestamp_millis()
}

/// `2019-01-01T00:00:00.000Z`
pub(crate) fn iso(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

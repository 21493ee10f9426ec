//! Shell overrides.

use bsonshift_core::lang::types::TypeKey;

use super::{DateArg, EmitCall, EmitFn, iso};
use crate::errors::TranspileResult;

pub const EMITS: &[(TypeKey, EmitFn)] = &[
    (TypeKey::Date, emit_date),
    (TypeKey::IsoDate, emit_date),
    (TypeKey::Now, emit_now),
];

fn emit_date(call: &EmitCall<'_>) -> TranspileResult<String> {
    let arg = call.date.cloned().unwrap_or(DateArg {
        date: None,
        as_string: false,
    });
    Ok(match (arg.date, arg.as_string) {
        (None, false) => "new Date()".to_string(),
        (None, true) => "Date()".to_string(),
        (Some(d), false) => format!("ISODate('{}')", iso(&d)),
        (Some(d), true) => format!("ISODate('{}').toString()", iso(&d)),
    })
}

fn emit_now(_: &EmitCall<'_>) -> TranspileResult<String> {
    Ok("Date.now()".to_string())
}

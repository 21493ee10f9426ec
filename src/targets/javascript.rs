//! JavaScript overrides.

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
        (Some(d), false) => format!("new Date('{}')", iso(&d)),
        (Some(d), true) => format!("new Date('{}').toString()", iso(&d)),
    })
}

fn emit_now(_: &EmitCall<'_>) -> TranspileResult<String> {
    Ok("Date.now()".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_date_forms() {
        let value = DateArg {
            date: Some(Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap()),
            as_string: false,
        };
        let call = EmitCall {
            date: Some(&value),
            ..Default::default()
        };
        assert_eq!(emit_date(&call).unwrap(), "new Date('2019-01-01T00:00:00.000Z')");

        let string = DateArg {
            date: None,
            as_string: true,
        };
        let call = EmitCall {
            date: Some(&string),
            ..Default::default()
        };
        assert_eq!(emit_date(&call).unwrap(), "Date()");
    }
}

//! C# overrides.

use bsonshift_core::lang::types::TypeKey;
use bsonshift_core::strings;
use chrono::{Datelike, Timelike};

use super::{DateArg, EmitCall, EmitFn};
use crate::errors::{TranspileError, TranspileResult};

pub const EMITS: &[(TypeKey, EmitFn)] = &[
    (TypeKey::Date, emit_date),
    (TypeKey::IsoDate, emit_date),
    (TypeKey::Now, emit_now),
    (TypeKey::ObjectId, emit_object_id),
    (TypeKey::Symbol, emit_symbol),
    (TypeKey::Decimal128, emit_decimal128),
    (TypeKey::MinKey, emit_min_key),
    (TypeKey::MaxKey, emit_max_key),
];

fn emit_date(call: &EmitCall<'_>) -> TranspileResult<String> {
    let arg = call.date.cloned().unwrap_or(DateArg {
        date: None,
        as_string: false,
    });
    let value = match arg.date {
        None => "DateTime.Now".to_string(),
        Some(d) => format!(
            "new DateTime({}, {}, {}, {}, {}, {}, DateTimeKind.Utc)",
            d.year(),
            d.month(),
            d.day(),
            d.hour(),
            d.minute(),
            d.second()
        ),
    };
    Ok(if arg.as_string {
        format!("{value}.ToString(\"ddd MMM dd yyyy HH':'mm':'ss UTC\")")
    } else {
        value
    })
}

fn emit_now(_: &EmitCall<'_>) -> TranspileResult<String> {
    Ok("DateTime.Now".to_string())
}

/// `ObjectId()` has no public constructor form in the .NET driver.
fn emit_object_id(call: &EmitCall<'_>) -> TranspileResult<String> {
    Ok(match call.arg(0) {
        Some(hex) if !hex.is_empty() => format!("new ObjectId({})", strings::double_quote_stringify(hex)),
        _ => "ObjectId.GenerateNewId()".to_string(),
    })
}

/// Symbols are plain strings on the .NET side.
fn emit_symbol(call: &EmitCall<'_>) -> TranspileResult<String> {
    let raw = call
        .raw(0)
        .ok_or_else(|| TranspileError::Argument("Argument count mismatch: 'Symbol' requires least one argument".into()))?;
    Ok(format!("new BsonString({})", strings::double_quote_stringify(raw)))
}

fn emit_decimal128(call: &EmitCall<'_>) -> TranspileResult<String> {
    Ok(format!(
        "Decimal128.Parse({})",
        strings::double_quote_stringify(call.arg(0).unwrap_or("0"))
    ))
}

fn emit_min_key(_: &EmitCall<'_>) -> TranspileResult<String> {
    Ok("BsonMinKey.Value".to_string())
}

fn emit_max_key(_: &EmitCall<'_>) -> TranspileResult<String> {
    Ok("BsonMaxKey.Value".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_date_forms() {
        let date = DateArg {
            date: Some(Utc.with_ymd_and_hms(2019, 1, 2, 3, 4, 5).unwrap()),
            as_string: false,
        };
        let call = EmitCall {
            date: Some(&date),
            ..Default::default()
        };
        assert_eq!(emit_date(&call).unwrap(), "new DateTime(2019, 1, 2, 3, 4, 5, DateTimeKind.Utc)");

        let now = DateArg {
            date: None,
            as_string: true,
        };
        let call = EmitCall {
            date: Some(&now),
            ..Default::default()
        };
        assert_eq!(
            emit_date(&call).unwrap(),
            "DateTime.Now.ToString(\"ddd MMM dd yyyy HH':'mm':'ss UTC\")"
        );
    }

    #[test]
    fn test_object_id_without_hex_generates() {
        assert_eq!(emit_object_id(&EmitCall::default()).unwrap(), "ObjectId.GenerateNewId()");
        let args = vec!["5ab901c29ee65f5c8550c5b9".to_string()];
        let call = EmitCall {
            args: &args,
            ..Default::default()
        };
        assert_eq!(
            emit_object_id(&call).unwrap(),
            "new ObjectId(\"5ab901c29ee65f5c8550c5b9\")"
        );
    }

    #[test]
    fn test_symbol_uses_raw_text() {
        let raw = ["'abc'"];
        let call = EmitCall {
            raw: &raw,
            ..Default::default()
        };
        assert_eq!(emit_symbol(&call).unwrap(), "new BsonString(\"abc\")");
    }
}

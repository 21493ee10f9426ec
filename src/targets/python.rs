//! Python overrides.

use bsonshift_core::lang::types::TypeKey;
use chrono::{Datelike, Timelike};

use super::{DateArg, EmitCall, EmitFn};
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
    let value = match arg.date {
        None => "datetime.datetime.utcnow()".to_string(),
        Some(d) => {
            let micros = d.timestamp_subsec_micros();
            let fraction = if micros == 0 { String::new() } else { format!(", {micros}") };
            format!(
                "datetime.datetime({}, {}, {}, {}, {}, {}{fraction}, tzinfo=datetime.timezone.utc)",
                d.year(),
                d.month(),
                d.day(),
                d.hour(),
                d.minute(),
                d.second()
            )
        }
    };
    Ok(if arg.as_string {
        format!("{value}.strftime('%a %b %d %Y %H:%M:%S %Z')")
    } else {
        value
    })
}

fn emit_now(_: &EmitCall<'_>) -> TranspileResult<String> {
    Ok("datetime.datetime.utcnow()".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_date_with_millis() {
        let date = DateArg {
            date: Some(Utc.timestamp_millis_opt(1_546_300_800_250).unwrap()),
            as_string: false,
        };
        let call = EmitCall {
            date: Some(&date),
            ..Default::default()
        };
        assert_eq!(
            emit_date(&call).unwrap(),
            "datetime.datetime(2019, 1, 1, 0, 0, 0, 250000, tzinfo=datetime.timezone.utc)"
        );
    }

    #[test]
    fn test_date_string_form() {
        let date = DateArg {
            date: None,
            as_string: true,
        };
        let call = EmitCall {
            date: Some(&date),
            ..Default::default()
        };
        assert_eq!(
            emit_date(&call).unwrap(),
            "datetime.datetime.utcnow().strftime('%a %b %d %Y %H:%M:%S %Z')"
        );
    }
}

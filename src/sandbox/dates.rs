//! Date construction for the sandbox.
//!
//! Every date is UTC. JavaScript component constructors normalize overflowing fields (`new Date(2019, 12, 1)` is
//! January 2020) and map two-digit years to the 1900s; Python's `datetime` rejects out-of-range fields instead.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

use crate::errors::{TranspileError, TranspileResult};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%a %b %d %Y %H:%M:%S",
    "%b %d %Y %H:%M:%S",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%a %b %d %Y", "%b %d %Y", "%B %d, %Y", "%B %d %Y"];

fn invalid() -> TranspileError {
    TranspileError::Runtime("Invalid Date".to_string())
}

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Milliseconds since the epoch, truncated toward zero.
pub fn from_millis(ms: f64) -> TranspileResult<DateTime<Utc>> {
    if !ms.is_finite() {
        return Err(invalid());
    }
    DateTime::from_timestamp_millis(ms.trunc() as i64).ok_or_else(invalid)
}

pub fn from_seconds(seconds: f64) -> TranspileResult<DateTime<Utc>> {
    from_millis(seconds * 1000.0)
}

/// Parse date text the way the JavaScript `Date` constructor accepts it in practice.
///
/// Text without a zone is read as UTC.
pub fn parse(text: &str) -> TranspileResult<DateTime<Utc>> {
    let trimmed = text.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(date.with_timezone(&Utc));
    }
    if let Ok(date) = DateTime::parse_from_rfc2822(trimmed) {
        return Ok(date.with_timezone(&Utc));
    }
    let naive = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(date) = NaiveDateTime::parse_from_str(naive, format) {
            return Ok(date.and_utc());
        }
    }
    for format in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(naive, format) {
            return midnight(date);
        }
    }
    // `2019` and `2019-03`
    let (year, month) = match naive.split_once('-') {
        Some((year, month)) => (year, Some(month)),
        None => (naive, None),
    };
    if year.len() == 4 {
        if let Ok(year) = year.parse::<i32>() {
            let month = match month {
                Some(m) => m.parse::<u32>().map_err(|_| invalid())?,
                None => 1,
            };
            return midnight(NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?);
        }
    }
    Err(TranspileError::Runtime(format!("Invalid Date '{text}'")))
}

fn midnight(date: NaiveDate) -> TranspileResult<DateTime<Utc>> {
    Ok(date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?.and_utc())
}

/// `new Date(year, monthIndex[, day[, hours[, minutes[, seconds[, ms]]]]])`
pub fn from_js_components(parts: &[f64]) -> TranspileResult<DateTime<Utc>> {
    if parts.iter().any(|p| !p.is_finite()) {
        return Err(invalid());
    }
    let field = |i: usize, default: f64| parts.get(i).copied().unwrap_or(default).trunc() as i64;

    let mut year = field(0, 1970.0);
    if (0..=99).contains(&year) {
        year += 1900;
    }
    let month = field(1, 0.0);
    year += month.div_euclid(12);
    let month = u32::try_from(month.rem_euclid(12) + 1).map_err(|_| invalid())?;
    let year = i32::try_from(year).map_err(|_| invalid())?;

    let base = NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(invalid)?;
    let offset = (field(2, 1.0) - 1)
        .checked_mul(86_400_000)
        .and_then(|ms| ms.checked_add(field(3, 0.0).checked_mul(3_600_000)?))
        .and_then(|ms| ms.checked_add(field(4, 0.0).checked_mul(60_000)?))
        .and_then(|ms| ms.checked_add(field(5, 0.0).checked_mul(1000)?))
        .and_then(|ms| ms.checked_add(field(6, 0.0)))
        .ok_or_else(invalid)?;
    let delta = TimeDelta::try_milliseconds(offset).ok_or_else(invalid)?;
    Ok(base.checked_add_signed(delta).ok_or_else(invalid)?.and_utc())
}

/// `datetime.datetime(year, month, day[, hour[, minute[, second[, microsecond]]]])`
pub fn from_python_components(parts: &[i64]) -> TranspileResult<DateTime<Utc>> {
    let field = |i: usize, default: i64| parts.get(i).copied().unwrap_or(default);
    let out_of_range = || TranspileError::Runtime("datetime argument out of range".to_string());
    let small = |v: i64| u32::try_from(v).map_err(|_| out_of_range());

    let year = i32::try_from(field(0, 1)).map_err(|_| out_of_range())?;
    NaiveDate::from_ymd_opt(year, small(field(1, 1))?, small(field(2, 1))?)
        .and_then(|d| {
            d.and_hms_micro_opt(
                small(field(3, 0)).ok()?,
                small(field(4, 0)).ok()?,
                small(field(5, 0)).ok()?,
                small(field(6, 0)).ok()?,
            )
        })
        .map(|d| d.and_utc())
        .ok_or_else(out_of_range)
}

/// `Date()` called as a function: the current time as text.
pub fn js_string(date: &DateTime<Utc>) -> String {
    date.format("%a %b %d %Y %H:%M:%S GMT+0000 (Coordinated Universal Time)")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_parse_common_forms() {
        assert_eq!(parse("2019-01-01T00:00:00Z").unwrap(), utc(2019, 1, 1, 0, 0, 0));
        assert_eq!(parse("2019-01-01T10:00:00+02:00").unwrap(), utc(2019, 1, 1, 8, 0, 0));
        assert_eq!(parse("2019-01-01").unwrap(), utc(2019, 1, 1, 0, 0, 0));
        assert_eq!(parse("2019-01-01 12:30:00").unwrap(), utc(2019, 1, 1, 12, 30, 0));
        assert_eq!(parse("2019/03/04").unwrap(), utc(2019, 3, 4, 0, 0, 0));
        assert_eq!(parse("2019").unwrap(), utc(2019, 1, 1, 0, 0, 0));
        assert_eq!(parse("2019-07").unwrap(), utc(2019, 7, 1, 0, 0, 0));
        assert!(parse("not a date").is_err());
    }

    #[test]
    fn test_js_components_normalize() {
        assert_eq!(from_js_components(&[2019.0, 0.0, 1.0]).unwrap(), utc(2019, 1, 1, 0, 0, 0));
        assert_eq!(from_js_components(&[2019.0, 12.0]).unwrap(), utc(2020, 1, 1, 0, 0, 0));
        assert_eq!(from_js_components(&[2019.0, 0.0, 32.0]).unwrap(), utc(2019, 2, 1, 0, 0, 0));
        assert_eq!(from_js_components(&[99.0, 0.0]).unwrap(), utc(1999, 1, 1, 0, 0, 0));
        assert_eq!(from_js_components(&[2019.0, -1.0]).unwrap(), utc(2018, 12, 1, 0, 0, 0));
        assert!(from_js_components(&[f64::NAN, 0.0]).is_err());
    }

    #[test]
    fn test_python_components_are_strict() {
        assert_eq!(
            from_python_components(&[2019, 1, 2, 3, 4, 5]).unwrap(),
            utc(2019, 1, 2, 3, 4, 5)
        );
        assert!(from_python_components(&[2019, 13, 1]).is_err());
        assert!(from_python_components(&[2019, 2, 30]).is_err());
    }

    #[test]
    fn test_millis() {
        assert_eq!(from_millis(1_546_300_800_000.0).unwrap(), utc(2019, 1, 1, 0, 0, 0));
        assert!(from_millis(f64::INFINITY).is_err());
    }
}

//! Numeric literal text helpers (pure).
//!
//! Numeric literals are rendered from their *source text*, not from a parsed value, so that `0x1F` stays `0x1F` and
//! `1.50` stays `1.50`. Octal literals are the exception: every target spells them differently (`05`, `0o5`, or
//! decimal), so these helpers convert between spellings.
//!
//! ## Examples
//! ```rust
//! use bsonshift_core::numbers;
//!
//! assert_eq!(numbers::octal_digits("0o17"), Some("17"));
//! assert_eq!(numbers::octal_digits("017"), Some("17"));
//! assert_eq!(numbers::octal_digits("17"), None);
//! assert_eq!(numbers::to_c_octal("0o17"), "017");
//! assert_eq!(numbers::to_python_octal("017"), "0o17");
//! assert_eq!(numbers::octal_to_decimal("0o17"), "15");
//! ```

/// Return the digit part of an octal literal (`0o17`, `0O17`, or legacy `017`).
pub fn octal_digits(text: &str) -> Option<&str> {
    let digits = if let Some(rest) = text.strip_prefix("0o").or_else(|| text.strip_prefix("0O")) {
        rest
    } else if text.len() > 1 && text.starts_with('0') {
        &text[1..]
    } else {
        return None;
    };
    if !digits.is_empty() && digits.chars().all(|c| ('0'..='7').contains(&c)) {
        Some(digits)
    } else {
        None
    }
}

/// Return `text` in C/Java octal spelling (`017`), or unchanged if it is not octal.
pub fn to_c_octal(text: &str) -> String {
    match octal_digits(text) {
        Some(digits) => format!("0{digits}"),
        None => text.to_string(),
    }
}

/// Return `text` in Python/ES2015 octal spelling (`0o17`), or unchanged if it is not octal.
pub fn to_python_octal(text: &str) -> String {
    match octal_digits(text) {
        Some(digits) => format!("0o{digits}"),
        None => text.to_string(),
    }
}

/// Return `text` as a decimal integer if it is octal, or unchanged otherwise.
pub fn octal_to_decimal(text: &str) -> String {
    octal_digits(text)
        .and_then(|digits| i64::from_str_radix(digits, 8).ok())
        .map(|v| v.to_string())
        .unwrap_or_else(|| text.to_string())
}

/// Parse integer literal text (decimal, `0x` hex, `0o`/legacy octal, `0b` binary) into a value.
///
/// ## Examples
/// ```rust
/// use bsonshift_core::numbers::parse_integer;
///
/// assert_eq!(parse_integer("0x1F"), Some(31));
/// assert_eq!(parse_integer("010"), Some(8));
/// assert_eq!(parse_integer("-12"), Some(-12));
/// assert_eq!(parse_integer("1.5"), None);
/// ```
pub fn parse_integer(text: &str) -> Option<i64> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let value = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else if let Some(bin) = body.strip_prefix("0b").or_else(|| body.strip_prefix("0B")) {
        i64::from_str_radix(bin, 2).ok()?
    } else if let Some(digits) = octal_digits(body) {
        i64::from_str_radix(digits, 8).ok()?
    } else {
        body.parse::<i64>().ok()?
    };
    Some(if negative { -value } else { value })
}

/// Parse any numeric literal text into an `f64`.
pub fn parse_number(text: &str) -> Option<f64> {
    parse_integer(text)
        .map(|v| v as f64)
        .or_else(|| text.parse::<f64>().ok())
}

/// Format an `f64` the way JavaScript's `Number.prototype.toString` does for the common cases.
///
/// ## Examples
/// ```rust
/// use bsonshift_core::numbers::js_number_string;
///
/// assert_eq!(js_number_string(10.0), "10");
/// assert_eq!(js_number_string(0.5), "0.5");
/// assert_eq!(js_number_string(f64::NAN), "NaN");
/// ```
pub fn js_number_string(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{}", value as i128)
    } else {
        format!("{value}")
    }
}

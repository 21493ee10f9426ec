//! Constructors, statics and methods the sandbox knows how to evaluate.
//!
//! Lookup is by dotted callee path per source dialect. Anything outside these tables is not evaluable: the walker
//! has already rejected unknown symbols, so reaching the fallback means a construct has no value-mode meaning.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use bsonshift_core::lang::languages::LanguageId;
use bsonshift_core::lang::regex_flags;
use bsonshift_core::numbers;
use indexmap::IndexMap;

use super::dates;
use crate::errors::{TranspileError, TranspileResult};
use crate::value::Value;

const JS_FUNCTIONS: &[&str] = &[
    "ObjectId",
    "ObjectId.createFromTime",
    "ObjectId.createFromHexString",
    "ObjectId.isValid",
    "Code",
    "Binary",
    "DBRef",
    "Double",
    "Int32",
    "Long",
    "Long.fromBits",
    "Long.fromString",
    "Long.fromNumber",
    "Long.fromInt",
    "MinKey",
    "MaxKey",
    "BSONRegExp",
    "Timestamp",
    "Symbol",
    "Decimal128",
    "Decimal128.fromString",
    "Date",
    "Date.now",
    "RegExp",
    "Number",
];

const SHELL_FUNCTIONS: &[&str] = &["NumberInt", "NumberLong", "NumberDecimal", "ISODate", "BinData"];

const PYTHON_FUNCTIONS: &[&str] = &[
    "ObjectId",
    "ObjectId.from_datetime",
    "ObjectId.is_valid",
    "Code",
    "DBRef",
    "Int64",
    "MinKey",
    "MaxKey",
    "Regex",
    "Timestamp",
    "Decimal128",
    "datetime.datetime",
    "datetime.datetime.utcnow",
    "int",
    "float",
];

pub fn is_function(input: LanguageId, path: &str) -> bool {
    match input {
        LanguageId::Python => PYTHON_FUNCTIONS.contains(&path),
        LanguageId::Shell => SHELL_FUNCTIONS.contains(&path) || JS_FUNCTIONS.contains(&path),
        _ => JS_FUNCTIONS.contains(&path),
    }
}

/// `Long.MAX_VALUE` and friends.
pub fn constant(input: LanguageId, path: &str) -> Option<Value> {
    if input == LanguageId::Python {
        return None;
    }
    Some(Value::Int64(match path {
        "Long.MAX_VALUE" => i64::MAX,
        "Long.MIN_VALUE" => i64::MIN,
        "Long.ZERO" => 0,
        "Long.ONE" => 1,
        "Long.NEG_ONE" => -1,
        _ => return None,
    }))
}

/// Evaluate a call of a known function.
pub fn call(input: LanguageId, path: &str, args: &[Value], is_new: bool) -> TranspileResult<Value> {
    let arg = |i: usize| args.get(i).filter(|v| !matches!(v, Value::Undefined));
    if input == LanguageId::Python {
        return python_call(path, args);
    }
    match path {
        "ObjectId" => object_id(arg(0)),
        "ObjectId.createFromTime" => Ok(Value::ObjectId(object_id_from_time(epoch_u32(seconds(arg(0), path)?, path)?))),
        "ObjectId.createFromHexString" => object_id_from_hex(string(arg(0), path)?).map(Value::ObjectId),
        "ObjectId.isValid" => Ok(Value::Bool(arg(0).is_some_and(is_valid_object_id))),
        "Code" => code(arg(0), arg(1)),
        "Binary" | "BinData" => Err(TranspileError::Unimplemented("Binary type not supported".into())),
        "DBRef" => dbref(arg(0), arg(1), arg(2)),
        "Double" => Ok(Value::Double(to_number(arg(0)))),
        "Int32" | "NumberInt" => Ok(Value::Int32(truncate_i32(to_number(arg(0))))),
        "Long" | "Long.fromBits" => Ok(Value::Int64(from_bits(number(arg(0), path)?, number(arg(1), path)?))),
        "Long.fromString" => {
            let radix = match arg(1) {
                Some(r) => number(Some(r), path)? as u32,
                None => 10,
            };
            long_from_string(string(arg(0), path)?, radix).map(Value::Int64)
        }
        "Long.fromNumber" => Ok(Value::Int64(truncate_i64(number(arg(0), path)?))),
        "Long.fromInt" => Ok(Value::Int64(i64::from(truncate_i32(number(arg(0), path)?)))),
        "NumberLong" => int64(arg(0), path).map(Value::Int64),
        "MinKey" => Ok(Value::MinKey),
        "MaxKey" => Ok(Value::MaxKey),
        "BSONRegExp" => bson_regex(arg(0), arg(1), path),
        "Timestamp" => Ok(Value::Timestamp {
            t: low_bits(number(arg(1), path)?),
            i: low_bits(number(arg(0), path)?),
        }),
        "Symbol" => Ok(Value::Symbol(string(arg(0), path)?.to_string())),
        "Decimal128" | "Decimal128.fromString" => decimal128(string(arg(0), path)?),
        "NumberDecimal" => match arg(0) {
            None => decimal128("0"),
            Some(Value::String(s)) => decimal128(s),
            Some(other) => decimal128(&numbers::js_number_string(number(Some(other), path)?)),
        },
        "Date" if !is_new => Ok(Value::String(dates::js_string(&dates::now()))),
        "Date" => js_date(args),
        "ISODate" => match arg(0) {
            None => Ok(Value::DateTime(dates::now())),
            Some(Value::String(s)) => dates::parse(s).map(Value::DateTime),
            Some(other) => dates::from_millis(number(Some(other), path)?).map(Value::DateTime),
        },
        "Date.now" => Ok(Value::DateTime(dates::now())),
        "RegExp" => js_regex(arg(0), arg(1)),
        "Number" => Ok(Value::Double(match arg(0) {
            None if args.is_empty() => 0.0,
            other => to_number(other),
        })),
        _ => Err(TranspileError::not_implemented(path)),
    }
}

fn python_call(path: &str, args: &[Value]) -> TranspileResult<Value> {
    let arg = |i: usize| args.get(i).filter(|v| !matches!(v, Value::Null));
    match path {
        "ObjectId" => object_id(arg(0)),
        "ObjectId.from_datetime" => Ok(Value::ObjectId(object_id_from_time(epoch_u32(seconds(arg(0), path)?, path)?))),
        "ObjectId.is_valid" => Ok(Value::Bool(arg(0).is_some_and(is_valid_object_id))),
        "Code" => code(arg(0), arg(1)),
        "DBRef" => dbref(arg(0), arg(1), arg(2)),
        "Int64" => int64(arg(0), path).map(Value::Int64),
        // Encoded as int32 when it fits, like the driver does.
        "int" => int64(arg(0), path).map(|v| i32::try_from(v).map_or(Value::Int64(v), Value::Int32)),
        "MinKey" => Ok(Value::MinKey),
        "MaxKey" => Ok(Value::MaxKey),
        "Regex" => bson_regex(arg(0), arg(1), path),
        "Timestamp" => Ok(Value::Timestamp {
            t: epoch_u32(seconds(arg(0), path)?, path)?,
            i: epoch_u32(number(arg(1), path)?, path)?,
        }),
        "Decimal128" => decimal128(string(arg(0), path)?),
        "datetime.datetime" => {
            let parts = args
                .iter()
                .map(|v| number(Some(v), path).map(|n| n.trunc() as i64))
                .collect::<TranspileResult<Vec<_>>>()?;
            dates::from_python_components(&parts).map(Value::DateTime)
        }
        "datetime.datetime.utcnow" => Ok(Value::DateTime(dates::now())),
        "float" => match arg(0) {
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .map(Value::Double)
                .map_err(|_| TranspileError::Runtime(format!("could not convert string to float: '{s}'"))),
            other => number(other, path).map(Value::Double),
        },
        _ => Err(TranspileError::not_implemented(path)),
    }
}

/// Call a method on an evaluated receiver.
pub fn method(receiver: &Value, name: &str, args: &[Value]) -> TranspileResult<Value> {
    match (receiver, name) {
        (Value::ObjectId(bytes), "toString" | "toHexString") => Ok(Value::String(Value::object_id_hex(bytes))),
        (Value::ObjectId(bytes), "equals") => Ok(Value::Bool(match args.first() {
            Some(Value::ObjectId(other)) => other == bytes,
            Some(Value::String(hex)) => hex.eq_ignore_ascii_case(&Value::object_id_hex(bytes)),
            _ => false,
        })),
        (Value::ObjectId(bytes), "getTimestamp") => object_id_time(bytes),
        (Value::Int64(_) | Value::Int32(_), "toString") => {
            let radix = match args.first() {
                Some(r) => number(Some(r), name)? as u32,
                None => 10,
            };
            let value = match receiver {
                Value::Int32(v) => i64::from(*v),
                Value::Int64(v) => *v,
                _ => 0,
            };
            to_radix(value, radix).map(Value::String)
        }
        (Value::Int64(v), "toInt") => Ok(Value::Int32(*v as i32)),
        (Value::Int64(v), "toNumber") => Ok(Value::Double(*v as f64)),
        (Value::Timestamp { i, .. }, "getLowBits") => Ok(Value::Int32(*i as i32)),
        (Value::Timestamp { t, .. }, "getHighBits") => Ok(Value::Int32(*t as i32)),
        (Value::Decimal128(text), "toString") => Ok(Value::String(text.clone())),
        (Value::DateTime(date), "getTime") => Ok(Value::Double(date.timestamp_millis() as f64)),
        _ => Err(not_an_attribute(receiver, name)),
    }
}

/// Read a non-callable member of an evaluated receiver.
pub fn attribute(receiver: &Value, name: &str) -> TranspileResult<Value> {
    match (receiver, name) {
        (Value::Code { code, .. }, "code") => Ok(Value::String(code.clone())),
        (Value::Code { scope, .. }, "scope") => Ok(scope.clone().map(Value::Document).unwrap_or(Value::Null)),
        (Value::DbRef { db, .. }, "db") => Ok(db.clone().map(Value::String).unwrap_or(Value::Null)),
        (Value::DbRef { collection, .. }, "collection") => Ok(Value::String(collection.clone())),
        (Value::DbRef { id, .. }, "oid") => Ok((**id).clone()),
        (Value::Regex { pattern, .. }, "pattern") => Ok(Value::String(pattern.clone())),
        (Value::Regex { flags, .. }, "options") => Ok(Value::String(flags.clone())),
        (Value::ObjectId(bytes), "generation_time") => object_id_time(bytes),
        (Value::ObjectId(_), "binary") => Err(TranspileError::Unimplemented("Binary type not supported".into())),
        _ => Err(not_an_attribute(receiver, name)),
    }
}

fn not_an_attribute(receiver: &Value, name: &str) -> TranspileError {
    TranspileError::Attribute(format!("'{name}' not an attribute of {}", receiver.type_name()))
}

// ============================================================================
// Argument coercion
// ============================================================================

fn number(value: Option<&Value>, name: &str) -> TranspileResult<f64> {
    value
        .and_then(Value::as_f64)
        .ok_or_else(|| TranspileError::Type(format!("'{name}' expects a number")))
}

fn string<'v>(value: Option<&'v Value>, name: &str) -> TranspileResult<&'v str> {
    value
        .and_then(Value::as_str)
        .ok_or_else(|| TranspileError::Type(format!("'{name}' expects a string")))
}

/// Seconds from a number or a date.
fn seconds(value: Option<&Value>, name: &str) -> TranspileResult<f64> {
    match value {
        Some(Value::DateTime(date)) => Ok(date.timestamp() as f64),
        other => number(other, name),
    }
}

/// JavaScript `Number(x)` conversion.
fn to_number(value: Option<&Value>) -> f64 {
    match value {
        None | Some(Value::Undefined) => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                numbers::parse_number(trimmed).unwrap_or(f64::NAN)
            }
        }
        Some(Value::DateTime(date)) => date.timestamp_millis() as f64,
        Some(other) => other.as_f64().unwrap_or(f64::NAN),
    }
}

fn truncate_i32(v: f64) -> i32 {
    if v.is_finite() { v.trunc() as i64 as i32 } else { 0 }
}

/// The halves of a JavaScript `Timestamp` are stored as raw 32-bit patterns, so negatives wrap.
fn low_bits(v: f64) -> u32 {
    if v.is_finite() { v.trunc() as i64 as u32 } else { 0 }
}

/// Whole seconds (or a counter) that must fit an unsigned 32-bit field.
fn epoch_u32(v: f64, name: &str) -> TranspileResult<u32> {
    let whole = v.trunc();
    if whole.is_finite() && (0.0..=f64::from(u32::MAX)).contains(&whole) {
        Ok(whole as u32)
    } else {
        Err(TranspileError::Runtime(format!("'{name}' value {v} is outside the 32-bit unsigned range")))
    }
}

fn truncate_i64(v: f64) -> i64 {
    if v.is_finite() { v.trunc() as i64 } else { 0 }
}

fn int64(value: Option<&Value>, name: &str) -> TranspileResult<i64> {
    match value {
        None => Ok(0),
        Some(Value::String(s)) => long_from_string(s.trim(), 10),
        other => number(other, name).map(truncate_i64),
    }
}

// ============================================================================
// Constructors
// ============================================================================

fn from_bits(low: f64, high: f64) -> i64 {
    (i64::from(truncate_i32(high)) << 32) | i64::from(truncate_i32(low) as u32)
}

fn long_from_string(text: &str, radix: u32) -> TranspileResult<i64> {
    if !(2..=36).contains(&radix) {
        return Err(TranspileError::Runtime(format!("radix {radix} out of range")));
    }
    i64::from_str_radix(text, radix).map_err(|_| TranspileError::Runtime(format!("'{text}' is not a valid Long")))
}

fn to_radix(value: i64, radix: u32) -> TranspileResult<String> {
    if !(2..=36).contains(&radix) {
        return Err(TranspileError::Runtime(format!("radix {radix} out of range")));
    }
    if value == 0 {
        return Ok("0".to_string());
    }
    let mut magnitude = value.unsigned_abs();
    let mut digits = Vec::new();
    while magnitude > 0 {
        let digit = (magnitude % u64::from(radix)) as u32;
        digits.push(char::from_digit(digit, radix).unwrap_or('0'));
        magnitude /= u64::from(radix);
    }
    if value < 0 {
        digits.push('-');
    }
    Ok(digits.into_iter().rev().collect())
}

fn code(code: Option<&Value>, scope: Option<&Value>) -> TranspileResult<Value> {
    let code = string(code, "Code")?.to_string();
    let scope = match scope {
        None | Some(Value::Null) => None,
        Some(Value::Document(doc)) => Some(doc.clone()),
        Some(other) => {
            return Err(TranspileError::Type(format!(
                "'Code' scope must be an object, got {}",
                other.type_name()
            )));
        }
    };
    Ok(Value::Code { code, scope })
}

fn dbref(collection: Option<&Value>, id: Option<&Value>, db: Option<&Value>) -> TranspileResult<Value> {
    Ok(Value::DbRef {
        collection: string(collection, "DBRef")?.to_string(),
        id: Box::new(id.cloned().unwrap_or(Value::Undefined)),
        db: db.map(|d| string(Some(d), "DBRef")).transpose()?.map(str::to_string),
    })
}

fn decimal128(text: &str) -> TranspileResult<Value> {
    if is_decimal_text(text) {
        Ok(Value::Decimal128(text.to_string()))
    } else {
        Err(TranspileError::Runtime(format!("'{text}' not a valid Decimal128 string")))
    }
}

fn is_decimal_text(text: &str) -> bool {
    let body = text.strip_prefix(['-', '+']).unwrap_or(text);
    if matches!(body, "Infinity" | "Inf" | "NaN") {
        return true;
    }
    let (mantissa, exponent) = match body.split_once(['e', 'E']) {
        Some((m, e)) => (m, Some(e)),
        None => (body, None),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    let mantissa_ok = !(whole.is_empty() && fraction.is_empty()) && digits(whole) && digits(fraction);
    let exponent_ok = exponent.is_none_or(|e| {
        let e = e.strip_prefix(['-', '+']).unwrap_or(e);
        !e.is_empty() && digits(e)
    });
    mantissa_ok && exponent_ok
}

fn bson_regex(pattern: Option<&Value>, flags: Option<&Value>, name: &str) -> TranspileResult<Value> {
    let pattern = string(pattern, name)?.to_string();
    let flags = match flags {
        Some(f) => string(Some(f), name)?,
        None => "",
    };
    let mut sorted: Vec<char> = Vec::new();
    for flag in flags.chars() {
        if !regex_flags::is_bson_flag(flag) {
            return Err(TranspileError::Runtime(format!(
                "Regular expression contains unsupported '{flag}' flag"
            )));
        }
        sorted.push(flag);
    }
    sorted.sort_unstable();
    sorted.dedup();
    Ok(Value::Regex {
        pattern,
        flags: sorted.into_iter().collect(),
    })
}

fn js_regex(pattern: Option<&Value>, flags: Option<&Value>) -> TranspileResult<Value> {
    let (pattern, inherited) = match pattern {
        Some(Value::Regex { pattern, flags }) => (pattern.clone(), flags.clone()),
        Some(Value::String(s)) => (s.clone(), String::new()),
        None => ("(?:)".to_string(), String::new()),
        Some(other) => {
            return Err(TranspileError::Type(format!(
                "'RegExp' expects a string or a regular expression, got {}",
                other.type_name()
            )));
        }
    };
    let flags = match flags {
        Some(f) => string(Some(f), "RegExp")?.to_string(),
        None => inherited,
    };
    let flags = regex_flags::canonical_js_flags(&flags).map_err(|e| TranspileError::Runtime(e.to_string()))?;
    Ok(Value::Regex { pattern, flags })
}

fn js_date(args: &[Value]) -> TranspileResult<Value> {
    let date = match args {
        [] => dates::now(),
        [Value::String(s)] => dates::parse(s)?,
        [Value::DateTime(d)] => *d,
        [single] => dates::from_millis(to_number(Some(single)))?,
        parts => {
            let parts: Vec<f64> = parts.iter().map(|p| to_number(Some(p))).collect();
            dates::from_js_components(&parts)?
        }
    };
    Ok(Value::DateTime(date))
}

// ============================================================================
// ObjectId
// ============================================================================

fn object_id(arg: Option<&Value>) -> TranspileResult<Value> {
    match arg {
        None | Some(Value::Null) => Ok(Value::ObjectId(generate_object_id())),
        Some(Value::ObjectId(bytes)) => Ok(Value::ObjectId(*bytes)),
        Some(Value::String(s)) if s.len() == 12 && !is_hex(s) => {
            let mut bytes = [0u8; 12];
            bytes.copy_from_slice(s.as_bytes());
            Ok(Value::ObjectId(bytes))
        }
        Some(Value::String(s)) => object_id_from_hex(s).map(Value::ObjectId),
        Some(other) => Ok(Value::ObjectId(object_id_from_time(epoch_u32(
            number(Some(other), "ObjectId")?,
            "ObjectId",
        )?))),
    }
}

fn is_hex(s: &str) -> bool {
    s.len() == 24 && s.chars().all(|c| c.is_ascii_hexdigit())
}

fn is_valid_object_id(value: &Value) -> bool {
    match value {
        Value::ObjectId(_) => true,
        Value::String(s) => is_hex(s) || s.len() == 12,
        _ => false,
    }
}

fn object_id_from_hex(hex: &str) -> TranspileResult<[u8; 12]> {
    if !is_hex(hex) {
        return Err(TranspileError::Runtime(
            "Argument passed in must be a string of 12 bytes or a string of 24 hex characters".to_string(),
        ));
    }
    let mut bytes = [0u8; 12];
    for (i, byte) in bytes.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
            .map_err(|_| TranspileError::Internal(format!("bad hex pair in '{hex}'")))?;
    }
    Ok(bytes)
}

/// Timestamp prefix, zeroed remainder.
fn object_id_from_time(seconds: u32) -> [u8; 12] {
    let mut bytes = [0u8; 12];
    bytes[..4].copy_from_slice(&seconds.to_be_bytes());
    bytes
}

fn object_id_time(bytes: &[u8; 12]) -> TranspileResult<Value> {
    let seconds = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    dates::from_seconds(f64::from(seconds)).map(Value::DateTime)
}

static COUNTER: AtomicU32 = AtomicU32::new(0);

fn process_unique() -> &'static [u8; 5] {
    static UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
    UNIQUE.get_or_init(|| {
        let mut hasher = RandomState::new().build_hasher();
        hasher.write_u32(std::process::id());
        let bits = hasher.finish().to_be_bytes();
        [bits[0], bits[1], bits[2], bits[3], bits[4]]
    })
}

fn generate_object_id() -> [u8; 12] {
    let mut bytes = object_id_from_time(dates::now().timestamp().clamp(0, i64::from(u32::MAX)) as u32);
    bytes[4..9].copy_from_slice(process_unique());
    let count = COUNTER.fetch_add(1, Ordering::Relaxed).to_be_bytes();
    bytes[9..].copy_from_slice(&count[1..]);
    bytes
}

/// Keys of a sandboxed document.
pub fn document(entries: Vec<(String, Value)>) -> Value {
    let mut doc = IndexMap::with_capacity(entries.len());
    for (key, value) in entries {
        doc.insert(key, value);
    }
    Value::Document(doc)
}

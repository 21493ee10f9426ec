//! Values produced by value mode.
//!
//! A closed set of BSON-shaped values. [`Value::to_extended_json`] renders relaxed Extended JSON (v2), which is what
//! the CLI prints for `--to object`.

use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde_json::{Map, Number, json};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Undefined,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Double(f64),
    String(String),
    Array(Vec<Value>),
    Document(IndexMap<String, Value>),
    ObjectId([u8; 12]),
    Code {
        code: String,
        scope: Option<IndexMap<String, Value>>,
    },
    DbRef {
        collection: String,
        id: Box<Value>,
        db: Option<String>,
    },
    /// Canonical decimal text; validated on construction.
    Decimal128(String),
    MinKey,
    MaxKey,
    Regex {
        pattern: String,
        flags: String,
    },
    Timestamp {
        t: u32,
        i: u32,
    },
    Symbol(String),
    DateTime(DateTime<Utc>),
}

impl Value {
    /// Name used in attribute errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Int32(_) => "Int32",
            Value::Int64(_) => "Long",
            Value::Double(_) => "Double",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Document(_) => "object",
            Value::ObjectId(_) => "ObjectId",
            Value::Code { .. } => "Code",
            Value::DbRef { .. } => "DBRef",
            Value::Decimal128(_) => "Decimal128",
            Value::MinKey => "MinKey",
            Value::MaxKey => "MaxKey",
            Value::Regex { .. } => "BSONRegExp",
            Value::Timestamp { .. } => "Timestamp",
            Value::Symbol(_) => "Symbol",
            Value::DateTime(_) => "Date",
        }
    }

    /// Numeric view for sandbox arithmetic and coercions.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int32(v) => Some(f64::from(*v)),
            Value::Int64(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null | Value::Undefined => false,
            Value::Bool(b) => *b,
            Value::String(s) => !s.is_empty(),
            other => other.as_f64().is_none_or(|v| v != 0.0 && !v.is_nan()),
        }
    }

    pub fn object_id_hex(bytes: &[u8; 12]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Relaxed Extended JSON.
    pub fn to_extended_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Undefined => json!({ "$undefined": true }),
            Value::Bool(b) => json!(b),
            Value::Int32(v) => json!(v),
            Value::Int64(v) => json!(v),
            Value::Double(v) => match Number::from_f64(*v) {
                Some(n) => serde_json::Value::Number(n),
                None => json!({ "$numberDouble": non_finite(*v) }),
            },
            Value::String(s) => json!(s),
            Value::Array(items) => serde_json::Value::Array(items.iter().map(Value::to_extended_json).collect()),
            Value::Document(doc) => document_json(doc),
            Value::ObjectId(bytes) => json!({ "$oid": Value::object_id_hex(bytes) }),
            Value::Code { code, scope: None } => json!({ "$code": code }),
            Value::Code {
                code,
                scope: Some(scope),
            } => json!({ "$code": code, "$scope": document_json(scope) }),
            Value::DbRef { collection, id, db } => {
                let mut map = Map::new();
                map.insert("$ref".into(), json!(collection));
                map.insert("$id".into(), id.to_extended_json());
                if let Some(db) = db {
                    map.insert("$db".into(), json!(db));
                }
                serde_json::Value::Object(map)
            }
            Value::Decimal128(text) => json!({ "$numberDecimal": text }),
            Value::MinKey => json!({ "$minKey": 1 }),
            Value::MaxKey => json!({ "$maxKey": 1 }),
            Value::Regex { pattern, flags } => {
                json!({ "$regularExpression": { "pattern": pattern, "options": flags } })
            }
            Value::Timestamp { t, i } => json!({ "$timestamp": { "t": t, "i": i } }),
            Value::Symbol(s) => json!({ "$symbol": s }),
            Value::DateTime(date) => {
                if (1970..=9999).contains(&date.year()) {
                    json!({ "$date": date.to_rfc3339_opts(SecondsFormat::Millis, true) })
                } else {
                    json!({ "$date": { "$numberLong": date.timestamp_millis().to_string() } })
                }
            }
        }
    }
}

fn document_json(doc: &IndexMap<String, Value>) -> serde_json::Value {
    serde_json::Value::Object(doc.iter().map(|(k, v)| (k.clone(), v.to_extended_json())).collect())
}

fn non_finite(v: f64) -> &'static str {
    if v.is_nan() {
        "NaN"
    } else if v > 0.0 {
        "Infinity"
    } else {
        "-Infinity"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_document_keeps_key_order() {
        let mut doc = IndexMap::new();
        doc.insert("z".to_string(), Value::Int32(1));
        doc.insert("a".to_string(), Value::Int64(2));
        let json = Value::Document(doc).to_extended_json().to_string();
        assert_eq!(json, r#"{"z":1,"a":2}"#);
    }

    #[test]
    fn test_wrapped_types() {
        let mut bytes = [0u8; 12];
        bytes[11] = 0xff;
        assert_eq!(
            Value::ObjectId(bytes).to_extended_json().to_string(),
            r#"{"$oid":"0000000000000000000000ff"}"#
        );
        assert_eq!(
            Value::Timestamp { t: 2, i: 1 }.to_extended_json().to_string(),
            r#"{"$timestamp":{"t":2,"i":1}}"#
        );
        assert_eq!(
            Value::Double(f64::NAN).to_extended_json().to_string(),
            r#"{"$numberDouble":"NaN"}"#
        );
    }

    #[test]
    fn test_dates_relaxed_and_canonical() {
        let date = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            Value::DateTime(date).to_extended_json().to_string(),
            r#"{"$date":"2019-01-01T00:00:00.000Z"}"#
        );
        let early = Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(
            Value::DateTime(early).to_extended_json().to_string(),
            r#"{"$date":{"$numberLong":"-1000"}}"#
        );
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Int32(0).is_truthy());
        assert!(Value::String("x".into()).is_truthy());
        assert!(!Value::Double(f64::NAN).is_truthy());
        assert!(Value::MinKey.is_truthy());
    }
}

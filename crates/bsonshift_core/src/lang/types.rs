//! Catalog type keys.
//!
//! The symbol catalog names types and symbols by string id (`_long`, `ObjectId`, `LongfromBits`, ...). The ids the
//! engine gives special meaning to (numeric casting, process hooks, emit overrides) are listed here as [`TypeKey`],
//! so dispatch is a `match` over a closed enum rather than string comparison.
//!
//! ## Notes
//! - Catalog descriptors whose id is not in this registry are still valid; they simply have no key and are rendered
//!   through templates only.
//! - Lookup via [`from_str`] is **case-sensitive**.
//!
//! ## Examples
//! ```rust
//! use bsonshift_core::lang::types::{self, TypeKey};
//!
//! assert_eq!(types::from_str("_hex"), Some(TypeKey::Hex));
//! assert!(types::is_numeric(TypeKey::Octal));
//! assert!(!types::is_numeric(TypeKey::String));
//! assert_eq!(types::as_str(TypeKey::Int64), "Long");
//! ```

use super::registry::Since;

/// Stable identifier for catalog ids with engine-level meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeKey {
    // Basic types
    Bool,
    Integer,
    Decimal,
    Hex,
    Octal,
    Long,
    Numeric,
    String,
    Regex,
    Array,
    Object,
    Null,
    Undefined,

    // Domain types and constructors
    Code,
    ObjectId,
    Binary,
    DbRef,
    Double,
    Int32,
    Int64,
    MinKey,
    MaxKey,
    BsonRegExp,
    Timestamp,
    Symbol,
    Decimal128,
    Date,
    IsoDate,

    // Native constructors
    Number,
    RegExp,

    // Members with process/emit hooks
    Now,
    LongFromBits,
    LongFromString,
    LongFromNumber,
    LongFromInt,
    LongToString,
    ObjectIdCreateFromTime,
    ObjectIdCreateFromHexString,
    Decimal128FromString,
}

/// Broad grouping of type keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFamily {
    /// Literal kinds and containers.
    Basic,
    /// Literal kinds that take part in numeric coercion.
    Numeric,
    /// The fixed domain (BSON) catalog.
    Domain,
    /// Built-in constructors of the source language.
    Native,
    /// Member functions and properties of other entries.
    Member,
}

/// Metadata for a type key.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    pub id: TypeKey,
    /// Catalog spelling.
    pub canonical: &'static str,
    pub family: TypeFamily,
    pub description: &'static str,
    pub since: Since,
}

/// Registry of all type keys.
pub const TYPES: &[TypeInfo] = &[
    // Basic
    info(TypeKey::Bool, "_bool", TypeFamily::Basic, "Boolean literal."),
    info(TypeKey::Integer, "_integer", TypeFamily::Numeric, "32-bit integer literal."),
    info(TypeKey::Decimal, "_decimal", TypeFamily::Numeric, "Floating point literal."),
    info(TypeKey::Hex, "_hex", TypeFamily::Numeric, "Hexadecimal integer literal."),
    info(TypeKey::Octal, "_octal", TypeFamily::Numeric, "Octal integer literal."),
    info(TypeKey::Long, "_long", TypeFamily::Numeric, "64-bit integer literal."),
    info(TypeKey::Numeric, "_numeric", TypeFamily::Numeric, "Any numeric literal; never narrows."),
    info(TypeKey::String, "_string", TypeFamily::Basic, "String literal."),
    info(TypeKey::Regex, "_regex", TypeFamily::Basic, "Regular expression literal."),
    info(TypeKey::Array, "_array", TypeFamily::Basic, "Array literal."),
    info(TypeKey::Object, "_object", TypeFamily::Basic, "Object/document literal."),
    info(TypeKey::Null, "_null", TypeFamily::Basic, "Null literal."),
    info(TypeKey::Undefined, "_undefined", TypeFamily::Basic, "Undefined literal, or an untyped expression."),
    // Domain
    info(TypeKey::Code, "Code", TypeFamily::Domain, "JavaScript code, optionally with a scope document."),
    info(TypeKey::ObjectId, "ObjectId", TypeFamily::Domain, "12-byte object identifier."),
    info(TypeKey::Binary, "Binary", TypeFamily::Domain, "Binary data (not supported)."),
    info(TypeKey::DbRef, "DBRef", TypeFamily::Domain, "Database reference."),
    info(TypeKey::Double, "Double", TypeFamily::Domain, "64-bit float wrapper."),
    info(TypeKey::Int32, "Int32", TypeFamily::Domain, "32-bit integer wrapper."),
    info(TypeKey::Int64, "Long", TypeFamily::Domain, "64-bit integer wrapper."),
    info(TypeKey::MinKey, "MinKey", TypeFamily::Domain, "Lowest-sorting singleton."),
    info(TypeKey::MaxKey, "MaxKey", TypeFamily::Domain, "Highest-sorting singleton."),
    info(TypeKey::BsonRegExp, "BSONRegExp", TypeFamily::Domain, "Regular expression with BSON flags."),
    info(TypeKey::Timestamp, "Timestamp", TypeFamily::Domain, "Replication timestamp."),
    info(TypeKey::Symbol, "Symbol", TypeFamily::Domain, "Deprecated symbol type."),
    info(TypeKey::Decimal128, "Decimal128", TypeFamily::Domain, "128-bit decimal."),
    info(TypeKey::Date, "Date", TypeFamily::Domain, "UTC datetime."),
    info(TypeKey::IsoDate, "ISODate", TypeFamily::Domain, "Shell datetime constructor; always a value."),
    // Native
    info(TypeKey::Number, "Number", TypeFamily::Native, "Number conversion function."),
    info(TypeKey::RegExp, "RegExp", TypeFamily::Native, "Regular expression constructor."),
    // Members
    info(TypeKey::Now, "now", TypeFamily::Member, "Current time pseudo-constructor."),
    info(TypeKey::LongFromBits, "LongfromBits", TypeFamily::Member, "Long from low/high 32-bit halves."),
    info(TypeKey::LongFromString, "LongfromString", TypeFamily::Member, "Long from decimal text."),
    info(TypeKey::LongFromNumber, "LongfromNumber", TypeFamily::Member, "Long from a number."),
    info(TypeKey::LongFromInt, "LongfromInt", TypeFamily::Member, "Long from a 32-bit integer."),
    info(TypeKey::LongToString, "LongtoString", TypeFamily::Member, "Long rendered as text."),
    info(
        TypeKey::ObjectIdCreateFromTime,
        "ObjectIdcreateFromTime",
        TypeFamily::Member,
        "ObjectId from seconds or a date.",
    ),
    info(
        TypeKey::ObjectIdCreateFromHexString,
        "ObjectIdcreateFromHexString",
        TypeFamily::Member,
        "ObjectId from hex text.",
    ),
    info(
        TypeKey::Decimal128FromString,
        "Decimal128fromString",
        TypeFamily::Member,
        "Decimal128 from text.",
    ),
];

/// Keys that take part in numeric coercion.
pub const NUMERIC_FAMILY: &[TypeKey] = &[
    TypeKey::Integer,
    TypeKey::Decimal,
    TypeKey::Hex,
    TypeKey::Octal,
    TypeKey::Long,
    TypeKey::Numeric,
];

/// Domain wrappers accepted unchanged by a `_numeric` expectation.
pub const NUMERIC_WRAPPERS: &[TypeKey] = &[TypeKey::Int64, TypeKey::Int32, TypeKey::Double];

/// Return the catalog spelling for a key.
pub fn as_str(id: TypeKey) -> &'static str {
    info_for(id).canonical
}

/// Return the family for a key.
pub fn family(id: TypeKey) -> TypeFamily {
    info_for(id).family
}

/// Return `true` for members of the numeric literal family.
pub fn is_numeric(id: TypeKey) -> bool {
    NUMERIC_FAMILY.contains(&id)
}

/// Return `true` for domain numeric wrappers (`Long`, `Int32`, `Double`).
pub fn is_numeric_wrapper(id: TypeKey) -> bool {
    NUMERIC_WRAPPERS.contains(&id)
}

/// Return the full metadata entry for a key.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: TypeKey) -> &'static TypeInfo {
    TYPES.iter().find(|t| t.id == id).expect("type info missing")
}

/// Resolve a catalog spelling to its key.
pub fn from_str(s: &str) -> Option<TypeKey> {
    TYPES.iter().find(|t| t.canonical == s).map(|t| t.id)
}

impl std::fmt::Display for TypeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(as_str(*self))
    }
}

const fn info(id: TypeKey, canonical: &'static str, family: TypeFamily, description: &'static str) -> TypeInfo {
    TypeInfo {
        id,
        canonical,
        family,
        description,
        since: Since(0, 1),
    }
}

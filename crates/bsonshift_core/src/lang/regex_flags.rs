//! Regular-expression flag vocabulary.
//!
//! Two flag alphabets exist in source text:
//! - JavaScript flags on regex literals and `RegExp(...)` (`d g i m s u y`), normalized to the order the JavaScript
//!   `flags` getter reports,
//! - BSON flags on `BSONRegExp(...)` (`i m x l s u`), kept in source order.
//!
//! Targets remap both alphabets through their own tables; that remapping lives in the catalog, not here.
//!
//! ## Examples
//! ```rust
//! use bsonshift_core::lang::regex_flags;
//!
//! assert_eq!(regex_flags::canonical_js_flags("mig").unwrap(), "gim");
//! assert!(regex_flags::canonical_js_flags("ii").is_err());
//! assert!(regex_flags::is_bson_flag('x'));
//! ```

/// JavaScript regex flags in canonical (`RegExp.prototype.flags`) order.
pub const JS_FLAGS: &[char] = &['d', 'g', 'i', 'm', 's', 'u', 'y'];

/// Flags accepted by `BSONRegExp`.
pub const BSON_FLAGS: &[char] = &['i', 'm', 'x', 'l', 's', 'u'];

/// Error produced when a JavaScript flag string is malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidFlags(pub String);

impl std::fmt::Display for InvalidFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid flags supplied to RegExp constructor '{}'", self.0)
    }
}

impl std::error::Error for InvalidFlags {}

/// Return `true` if `c` is a JavaScript regex flag.
pub fn is_js_flag(c: char) -> bool {
    JS_FLAGS.contains(&c)
}

/// Return `true` if `c` is a BSON regex flag.
pub fn is_bson_flag(c: char) -> bool {
    BSON_FLAGS.contains(&c)
}

/// Validate a JavaScript flag string and return it in canonical order.
///
/// ## Errors
/// - [`InvalidFlags`] if a flag is unknown or repeated (the JavaScript `RegExp` constructor throws in both cases).
pub fn canonical_js_flags(flags: &str) -> Result<String, InvalidFlags> {
    let mut seen = [false; 7];
    for c in flags.chars() {
        let Some(pos) = JS_FLAGS.iter().position(|f| *f == c) else {
            return Err(InvalidFlags(flags.to_string()));
        };
        if seen[pos] {
            return Err(InvalidFlags(flags.to_string()));
        }
        seen[pos] = true;
    }
    Ok(JS_FLAGS
        .iter()
        .zip(seen)
        .filter_map(|(c, on)| on.then_some(*c))
        .collect())
}

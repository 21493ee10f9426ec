//! Define shared quoting helpers (pure).
//!
//! Templates receive rendered text that may or may not already be a quoted string literal (a key may be written
//! `x`, `'x'` or `"x"`). These helpers normalize such text to one quoting style without double-escaping.
//!
//! ## Notes
//! - **Outer quotes** are only stripped when the first and last characters are the *same* quote character.
//! - **Escapes** already present (`\x`) are preserved as-is; only *unescaped* occurrences of the target quote are
//!   escaped.

/// Strip one pair of matching outer quotes, if present.
///
/// ## Examples
/// ```rust
/// use bsonshift_core::strings::remove_quotes;
///
/// assert_eq!(remove_quotes("'abc'"), "abc");
/// assert_eq!(remove_quotes("\"abc\""), "abc");
/// assert_eq!(remove_quotes("'abc\""), "'abc\"");
/// assert_eq!(remove_quotes("abc"), "abc");
/// ```
pub fn remove_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' || first == b'\'') && first == last {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Escape unescaped occurrences of `quote`, keeping existing escape sequences intact.
///
/// ## Examples
/// ```rust
/// use bsonshift_core::strings::escape_quote;
///
/// assert_eq!(escape_quote(r#"a"b"#, '"'), r#"a\"b"#);
/// assert_eq!(escape_quote(r#"a\"b"#, '"'), r#"a\"b"#);
/// ```
pub fn escape_quote(s: &str, quote: char) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(c);
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else if c == quote {
            out.push('\\');
            out.push(c);
        } else {
            out.push(c);
        }
    }
    out
}

/// Return `s` as a double-quoted string literal.
///
/// ## Examples
/// ```rust
/// use bsonshift_core::strings::double_quote_stringify;
///
/// assert_eq!(double_quote_stringify("abc"), "\"abc\"");
/// assert_eq!(double_quote_stringify("'a\"b'"), "\"a\\\"b\"");
/// ```
pub fn double_quote_stringify(s: &str) -> String {
    format!("\"{}\"", escape_quote(remove_quotes(s), '"'))
}

/// Return `s` as a single-quoted string literal.
///
/// ## Examples
/// ```rust
/// use bsonshift_core::strings::single_quote_stringify;
///
/// assert_eq!(single_quote_stringify("\"abc\""), "'abc'");
/// assert_eq!(single_quote_stringify("it's"), "'it\\'s'");
/// ```
pub fn single_quote_stringify(s: &str) -> String {
    format!("'{}'", escape_quote(remove_quotes(s), '\''))
}

/// Return `true` if `s` is a valid JavaScript identifier name (ASCII subset, `$` allowed).
///
/// ## Examples
/// ```rust
/// use bsonshift_core::strings::is_identifier_name;
///
/// assert!(is_identifier_name("$where"));
/// assert!(is_identifier_name("_id"));
/// assert!(!is_identifier_name("a-b"));
/// assert!(!is_identifier_name("1x"));
/// ```
pub fn is_identifier_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Decode the body of a quoted source string literal (without its quotes) into its value.
///
/// Handles the escapes shared by JavaScript and Python: `\n \t \r \b \f \v \0 \\ \' \"`, `\xHH`, `\uHHHH`, and
/// `\u{H...}`. Unknown escapes yield the escaped character itself. Line continuations (`\` + newline) are removed.
///
/// ## Examples
/// ```rust
/// use bsonshift_core::strings::unescape;
///
/// assert_eq!(unescape(r"a\nb"), "a\nb");
/// assert_eq!(unescape(r"\x41B"), "AB");
/// assert_eq!(unescape(r"\q"), "q");
/// ```
pub fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(esc) = chars.next() else {
            out.push('\\');
            break;
        };
        match esc {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            '\n' => {}
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                push_code_point(&mut out, &hex, 'x');
            }
            'u' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    let hex: String = chars.by_ref().take_while(|c| *c != '}').collect();
                    push_code_point(&mut out, &hex, 'u');
                } else {
                    let hex: String = chars.by_ref().take(4).collect();
                    push_code_point(&mut out, &hex, 'u');
                }
            }
            other => out.push(other),
        }
    }
    out
}

fn push_code_point(out: &mut String, hex: &str, marker: char) {
    match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
        Some(c) => out.push(c),
        None => {
            out.push(marker);
            out.push_str(hex);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // Quoting
    // ========================================

    #[test]
    fn test_double_quote_keeps_existing_escapes() {
        assert_eq!(double_quote_stringify(r#"'a\'b'"#), r#""a\'b""#);
        assert_eq!(double_quote_stringify(r#""a\"b""#), r#""a\"b""#);
    }

    #[test]
    fn test_single_char_quote_is_not_stripped() {
        assert_eq!(remove_quotes("'"), "'");
        assert_eq!(double_quote_stringify("\""), "\"\\\"\"");
    }

    #[test]
    fn test_trailing_backslash_survives() {
        assert_eq!(escape_quote("a\\", '"'), "a\\");
    }

    // ========================================
    // Unescaping
    // ========================================

    #[test]
    fn test_unescape_braced_unicode() {
        assert_eq!(unescape(r"\u{1F600}"), "\u{1F600}");
    }

    #[test]
    fn test_unescape_bad_hex_is_kept() {
        assert_eq!(unescape(r"\xZZ"), "xZZ");
    }
}

//! Catalog template mini-language.
//!
//! Templates are plain strings with holes:
//! - `{0}`, `{1}` positional arguments, `{lhs}`, `{rhs}`, `{key}`, `{value}`, `{names}`, `{op}` named ones,
//! - filters after a bar: `{0|dq}`, `{key|unquote|js_key}`,
//! - optional groups `{?, {1}?}` rendered only when every hole inside is present and non-empty,
//! - `{{` and `}}` for literal braces.
//!
//! A template may also be a *match*: it selects one of several templates on the value of a single argument (the
//! literal origin type, a flag rendered as text, ...). A missing argument selects the case keyed `""`.
//!
//! Missing holes outside optional groups render as the empty string.
//!
//! ## Examples
//! ```rust
//! use bsonshift::catalog::template::{Args, Template};
//!
//! let t = Template::parse("Pattern.compile({0|dq}{?, {1}?})").unwrap();
//! assert_eq!(t.render(&Args::positional(["a+"])), "Pattern.compile(\"a+\")");
//! assert_eq!(t.render(&Args::positional(["a+", "2"])), "Pattern.compile(\"a+\", 2)");
//! ```

use bsonshift_core::{numbers, strings};
use indexmap::IndexMap;

use crate::errors::CatalogError;

// ============================================================================
// Template AST
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Template {
    Text(Vec<Segment>),
    Match {
        on: Key,
        cases: IndexMap<String, Template>,
        default: Option<Box<Template>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Literal(String),
    Hole { key: Key, filters: Vec<Filter> },
    Optional(Vec<Segment>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Positional(usize),
    Named(String),
}

impl Key {
    fn parse(s: &str) -> Key {
        match s.parse::<usize>() {
            Ok(i) => Key::Positional(i),
            Err(_) => Key::Named(s.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// Re-quote with double quotes.
    Dq,
    /// Re-quote with single quotes.
    Sq,
    /// Strip one pair of outer quotes.
    Unquote,
    /// Escape for the inside of a double-quoted literal (backslashes and quotes).
    EscDq,
    /// Octal as `017`.
    COctal,
    /// Octal as `0o17`.
    PyOctal,
    /// Octal as decimal.
    DecOctal,
    Capitalize,
    /// Bare JavaScript property name when possible, single-quoted otherwise.
    JsKey,
}

impl Filter {
    fn parse(name: &str) -> Option<Filter> {
        Some(match name {
            "dq" => Filter::Dq,
            "sq" => Filter::Sq,
            "unquote" => Filter::Unquote,
            "esc_dq" => Filter::EscDq,
            "c_octal" => Filter::COctal,
            "py_octal" => Filter::PyOctal,
            "dec_octal" => Filter::DecOctal,
            "capitalize" => Filter::Capitalize,
            "js_key" => Filter::JsKey,
            _ => return None,
        })
    }

    fn apply(&self, text: &str) -> String {
        match self {
            Filter::Dq => strings::double_quote_stringify(text),
            Filter::Sq => strings::single_quote_stringify(text),
            Filter::Unquote => strings::remove_quotes(text).to_string(),
            Filter::EscDq => escape_double_quoted(text),
            Filter::COctal => numbers::to_c_octal(text),
            Filter::PyOctal => numbers::to_python_octal(text),
            Filter::DecOctal => numbers::octal_to_decimal(text),
            Filter::Capitalize => {
                let mut chars = text.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
            Filter::JsKey => {
                let bare = strings::remove_quotes(text);
                if strings::is_identifier_name(bare) || (!bare.is_empty() && bare.chars().all(|c| c.is_ascii_digit())) {
                    bare.to_string()
                } else {
                    strings::single_quote_stringify(text)
                }
            }
        }
    }
}

fn escape_double_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Arguments
// ============================================================================

/// Values bound to a template's holes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    positional: Vec<String>,
    named: Vec<(String, String)>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positional<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            positional: values.into_iter().map(Into::into).collect(),
            named: Vec::new(),
        }
    }

    pub fn push(mut self, value: impl Into<String>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.named.push((name.to_string(), value.into()));
        self
    }

    pub fn positional_values(&self) -> &[String] {
        &self.positional
    }

    pub fn get(&self, key: &Key) -> Option<&str> {
        match key {
            Key::Positional(i) => self.positional.get(*i).map(String::as_str),
            Key::Named(name) => self
                .named
                .iter()
                .rev()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

impl Template {
    /// Parse a text template.
    ///
    /// ## Errors
    /// - [`CatalogError::Template`] on unbalanced braces, unknown filters or nested optional groups.
    pub fn parse(source: &str) -> Result<Template, CatalogError> {
        let err = |message: &str| CatalogError::Template {
            template: source.to_string(),
            message: message.to_string(),
        };

        let mut stack: Vec<Vec<Segment>> = vec![Vec::new()];
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' if chars.peek() == Some(&'?') => {
                    chars.next();
                    if stack.len() > 1 {
                        return Err(err("optional groups cannot nest"));
                    }
                    flush(&mut stack, &mut literal);
                    stack.push(Vec::new());
                }
                '?' if chars.peek() == Some(&'}') && stack.len() > 1 => {
                    chars.next();
                    flush(&mut stack, &mut literal);
                    let group = stack.pop().ok_or_else(|| err("unbalanced optional group"))?;
                    if let Some(top) = stack.last_mut() {
                        top.push(Segment::Optional(group));
                    }
                }
                '{' => {
                    let mut body = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(ch) => body.push(ch),
                            None => return Err(err("unclosed '{'")),
                        }
                    }
                    let mut parts = body.split('|').map(str::trim);
                    let key = parts.next().filter(|k| !k.is_empty()).ok_or_else(|| err("empty hole"))?;
                    let filters = parts
                        .map(|name| Filter::parse(name).ok_or_else(|| err(&format!("unknown filter '{name}'"))))
                        .collect::<Result<Vec<_>, _>>()?;
                    flush(&mut stack, &mut literal);
                    if let Some(top) = stack.last_mut() {
                        top.push(Segment::Hole {
                            key: Key::parse(key),
                            filters,
                        });
                    }
                }
                '}' => return Err(err("unmatched '}'")),
                _ => literal.push(c),
            }
        }

        if stack.len() > 1 {
            return Err(err("unclosed optional group"));
        }
        flush(&mut stack, &mut literal);
        Ok(Template::Text(stack.pop().unwrap_or_default()))
    }

    /// Build a match template from already-parsed cases.
    pub fn matching(on: &str, cases: IndexMap<String, Template>, default: Option<Template>) -> Template {
        Template::Match {
            on: Key::parse(on),
            cases,
            default: default.map(Box::new),
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    pub fn render(&self, args: &Args) -> String {
        match self {
            Template::Text(segments) => render_segments(segments, args),
            Template::Match { on, cases, default } => {
                let selector = args.get(on).unwrap_or("");
                match cases.get(selector) {
                    Some(t) => t.render(args),
                    None => default.as_ref().map(|t| t.render(args)).unwrap_or_default(),
                }
            }
        }
    }
}

fn flush(stack: &mut [Vec<Segment>], literal: &mut String) {
    if literal.is_empty() {
        return;
    }
    if let Some(top) = stack.last_mut() {
        top.push(Segment::Literal(std::mem::take(literal)));
    }
}

fn render_segments(segments: &[Segment], args: &Args) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Hole { key, filters } => {
                if let Some(value) = args.get(key) {
                    out.push_str(&apply_filters(value, filters));
                }
            }
            Segment::Optional(inner) => {
                let complete = inner.iter().all(|s| match s {
                    Segment::Hole { key, .. } => args.get(key).is_some_and(|v| !v.is_empty()),
                    _ => true,
                });
                if complete {
                    out.push_str(&render_segments(inner, args));
                }
            }
        }
    }
    out
}

fn apply_filters(value: &str, filters: &[Filter]) -> String {
    filters
        .iter()
        .fold(value.to_string(), |acc, filter| filter.apply(&acc))
}

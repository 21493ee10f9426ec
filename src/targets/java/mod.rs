//! Java overrides, and the driver builder forms of top-level documents and pipelines.
//!
//! A top-level document becomes a `Filters` expression; a top-level array becomes a list whose elements are
//! rendered as aggregation stages, accumulators, GeoJSON geometries or filters, whichever fits. Every builder
//! function returns `Ok(None)` when its input has a shape it does not model, and the caller falls back to the
//! generic `Document` form of that input.

mod filters;
mod geometry;
mod pipeline;

pub use filters::filters;
pub use pipeline::pipeline;

use bsonshift_core::lang::types::TypeKey;
use bsonshift_syntax::ast::{Expr, ExprKind, Literal, NumberKind, Property, UnaryOp};

use super::{DateArg, EmitCall, EmitFn, millis};
use crate::errors::TranspileResult;
use crate::walker::{Walker, property_name};

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
        None => "new java.util.Date()".to_string(),
        Some(d) => format!("new java.util.Date({}L)", millis(&d)),
    };
    Ok(if arg.as_string {
        format!("new SimpleDateFormat(\"EEE MMM dd yyyy HH:mm:ss\").format({value})")
    } else {
        value
    })
}

fn emit_now(_: &EmitCall<'_>) -> TranspileResult<String> {
    Ok("new java.util.Date()".to_string())
}

// ============================================================================
// Builder calls
// ============================================================================

/// `name(args...)`, recording `name` under the static-import list `code`.
fn call(walker: &mut Walker<'_>, code: u16, name: &str, args: &[String]) -> String {
    walker.record_name(code, name);
    format!("{name}({})", args.join(", "))
}

/// `new Class(args...)`, recording `Class` under the class-import list `code`.
fn construct(walker: &mut Walker<'_>, code: u16, class: &str, args: &[String]) -> String {
    walker.record_name(code, class);
    format!("new {class}({})", args.join(", "))
}

/// `Arrays.asList(items...)`
fn list(walker: &mut Walker<'_>, items: &[String]) -> String {
    walker.record_code(bsonshift_core::lang::import_codes::ARRAY);
    format!("Arrays.asList({})", items.join(", "))
}

fn quoted(text: &str) -> String {
    bsonshift_core::strings::double_quote_stringify(text)
}

// ============================================================================
// Shape accessors
// ============================================================================

fn as_object(expr: &Expr) -> Option<&[Property]> {
    match &expr.unparenthesized().kind {
        ExprKind::Object(props) => Some(props),
        _ => None,
    }
}

/// Items of an array literal; `None` for anything else or an array with holes.
fn as_items(expr: &Expr) -> Option<Vec<&Expr>> {
    match &expr.unparenthesized().kind {
        ExprKind::Array(items) => items.iter().map(Option::as_ref).collect(),
        _ => None,
    }
}

fn as_str(expr: &Expr) -> Option<&str> {
    match &expr.unparenthesized().kind {
        ExprKind::Literal(Literal::String(value)) => Some(value),
        _ => None,
    }
}

/// A signed numeric literal of one of `kinds`: its sign and source text.
fn signed_number<'e>(expr: &'e Expr, kinds: &[NumberKind]) -> Option<(bool, &'e str)> {
    match &expr.unparenthesized().kind {
        ExprKind::Literal(Literal::Number { kind, text }) if kinds.contains(kind) => Some((false, text)),
        ExprKind::Unary { op, operand } => {
            let (negative, text) = signed_number(operand, kinds)?;
            match op {
                UnaryOp::Minus => Some((!negative, text)),
                UnaryOp::Plus => Some((negative, text)),
                _ => None,
            }
        }
        _ => None,
    }
}

fn as_int(expr: &Expr) -> Option<i64> {
    let (negative, text) = signed_number(expr, &[NumberKind::Integer])?;
    let value = text.parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}

/// Java `int` text of an integer literal.
fn int_text(expr: &Expr) -> Option<String> {
    as_int(expr).filter(|v| i32::try_from(*v).is_ok()).map(|v| v.to_string())
}

/// Java `double` text of an integer or decimal literal (`1` → `1d`).
fn double_text(expr: &Expr) -> Option<String> {
    let (negative, text) = signed_number(expr, &[NumberKind::Integer, NumberKind::Decimal])?;
    Some(format!("{}{text}d", if negative { "-" } else { "" }))
}

/// `true`/`false`, or a number read as a projection or sort flag.
fn as_flag(expr: &Expr) -> Option<bool> {
    match &expr.unparenthesized().kind {
        ExprKind::Literal(Literal::Bool(value)) => Some(*value),
        _ => as_int(expr).map(|v| v != 0),
    }
}

/// The only property of a one-key document.
fn single(props: &[Property]) -> Option<(&str, &Expr)> {
    match props {
        [prop] => Some((property_name(prop)?, &prop.value)),
        _ => None,
    }
}

fn field<'p>(props: &'p [Property], name: &str) -> Option<&'p Expr> {
    props
        .iter()
        .find(|prop| property_name(prop) == Some(name))
        .map(|prop| &prop.value)
}

/// Every key is a static `$` operator name.
fn is_operator_document(props: &[Property]) -> bool {
    !props.is_empty() && props.iter().all(|p| property_name(p).is_some_and(|n| n.starts_with('$')))
}

/// Visit a string literal; `None` for any other expression.
fn string_arg(walker: &mut Walker<'_>, expr: &Expr) -> TranspileResult<Option<String>> {
    match as_str(expr) {
        Some(_) => walker.visit(expr).map(Some),
        None => Ok(None),
    }
}

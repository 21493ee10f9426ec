//! `com.mongodb.client.model.Filters`

use bsonshift_core::lang::import_codes::{FILTER_BUILDERS, MODEL_CLASSES};
use bsonshift_syntax::ast::{Expr, ExprKind, Literal, Property};

use super::geometry::{geometry, point};
use super::{
    as_int, as_items, as_object, call, double_text, field, int_text, is_operator_document, list, quoted, single,
    string_arg,
};
use crate::errors::TranspileResult;
use crate::walker::{Walker, property_name};

const COMPARISONS: &[&str] = &["$eq", "$ne", "$gt", "$gte", "$lt", "$lte", "$exists"];
const LISTS: &[&str] = &["$in", "$nin", "$all"];
const BITS: &[&str] = &["$bitsAllClear", "$bitsAllSet", "$bitsAnyClear", "$bitsAnySet"];

fn filter(walker: &mut Walker<'_>, name: &str, args: &[String]) -> String {
    call(walker, FILTER_BUILDERS, name, args)
}

/// Render a query document as a `Filters` expression.
///
/// Several clauses are joined with `and`. Returns `None` when any clause has a shape `Filters` cannot express (an
/// unknown operator, a computed key, a non-literal operand where a literal is required).
pub fn filters(walker: &mut Walker<'_>, props: &[Property]) -> TranspileResult<Option<String>> {
    let mut clauses = Vec::with_capacity(props.len());
    for prop in props {
        let Some(name) = property_name(prop) else {
            return Ok(None);
        };
        let clause = match name {
            "$and" | "$or" | "$nor" => combinator(walker, &name[1..], &prop.value)?,
            "$expr" => {
                let rendered = walker.visit(&prop.value)?;
                Some(filter(walker, "expr", &[rendered]))
            }
            "$where" => match string_arg(walker, &prop.value)? {
                Some(script) => Some(filter(walker, "where", &[script])),
                None => None,
            },
            "$text" => text(walker, &prop.value)?,
            _ if name.starts_with('$') => None,
            path => field_filter(walker, path, &prop.value)?,
        };
        match clause {
            Some(clause) => clauses.push(clause),
            None => return Ok(None),
        }
    }
    Ok(match clauses.len() {
        0 => None,
        1 => clauses.pop(),
        _ => Some(filter(walker, "and", &clauses)),
    })
}

/// `{$or: [{...}, {...}]}`
fn combinator(walker: &mut Walker<'_>, name: &str, value: &Expr) -> TranspileResult<Option<String>> {
    let Some(items) = as_items(value) else {
        return Ok(None);
    };
    if items.is_empty() {
        return Ok(None);
    }
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        let Some(props) = as_object(item) else {
            return Ok(None);
        };
        match filters(walker, props)? {
            Some(part) => parts.push(part),
            None => return Ok(None),
        }
    }
    Ok(Some(filter(walker, name, &parts)))
}

/// `{$text: {$search: 'x', $language: 'en', $caseSensitive: true}}`
fn text(walker: &mut Walker<'_>, value: &Expr) -> TranspileResult<Option<String>> {
    let Some(props) = as_object(value) else {
        return Ok(None);
    };
    let Some(search) = field(props, "$search") else {
        return Ok(None);
    };
    let Some(search) = string_arg(walker, search)? else {
        return Ok(None);
    };

    let mut options = String::new();
    for prop in props {
        let setter = match property_name(prop) {
            Some("$search") => continue,
            Some("$language") => "language",
            Some("$caseSensitive") => "caseSensitive",
            Some("$diacriticSensitive") => "diacriticSensitive",
            _ => return Ok(None),
        };
        let rendered = walker.visit(&prop.value)?;
        options.push_str(&format!(".{setter}({rendered})"));
    }
    if options.is_empty() {
        return Ok(Some(filter(walker, "text", &[search])));
    }
    walker.record_name(MODEL_CLASSES, "TextSearchOptions");
    let options = format!("new TextSearchOptions(){options}");
    Ok(Some(filter(walker, "text", &[search, options])))
}

/// `{field: value}` or `{field: {$op: value, ...}}`
fn field_filter(walker: &mut Walker<'_>, name: &str, value: &Expr) -> TranspileResult<Option<String>> {
    let key = quoted(name);

    let operators = match as_object(value) {
        Some(inner) if is_operator_document(inner) => inner,
        _ => {
            let rendered = walker.visit(value)?;
            return Ok(Some(filter(walker, "eq", &[key, rendered])));
        }
    };

    let mut parts = Vec::with_capacity(operators.len());
    for prop in operators {
        let op = property_name(prop).unwrap_or_default();
        let part = match op {
            "$options" if field(operators, "$regex").is_some() => continue,
            "$regex" => regex(walker, &key, &prop.value, field(operators, "$options"))?,
            _ => operator(walker, name, op, &prop.value)?,
        };
        match part {
            Some(part) => parts.push(part),
            None => return Ok(None),
        }
    }
    Ok(match parts.len() {
        1 => parts.pop(),
        _ => Some(filter(walker, "and", &parts)),
    })
}

/// One `$op: value` pair under the field `path`.
fn operator(walker: &mut Walker<'_>, path: &str, op: &str, value: &Expr) -> TranspileResult<Option<String>> {
    let key = quoted(path);
    let key = key.as_str();
    let name = op.trim_start_matches('$');
    if COMPARISONS.contains(&op) {
        let rendered = walker.visit(value)?;
        return Ok(Some(filter(walker, name, &[key.to_string(), rendered])));
    }
    if LISTS.contains(&op) {
        let Some(items) = as_items(value) else {
            return Ok(None);
        };
        let mut args = vec![key.to_string()];
        for item in items {
            args.push(walker.visit(item)?);
        }
        return Ok(Some(filter(walker, name, &args)));
    }
    if BITS.contains(&op) {
        return Ok(bitmask(value).map(|mask| filter(walker, name, &[key.to_string(), format!("{mask}L")])));
    }

    Ok(match op {
        "$elemMatch" => match as_object(value) {
            Some(inner) if !is_operator_document(inner) => match filters(walker, inner)? {
                Some(inner) => Some(filter(walker, name, &[key.to_string(), inner])),
                None => None,
            },
            _ => None,
        },
        "$not" => match &value.unparenthesized().kind {
            ExprKind::Object(inner) if is_operator_document(inner) => {
                match field_filter(walker, path, value)? {
                    Some(inner) => Some(filter(walker, name, &[inner])),
                    None => None,
                }
            }
            ExprKind::Literal(Literal::Regex { .. }) => {
                let pattern = walker.visit(value)?;
                let inner = filter(walker, "regex", &[key.to_string(), pattern]);
                Some(filter(walker, name, &[inner]))
            }
            _ => None,
        },
        "$mod" => match as_items(value).as_deref() {
            Some([divisor, remainder]) => {
                let divisor = walker.visit(divisor)?;
                let remainder = walker.visit(remainder)?;
                Some(filter(walker, name, &[key.to_string(), divisor, remainder]))
            }
            _ => None,
        },
        "$size" => int_text(value).map(|size| filter(walker, name, &[key.to_string(), size])),
        "$type" => match string_arg(walker, value)? {
            Some(alias) => Some(filter(walker, name, &[key.to_string(), alias])),
            None => None,
        },
        "$geoWithin" => geo_within(walker, key, value)?,
        "$geoIntersects" => match as_object(value).and_then(|p| field(p, "$geometry")) {
            Some(shape) => match geometry(walker, shape)? {
                Some(shape) => Some(filter(walker, name, &[key.to_string(), shape])),
                None => None,
            },
            None => None,
        },
        "$near" | "$nearSphere" => near(walker, key, name, value)?,
        _ => None,
    })
}

/// `{$regex: 'abc', $options: 'i'}`
fn regex(walker: &mut Walker<'_>, key: &str, pattern: &Expr, options: Option<&Expr>) -> TranspileResult<Option<String>> {
    let Some(pattern) = string_arg(walker, pattern)? else {
        return Ok(None);
    };
    let mut args = vec![key.to_string(), pattern];
    if let Some(options) = options {
        match string_arg(walker, options)? {
            Some(options) => args.push(options),
            None => return Ok(None),
        }
    }
    Ok(Some(filter(walker, "regex", &args)))
}

/// An integer mask, or a list of bit positions folded into one.
fn bitmask(value: &Expr) -> Option<i64> {
    if let Some(mask) = as_int(value) {
        return Some(mask);
    }
    let mut mask = 0i64;
    for item in as_items(value)? {
        let position = u32::try_from(as_int(item)?).ok().filter(|p| *p < 64)?;
        mask |= 1i64 << position;
    }
    Some(mask)
}

/// `$geoWithin` with `$geometry`, `$box`, `$polygon`, `$center` or `$centerSphere`.
fn geo_within(walker: &mut Walker<'_>, key: &str, value: &Expr) -> TranspileResult<Option<String>> {
    let Some((shape, operand)) = as_object(value).and_then(single) else {
        return Ok(None);
    };
    let key = key.to_string();
    Ok(match shape {
        "$geometry" => match geometry(walker, operand)? {
            Some(shape) => Some(filter(walker, "geoWithin", &[key, shape])),
            None => None,
        },
        "$box" => match as_items(operand).as_deref() {
            Some([lower_left, upper_right]) => match (coordinates(lower_left), coordinates(upper_right)) {
                (Some([x1, y1]), Some([x2, y2])) => Some(filter(walker, "geoWithinBox", &[key, x1, y1, x2, y2])),
                _ => None,
            },
            _ => None,
        },
        "$polygon" => {
            let Some(points) = as_items(operand) else {
                return Ok(None);
            };
            let mut rendered = Vec::with_capacity(points.len());
            for point in points {
                let Some(pair) = coordinates(point) else {
                    return Ok(None);
                };
                rendered.push(list(walker, &pair));
            }
            let points = list(walker, &rendered);
            Some(filter(walker, "geoWithinPolygon", &[key, points]))
        }
        "$center" | "$centerSphere" => match as_items(operand).as_deref() {
            Some([center, radius]) => match (coordinates(center), double_text(radius)) {
                (Some([x, y]), Some(radius)) => {
                    let name = if shape == "$center" { "geoWithinCenter" } else { "geoWithinCenterSphere" };
                    Some(filter(walker, name, &[key, x, y, radius]))
                }
                _ => None,
            },
            _ => None,
        },
        _ => None,
    })
}

/// `[x, y]` as two Java doubles.
fn coordinates(expr: &Expr) -> Option<[String; 2]> {
    match as_items(expr)?.as_slice() {
        [x, y] => Some([double_text(x)?, double_text(y)?]),
        _ => None,
    }
}

/// `{$near: {$geometry: {type: 'Point', ...}, $maxDistance: 100, $minDistance: 10}}`
fn near(walker: &mut Walker<'_>, key: &str, name: &str, value: &Expr) -> TranspileResult<Option<String>> {
    let Some(props) = as_object(value) else {
        return Ok(None);
    };
    let mut shape = None;
    let mut max = "null".to_string();
    let mut min = "null".to_string();
    for prop in props {
        let slot = match property_name(prop) {
            Some("$geometry") => {
                shape = Some(&prop.value);
                continue;
            }
            Some("$maxDistance") => &mut max,
            Some("$minDistance") => &mut min,
            _ => return Ok(None),
        };
        match double_text(&prop.value) {
            Some(distance) => *slot = distance,
            None => return Ok(None),
        }
    }
    let Some(shape) = shape else {
        return Ok(None);
    };
    let Some(point) = point(walker, shape)? else {
        return Ok(None);
    };
    Ok(Some(filter(walker, name, &[key.to_string(), point, max, min])))
}

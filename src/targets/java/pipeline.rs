//! Top-level arrays: aggregation stages (`Aggregates`, `Projections`, `Sorts`), accumulators and geometries.

use bsonshift_core::lang::import_codes::{
    ACCUMULATOR_BUILDERS, AGGREGATE_BUILDERS, MODEL_CLASSES, PROJECTION_BUILDERS, SORT_BUILDERS,
};
use bsonshift_syntax::ast::{Expr, Property};

use super::filters::filters;
use super::geometry::geometry;
use super::{as_flag, as_int, as_items, as_object, as_str, call, construct, field, int_text, list, quoted, single, string_arg};
use crate::errors::TranspileResult;
use crate::walker::{Walker, property_name};

const ACCUMULATORS: &[&str] = &[
    "$sum",
    "$avg",
    "$first",
    "$last",
    "$max",
    "$min",
    "$push",
    "$addToSet",
    "$mergeObjects",
    "$stdDevPop",
    "$stdDevSamp",
];

/// Render a top-level array element by element.
///
/// Each document element becomes the first builder form that accepts it: an aggregation stage, an accumulator, a
/// `$geometry` wrapper, then a filter. An element no form accepts is rendered generically. Returns `None` (the whole
/// array is rendered generically) if the array has holes.
pub fn pipeline(walker: &mut Walker<'_>, items: &[Option<Expr>]) -> TranspileResult<Option<String>> {
    let mut rendered = Vec::with_capacity(items.len());
    for item in items {
        let Some(item) = item else {
            return Ok(None);
        };
        let element = match as_object(item) {
            Some(props) => walker.attempt(|walker| element(walker, props))?,
            None => None,
        };
        rendered.push(match element {
            Some(element) => element,
            None => walker.visit(item)?,
        });
    }
    Ok(Some(list(walker, &rendered)))
}

fn element(walker: &mut Walker<'_>, props: &[Property]) -> TranspileResult<Option<String>> {
    if let Some((name, value)) = single(props) {
        if name == "$geometry" {
            return geometry(walker, value);
        }
        if name.starts_with('$') {
            if let Some(stage) = stage(walker, name, value)? {
                return Ok(Some(stage));
            }
        }
        if let Some(accumulator) = accumulator(walker, name, value)? {
            return Ok(Some(accumulator));
        }
    }
    filters(walker, props)
}

// ============================================================================
// Stages
// ============================================================================

fn aggregate(walker: &mut Walker<'_>, name: &str, args: &[String]) -> String {
    call(walker, AGGREGATE_BUILDERS, name, args)
}

/// A stage document in a nested pipeline, rendered generically if no builder fits.
fn nested_stage(walker: &mut Walker<'_>, expr: &Expr) -> TranspileResult<String> {
    if let Some((name, value)) = as_object(expr).and_then(single) {
        if let Some(stage) = walker.attempt(|walker| stage(walker, name, value))? {
            return Ok(stage);
        }
    }
    walker.visit(expr)
}

/// `{$stage: value}`
fn stage(walker: &mut Walker<'_>, name: &str, value: &Expr) -> TranspileResult<Option<String>> {
    let builder = name.trim_start_matches('$');
    Ok(match name {
        "$count" | "$out" => match string_arg(walker, value)? {
            Some(arg) => Some(aggregate(walker, builder, &[arg])),
            None => None,
        },
        "$unwind" => match as_str(value) {
            Some(path) if path.starts_with('$') => {
                let path = walker.visit(value)?;
                Some(aggregate(walker, builder, &[path]))
            }
            _ => None,
        },
        "$limit" | "$skip" => int_text(value).map(|n| aggregate(walker, builder, &[n])),
        "$sample" => match as_object(value).and_then(single) {
            Some(("size", size)) => int_text(size).map(|n| aggregate(walker, builder, &[n])),
            _ => None,
        },
        "$match" => match as_object(value) {
            Some(query) => {
                let query = match walker.attempt(|walker| filters(walker, query))? {
                    Some(query) => query,
                    None => walker.visit(value)?,
                };
                Some(aggregate(walker, builder, &[query]))
            }
            None => None,
        },
        "$sortByCount" => {
            let expression = walker.visit(value)?;
            Some(aggregate(walker, builder, &[expression]))
        }
        "$replaceRoot" => match as_object(value).and_then(single) {
            Some(("newRoot", root)) => {
                let root = walker.visit(root)?;
                Some(aggregate(walker, builder, &[root]))
            }
            _ => None,
        },
        "$lookup" => lookup(walker, value)?,
        "$graphLookup" => graph_lookup(walker, value)?,
        "$group" => group(walker, value)?,
        "$facet" => facet(walker, value)?,
        "$addFields" => add_fields(walker, value)?,
        "$project" => match as_object(value) {
            Some(props) => projection(walker, props)?.map(|p| aggregate(walker, builder, &[p])),
            None => None,
        },
        "$sort" => match as_object(value) {
            Some(props) => sort_order(walker, props)?.map(|s| aggregate(walker, builder, &[s])),
            None => None,
        },
        _ => None,
    })
}

/// String-valued fields of a stage document, in the order given; `None` if any is missing or not a string.
fn strings(walker: &mut Walker<'_>, props: &[Property], names: &[&str]) -> TranspileResult<Option<Vec<String>>> {
    let mut values = Vec::with_capacity(names.len());
    for name in names {
        let Some(value) = field(props, name) else {
            return Ok(None);
        };
        match string_arg(walker, value)? {
            Some(value) => values.push(value),
            None => return Ok(None),
        }
    }
    Ok(Some(values))
}

/// `{$lookup: {from, localField, foreignField, as}}`
fn lookup(walker: &mut Walker<'_>, value: &Expr) -> TranspileResult<Option<String>> {
    const FIELDS: &[&str] = &["from", "localField", "foreignField", "as"];
    let Some(props) = as_object(value) else {
        return Ok(None);
    };
    if props.len() != FIELDS.len() {
        return Ok(None);
    }
    Ok(strings(walker, props, FIELDS)?.map(|args| aggregate(walker, "lookup", &args)))
}

/// `{$graphLookup: {...}}`; the optional fields go through `GraphLookupOptions`.
fn graph_lookup(walker: &mut Walker<'_>, value: &Expr) -> TranspileResult<Option<String>> {
    let Some(props) = as_object(value) else {
        return Ok(None);
    };
    let Some(start_with) = field(props, "startWith") else {
        return Ok(None);
    };
    let Some(mut args) = strings(walker, props, &["from"])? else {
        return Ok(None);
    };
    args.push(walker.visit(start_with)?);
    let Some(rest) = strings(walker, props, &["connectFromField", "connectToField", "as"])? else {
        return Ok(None);
    };
    args.extend(rest);

    let mut options = String::new();
    for prop in props {
        let option = match property_name(prop) {
            Some("from" | "startWith" | "connectFromField" | "connectToField" | "as") => continue,
            Some("maxDepth") => int_text(&prop.value),
            Some("depthField") => string_arg(walker, &prop.value)?,
            Some("restrictSearchWithMatch") => match as_object(&prop.value) {
                Some(query) => match walker.attempt(|walker| filters(walker, query))? {
                    Some(query) => Some(query),
                    None => Some(walker.visit(&prop.value)?),
                },
                None => None,
            },
            _ => None,
        };
        let (Some(name), Some(option)) = (property_name(prop), option) else {
            return Ok(None);
        };
        options.push_str(&format!(".{name}({option})"));
    }
    if !options.is_empty() {
        walker.record_name(MODEL_CLASSES, "GraphLookupOptions");
        args.push(format!("new GraphLookupOptions(){options}"));
    }
    Ok(Some(aggregate(walker, "graphLookup", &args)))
}

/// `{$group: {_id: expr, field: {$accumulator: expr}, ...}}`
fn group(walker: &mut Walker<'_>, value: &Expr) -> TranspileResult<Option<String>> {
    let Some(props) = as_object(value) else {
        return Ok(None);
    };
    let Some(id) = field(props, "_id") else {
        return Ok(None);
    };
    let mut args = vec![walker.visit(id)?];
    for prop in props {
        let Some(name) = property_name(prop) else {
            return Ok(None);
        };
        if name == "_id" {
            continue;
        }
        match accumulator(walker, name, &prop.value)? {
            Some(accumulator) => args.push(accumulator),
            None => return Ok(None),
        }
    }
    Ok(Some(aggregate(walker, "group", &args)))
}

/// `{$facet: {name: [stages...], ...}}`
fn facet(walker: &mut Walker<'_>, value: &Expr) -> TranspileResult<Option<String>> {
    let Some(props) = as_object(value) else {
        return Ok(None);
    };
    let mut facets = Vec::with_capacity(props.len());
    for prop in props {
        let (Some(name), Some(stages)) = (property_name(prop), as_items(&prop.value)) else {
            return Ok(None);
        };
        let mut rendered = Vec::with_capacity(stages.len());
        for stage in stages {
            rendered.push(nested_stage(walker, stage)?);
        }
        let stages = list(walker, &rendered);
        facets.push(construct(walker, MODEL_CLASSES, "Facet", &[quoted(name), stages]));
    }
    Ok(Some(aggregate(walker, "facet", &facets)))
}

/// `{$addFields: {name: expr, ...}}`
fn add_fields(walker: &mut Walker<'_>, value: &Expr) -> TranspileResult<Option<String>> {
    let Some(props) = as_object(value) else {
        return Ok(None);
    };
    let mut fields = Vec::with_capacity(props.len());
    for prop in props {
        let Some(name) = property_name(prop) else {
            return Ok(None);
        };
        let rendered = walker.visit(&prop.value)?;
        fields.push(construct(walker, MODEL_CLASSES, "Field", &[quoted(name), rendered]));
    }
    Ok(Some(aggregate(walker, "addFields", &fields)))
}

// ============================================================================
// Accumulators, projections, sorts
// ============================================================================

/// `field: {$sum: expr}` → `sum("field", expr)`
fn accumulator(walker: &mut Walker<'_>, name: &str, value: &Expr) -> TranspileResult<Option<String>> {
    let Some((op, operand)) = as_object(value).and_then(single) else {
        return Ok(None);
    };
    if !ACCUMULATORS.contains(&op) {
        return Ok(None);
    }
    let operand = walker.visit(operand)?;
    Ok(Some(call(walker, ACCUMULATOR_BUILDERS, &op[1..], &[quoted(name), operand])))
}

/// `{a: 1, b: 0, _id: 0, c: {$meta: 'textScore'}}`
///
/// Included (and excluded) fields are gathered into one `include` (`exclude`) at the position of the first.
fn projection(walker: &mut Walker<'_>, props: &[Property]) -> TranspileResult<Option<String>> {
    enum Part {
        Include(Vec<String>),
        Exclude(Vec<String>),
        Other(String),
    }

    let mut parts: Vec<Part> = Vec::new();
    for prop in props {
        let Some(name) = property_name(prop) else {
            return Ok(None);
        };
        let key = quoted(name);
        let rendered = match (as_flag(&prop.value), name) {
            (Some(false), "_id") => call(walker, PROJECTION_BUILDERS, "excludeId", &[]),
            (Some(true), _) => {
                match parts.iter_mut().find_map(|p| if let Part::Include(keys) = p { Some(keys) } else { None }) {
                    Some(keys) => keys.push(key),
                    None => parts.push(Part::Include(vec![key])),
                }
                continue;
            }
            (Some(false), _) => {
                match parts.iter_mut().find_map(|p| if let Part::Exclude(keys) = p { Some(keys) } else { None }) {
                    Some(keys) => keys.push(key),
                    None => parts.push(Part::Exclude(vec![key])),
                }
                continue;
            }
            (None, _) => match as_object(&prop.value).and_then(single) {
                Some(("$meta", meta)) if as_str(meta) == Some("textScore") => {
                    call(walker, PROJECTION_BUILDERS, "metaTextScore", &[key])
                }
                Some(("$slice", count)) if as_int(count).is_some() => {
                    let count = walker.visit(count)?;
                    call(walker, PROJECTION_BUILDERS, "slice", &[key, count])
                }
                Some(("$elemMatch", query)) => match as_object(query) {
                    Some(query) => match filters(walker, query)? {
                        Some(query) => call(walker, PROJECTION_BUILDERS, "elemMatch", &[key, query]),
                        None => return Ok(None),
                    },
                    None => return Ok(None),
                },
                _ => {
                    let expression = walker.visit(&prop.value)?;
                    call(walker, PROJECTION_BUILDERS, "computed", &[key, expression])
                }
            },
        };
        parts.push(Part::Other(rendered));
    }

    let mut rendered = Vec::with_capacity(parts.len());
    for part in parts {
        rendered.push(match part {
            Part::Include(keys) => call(walker, PROJECTION_BUILDERS, "include", &keys),
            Part::Exclude(keys) => call(walker, PROJECTION_BUILDERS, "exclude", &keys),
            Part::Other(text) => text,
        });
    }
    Ok(match rendered.len() {
        0 => None,
        1 => rendered.pop(),
        _ => Some(call(walker, PROJECTION_BUILDERS, "fields", &rendered)),
    })
}

/// `{a: 1, b: -1, c: {$meta: 'textScore'}}`
fn sort_order(walker: &mut Walker<'_>, props: &[Property]) -> TranspileResult<Option<String>> {
    let mut orders = Vec::with_capacity(props.len());
    for prop in props {
        let Some(name) = property_name(prop) else {
            return Ok(None);
        };
        let key = quoted(name);
        let order = match as_int(&prop.value) {
            Some(1) => "ascending",
            Some(-1) => "descending",
            _ => match as_object(&prop.value).and_then(single) {
                Some(("$meta", meta)) if as_str(meta) == Some("textScore") => "metaTextScore",
                _ => return Ok(None),
            },
        };
        orders.push(call(walker, SORT_BUILDERS, order, &[key]));
    }
    Ok(match orders.len() {
        0 => None,
        1 => orders.pop(),
        _ => Some(call(walker, SORT_BUILDERS, "orderBy", &orders)),
    })
}

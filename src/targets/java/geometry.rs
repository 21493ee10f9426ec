//! `com.mongodb.client.model.geojson`

use bsonshift_core::lang::import_codes::GEOJSON_CLASSES;
use bsonshift_syntax::ast::Expr;

use super::{as_items, as_object, as_str, construct, double_text, field, list};
use crate::errors::TranspileResult;
use crate::walker::Walker;

/// Render a GeoJSON document (`{type: 'Point', coordinates: [1, 2]}`) as a geometry object.
///
/// A `GeometryCollection` takes its members from `geometries`, or from `coordinates` when that holds documents.
pub fn geometry(walker: &mut Walker<'_>, value: &Expr) -> TranspileResult<Option<String>> {
    let Some(props) = as_object(value) else {
        return Ok(None);
    };
    let Some(kind) = field(props, "type").and_then(as_str) else {
        return Ok(None);
    };
    if kind == "GeometryCollection" {
        let Some(members) = field(props, "geometries")
            .or_else(|| field(props, "coordinates"))
            .and_then(as_items)
        else {
            return Ok(None);
        };
        let mut rendered = Vec::with_capacity(members.len());
        for member in members {
            match geometry(walker, member)? {
                Some(member) => rendered.push(member),
                None => return Ok(None),
            }
        }
        let members = list(walker, &rendered);
        return Ok(Some(construct(walker, GEOJSON_CLASSES, kind, &[members])));
    }

    let Some(coordinates) = field(props, "coordinates") else {
        return Ok(None);
    };
    let arg = match kind {
        "Point" => position(walker, coordinates),
        "MultiPoint" | "LineString" => positions(walker, coordinates),
        "MultiLineString" => nested(walker, coordinates, positions),
        "Polygon" => polygon_coordinates(walker, coordinates),
        "MultiPolygon" => nested(walker, coordinates, polygon_coordinates),
        _ => None,
    };
    Ok(arg.map(|arg| construct(walker, GEOJSON_CLASSES, kind, &[arg])))
}

/// A geometry that must be a `Point`, as `$near` requires.
pub fn point(walker: &mut Walker<'_>, value: &Expr) -> TranspileResult<Option<String>> {
    let is_point = as_object(value)
        .and_then(|props| field(props, "type"))
        .and_then(as_str)
        .is_some_and(|kind| kind == "Point");
    if is_point { geometry(walker, value) } else { Ok(None) }
}

/// `[x, y]` or `[x, y, z]` → `new Position(xd, yd)`
fn position(walker: &mut Walker<'_>, expr: &Expr) -> Option<String> {
    let items = as_items(expr)?;
    if !(2..=3).contains(&items.len()) {
        return None;
    }
    let values = items.into_iter().map(double_text).collect::<Option<Vec<_>>>()?;
    Some(construct(walker, GEOJSON_CLASSES, "Position", &values))
}

/// `[[x, y], ...]` → `Arrays.asList(new Position(..), ...)`
fn positions(walker: &mut Walker<'_>, expr: &Expr) -> Option<String> {
    let items = as_items(expr)?;
    let mut rendered = Vec::with_capacity(items.len());
    for item in items {
        rendered.push(position(walker, item)?);
    }
    Some(list(walker, &rendered))
}

/// `[exterior, hole, ...]` → `new PolygonCoordinates(exterior, hole...)`
fn polygon_coordinates(walker: &mut Walker<'_>, expr: &Expr) -> Option<String> {
    let rings = as_items(expr)?;
    if rings.is_empty() {
        return None;
    }
    let mut rendered = Vec::with_capacity(rings.len());
    for ring in rings {
        rendered.push(positions(walker, ring)?);
    }
    Some(construct(walker, GEOJSON_CLASSES, "PolygonCoordinates", &rendered))
}

/// A list of `inner` forms.
fn nested(
    walker: &mut Walker<'_>,
    expr: &Expr,
    inner: fn(&mut Walker<'_>, &Expr) -> Option<String>,
) -> Option<String> {
    let items = as_items(expr)?;
    let mut rendered = Vec::with_capacity(items.len());
    for item in items {
        rendered.push(inner(walker, item)?);
    }
    Some(list(walker, &rendered))
}

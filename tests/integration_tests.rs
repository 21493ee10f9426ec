//! End-to-end tests through the public [`Transpiler`] API.

use bsonshift::{ErrorKind, TranspileConfig, Transpiler, Value};
use bsonshift_core::lang::languages::LanguageId;

fn transpiler(input: LanguageId, output: LanguageId) -> Transpiler {
    Transpiler::new(TranspileConfig::new().with_input(input).with_output(output)).unwrap()
}

fn compile(input: LanguageId, output: LanguageId, source: &str) -> (String, String) {
    let mut t = transpiler(input, output);
    let rendered = t.compile(source).unwrap();
    (rendered, t.imports())
}

// ============================================================================
// One query across every target
// ============================================================================

const QUERY: &str = "{_id: ObjectId('5a7382114ec1f67ae445f778'), n: NumberLong(7), tags: ['a', 'b']}";

#[test]
fn shell_query_to_java() {
    let mut t = Transpiler::new(
        TranspileConfig::new()
            .with_input(LanguageId::Shell)
            .with_output(LanguageId::Java)
            .with_idiomatic(false),
    )
    .unwrap();
    insta::assert_snapshot!(
        t.compile(QUERY).unwrap(),
        @r#"new Document("_id", new ObjectId("5a7382114ec1f67ae445f778")).append("n", 7L).append("tags", Arrays.asList("a", "b"))"#
    );
    insta::assert_snapshot!(t.imports(), @r"
    import java.util.Arrays;
    import org.bson.Document;
    import org.bson.types.ObjectId;
    ");
}

#[test]
fn shell_query_to_python() {
    let (rendered, imports) = compile(LanguageId::Shell, LanguageId::Python, QUERY);
    insta::assert_snapshot!(rendered, @"{'_id': ObjectId('5a7382114ec1f67ae445f778'), 'n': Int64(7), 'tags': ['a', 'b']}");
    assert_eq!(imports, "from bson import ObjectId, Int64");
}

#[test]
fn shell_query_to_csharp() {
    let (rendered, imports) = compile(LanguageId::Shell, LanguageId::CSharp, QUERY);
    insta::assert_snapshot!(rendered, @r#"new BsonDocument { { "_id", new ObjectId("5a7382114ec1f67ae445f778") }, { "n", 7L }, { "tags", new BsonArray { "a", "b" } } }"#);
    insta::assert_snapshot!(imports, @r"
    using MongoDB.Bson;
    using MongoDB.Driver;
    ");
}

#[test]
fn shell_query_to_javascript() {
    let (rendered, imports) = compile(LanguageId::Shell, LanguageId::JavaScript, QUERY);
    insta::assert_snapshot!(rendered, @r"
    {
      _id: new ObjectId('5a7382114ec1f67ae445f778'),
      n: Long.fromString('7'),
      tags: ['a', 'b']
    }
    ");
    insta::assert_snapshot!(imports, @r"
    const {
      ObjectId,
      Long
    } = require('mongodb');
    ");
}

#[test]
fn javascript_query_to_shell() {
    let (rendered, imports) = compile(
        LanguageId::JavaScript,
        LanguageId::Shell,
        "{_id: new ObjectId('5a7382114ec1f67ae445f778'), n: Long.fromNumber(7)}",
    );
    assert_eq!(
        rendered,
        "{_id: ObjectId('5a7382114ec1f67ae445f778'), n: NumberLong('7')}"
    );
    assert_eq!(imports, "");
}

// ============================================================================
// Imports
// ============================================================================

#[test]
fn java_timestamp_filter_imports() {
    let (rendered, imports) = compile(LanguageId::JavaScript, LanguageId::Java, "{ts: new Timestamp(1, 2)}");
    assert_eq!(rendered, r#"eq("ts", new BSONTimestamp(1L, 2L))"#);
    insta::assert_snapshot!(imports, @r"
    import org.bson.types.BSONTimestamp;
    import static com.mongodb.client.model.Filters.eq;
    ");
}

#[test]
fn java_code_with_scope_in_filter() {
    let (rendered, imports) = compile(LanguageId::JavaScript, LanguageId::Java, "{f: new Code('x', {a: 1})}");
    assert_eq!(rendered, r#"eq("f", new CodeWithScope("x", new Document("a", 1L)))"#);
    insta::assert_snapshot!(imports, @r"
    import org.bson.Document;
    import org.bson.types.Code;
    import org.bson.types.CodeWithScope;
    import static com.mongodb.client.model.Filters.eq;
    ");
}

const EVERY_TYPE: &str = "{0: true, 1: 1, 2: NumberLong(100), 3: 0.001, 4: 0x1243, 5: 0o123, 6: 10, 7: 'str', \
8: RegExp('10'), '8a': /abc/, 9: [1, 2], 10: {x: 1}, 11: null, 12: undefined, 100: Code('1', {x: 1}), \
'100a': Code('!'), 101: ObjectId(), 103: DBRef('c', ObjectId()), 105: NumberInt(1), 106: NumberLong(1), \
107: MinKey(), 108: MaxKey(), 110: Timestamp(1, 100), 111: Symbol('1'), 112: NumberDecimal(1), \
'201a': new Date(), '201b': ISODate(), '201c': new ISODate()}";

#[test]
fn java_imports_for_every_type() {
    let (_, imports) = compile(LanguageId::Shell, LanguageId::Java, EVERY_TYPE);
    insta::assert_snapshot!(imports, @r"
    import java.util.regex.Pattern;
    import java.util.Arrays;
    import org.bson.Document;
    import org.bson.BsonNull;
    import org.bson.BsonUndefined;
    import org.bson.types.Code;
    import org.bson.types.ObjectId;
    import com.mongodb.DBRef;
    import org.bson.types.MinKey;
    import org.bson.types.MaxKey;
    import org.bson.types.BSONTimestamp;
    import org.bson.types.Symbol;
    import org.bson.types.Decimal128;
    import org.bson.types.CodeWithScope;
    import static com.mongodb.client.model.Filters.and;
    import static com.mongodb.client.model.Filters.eq;
    ");
}

#[test]
fn csharp_imports_for_every_type() {
    let (_, imports) = compile(LanguageId::Shell, LanguageId::CSharp, EVERY_TYPE);
    insta::assert_snapshot!(imports, @r"
    using MongoDB.Bson;
    using MongoDB.Driver;
    using System.Text.RegularExpressions;
    using System;
    ");
}

#[test]
fn javascript_imports_for_every_type() {
    let (_, imports) = compile(LanguageId::Shell, LanguageId::JavaScript, EVERY_TYPE);
    insta::assert_snapshot!(imports, @r"
    const {
      Code,
      ObjectId,
      DBRef,
      Int32,
      Long,
      MinKey,
      MaxKey,
      Timestamp,
      Symbol,
      Decimal128
    } = require('mongodb');
    ");
}

#[test]
fn single_type_imports() {
    use LanguageId::*;
    assert_eq!(compile(Shell, CSharp, "{x: /abc/g}").1, "using MongoDB.Bson;\nusing MongoDB.Driver;\nusing System.Text.RegularExpressions;");
    assert_eq!(compile(Shell, JavaScript, "{x: Symbol('a')}").1, "const {\n  Symbol\n} = require('mongodb');");
    assert_eq!(compile(Python, JavaScript, "{'x': int(1)}").1, "const {\n  Int32\n} = require('mongodb');");
    assert_eq!(compile(Python, Java, "{'x': int(1)}").1, "import static com.mongodb.client.model.Filters.eq;");

    let (rendered, imports) = compile(Shell, Java, "{x: null, y: undefined}");
    assert_eq!(rendered, r#"and(eq("x", new BsonNull()), eq("y", new BsonUndefined()))"#);
    insta::assert_snapshot!(imports, @r"
    import org.bson.BsonNull;
    import org.bson.BsonUndefined;
    import static com.mongodb.client.model.Filters.and;
    import static com.mongodb.client.model.Filters.eq;
    ");
}

// ============================================================================
// Java builders
// ============================================================================

#[test]
fn java_filter_builder_imports() {
    let source = "[{$and: [{x: 1}], $expr: 1, all: {$all: [1, 2]}, bitsAllClear: {$bitsAllClear: [1, 1]}, \
bitsAllSet: {$bitsAllSet: [1, 1]}, bitsAnyClear: {$bitsAnyClear: [1, 1]}, bitsAnySet: {$bitsAnySet: [1, 1]}, \
elemMatch: {$elemMatch: {x: 1}}, eq: {$eq: 1}, exists: {$exists: true}, gt: {$gt: 1}, gte: {$gte: 1}, \
lt: {$lt: 1}, lte: {$lte: 1}, in: {$in: [1, 2]}, mod: {$mod: [1, 2]}, ne: {$ne: 1}, nin: {$nin: [1, 2]}, \
$nor: [{x: 1}, {y: 1}], not: {$not: {$eq: 1}}, $or: [{x: 1}, {y: 2}], regex: {$regex: 'abc', $options: 'c'}, \
size: {$size: 1}, type: {$type: 'string'}, $where: '1', $text: {$search: '1'}, \
x1: {$geoWithin: {$geometry: {type: 'Point', coordinates: [1, 2]}}}, \
x2: {$geoWithin: {$box: [[1, 2], [3, 4]]}}, x3: {$geoWithin: {$polygon: [[1, 2], [3, 4], [5, 6], [1, 2]]}}, \
x4: {$geoWithin: {$center: [[1, 2], 5]}}, x5: {$geoWithin: {$centerSphere: [[1, 2], 5]}}, \
x6: {$geoIntersects: {$geometry: {type: 'Point', coordinates: [1, 2]}}}, \
x7: {$near: {$geometry: {type: 'Point', coordinates: [1, 2]}, $minDistance: 10, $maxDistance: 100}}, \
x8: {$nearSphere: {$geometry: {type: 'Point', coordinates: [1, 2]}, $minDistance: 10, $maxDistance: 100}}}]";
    let (_, imports) = compile(LanguageId::Shell, LanguageId::Java, source);
    let filters = [
        "all", "and", "bitsAllClear", "bitsAllSet", "bitsAnyClear", "bitsAnySet", "elemMatch", "eq", "exists",
        "expr", "geoIntersects", "geoWithin", "geoWithinBox", "geoWithinCenter", "geoWithinCenterSphere",
        "geoWithinPolygon", "gt", "gte", "in", "lt", "lte", "mod", "ne", "near", "nearSphere", "nin", "nor", "not",
        "or", "regex", "size", "text", "type", "where",
    ];
    let mut expected = vec!["import java.util.Arrays;".to_string()];
    expected.extend(filters.iter().map(|name| format!("import static com.mongodb.client.model.Filters.{name};")));
    expected.push("import com.mongodb.client.model.geojson.Point;".to_string());
    expected.push("import com.mongodb.client.model.geojson.Position;".to_string());
    assert_eq!(imports, expected.join("\n"));
}

#[test]
fn java_filter_operators() {
    use LanguageId::*;
    let cases = [
        ("{n: {$bitsAllSet: [1, 5]}}", r#"bitsAllSet("n", 34L)"#),
        ("{n: {$not: {$gt: 5}}}", r#"not(gt("n", 5L))"#),
        ("{n: {$regex: 'a.c', $options: 'i'}}", r#"regex("n", "a.c", "i")"#),
        ("{n: {$mod: [4, 0]}}", r#"mod("n", 4L, 0L)"#),
        ("{tags: {$size: 2}}", r#"size("tags", 2)"#),
        ("{loc: {$geoWithin: {$center: [[1, 2], 5]}}}", r#"geoWithinCenter("loc", 1d, 2d, 5d)"#),
        (
            "{loc: {$near: {$geometry: {type: 'Point', coordinates: [1, 2]}, $maxDistance: 100}}}",
            r#"near("loc", new Point(new Position(1d, 2d)), 100d, null)"#,
        ),
    ];
    for (source, expected) in cases {
        assert_eq!(compile(Shell, Java, source).0, expected, "{source}");
    }
}

#[test]
fn java_aggregation_builder_imports() {
    let source = "[{$count: 'field'}, {$facet: {output1: [{$match: {x: 1}}]}}, \
{$graphLookup: {from: 'collection', startWith: '$expr', connectFromField: 'fromF', connectToField: 'toF', \
as: 'asF', maxDepth: 10, depthField: 'depthF', restrictSearchWithMatch: {x: 1}}}, {$group: {_id: 'idField'}}, \
{$limit: 1}, {$lookup: {from: 'fromColl', localField: 'localF', foreignField: 'foreignF', as: 'outputF'}}, \
{$match: {x: 1}}, {$out: 'coll'}, {$project: {x: true, y: true, _id: 0}}, {$replaceRoot: {newRoot: {x: 'newDoc'}}}, \
{$sample: {size: 1}}, {$skip: 10}, {$sort: {x: 1, y: -1, z: {$meta: 'textScore'}}}, {$sortByCount: '$expr'}, \
{$unwind: '$field'}]";
    let (_, imports) = compile(LanguageId::Shell, LanguageId::Java, source);
    insta::assert_snapshot!(imports, @r"
    import java.util.Arrays;
    import org.bson.Document;
    import static com.mongodb.client.model.Filters.eq;
    import static com.mongodb.client.model.Aggregates.count;
    import static com.mongodb.client.model.Aggregates.facet;
    import static com.mongodb.client.model.Aggregates.graphLookup;
    import static com.mongodb.client.model.Aggregates.group;
    import static com.mongodb.client.model.Aggregates.limit;
    import static com.mongodb.client.model.Aggregates.lookup;
    import static com.mongodb.client.model.Aggregates.match;
    import static com.mongodb.client.model.Aggregates.out;
    import static com.mongodb.client.model.Aggregates.project;
    import static com.mongodb.client.model.Aggregates.replaceRoot;
    import static com.mongodb.client.model.Aggregates.sample;
    import static com.mongodb.client.model.Aggregates.skip;
    import static com.mongodb.client.model.Aggregates.sort;
    import static com.mongodb.client.model.Aggregates.sortByCount;
    import static com.mongodb.client.model.Aggregates.unwind;
    import static com.mongodb.client.model.Projections.excludeId;
    import static com.mongodb.client.model.Projections.fields;
    import static com.mongodb.client.model.Projections.include;
    import static com.mongodb.client.model.Sorts.ascending;
    import static com.mongodb.client.model.Sorts.descending;
    import static com.mongodb.client.model.Sorts.metaTextScore;
    import static com.mongodb.client.model.Sorts.orderBy;
    import com.mongodb.client.model.Facet;
    import com.mongodb.client.model.GraphLookupOptions;
    ");
}

#[test]
fn java_pipeline_stages() {
    use LanguageId::*;
    let cases = [
        ("[{$match: {x: 1}}, {$limit: 1}]", r#"Arrays.asList(match(eq("x", 1L)), limit(1))"#),
        (
            "[{$group: {_id: '$a', total: {$sum: '$n'}}}]",
            r#"Arrays.asList(group("$a", sum("total", "$n")))"#,
        ),
        (
            "[{$project: {x: 1, _id: 0}}, {$sort: {x: -1}}]",
            r#"Arrays.asList(project(fields(include("x"), excludeId())), sort(descending("x")))"#,
        ),
        (
            "[{$facet: {a: [{$skip: 2}]}}]",
            r#"Arrays.asList(facet(new Facet("a", Arrays.asList(skip(2)))))"#,
        ),
        ("[{$unwind: '$tags'}, {$out: 'c'}]", r#"Arrays.asList(unwind("$tags"), out("c"))"#),
    ];
    for (source, expected) in cases {
        assert_eq!(compile(Shell, Java, source).0, expected, "{source}");
    }
}

#[test]
fn java_pipeline_falls_back_per_element() {
    let mut t = transpiler(LanguageId::Shell, LanguageId::Java);
    assert_eq!(
        t.compile("[{$limit: 1}, {$bucket: {groupBy: '$a'}}]").unwrap(),
        r#"Arrays.asList(limit(1), new Document("$bucket", new Document("groupBy", "$a")))"#
    );
    insta::assert_snapshot!(t.imports(), @r"
    import java.util.Arrays;
    import org.bson.Document;
    import static com.mongodb.client.model.Aggregates.limit;
    ");
}

#[test]
fn java_geometry_builder_imports() {
    let source = "[{$geometry: {type: 'Point', coordinates: [1, 2]}}, \
{$geometry: {type: 'MultiPoint', coordinates: [[1, 2], [3, 4], [5, 6]]}}, \
{$geometry: {type: 'LineString', coordinates: [[1, 2], [3, 4], [5, 6]]}}, \
{$geometry: {type: 'MultiLineString', coordinates: [[[1, 2], [3, 4], [5, 6]], [[7, 8], [9, 10]],]}}, \
{$geometry: {type: 'Polygon', coordinates: [[[1, 2], [3, 4], [5, 6], [1, 2]], [[7, 8], [9, 10], [9, 11], [7, 8]]]}}, \
{$geometry: {type: 'MultiPolygon', coordinates: [[[[1, 2], [3, 4], [5, 6], [1, 2]]], [[[1, 2], [3, 4], [5, 6], [1, 2]]]]}}, \
{$geometry: {type: 'GeometryCollection', coordinates: [{type: 'Point', coordinates: [1, 2]}, \
{type: 'LineString', coordinates: [[1, 2], [3, 4]]}]}}]";
    let (_, imports) = compile(LanguageId::Shell, LanguageId::Java, source);
    insta::assert_snapshot!(imports, @r"
    import java.util.Arrays;
    import com.mongodb.client.model.geojson.GeometryCollection;
    import com.mongodb.client.model.geojson.LineString;
    import com.mongodb.client.model.geojson.MultiLineString;
    import com.mongodb.client.model.geojson.MultiPoint;
    import com.mongodb.client.model.geojson.MultiPolygon;
    import com.mongodb.client.model.geojson.Point;
    import com.mongodb.client.model.geojson.Polygon;
    import com.mongodb.client.model.geojson.PolygonCoordinates;
    import com.mongodb.client.model.geojson.Position;
    ");

    let (rendered, _) = compile(
        LanguageId::Shell,
        LanguageId::Java,
        "[{$geometry: {type: 'LineString', coordinates: [[1, 2], [3, -4.5]]}}]",
    );
    assert_eq!(
        rendered,
        "Arrays.asList(new LineString(Arrays.asList(new Position(1d, 2d), new Position(3d, -4.5d))))"
    );
}

#[test]
fn java_accumulator_builder_imports() {
    let ops = ["sum", "avg", "first", "last", "max", "min", "push", "addToSet", "stdDevPop", "stdDevSamp"];
    let elements: Vec<String> = ops.iter().map(|op| format!("{{x: {{${op}: 1}}}}")).collect();
    let (rendered, imports) = compile(LanguageId::Shell, LanguageId::Java, &format!("[{}]", elements.join(", ")));
    assert!(rendered.starts_with(r#"Arrays.asList(sum("x", 1L), avg("x", 1L)"#), "{rendered}");

    let mut sorted = ops.to_vec();
    sorted.sort_unstable();
    let mut expected = vec!["import java.util.Arrays;".to_string()];
    expected.extend(sorted.iter().map(|op| format!("import static com.mongodb.client.model.Accumulators.{op};")));
    assert_eq!(imports, expected.join("\n"));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn syntax_errors_carry_positions() {
    let err = transpiler(LanguageId::JavaScript, LanguageId::Python).compile("{a: }").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!(err.code(), "SYNTAX_ERROR");
}

#[test]
fn deeply_nested_input_is_a_syntax_error() {
    let mut t = transpiler(LanguageId::JavaScript, LanguageId::Shell);
    let err = t.compile(&"[".repeat(20_000)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert!(err.to_string().contains("nested deeper than 100 levels"), "{err}");

    let nested = format!("{}{}", "[".repeat(50), "]".repeat(50));
    assert_eq!(t.compile(&nested).unwrap(), nested);
}

#[test]
fn unsupported_regex_flag() {
    let err = transpiler(LanguageId::JavaScript, LanguageId::Java).compile("/a/s").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Runtime);
}

#[test]
fn unknown_language_names() {
    assert!(TranspileConfig::from_names("js", "java").is_ok());
    let err = TranspileConfig::from_names("java", "python").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(TranspileConfig::from_names("cobol", "python").is_err());
}

// ============================================================================
// Value mode
// ============================================================================

#[test]
fn object_mode_evaluates_documents() {
    let mut t = transpiler(LanguageId::Shell, LanguageId::Object);
    let value = t.to_value("{n: NumberLong('9007199254740993'), s: 'x', ok: true}").unwrap();
    let Value::Document(fields) = &value else {
        panic!("expected a document, got {}", value.type_name());
    };
    assert_eq!(fields.len(), 3);
    assert_eq!(
        value.to_extended_json().to_string(),
        r#"{"n":9007199254740993,"s":"x","ok":true}"#
    );
}

#[test]
fn object_mode_reads_python() {
    let mut t = transpiler(LanguageId::Python, LanguageId::Object);
    let value = t.to_value("{'a': [1, 2.5], 'b': None}").unwrap();
    assert_eq!(value.to_extended_json().to_string(), r#"{"a":[1,2.5],"b":null}"#);
}

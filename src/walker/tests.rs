use bsonshift_core::lang::languages::LanguageId;

use crate::catalog::Catalog;
use crate::config::TranspileConfig;
use crate::errors::ErrorKind;
use crate::transpiler::Transpiler;

const TEST_SYMBOLS: &str = "\
symbols:
  TestFunc: {callable: func, args: [[_integer], [_decimal, null]], returns: _string}
  Quad: {callable: func, args: [[_integer], [_decimal], [_hex], [_octal]], returns: _string}
  NoArgs: {callable: func, returns: _string}
  Optional: {callable: func, args: [[_string, null]], returns: _string}
  Quint: {callable: func, args: [[_integer], [_decimal], [_hex], [_octal], [_integer]], returns: _string}
  Numerics:
    callable: func
    args: [[_numeric], [_numeric], [_numeric], [_numeric], [_numeric], [_numeric], [_numeric]]
    returns: _string
  Mixed: {callable: func, args: [[_numeric], [_long], [_decimal], [_integer]], returns: _string}
  Longs: {callable: func, args: [[_long], [_long], [_long], [_long], [_long]], returns: _string}
  Ints: {callable: func, args: [[_integer], [_integer], [_integer], [_integer], [_integer]], returns: _string}
  Decimals: {callable: func, args: [[_decimal], [_decimal], [_decimal], [_decimal], [_decimal]], returns: _string}
  Hexes: {callable: func, args: [[_hex], [_hex], [_hex], [_hex], [_hex]], returns: _string}
  Octals: {callable: func, args: [[_octal], [_octal], [_octal], [_octal], [_octal]], returns: _string}
  MaybeDecimal: {callable: func, args: [[_decimal, null]], returns: _string}
";

fn transpiler(input: LanguageId, output: LanguageId, idiomatic: bool) -> Transpiler {
    let config = TranspileConfig::new()
        .with_input(input)
        .with_output(output)
        .with_idiomatic(idiomatic);
    Transpiler::new(config).unwrap()
}

fn with_test_symbols(output: LanguageId) -> Transpiler {
    let catalog = Catalog::load_with(LanguageId::JavaScript, output, Some(TEST_SYMBOLS)).unwrap();
    let config = TranspileConfig::new()
        .with_input(LanguageId::JavaScript)
        .with_output(output);
    Transpiler::with_catalog(config, catalog)
}

fn compile(input: LanguageId, output: LanguageId, source: &str) -> String {
    transpiler(input, output, false).compile(source).unwrap()
}

// ============================================================================
// Containers
// ============================================================================

#[test]
fn test_generic_documents() {
    use LanguageId::*;
    insta::assert_snapshot!(compile(JavaScript, Java, "{x: 1, y: 'a'}"), @r#"new Document("x", 1L).append("y", "a")"#);
    insta::assert_snapshot!(compile(JavaScript, Python, "{x: 1.5, y: true, z: null}"), @"{'x': 1.5, 'y': True, 'z': None}");
    insta::assert_snapshot!(compile(JavaScript, CSharp, "{x: 2.5}"), @r#"new BsonDocument { { "x", 2.5d } }"#);
    insta::assert_snapshot!(compile(JavaScript, Shell, "{'a b': 1}"), @"{'a b': 1}");
}

#[test]
fn test_empty_containers() {
    use LanguageId::*;
    assert_eq!(compile(JavaScript, Java, "{}"), "new Document()");
    assert_eq!(compile(JavaScript, Java, "[]"), "Arrays.asList()");
    assert_eq!(compile(JavaScript, CSharp, "[]"), "new BsonArray()");
}

#[test]
fn test_nested_documents_indent_per_level() {
    insta::assert_snapshot!(compile(LanguageId::JavaScript, LanguageId::JavaScript, "{a: {b: 1}, c: [1, 2]}"), @r"
    {
      a: {
        b: 1
      },
      c: [1, 2]
    }
    ");
}

#[test]
fn test_python_literals_to_javascript() {
    insta::assert_snapshot!(compile(LanguageId::Python, LanguageId::JavaScript, "{'a': True, 'b': None}"), @r"
    {
      a: true,
      b: null
    }
    ");
}

#[test]
fn test_octal_literals_per_target() {
    use LanguageId::*;
    assert_eq!(compile(JavaScript, Java, "0o17"), "017");
    assert_eq!(compile(JavaScript, Python, "0o17"), "0o17");
    assert_eq!(compile(JavaScript, CSharp, "0o17"), "15");
}

#[test]
fn test_array_elision() {
    assert_eq!(compile(LanguageId::JavaScript, LanguageId::Python, "[1, , 2]"), "[1, None, 2]");
}

// ============================================================================
// Idiomatic Java
// ============================================================================

#[test]
fn test_java_filters() {
    let mut t = transpiler(LanguageId::JavaScript, LanguageId::Java, true);
    assert_eq!(t.compile("{x: 1}").unwrap(), r#"eq("x", 1L)"#);
    assert_eq!(t.imports(), "import static com.mongodb.client.model.Filters.eq;");

    assert_eq!(
        t.compile("{age: {$gt: 5, $lt: 10}}").unwrap(),
        r#"and(gt("age", 5L), lt("age", 10L))"#
    );
    insta::assert_snapshot!(t.imports(), @r"
    import static com.mongodb.client.model.Filters.and;
    import static com.mongodb.client.model.Filters.gt;
    import static com.mongodb.client.model.Filters.lt;
    ");

    assert_eq!(
        t.compile("{$or: [{a: 1}, {b: 'x'}]}").unwrap(),
        r#"or(eq("a", 1L), eq("b", "x"))"#
    );
    assert_eq!(t.compile("{s: {$in: [1, 2]}}").unwrap(), r#"in("s", 1L, 2L)"#);
}

#[test]
fn test_java_filters_fall_back_to_documents() {
    let mut t = transpiler(LanguageId::JavaScript, LanguageId::Java, true);
    assert_eq!(
        t.compile("{x: {$foo: 1}}").unwrap(),
        r#"new Document("x", new Document("$foo", 1L))"#
    );
    assert_eq!(t.imports(), "import org.bson.Document;");
}

// ============================================================================
// Casting and argument checks
// ============================================================================

#[test]
fn test_numeric_literals_cast_to_parameter_types() {
    let mut java = with_test_symbols(LanguageId::Java);
    assert_eq!(java.compile("TestFunc(1, 2)").unwrap(), "TestFunc(1, 2d)");
    assert_eq!(java.compile("TestFunc(1.5)").unwrap(), "TestFunc(1.5)");
    assert_eq!(java.compile("TestFunc(1, 0x1F)").unwrap(), "TestFunc(1, (double) 0x1F)");
    assert_eq!(java.compile("TestFunc(-1)").unwrap(), "TestFunc(-1)");

    let mut python = with_test_symbols(LanguageId::Python);
    assert_eq!(python.compile("TestFunc(1, 2)").unwrap(), "TestFunc(1, float(2))");
    assert_eq!(python.compile("TestFunc(2.5)").unwrap(), "TestFunc(2.5)");
}

#[test]
fn test_cast_into_each_numeric_slot() {
    let mut java = with_test_symbols(LanguageId::Java);
    assert_eq!(java.compile("Quad(100, 200, 300, 400)").unwrap(), "Quad(100, 200d, 300, 400)");
    assert_eq!(
        java.compile("Quint(100, 200, 300, 400, -500)").unwrap(),
        "Quint(100, 200d, 300, 400, -500)"
    );
}

#[test]
fn test_java_cast_table() {
    let mut java = with_test_symbols(LanguageId::Java);
    let cases = [
        ("1", "1L"),
        ("Number(1)", "1d"),
        ("MaybeDecimal(100)", "MaybeDecimal(100d)"),
        (
            "Numerics(10, 10.01, 0x6, 0o5, Number(10), Number('10'), -10)",
            r#"Numerics(10L, 10.01d, 0x6, 05, 10d, Double.parseDouble("10"), -10L)"#,
        ),
        (
            "Mixed(Number(10), Number('10'), Number(10), Number('10'))",
            r#"Mixed(10d, Double.parseDouble("10"), 10d, Double.parseDouble("10"))"#,
        ),
        (
            "Longs(10, 10.01, 0x6, 0o5, -10)",
            "Longs(10L, new Long(10.01), new Long(0x6), new Long(05), -10L)",
        ),
        ("Ints(10, 10.01, 0x6, 0o5, -10)", "Ints(10, 10.01, 0x6, 05, -10)"),
        (
            "Decimals(10, 10.01, 0x6, 0o5, -10)",
            "Decimals(10d, 10.01d, (double) 0x6, (double) 05, -10d)",
        ),
        ("Hexes(10, 10.01, 0x6, 0o5, -10)", "Hexes(10, 10.01, 0x6, 05, -10)"),
        ("Octals(10, 10.01, 0x6, 0o5, -10)", "Octals(10, 10.01, 0x6, 05, -10)"),
    ];
    for (source, expected) in cases {
        assert_eq!(java.compile(source).unwrap(), expected, "{source}");
    }
}

#[test]
fn test_int32_casts_decimals_explicitly() {
    use LanguageId::*;
    assert_eq!(compile(Shell, Java, "NumberInt(1.5)"), "(int) 1.5");
    assert_eq!(compile(Shell, CSharp, "NumberInt(1.5)"), "(int) 1.5");
    assert_eq!(compile(Shell, Python, "NumberInt(1.5)"), "int(1.5)");
    assert_eq!(compile(Shell, Java, "NumberInt(7)"), "7");
}

#[test]
fn test_empty_and_optional_parameter_lists() {
    let mut t = with_test_symbols(LanguageId::Java);
    assert_eq!(t.compile("NoArgs()").unwrap(), "NoArgs()");
    assert_eq!(t.compile("Optional()").unwrap(), "Optional()");
    assert_eq!(t.compile("Optional('a')").unwrap(), r#"Optional("a")"#);
    let err = t.compile("NoArgs(1)").unwrap_err();
    assert_eq!(err.to_string(), "Argument count mismatch: 'NoArgs' expects 0 args and got 1");
}

#[test]
fn test_argument_errors() {
    let mut t = with_test_symbols(LanguageId::Java);

    let err = t.compile("TestFunc()").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Argument);
    assert_eq!(err.to_string(), "Argument count mismatch: 'TestFunc' requires least one argument");

    let err = t.compile("TestFunc(1, 2, 3)").unwrap_err();
    assert_eq!(err.to_string(), "Argument count mismatch: 'TestFunc' expects 2 args and got 3");

    let err = t.compile("TestFunc('a')").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Argument type mismatch: 'TestFunc' expects types _integer but got type _string for argument at index 0");

    let err = t.compile("TestFunc(1, 'a')").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Argument type mismatch: 'TestFunc' expects types _decimal,[optional] but got type _string for argument at index 1");
}

#[test]
fn test_reference_and_attribute_errors() {
    let mut t = transpiler(LanguageId::JavaScript, LanguageId::Python, false);
    let err = t.compile("{x: Foo(1)}").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Reference);
    assert_eq!(err.to_string(), "Symbol 'Foo' is undefined");

    let err = t.compile("'abc'.length").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unimplemented);
}

#[test]
fn test_attribute_policy() {
    let mut t = transpiler(LanguageId::JavaScript, LanguageId::Java, false);
    let err = t.compile("ObjectId.foo").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Attribute);
    assert_eq!(t.compile("Date.foo").unwrap(), "Date.foo");
}

#[test]
fn test_non_callable_symbol() {
    let err = transpiler(LanguageId::JavaScript, LanguageId::Java, false)
        .compile("Long.MAX_VALUE()")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
}

// ============================================================================
// Symbols
// ============================================================================

#[test]
fn test_object_id_constructor() {
    use LanguageId::*;
    assert_eq!(compile(JavaScript, Java, "new ObjectId()"), "new ObjectId()");
    assert_eq!(
        compile(Shell, Java, "ObjectId('5a7382114ec1f67ae445f778')"),
        r#"new ObjectId("5a7382114ec1f67ae445f778")"#
    );
    assert_eq!(
        compile(Shell, Python, "ObjectId('5a7382114ec1f67ae445f778')"),
        "ObjectId('5a7382114ec1f67ae445f778')"
    );
}

/// `name` occurs in `text` as a whole identifier.
fn mentions(text: &str, name: &str) -> bool {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_';
    text.match_indices(name).any(|(at, _)| {
        let before = text[..at].chars().next_back();
        let after = text[at + name.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}

#[test]
fn test_aliases_render_under_their_target_names() {
    use LanguageId::*;
    let aliases: &[(LanguageId, &str, &[&str])] = &[
        (Shell, "NumberInt(1)", &["NumberInt"]),
        (Shell, "NumberLong(1)", &["NumberLong"]),
        (Shell, "NumberDecimal('1')", &["NumberDecimal"]),
        (Python, "int(1)", &["int"]),
        (Python, "float(2)", &["float"]),
        (Python, "Int64(1)", &["Int64"]),
        (Python, "Regex('a')", &["Regex"]),
        (Python, "ObjectId.is_valid('x')", &["is_valid"]),
        (Python, "datetime.datetime(2019, 1, 1)", &["datetime"]),
        (
            Python,
            "ObjectId.from_datetime(datetime.datetime(2019, 1, 1))",
            &["from_datetime", "datetime"],
        ),
    ];
    for &(input, source, names) in aliases {
        for output in [Java, CSharp, Python, JavaScript, Shell] {
            // A same-language target may spell the alias back.
            if output == input {
                continue;
            }
            let rendered = compile(input, output, source);
            for name in names {
                assert!(!mentions(&rendered, name), "{input} `{source}` -> {output}: {rendered}");
            }
        }
    }
}

#[test]
fn test_aliases_without_target_templates_use_canonical_names() {
    use LanguageId::*;
    let mut t = transpiler(Shell, JavaScript, false);
    assert_eq!(t.compile("NumberInt(1)").unwrap(), "new Int32(1)");
    assert_eq!(t.imports(), "const {\n  Int32\n} = require('mongodb');");
    assert_eq!(compile(Python, JavaScript, "float(2)"), "Number(2)");
    assert_eq!(compile(Python, JavaScript, "ObjectId.is_valid('x')"), "ObjectId.isValid('x')");
}

#[test]
fn test_member_call_on_constructed_value() {
    assert_eq!(
        compile(LanguageId::JavaScript, LanguageId::Java, "new ObjectId().toString()"),
        "new ObjectId().toHexString()"
    );
}

#[test]
fn test_long_constructors_are_evaluated() {
    use LanguageId::*;
    assert_eq!(compile(Shell, Java, "NumberLong('9')"), "9L");
    assert_eq!(compile(JavaScript, Java, "Long.fromBits(1, 1)"), "4294967297L");
    assert_eq!(compile(JavaScript, Shell, "Long.fromBits(1, 1)"), "NumberLong('4294967297')");
    assert_eq!(compile(Shell, Java, "NumberLong(5).toString()"), r#""5""#);
}

#[test]
fn test_code_with_scope() {
    let mut t = transpiler(LanguageId::Shell, LanguageId::Java, true);
    assert_eq!(
        t.compile("Code('x', {a: 1})").unwrap(),
        r#"new CodeWithScope("x", new Document("a", 1L))"#
    );
    insta::assert_snapshot!(t.imports(), @r"
    import org.bson.Document;
    import org.bson.types.Code;
    import org.bson.types.CodeWithScope;
    ");

    let err = t.compile("Code('x', 1)").unwrap_err();
    assert_eq!(err.to_string(), "Argument type mismatch: Code requires scope to be an object");
}

#[test]
fn test_code_in_document_imports() {
    let mut t = transpiler(LanguageId::JavaScript, LanguageId::Python, false);
    assert_eq!(t.compile("{x: Code('c')}").unwrap(), "{'x': Code('c')}");
    assert_eq!(t.imports(), "from bson import Code");
    t.compile("{x: 1}").unwrap();
    assert_eq!(t.imports(), "");
}

#[test]
fn test_binary_is_unimplemented() {
    let err = transpiler(LanguageId::Shell, LanguageId::Java, false)
        .compile("BinData(0, 'AAAA')")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unimplemented);
}

// ============================================================================
// Regular expressions and equality
// ============================================================================

#[test]
fn test_regex_literals() {
    use LanguageId::*;
    assert_eq!(
        compile(JavaScript, Java, "{x: /ab+c/i}"),
        r#"new Document("x", Pattern.compile("(?i)ab+c"))"#
    );
    assert_eq!(compile(JavaScript, Python, "/a/g"), r#"re.compile("a")"#);
    assert_eq!(compile(JavaScript, Shell, "/a/i"), "/a/i");
}

#[test]
fn test_equality() {
    use LanguageId::*;
    assert_eq!(compile(JavaScript, Python, "'a' === 'b'"), "'a' == 'b'");
    assert_eq!(compile(JavaScript, Java, "'a' !== 'b'"), r#""a" != "b""#);
}

// ============================================================================
// Dates
// ============================================================================

#[test]
fn test_dates() {
    let mut t = transpiler(LanguageId::JavaScript, LanguageId::Java, false);
    assert_eq!(
        t.compile("new Date(2019, 0, 1)").unwrap(),
        "new java.util.Date(1546300800000L)"
    );
    assert_eq!(t.imports(), "");

    assert_eq!(
        t.compile("Date()").unwrap(),
        r#"new SimpleDateFormat("EEE MMM dd yyyy HH:mm:ss").format(new java.util.Date())"#
    );
    assert_eq!(t.imports(), "import java.text.SimpleDateFormat;");
}

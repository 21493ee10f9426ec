//! Render to shell, read the result back, and compare values.

use bsonshift::{TranspileConfig, Transpiler};
use bsonshift_core::lang::languages::LanguageId;

fn value_json(input: LanguageId, source: &str) -> serde_json::Value {
    let mut t = Transpiler::new(TranspileConfig::new().with_input(input).with_output(LanguageId::Object)).unwrap();
    t.to_value(source).unwrap().to_extended_json()
}

fn to_shell(input: LanguageId, source: &str) -> String {
    let mut t = Transpiler::new(TranspileConfig::new().with_input(input).with_output(LanguageId::Shell)).unwrap();
    t.compile(source).unwrap()
}

#[test]
fn javascript_documents_survive_shell_rendering() {
    let sources = [
        "{a: 1, b: 'x', c: [true, null]}",
        "{_id: new ObjectId('5a7382114ec1f67ae445f778'), n: Long.fromNumber(7)}",
        "{nested: {deep: {list: [1, 2.5, 'three']}}}",
        "{d: Decimal128.fromString('1.25'), t: new Timestamp(1, 2)}",
    ];
    for source in sources {
        let shell = to_shell(LanguageId::JavaScript, source);
        assert_eq!(
            value_json(LanguageId::Shell, &shell),
            value_json(LanguageId::JavaScript, source),
            "value changed through `{shell}`"
        );
    }
}

#[test]
fn python_documents_survive_shell_rendering() {
    let source = "{'a': 1, 'b': [True, None], 'c': 'x'}";
    let shell = to_shell(LanguageId::Python, source);
    assert_eq!(value_json(LanguageId::Shell, &shell), value_json(LanguageId::Python, source));
}

use std::collections::HashMap;

use bsonshift_core::lang::import_codes;
use bsonshift_core::lang::keywords;
use bsonshift_core::lang::languages;
use bsonshift_core::lang::operators;
use bsonshift_core::lang::punctuation;
use bsonshift_core::lang::registry::SyntaxFamily;
use bsonshift_core::lang::types;

#[test]
fn keywords_spellings_unique_and_resolvable() {
    for family in [SyntaxFamily::JavaScript, SyntaxFamily::Python] {
        let mut seen: HashMap<&'static str, keywords::KeywordId> = HashMap::new();
        for info in keywords::KEYWORDS.iter().filter(|k| k.families.contains(&family)) {
            assert_eq!(
                keywords::from_str(info.canonical, family),
                Some(info.id),
                "keyword canonical spelling not resolvable: {}",
                info.canonical
            );
            if let Some(prev) = seen.insert(info.canonical, info.id) {
                panic!(
                    "duplicate keyword spelling {:?}: {:?} and {:?}",
                    info.canonical, prev, info.id
                );
            }
        }
    }
}

#[test]
fn python_booleans_share_ids() {
    assert_eq!(
        keywords::from_str("True", SyntaxFamily::Python),
        keywords::from_str("true", SyntaxFamily::JavaScript)
    );
    assert_eq!(keywords::from_str("true", SyntaxFamily::Python), None);
}

#[test]
fn operators_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, operators::OperatorId> = HashMap::new();
    for info in operators::OPERATORS {
        assert_eq!(operators::from_str(info.canonical), Some(info.id));
        assert_eq!(operators::as_str(info.id), info.canonical);
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!("duplicate operator spelling {:?}: {:?} and {:?}", info.canonical, prev, info.id);
        }
    }
}

#[test]
fn punctuation_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, punctuation::PunctuationId> = HashMap::new();
    for info in punctuation::PUNCTUATION {
        assert_eq!(punctuation::from_str(info.canonical), Some(info.id));
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!(
                "duplicate punctuation spelling {:?}: {:?} and {:?}",
                info.canonical, prev, info.id
            );
        }
    }
}

#[test]
fn type_keys_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, types::TypeKey> = HashMap::new();
    for info in types::TYPES {
        assert_eq!(types::from_str(info.canonical), Some(info.id));
        assert_eq!(types::info_for(info.id).canonical, info.canonical);
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!("duplicate type spelling {:?}: {:?} and {:?}", info.canonical, prev, info.id);
        }
    }
}

#[test]
fn numeric_family_is_registered_as_numeric() {
    for key in types::NUMERIC_FAMILY {
        assert_eq!(types::family(*key), types::TypeFamily::Numeric, "{key} must be numeric");
    }
    for key in types::NUMERIC_WRAPPERS {
        assert_eq!(types::family(*key), types::TypeFamily::Domain, "{key} must be a domain type");
    }
}

#[test]
fn languages_aliases_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, languages::LanguageId> = HashMap::new();
    for info in languages::LANGUAGES {
        assert_eq!(languages::info_for(info.id).id, info.id, "info_for index out of sync");
        assert_eq!(languages::from_str(info.canonical), Some(info.id));
        for name in std::iter::once(&info.canonical).chain(info.aliases.iter()) {
            assert_eq!(languages::from_str(&name.to_uppercase()), Some(info.id));
            if let Some(prev) = seen.insert(*name, info.id) {
                panic!("duplicate language spelling {:?}: {:?} and {:?}", name, prev, info.id);
            }
        }
        if languages::is_input(info.id) {
            assert!(info.syntax.is_some(), "input language {} needs a syntax family", info.canonical);
        }
    }
}

#[test]
fn import_code_names_unique() {
    let mut seen: HashMap<u16, &'static str> = HashMap::new();
    for info in import_codes::IMPORT_CODES {
        assert_eq!(import_codes::name(info.code), Some(info.name));
        if let Some(prev) = seen.insert(info.code, info.name) {
            panic!("duplicate import code {}: {} and {}", info.code, prev, info.name);
        }
    }
}

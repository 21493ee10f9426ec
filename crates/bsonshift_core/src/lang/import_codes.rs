//! Import codes.
//!
//! Every catalog descriptor may carry a numeric import `code`. Visiting a descriptor marks its code as used; target
//! catalogs map codes to import/using lines. A few codes are raised by the walker itself (scoped code, date strings,
//! builder names), so they are named here.
//!
//! ## Notes
//! - Codes `300..=306` are **list-valued**: they collect builder function names rather than a single flag.
//!
//! ## Examples
//! ```rust
//! use bsonshift_core::lang::import_codes::{self, CODE_WITH_SCOPE, FILTER_BUILDERS};
//!
//! assert_eq!(CODE_WITH_SCOPE, 113);
//! assert!(import_codes::is_list_valued(FILTER_BUILDERS));
//! assert!(!import_codes::is_list_valued(CODE_WITH_SCOPE));
//! ```

/// Import code for regular expressions.
pub const REGEX: u16 = 8;
/// Import code for array literals.
pub const ARRAY: u16 = 9;
/// Import code for object literals.
pub const OBJECT: u16 = 10;
/// Import code for `Code` with a scope document.
pub const CODE_WITH_SCOPE: u16 = 113;
/// Import code for date values.
pub const DATE: u16 = 200;
/// Import code for dates rendered as strings (`Date()` without `new`).
pub const DATE_STRING: u16 = 201;
/// Import code for Java `Filters` builder names.
pub const FILTER_BUILDERS: u16 = 300;
/// Import code for Java `Aggregates` stage builder names.
pub const AGGREGATE_BUILDERS: u16 = 301;
/// Import code for Java `Accumulators` builder names.
pub const ACCUMULATOR_BUILDERS: u16 = 302;
/// Import code for Java `Projections` builder names.
pub const PROJECTION_BUILDERS: u16 = 303;
/// Import code for Java `Sorts` builder names.
pub const SORT_BUILDERS: u16 = 304;
/// Import code for Java GeoJSON class names.
pub const GEOJSON_CLASSES: u16 = 305;
/// Import code for Java model classes used by builders (`Facet`, `GraphLookupOptions`).
pub const MODEL_CLASSES: u16 = 306;

/// Range of list-valued codes.
pub const LIST_VALUED: std::ops::RangeInclusive<u16> = 300..=306;

/// Metadata for a named import code.
#[derive(Debug, Clone, Copy)]
pub struct ImportCodeInfo {
    pub code: u16,
    pub name: &'static str,
    pub description: &'static str,
}

/// Registry of the codes the engine raises or reads directly.
pub const IMPORT_CODES: &[ImportCodeInfo] = &[
    ImportCodeInfo {
        code: REGEX,
        name: "regex",
        description: "Regular expression literals and RegExp().",
    },
    ImportCodeInfo {
        code: ARRAY,
        name: "array",
        description: "Array literals.",
    },
    ImportCodeInfo {
        code: OBJECT,
        name: "object",
        description: "Document literals in their generic form.",
    },
    ImportCodeInfo {
        code: CODE_WITH_SCOPE,
        name: "code_with_scope",
        description: "Code(...) called with a scope document.",
    },
    ImportCodeInfo {
        code: DATE,
        name: "date",
        description: "Date values.",
    },
    ImportCodeInfo {
        code: DATE_STRING,
        name: "date_string",
        description: "Date() called without `new`, which yields a string.",
    },
    ImportCodeInfo {
        code: FILTER_BUILDERS,
        name: "filter_builders",
        description: "Java `Filters` static imports, one per builder name.",
    },
    ImportCodeInfo {
        code: AGGREGATE_BUILDERS,
        name: "aggregate_builders",
        description: "Java `Aggregates` static imports, one per stage builder.",
    },
    ImportCodeInfo {
        code: ACCUMULATOR_BUILDERS,
        name: "accumulator_builders",
        description: "Java `Accumulators` static imports, one per accumulator.",
    },
    ImportCodeInfo {
        code: PROJECTION_BUILDERS,
        name: "projection_builders",
        description: "Java `Projections` static imports.",
    },
    ImportCodeInfo {
        code: SORT_BUILDERS,
        name: "sort_builders",
        description: "Java `Sorts` static imports.",
    },
    ImportCodeInfo {
        code: GEOJSON_CLASSES,
        name: "geojson_classes",
        description: "Java GeoJSON geometry classes.",
    },
    ImportCodeInfo {
        code: MODEL_CLASSES,
        name: "model_classes",
        description: "Java builder model classes.",
    },
];

/// Return `true` if the code collects names instead of a flag.
pub fn is_list_valued(code: u16) -> bool {
    LIST_VALUED.contains(&code)
}

/// Resolve a code to its registry name, if it is one the engine raises directly.
pub fn name(code: u16) -> Option<&'static str> {
    IMPORT_CODES.iter().find(|c| c.code == code).map(|c| c.name)
}

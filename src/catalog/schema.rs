//! Serde shapes of the catalog YAML documents.
//!
//! These mirror the files under `catalog/data/` one to one. Nothing here is interpreted: [`super::Catalog::load`]
//! turns them into descriptors and parsed templates.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Deserialize;

// ============================================================================
// Input side: types and symbols
// ============================================================================

/// `basic.yaml` and `input/*.yaml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SymbolDoc {
    #[serde(default)]
    pub types: IndexMap<String, DescriptorDoc>,
    #[serde(default)]
    pub symbols: IndexMap<String, DescriptorDoc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallableDoc {
    #[default]
    Var,
    Func,
    Constructor,
}

/// One type, symbol or member entry.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DescriptorDoc {
    /// Descriptor id; defaults to the entry name (members: owner id + member name).
    #[serde(default)]
    pub id: Option<String>,
    /// Engine key spelling (`Long`, `now`, ...); defaults to the id.
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub callable: CallableDoc,
    /// One list of accepted type ids per parameter; `null` marks the parameter optional.
    #[serde(default)]
    pub args: Vec<Vec<Option<String>>>,
    #[serde(default)]
    pub returns: Option<String>,
    #[serde(default)]
    pub attrs: IndexMap<String, DescriptorDoc>,
    #[serde(default)]
    pub domain: bool,
    /// Output entry to render with, as a dotted path into the output `symbols` (or `types` for types).
    #[serde(default)]
    pub template: Option<String>,
}

// ============================================================================
// Output side: templates, syntax hooks, containers, imports
// ============================================================================

/// `output/*.yaml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputDoc {
    #[serde(default)]
    pub syntax: SyntaxDoc,
    #[serde(default)]
    pub containers: ContainersDoc,
    #[serde(default)]
    pub types: IndexMap<String, TemplateEntryDoc>,
    #[serde(default)]
    pub symbols: IndexMap<String, TemplateEntryDoc>,
    #[serde(default)]
    pub imports: ImportsDoc,
}

/// A template as written: a string, or a match on one placeholder.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TemplateDoc {
    Text(String),
    Match {
        on: String,
        cases: IndexMap<String, TemplateDoc>,
        #[serde(default)]
        default: Option<Box<TemplateDoc>>,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateEntryDoc {
    #[serde(default)]
    pub template: Option<TemplateDoc>,
    #[serde(default)]
    pub args_template: Option<TemplateDoc>,
    #[serde(default)]
    pub attrs: IndexMap<String, TemplateEntryDoc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyntaxDoc {
    #[serde(default)]
    pub new: Option<NewDoc>,
    #[serde(default)]
    pub equality: Option<TemplateDoc>,
    #[serde(default)]
    pub eos: Option<String>,
    #[serde(default)]
    pub regex_flags: Option<IndexMap<String, String>>,
    #[serde(default)]
    pub bson_regex_flags: Option<IndexMap<String, String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewDoc {
    pub template: String,
    /// Import codes whose constructors never take the keyword.
    #[serde(default)]
    pub skip: Vec<u16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainersDoc {
    #[serde(default)]
    pub object: Option<ObjectDoc>,
    #[serde(default)]
    pub array: Option<ArrayDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectDoc {
    pub open: String,
    pub close: String,
    pub empty: String,
    /// Template for the first pair when it differs from the rest (builder-style documents).
    #[serde(default)]
    pub first: Option<String>,
    pub item: String,
    pub separator: String,
    #[serde(default)]
    pub multiline: bool,
    #[serde(default)]
    pub indent: usize,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArrayDoc {
    pub open: String,
    pub close: String,
    pub empty: String,
    pub separator: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportsDoc {
    #[serde(default)]
    pub always: Vec<String>,
    #[serde(default)]
    pub codes: BTreeMap<u16, ImportEntryDoc>,
    #[serde(default)]
    pub groups: IndexMap<String, GroupDoc>,
}

/// Exactly one of `line`, `each`, or `group` + `name`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportEntryDoc {
    #[serde(default)]
    pub line: Option<String>,
    #[serde(default)]
    pub each: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupDoc {
    pub template: String,
    pub separator: String,
}

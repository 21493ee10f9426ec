//! Required-imports bookkeeping and rendering.
//!
//! A compile records import codes as it renders (`8` for a regex, `106` for a Long, `300` with a builder name, ...).
//! After the compile the target's import templates turn the recorded set into source lines.

use std::collections::BTreeMap;

use bsonshift_core::lang::import_codes;
use indexmap::IndexMap;

use super::schema::ImportsDoc;
use super::template::{Args, Template};
use crate::errors::CatalogError;

// ============================================================================
// Recorded set
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportValue {
    Flag,
    Names(Vec<String>),
}

/// Import codes raised by one compile, ordered by code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredImports {
    codes: BTreeMap<u16, ImportValue>,
}

impl RequiredImports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.codes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn contains(&self, code: u16) -> bool {
        self.codes.contains_key(&code)
    }

    /// Record a flag-valued code. List-valued codes are left alone until a name arrives.
    pub fn add(&mut self, code: u16) {
        if import_codes::is_list_valued(code) {
            return;
        }
        self.codes.insert(code, ImportValue::Flag);
    }

    /// Record `name` under a list-valued code.
    pub fn add_name(&mut self, code: u16, name: &str) {
        let entry = self
            .codes
            .entry(code)
            .or_insert_with(|| ImportValue::Names(Vec::new()));
        match entry {
            ImportValue::Names(names) => {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
            ImportValue::Flag => *entry = ImportValue::Names(vec![name.to_string()]),
        }
    }

    /// Copy of the current set, for rolling back a speculative render.
    pub fn snapshot(&self) -> RequiredImports {
        self.clone()
    }

    pub fn restore(&mut self, snapshot: RequiredImports) {
        *self = snapshot;
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &ImportValue)> {
        self.codes.iter().map(|(code, value)| (*code, value))
    }
}

// ============================================================================
// Templates
// ============================================================================

#[derive(Debug, Clone)]
pub enum ImportEntry {
    Line(String),
    /// One line per recorded name; `{name}` is bound.
    Each(Template),
    Group { group: String, name: String },
}

#[derive(Debug, Clone)]
pub struct ImportGroup {
    pub template: Template,
    pub separator: String,
}

/// A target's import lines, keyed by code.
#[derive(Debug, Clone, Default)]
pub struct ImportTemplates {
    always: Vec<String>,
    codes: BTreeMap<u16, ImportEntry>,
    groups: IndexMap<String, ImportGroup>,
}

impl ImportTemplates {
    pub fn from_doc(document: &str, doc: ImportsDoc) -> Result<Self, CatalogError> {
        let mut codes = BTreeMap::new();
        for (code, entry) in doc.codes {
            let parsed = match (entry.line, entry.each, entry.group, entry.name) {
                (Some(line), None, None, None) => ImportEntry::Line(line),
                (None, Some(each), None, None) => ImportEntry::Each(Template::parse(&each)?),
                (None, None, Some(group), Some(name)) => {
                    if !doc.groups.contains_key(&group) {
                        return Err(CatalogError::invalid(
                            document,
                            format!("import code {code} refers to unknown group '{group}'"),
                        ));
                    }
                    ImportEntry::Group { group, name }
                }
                _ => {
                    return Err(CatalogError::invalid(
                        document,
                        format!("import code {code} needs exactly one of line, each, or group with name"),
                    ));
                }
            };
            codes.insert(code, parsed);
        }

        let mut groups = IndexMap::new();
        for (name, group) in doc.groups {
            groups.insert(
                name,
                ImportGroup {
                    template: Template::parse(&group.template)?,
                    separator: group.separator,
                },
            );
        }

        Ok(Self {
            always: doc.always,
            codes,
            groups,
        })
    }

    /// Render the import lines for a recorded set.
    ///
    /// Order: `always` lines, then per-code lines by ascending code, then groups in order of first use. Duplicate
    /// lines are dropped.
    pub fn render(&self, required: &RequiredImports) -> Vec<String> {
        let mut lines: Vec<String> = self.always.clone();
        let mut grouped: IndexMap<&str, Vec<&str>> = IndexMap::new();

        for (code, value) in required.iter() {
            let Some(entry) = self.codes.get(&code) else {
                continue;
            };
            match entry {
                ImportEntry::Line(line) => lines.push(line.clone()),
                ImportEntry::Each(template) => {
                    let mut names: Vec<&str> = match value {
                        ImportValue::Names(names) => names.iter().map(String::as_str).collect(),
                        ImportValue::Flag => Vec::new(),
                    };
                    names.sort_unstable();
                    names.dedup();
                    for name in names {
                        lines.push(template.render(&Args::new().with("name", name)));
                    }
                }
                ImportEntry::Group { group, name } => {
                    let names = grouped.entry(group.as_str()).or_default();
                    if !names.contains(&name.as_str()) {
                        names.push(name);
                    }
                }
            }
        }

        for (group, names) in grouped {
            if let Some(template) = self.groups.get(group) {
                let joined = names.join(&template.separator);
                lines.push(template.template.render(&Args::new().with("names", joined)));
            }
        }

        let mut seen = std::collections::HashSet::new();
        lines.retain(|line| !line.is_empty() && seen.insert(line.clone()));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::schema::{GroupDoc, ImportEntryDoc};

    fn templates() -> ImportTemplates {
        let mut doc = ImportsDoc::default();
        doc.always.push("import a;".into());
        doc.codes.insert(
            106,
            ImportEntryDoc {
                group: Some("bson".into()),
                name: Some("Int64".into()),
                ..Default::default()
            },
        );
        doc.codes.insert(
            100,
            ImportEntryDoc {
                group: Some("bson".into()),
                name: Some("Code".into()),
                ..Default::default()
            },
        );
        doc.codes.insert(
            8,
            ImportEntryDoc {
                line: Some("import re".into()),
                ..Default::default()
            },
        );
        doc.codes.insert(
            300,
            ImportEntryDoc {
                each: Some("import static F.{name};".into()),
                ..Default::default()
            },
        );
        doc.groups.insert(
            "bson".into(),
            GroupDoc {
                template: "from bson import {names}".into(),
                separator: ", ".into(),
            },
        );
        ImportTemplates::from_doc("test", doc).unwrap()
    }

    #[test]
    fn test_render_order_and_groups() {
        let mut required = RequiredImports::new();
        required.add(106);
        required.add(8);
        required.add(100);
        assert_eq!(
            templates().render(&required),
            vec!["import a;", "import re", "from bson import Code, Int64"]
        );
    }

    #[test]
    fn test_list_valued_names_sorted_and_deduped() {
        let mut required = RequiredImports::new();
        required.add_name(300, "lt");
        required.add_name(300, "eq");
        required.add_name(300, "lt");
        assert_eq!(
            templates().render(&required),
            vec!["import a;", "import static F.eq;", "import static F.lt;"]
        );
    }

    #[test]
    fn test_flag_add_ignores_list_codes() {
        let mut required = RequiredImports::new();
        required.add(300);
        assert!(required.is_empty());
    }

    #[test]
    fn test_snapshot_restore() {
        let mut required = RequiredImports::new();
        required.add(10);
        let snapshot = required.snapshot();
        required.add_name(300, "eq");
        required.restore(snapshot);
        assert!(required.contains(10));
        assert!(!required.contains(300));
    }

    #[test]
    fn test_group_entry_must_name_known_group() {
        let mut doc = ImportsDoc::default();
        doc.codes.insert(
            1,
            ImportEntryDoc {
                group: Some("missing".into()),
                name: Some("X".into()),
                ..Default::default()
            },
        );
        assert!(ImportTemplates::from_doc("test", doc).is_err());
    }
}

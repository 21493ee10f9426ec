//! Supported source and target languages.
//!
//! A language may be an input (it has a parser and a symbol catalog), an output (it has a template catalog and an
//! override table), or both. `object` is the in-process value mode: it is an output with no text form.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-insensitive** and accepts aliases (`js`, `mongosh`, `py`, `c#`).
//!
//! ## Examples
//! ```rust
//! use bsonshift_core::lang::languages::{self, LanguageId};
//!
//! assert_eq!(languages::from_str("js"), Some(LanguageId::JavaScript));
//! assert!(languages::is_input(LanguageId::Python));
//! assert!(!languages::is_input(LanguageId::Java));
//! ```

use super::registry::{Since, Stability, SyntaxFamily};

/// Stable identifier for every language the transpiler knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LanguageId {
    JavaScript,
    Shell,
    Python,
    Java,
    CSharp,
    Object,
}

/// Whether a language can be read, written, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageRole {
    Input,
    Output,
}

/// Metadata for a language.
#[derive(Debug, Clone, Copy)]
pub struct LanguageInfo {
    pub id: LanguageId,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub roles: &'static [LanguageRole],
    /// Token grammar used when the language is an input.
    pub syntax: Option<SyntaxFamily>,
    pub description: &'static str,
    pub since: Since,
    pub stability: Stability,
}

const BOTH: &[LanguageRole] = &[LanguageRole::Input, LanguageRole::Output];
const OUTPUT: &[LanguageRole] = &[LanguageRole::Output];

/// Registry of all languages.
pub const LANGUAGES: &[LanguageInfo] = &[
    LanguageInfo {
        id: LanguageId::JavaScript,
        canonical: "javascript",
        aliases: &["js", "node"],
        roles: BOTH,
        syntax: Some(SyntaxFamily::JavaScript),
        description: "Node.js driver syntax (`bson` package constructors).",
        since: Since(0, 1),
        stability: Stability::Stable,
    },
    LanguageInfo {
        id: LanguageId::Shell,
        canonical: "shell",
        aliases: &["mongosh", "mongo"],
        roles: BOTH,
        syntax: Some(SyntaxFamily::JavaScript),
        description: "MongoDB shell syntax (`NumberLong`, `ISODate`, ...).",
        since: Since(0, 1),
        stability: Stability::Stable,
    },
    LanguageInfo {
        id: LanguageId::Python,
        canonical: "python",
        aliases: &["py", "python3", "pymongo"],
        roles: BOTH,
        syntax: Some(SyntaxFamily::Python),
        description: "PyMongo syntax (`bson` module types, `datetime`).",
        since: Since(0, 1),
        stability: Stability::Stable,
    },
    LanguageInfo {
        id: LanguageId::Java,
        canonical: "java",
        aliases: &[],
        roles: OUTPUT,
        syntax: None,
        description: "Java driver syntax (`org.bson` types, `Filters` builders).",
        since: Since(0, 1),
        stability: Stability::Stable,
    },
    LanguageInfo {
        id: LanguageId::CSharp,
        canonical: "csharp",
        aliases: &["cs", "c#"],
        roles: OUTPUT,
        syntax: None,
        description: "C# driver syntax (`MongoDB.Bson` types).",
        since: Since(0, 1),
        stability: Stability::Stable,
    },
    LanguageInfo {
        id: LanguageId::Object,
        canonical: "object",
        aliases: &["value"],
        roles: OUTPUT,
        syntax: None,
        description: "In-process value construction instead of text.",
        since: Since(0, 1),
        stability: Stability::Draft,
    },
];

/// Return the canonical spelling for a language.
pub fn as_str(id: LanguageId) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for a language.
pub fn info_for(id: LanguageId) -> &'static LanguageInfo {
    match id {
        LanguageId::JavaScript => &LANGUAGES[0],
        LanguageId::Shell => &LANGUAGES[1],
        LanguageId::Python => &LANGUAGES[2],
        LanguageId::Java => &LANGUAGES[3],
        LanguageId::CSharp => &LANGUAGES[4],
        LanguageId::Object => &LANGUAGES[5],
    }
}

/// Resolve a language spelling (canonical or alias, any case).
pub fn from_str(s: &str) -> Option<LanguageId> {
    let lowered = s.trim().to_ascii_lowercase();
    LANGUAGES
        .iter()
        .find(|l| l.canonical == lowered || l.aliases.contains(&lowered.as_str()))
        .map(|l| l.id)
}

/// Return `true` if the language can be parsed.
pub fn is_input(id: LanguageId) -> bool {
    info_for(id).roles.contains(&LanguageRole::Input)
}

/// Return `true` if the language can be produced.
pub fn is_output(id: LanguageId) -> bool {
    info_for(id).roles.contains(&LanguageRole::Output)
}

/// Return the token grammar for an input language.
pub fn syntax_family(id: LanguageId) -> Option<SyntaxFamily> {
    info_for(id).syntax
}

impl std::fmt::Display for LanguageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(as_str(*self))
    }
}

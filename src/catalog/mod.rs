//! Type and symbol catalog for one input/output language pair.
//!
//! The catalog is assembled from embedded YAML documents:
//! - `basic.yaml` (literal types),
//! - `domain.yaml` (BSON types and their members),
//! - `input/<lang>.yaml` (the symbols the source dialect can name, plus dialect-specific types),
//! - `output/<lang>.yaml` (templates, syntax hooks, container layout and import lines of the target).
//!
//! Descriptors live in one arena and refer to each other by [`DescId`], so self-referential shapes (a `Long` whose
//! `fromBits` returns a `Long`) need no reference counting. Once loaded, a catalog is immutable.

pub mod imports;
pub mod schema;
pub mod template;

use std::collections::HashMap;

use bsonshift_core::lang::languages::LanguageId;
use bsonshift_core::lang::regex_flags;
use bsonshift_core::lang::types::{self, TypeKey};
use indexmap::IndexMap;

use self::imports::ImportTemplates;
use self::schema::{
    ArrayDoc, CallableDoc, DescriptorDoc, ObjectDoc, OutputDoc, SymbolDoc, SyntaxDoc, TemplateDoc, TemplateEntryDoc,
};
use self::template::{Args, Template};
use crate::errors::{CatalogError, TranspileError, TranspileResult};

const BASIC: &str = include_str!("data/basic.yaml");
const DOMAIN: &str = include_str!("data/domain.yaml");

fn input_documents(input: LanguageId) -> Option<&'static [(&'static str, &'static str)]> {
    const JAVASCRIPT: &str = include_str!("data/input/javascript.yaml");
    const SHELL: &str = include_str!("data/input/shell.yaml");
    const PYTHON: &str = include_str!("data/input/python.yaml");
    Some(match input {
        LanguageId::JavaScript => &[("input/javascript", JAVASCRIPT)],
        LanguageId::Shell => &[("input/javascript", JAVASCRIPT), ("input/shell", SHELL)],
        LanguageId::Python => &[("input/python", PYTHON)],
        _ => return None,
    })
}

fn output_document(output: LanguageId) -> (&'static str, &'static str) {
    match output {
        LanguageId::Java => ("output/java", include_str!("data/output/java.yaml")),
        LanguageId::CSharp => ("output/csharp", include_str!("data/output/csharp.yaml")),
        LanguageId::Python => ("output/python", include_str!("data/output/python.yaml")),
        LanguageId::JavaScript => ("output/javascript", include_str!("data/output/javascript.yaml")),
        LanguageId::Shell => ("output/shell", include_str!("data/output/shell.yaml")),
        LanguageId::Object => ("output/object", include_str!("data/output/object.yaml")),
    }
}

// ============================================================================
// Descriptors
// ============================================================================

/// Index of a descriptor in the catalog arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callable {
    Var,
    Func,
    Constructor,
}

impl From<CallableDoc> for Callable {
    fn from(doc: CallableDoc) -> Self {
        match doc {
            CallableDoc::Var => Callable::Var,
            CallableDoc::Func => Callable::Func,
            CallableDoc::Constructor => Callable::Constructor,
        }
    }
}

/// A type, a symbol, or a member of either.
#[derive(Debug, Clone)]
pub struct Descriptor {
    pub id: String,
    /// Name the target knows this descriptor by when it has no template: the last segment of an alias's output
    /// path (`NumberInt` → `Int32`), otherwise the source name.
    pub name: String,
    /// Engine meaning, if the id (or its `key`) is a registered [`TypeKey`].
    pub key: Option<TypeKey>,
    pub code: Option<u16>,
    pub callable: Callable,
    /// Accepted type ids per parameter; `None` is the optional marker.
    pub args: Vec<Vec<Option<String>>>,
    pub ret: Option<DescId>,
    pub attrs: IndexMap<String, DescId>,
    pub template: Option<Template>,
    pub args_template: Option<Template>,
    pub domain: bool,
}

impl Descriptor {
    fn placeholder(id: String) -> Self {
        Self {
            key: types::from_str(&id),
            name: id.clone(),
            id,
            code: None,
            callable: Callable::Var,
            args: Vec::new(),
            ret: None,
            attrs: IndexMap::new(),
            template: None,
            args_template: None,
            domain: false,
        }
    }

    pub fn is_key(&self, key: TypeKey) -> bool {
        self.key == Some(key)
    }
}

// ============================================================================
// Syntax hooks and containers
// ============================================================================

/// Where the target's `new` keyword goes.
#[derive(Debug, Clone)]
pub struct NewPolicy {
    pub template: Template,
    pub skip_codes: Vec<u16>,
}

/// Regex flag translation table: source flag to target spelling (empty means "accepted, dropped").
#[derive(Debug, Clone)]
pub struct FlagTable(IndexMap<char, String>);

impl FlagTable {
    fn identity(flags: &[char]) -> Self {
        Self(flags.iter().map(|c| (*c, c.to_string())).collect())
    }

    fn from_doc(document: &str, doc: IndexMap<String, String>) -> Result<Self, CatalogError> {
        let mut table = IndexMap::new();
        for (flag, spelling) in doc {
            let mut chars = flag.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => {
                    table.insert(c, spelling);
                }
                _ => return Err(CatalogError::invalid(document, format!("regex flag '{flag}' is not one character"))),
            }
        }
        Ok(Self(table))
    }

    /// Translate `flags`; the result is sorted and free of duplicates.
    ///
    /// ## Errors
    /// - `Runtime` naming the first flag the target cannot express.
    pub fn translate(&self, flags: &str) -> TranspileResult<String> {
        let mut out: Vec<char> = Vec::new();
        for flag in flags.chars() {
            let spelling = self.0.get(&flag).ok_or_else(|| {
                TranspileError::Runtime(format!("Regular expression contains unsupported '{flag}' flag"))
            })?;
            out.extend(spelling.chars());
        }
        out.sort_unstable();
        out.dedup();
        Ok(out.into_iter().collect())
    }
}

#[derive(Debug, Clone)]
pub struct SyntaxHooks {
    pub new: Option<NewPolicy>,
    /// `{lhs}`, `{op}`, `{rhs}`.
    pub equality: Option<Template>,
    /// Statement separator.
    pub eos: String,
    pub regex_flags: FlagTable,
    pub bson_regex_flags: FlagTable,
}

impl SyntaxHooks {
    fn from_doc(document: &str, doc: SyntaxDoc) -> Result<Self, CatalogError> {
        let new = doc
            .new
            .map(|n| {
                Ok::<_, CatalogError>(NewPolicy {
                    template: Template::parse(&n.template)?,
                    skip_codes: n.skip,
                })
            })
            .transpose()?;
        Ok(Self {
            new,
            equality: doc.equality.as_ref().map(convert).transpose()?,
            eos: doc.eos.unwrap_or_else(|| "\n".to_string()),
            regex_flags: match doc.regex_flags {
                Some(table) => FlagTable::from_doc(document, table)?,
                None => FlagTable::identity(&['g', 'i', 'm', 'u', 'y']),
            },
            bson_regex_flags: match doc.bson_regex_flags {
                Some(table) => FlagTable::from_doc(document, table)?,
                None => FlagTable::identity(regex_flags::BSON_FLAGS),
            },
        })
    }

    /// Apply the `new` keyword unless `skip` or the code is exempt.
    pub fn apply_new(&self, expr: String, skip: bool, code: Option<u16>) -> String {
        match &self.new {
            Some(policy) if !skip && !code.is_some_and(|c| policy.skip_codes.contains(&c)) => {
                policy.template.render(&Args::positional([expr]))
            }
            _ => expr,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObjectLayout {
    pub open: String,
    pub close: String,
    pub empty: String,
    pub first: Option<Template>,
    /// `{key}` (quoted source key) and `{value}`.
    pub item: Template,
    pub separator: String,
    pub multiline: bool,
    pub indent: usize,
}

#[derive(Debug, Clone)]
pub struct ArrayLayout {
    pub open: String,
    pub close: String,
    pub empty: String,
    pub separator: String,
}

#[derive(Debug, Clone)]
pub struct Containers {
    pub object: ObjectLayout,
    pub array: ArrayLayout,
}

impl ObjectLayout {
    fn from_doc(doc: Option<ObjectDoc>) -> Result<Self, CatalogError> {
        let Some(doc) = doc else {
            return Ok(Self {
                open: "{".into(),
                close: "}".into(),
                empty: "{}".into(),
                first: None,
                item: Template::parse("{key|dq}: {value}")?,
                separator: ", ".into(),
                multiline: false,
                indent: 0,
            });
        };
        Ok(Self {
            first: doc.first.as_deref().map(Template::parse).transpose()?,
            item: Template::parse(&doc.item)?,
            open: doc.open,
            close: doc.close,
            empty: doc.empty,
            separator: doc.separator,
            multiline: doc.multiline,
            indent: doc.indent,
        })
    }
}

impl From<Option<ArrayDoc>> for ArrayLayout {
    fn from(doc: Option<ArrayDoc>) -> Self {
        match doc {
            Some(doc) => Self {
                open: doc.open,
                close: doc.close,
                empty: doc.empty,
                separator: doc.separator,
            },
            None => Self {
                open: "[".into(),
                close: "]".into(),
                empty: "[]".into(),
                separator: ", ".into(),
            },
        }
    }
}

fn convert(doc: &TemplateDoc) -> Result<Template, CatalogError> {
    match doc {
        TemplateDoc::Text(text) => Template::parse(text),
        TemplateDoc::Match { on, cases, default } => {
            let mut parsed = IndexMap::new();
            for (case, template) in cases {
                parsed.insert(case.clone(), convert(template)?);
            }
            let default = default.as_deref().map(convert).transpose()?;
            Ok(Template::matching(on, parsed, default))
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Debug, Clone)]
pub struct Catalog {
    input: LanguageId,
    output: LanguageId,
    descriptors: Vec<Descriptor>,
    types: HashMap<String, DescId>,
    symbols: HashMap<String, DescId>,
    pub syntax: SyntaxHooks,
    pub containers: Containers,
    pub imports: ImportTemplates,
}

impl Catalog {
    /// Load the catalog for `input` → `output`.
    ///
    /// ## Errors
    /// - [`CatalogError::Unsupported`] if `input` is not a source dialect.
    /// - [`CatalogError::Yaml`] / [`CatalogError::Invalid`] / [`CatalogError::Template`] on malformed documents.
    pub fn load(input: LanguageId, output: LanguageId) -> Result<Catalog, CatalogError> {
        Self::load_with(input, output, None)
    }

    /// Load the catalog with one more symbol document layered on top of the input documents.
    ///
    /// Embedders use this to declare extra functions (`TestFunc: {callable: func, args: [[_integer]]}`) without
    /// editing the bundled catalog.
    #[tracing::instrument(level = "debug", skip_all, fields(input = %input, output = %output))]
    pub fn load_with(input: LanguageId, output: LanguageId, extra: Option<&str>) -> Result<Catalog, CatalogError> {
        let inputs = input_documents(input).ok_or_else(|| CatalogError::Unsupported {
            input: input.to_string(),
            output: output.to_string(),
        })?;

        let mut docs = vec![parse::<SymbolDoc>("basic", BASIC)?, parse::<SymbolDoc>("domain", DOMAIN)?];
        for (name, text) in inputs {
            docs.push(parse::<SymbolDoc>(name, text)?);
        }
        if let Some(text) = extra {
            docs.push(parse::<SymbolDoc>("extra", text)?);
        }
        let (out_name, out_text) = output_document(output);
        let out: OutputDoc = parse(out_name, out_text)?;

        let mut builder = Builder {
            document: out_name,
            out: &out,
            descriptors: Vec::new(),
            types: HashMap::new(),
        };

        // Later documents override earlier entries of the same name.
        let mut type_docs: IndexMap<&str, &DescriptorDoc> = IndexMap::new();
        let mut symbol_docs: IndexMap<&str, &DescriptorDoc> = IndexMap::new();
        for doc in &docs {
            for (name, entry) in &doc.types {
                type_docs.insert(name, entry);
            }
            for (name, entry) in &doc.symbols {
                symbol_docs.insert(name, entry);
            }
        }

        // Allocate every type first so `returns` can point anywhere.
        let mut pending = Vec::with_capacity(type_docs.len());
        for (name, doc) in &type_docs {
            let id = doc.id.clone().unwrap_or_else(|| name.to_string());
            let entry = builder.type_entry(doc.template.as_deref().unwrap_or(*name));
            let did = builder.push(builder.header(id.clone(), doc, entry)?);
            builder.types.insert(id, did);
            pending.push((did, *doc, entry));
        }
        for (did, doc, entry) in pending {
            let id = builder.descriptors[did.0].id.clone();
            let ret = builder.resolve_returns(&id, doc)?;
            let attrs = builder.members(&id, doc, entry)?;
            let descriptor = &mut builder.descriptors[did.0];
            descriptor.ret = ret;
            descriptor.attrs = attrs;
        }

        let mut symbols = HashMap::new();
        for (name, doc) in &symbol_docs {
            let id = doc.id.clone().unwrap_or_else(|| name.to_string());
            let entry = builder.symbol_entry(doc.template.as_deref().unwrap_or(*name));
            let did = builder.build(id, name, doc, entry)?;
            symbols.insert(name.to_string(), did);
        }

        let Builder {
            descriptors, types, ..
        } = builder;
        let OutputDoc {
            syntax,
            containers,
            imports,
            ..
        } = out;

        tracing::debug!(types = types.len(), symbols = symbols.len(), "catalog loaded");

        Ok(Catalog {
            input,
            output,
            descriptors,
            types,
            symbols,
            syntax: SyntaxHooks::from_doc(out_name, syntax)?,
            containers: Containers {
                object: ObjectLayout::from_doc(containers.object)?,
                array: containers.array.into(),
            },
            imports: ImportTemplates::from_doc(out_name, imports)?,
        })
    }

    pub fn input(&self) -> LanguageId {
        self.input
    }

    pub fn output(&self) -> LanguageId {
        self.output
    }

    pub fn get(&self, id: DescId) -> &Descriptor {
        &self.descriptors[id.0]
    }

    /// Resolve an identifier in the symbol table.
    ///
    /// ## Errors
    /// - `Reference` if no symbol has this name.
    pub fn lookup(&self, name: &str) -> TranspileResult<DescId> {
        self.symbols
            .get(name)
            .copied()
            .ok_or_else(|| TranspileError::Reference(format!("Symbol '{name}' is undefined")))
    }

    pub fn type_id(&self, id: &str) -> Option<DescId> {
        self.types.get(id).copied()
    }

    /// The descriptor of a basic or domain type by key.
    ///
    /// ## Errors
    /// - `Internal` if the catalog lacks the type.
    pub fn type_of(&self, key: TypeKey) -> TranspileResult<DescId> {
        self.type_id(types::as_str(key))
            .ok_or_else(|| TranspileError::Internal(format!("type '{}' missing from catalog", types::as_str(key))))
    }

    /// Look `name` up among the members of `owner`, following return types.
    ///
    /// `Ok(None)` means the chain ended on non-domain descriptors; the caller renders the access verbatim.
    ///
    /// ## Errors
    /// - `Attribute` at the first domain descriptor lacking the member.
    pub fn member(&self, owner: DescId, name: &str) -> TranspileResult<Option<DescId>> {
        let mut current = Some(owner);
        let mut visited = Vec::new();
        while let Some(id) = current {
            if visited.contains(&id) {
                break;
            }
            visited.push(id);
            let descriptor = self.get(id);
            if let Some(member) = descriptor.attrs.get(name) {
                return Ok(Some(*member));
            }
            if descriptor.domain {
                return Err(TranspileError::Attribute(format!(
                    "'{name}' not an attribute of {}",
                    descriptor.id
                )));
            }
            current = descriptor.ret;
        }
        Ok(None)
    }
}

fn parse<T: serde::de::DeserializeOwned>(document: &str, text: &str) -> Result<T, CatalogError> {
    serde_yaml::from_str(text).map_err(|source| CatalogError::Yaml {
        document: document.to_string(),
        source,
    })
}

/// The last segment of an alias's output path, or the source name.
fn output_name(name: &str, doc: &DescriptorDoc) -> String {
    match &doc.template {
        Some(path) => path.rsplit('.').next().unwrap_or(path).to_string(),
        None => name.to_string(),
    }
}

fn walk_path<'o>(root: &'o IndexMap<String, TemplateEntryDoc>, path: &str) -> Option<&'o TemplateEntryDoc> {
    let mut parts = path.split('.');
    let mut entry = root.get(parts.next()?)?;
    for part in parts {
        entry = entry.attrs.get(part)?;
    }
    Some(entry)
}

struct Builder<'o> {
    document: &'static str,
    out: &'o OutputDoc,
    descriptors: Vec<Descriptor>,
    types: HashMap<String, DescId>,
}

impl<'o> Builder<'o> {
    fn push(&mut self, descriptor: Descriptor) -> DescId {
        self.descriptors.push(descriptor);
        DescId(self.descriptors.len() - 1)
    }

    fn type_entry(&self, name: &str) -> Option<&'o TemplateEntryDoc> {
        self.out.types.get(name)
    }

    /// Resolve a dotted output path (`Date.now`) through `symbols`, then `types`.
    fn symbol_entry(&self, path: &str) -> Option<&'o TemplateEntryDoc> {
        walk_path(&self.out.symbols, path).or_else(|| walk_path(&self.out.types, path))
    }

    /// Everything but `ret` and `attrs`.
    fn header(
        &self,
        id: String,
        doc: &DescriptorDoc,
        entry: Option<&TemplateEntryDoc>,
    ) -> Result<Descriptor, CatalogError> {
        let mut descriptor = Descriptor::placeholder(id);
        if let Some(key) = &doc.key {
            descriptor.key = Some(types::from_str(key).ok_or_else(|| {
                CatalogError::invalid(self.document, format!("'{}' has unknown key '{key}'", descriptor.id))
            })?);
        }
        descriptor.code = doc.code;
        descriptor.callable = doc.callable.into();
        descriptor.args = doc.args.clone();
        descriptor.domain = doc.domain;
        if let Some(entry) = entry {
            descriptor.template = entry.template.as_ref().map(convert).transpose()?;
            descriptor.args_template = entry.args_template.as_ref().map(convert).transpose()?;
        }
        for slot in &descriptor.args {
            for arg in slot.iter().flatten() {
                if !self.types.contains_key(arg) {
                    return Err(CatalogError::invalid(
                        self.document,
                        format!("'{}' accepts unknown type '{arg}'", descriptor.id),
                    ));
                }
            }
        }
        Ok(descriptor)
    }

    fn resolve_returns(&self, id: &str, doc: &DescriptorDoc) -> Result<Option<DescId>, CatalogError> {
        doc.returns
            .as_ref()
            .map(|ret| {
                self.types.get(ret).copied().ok_or_else(|| {
                    CatalogError::invalid(self.document, format!("'{id}' returns unknown type '{ret}'"))
                })
            })
            .transpose()
    }

    fn members(
        &mut self,
        owner: &str,
        doc: &DescriptorDoc,
        entry: Option<&'o TemplateEntryDoc>,
    ) -> Result<IndexMap<String, DescId>, CatalogError> {
        let mut attrs = IndexMap::new();
        for (name, member) in &doc.attrs {
            let id = member.id.clone().unwrap_or_else(|| format!("{owner}{name}"));
            let member_entry = match &member.template {
                Some(path) => self.symbol_entry(path),
                None => entry.and_then(|e| e.attrs.get(name)),
            };
            let did = self.build(id, name, member, member_entry)?;
            attrs.insert(name.clone(), did);
        }
        Ok(attrs)
    }

    fn build(
        &mut self,
        id: String,
        name: &str,
        doc: &DescriptorDoc,
        entry: Option<&'o TemplateEntryDoc>,
    ) -> Result<DescId, CatalogError> {
        let mut descriptor = self.header(id.clone(), doc, entry)?;
        descriptor.name = output_name(name, doc);
        descriptor.ret = self.resolve_returns(&id, doc)?;
        descriptor.attrs = self.members(&id, doc, entry)?;
        Ok(self.push(descriptor))
    }
}

//! The compile entry point.
//!
//! A [`Transpiler`] owns one loaded catalog and the import set of its last compile. Each compile starts from an empty
//! import set; a failed compile leaves it empty.
//!
//! ## Examples
//!
//! ```rust
//! use bsonshift::{TranspileConfig, Transpiler};
//! use bsonshift_core::lang::languages::LanguageId;
//!
//! let config = TranspileConfig::new()
//!     .with_input(LanguageId::Shell)
//!     .with_output(LanguageId::Python);
//! let mut transpiler = Transpiler::new(config)?;
//! assert_eq!(transpiler.compile("NumberLong(5)")?, "Int64(5)");
//! assert_eq!(transpiler.imports(), "from bson import Int64");
//! # Ok::<(), bsonshift::TranspileError>(())
//! ```

use bsonshift_core::lang::languages;
use bsonshift_syntax::ast::Program;
use bsonshift_syntax::parser::parse_source;

use crate::catalog::Catalog;
use crate::catalog::imports::RequiredImports;
use crate::config::TranspileConfig;
use crate::errors::{TranspileError, TranspileResult};
use crate::sandbox::Sandbox;
use crate::value::Value;
use crate::walker::Walker;

#[derive(Debug)]
pub struct Transpiler {
    config: TranspileConfig,
    catalog: Catalog,
    imports: RequiredImports,
}

impl Transpiler {
    /// Validate `config` and load its catalog.
    ///
    /// ## Errors
    /// - `Internal` if a language is used in a role it does not support, or the bundled catalog fails to load.
    pub fn new(config: TranspileConfig) -> TranspileResult<Self> {
        config.validate()?;
        let catalog = Catalog::load(config.input, config.output)?;
        Ok(Self::with_catalog(config, catalog))
    }

    /// Use an already loaded catalog (one built with [`Catalog::load_with`], for instance).
    pub fn with_catalog(config: TranspileConfig, catalog: Catalog) -> Self {
        Self {
            config,
            catalog,
            imports: RequiredImports::new(),
        }
    }

    pub fn config(&self) -> &TranspileConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Compile with the configured idiomatic setting.
    pub fn compile(&mut self, source: &str) -> TranspileResult<String> {
        self.compile_with_options(source, self.config.idiomatic)
    }

    #[tracing::instrument(
        skip_all,
        fields(input = %self.config.input, output = %self.config.output, idiomatic = idiomatic)
    )]
    pub fn compile_with_options(&mut self, source: &str, idiomatic: bool) -> TranspileResult<String> {
        self.imports.clear();
        let program = self.parse(source)?;
        let mut guard = ImportsGuard {
            imports: &mut self.imports,
            committed: false,
        };
        let rendered = Walker::new(&self.catalog, source, &mut *guard.imports, idiomatic).walk(&program)?;
        guard.committed = true;
        tracing::debug!(len = rendered.len(), "compiled");
        Ok(rendered)
    }

    /// Import lines required by the last successful compile, one per line.
    pub fn imports(&self) -> String {
        self.catalog.imports.render(&self.imports).join("\n")
    }

    pub fn required_imports(&self) -> &RequiredImports {
        &self.imports
    }

    /// Evaluate the last statement of `source` to a value.
    ///
    /// The program is walked first so symbol and argument errors surface exactly as they do for a compile.
    #[tracing::instrument(skip_all, fields(input = %self.config.input))]
    pub fn to_value(&mut self, source: &str) -> TranspileResult<Value> {
        self.compile(source)?;
        self.imports.clear();
        let program = self.parse(source)?;
        let last = program
            .statements
            .last()
            .ok_or_else(|| TranspileError::Runtime("nothing to evaluate".to_string()))?;
        Sandbox::new(self.config.input, source).evaluate(last)
    }

    fn parse(&self, source: &str) -> TranspileResult<Program> {
        let family = languages::syntax_family(self.config.input)
            .ok_or_else(|| TranspileError::Internal(format!("{} has no grammar", self.config.input)))?;
        parse_source(source, family).map_err(TranspileError::from)
    }
}

/// Clears the import set unless the compile completed.
struct ImportsGuard<'i> {
    imports: &'i mut RequiredImports,
    committed: bool,
}

impl Drop for ImportsGuard<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.imports.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsonshift_core::lang::languages::LanguageId;

    fn transpiler(input: LanguageId, output: LanguageId) -> Transpiler {
        Transpiler::new(TranspileConfig::new().with_input(input).with_output(output)).unwrap()
    }

    #[test]
    fn test_failed_compile_clears_imports() {
        let mut t = transpiler(LanguageId::JavaScript, LanguageId::Java);
        t.compile("{x: /a/}").unwrap();
        assert!(!t.imports().is_empty());
        assert!(t.compile("{x: Foo()}").is_err());
        assert!(t.required_imports().is_empty());
        assert_eq!(t.imports(), "");
    }

    #[test]
    fn test_imports_reset_between_compiles() {
        let mut t = transpiler(LanguageId::JavaScript, LanguageId::Java);
        t.compile_with_options("{x: /a/}", false).unwrap();
        t.compile_with_options("{x: 1}", false).unwrap();
        assert_eq!(t.imports(), "import org.bson.Document;");
    }

    #[test]
    fn test_to_value_checks_symbols_first() {
        let mut t = transpiler(LanguageId::JavaScript, LanguageId::Object);
        let err = t.to_value("Foo(1)").unwrap_err();
        assert_eq!(err.to_string(), "Symbol 'Foo' is undefined");
        let err = t.to_value("{a: NumberLong(5)}").unwrap_err();
        assert_eq!(err.to_string(), "Symbol 'NumberLong' is undefined");
    }

    #[test]
    fn test_to_value_returns_document() {
        let mut t = transpiler(LanguageId::Shell, LanguageId::Object);
        let value = t.to_value("{a: NumberLong(5), b: [1, 'x']}").unwrap();
        assert_eq!(value.to_extended_json().to_string(), r#"{"a":5,"b":[1,"x"]}"#);
    }
}

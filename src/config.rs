//! Transpiler configuration.

use bsonshift_core::lang::languages::{self, LanguageId};

use crate::errors::{TranspileError, TranspileResult};

/// Which dialect to read, which to write, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranspileConfig {
    /// Source dialect (`javascript`, `shell` or `python`).
    pub input: LanguageId,
    /// Target language, or [`LanguageId::Object`] for value mode.
    pub output: LanguageId,
    /// Let targets with an idiomatic object form (Java `Filters`) use it.
    pub idiomatic: bool,
}

impl Default for TranspileConfig {
    fn default() -> Self {
        Self {
            input: LanguageId::JavaScript,
            output: LanguageId::Java,
            idiomatic: true,
        }
    }
}

impl TranspileConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, input: LanguageId) -> Self {
        self.input = input;
        self
    }

    pub fn with_output(mut self, output: LanguageId) -> Self {
        self.output = output;
        self
    }

    pub fn with_idiomatic(mut self, idiomatic: bool) -> Self {
        self.idiomatic = idiomatic;
        self
    }

    /// Build a config from language names (`"js"`, `"mongosh"`, `"c#"`, ...).
    ///
    /// ## Errors
    /// - `Internal` if a name is unknown or used in the wrong role.
    pub fn from_names(input: &str, output: &str) -> TranspileResult<Self> {
        let parse = |name: &str| {
            languages::from_str(name).ok_or_else(|| TranspileError::Internal(format!("unknown language '{name}'")))
        };
        let config = Self::new().with_input(parse(input)?).with_output(parse(output)?);
        config.validate()?;
        Ok(config)
    }

    /// Check that `input` can be read and `output` can be written.
    pub fn validate(&self) -> TranspileResult<()> {
        if !languages::is_input(self.input) {
            return Err(TranspileError::Internal(format!(
                "'{}' is not a supported input language",
                self.input
            )));
        }
        if !languages::is_output(self.output) {
            return Err(TranspileError::Internal(format!(
                "'{}' is not a supported output language",
                self.output
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TranspileConfig::default();
        assert_eq!(config.input, LanguageId::JavaScript);
        assert_eq!(config.output, LanguageId::Java);
        assert!(config.idiomatic);
    }

    #[test]
    fn test_from_names_uses_aliases() {
        let config = TranspileConfig::from_names("mongosh", "c#").unwrap();
        assert_eq!(config.input, LanguageId::Shell);
        assert_eq!(config.output, LanguageId::CSharp);
    }

    #[test]
    fn test_output_only_language_cannot_be_input() {
        assert!(TranspileConfig::from_names("java", "python").is_err());
        assert!(TranspileConfig::from_names("cobol", "python").is_err());
    }
}

//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling `process::exit`. Error handling and exits
//! happen in the top-level `run()`.

use std::fs;
use std::io::{self, Read};

use bsonshift_core::lang::languages::{self, LanguageId, LanguageRole};
use miette::{NamedSource, Report};
use serde_json::json;

use super::{CliError, CliResult, ExitCode, SourceArgs};
use crate::config::TranspileConfig;
use crate::errors::TranspileError;
use crate::transpiler::Transpiler;

/// Maximum source size (1 MB)
///
/// Expressions are short; anything larger is almost certainly the wrong file.
const MAX_SOURCE_SIZE: u64 = 1024 * 1024;

pub struct CompileOptions {
    pub to: String,
    pub idiomatic: bool,
    pub imports: bool,
    pub json: bool,
}

/// Source text and a display name for diagnostics.
struct Source {
    name: String,
    text: String,
}

/// Read the source named by `args`.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The source exceeds `MAX_SOURCE_SIZE`
fn read_source(args: &SourceArgs) -> CliResult<Source> {
    let (name, text) = if let Some(code) = &args.expression {
        ("<expression>".to_string(), code.clone())
    } else if let Some(path) = &args.file {
        let display = path.display().to_string();
        let metadata =
            fs::metadata(path).map_err(|e| CliError::failure(format!("Cannot access file '{display}': {e}")))?;
        if metadata.len() > MAX_SOURCE_SIZE {
            return Err(CliError::failure(format!(
                "Source file '{display}' is too large ({} bytes, max {MAX_SOURCE_SIZE} bytes)",
                metadata.len()
            )));
        }
        let text =
            fs::read_to_string(path).map_err(|e| CliError::failure(format!("Error reading file '{display}': {e}")))?;
        (display, text)
    } else {
        let mut text = String::new();
        io::stdin()
            .take(MAX_SOURCE_SIZE + 1)
            .read_to_string(&mut text)
            .map_err(|e| CliError::failure(format!("Error reading stdin: {e}")))?;
        if text.len() as u64 > MAX_SOURCE_SIZE {
            return Err(CliError::failure(format!("Source on stdin is too large (max {MAX_SOURCE_SIZE} bytes)")));
        }
        ("<stdin>".to_string(), text)
    };
    Ok(Source { name, text })
}

fn parse_language(name: &str, role: LanguageRole) -> CliResult<LanguageId> {
    let id = languages::from_str(name).ok_or_else(|| CliError::usage(format!("Unknown language '{name}'")))?;
    let supported = match role {
        LanguageRole::Input => languages::is_input(id),
        LanguageRole::Output => languages::is_output(id),
    };
    if !supported {
        let role = match role {
            LanguageRole::Input => "input",
            LanguageRole::Output => "output",
        };
        return Err(CliError::usage(format!("'{name}' is not a supported {role} language")));
    }
    Ok(id)
}

/// Render a compile error with the source attached.
fn report(err: TranspileError, source: &Source) -> String {
    let report = Report::new(err).with_source_code(NamedSource::new(&source.name, source.text.clone()));
    format!("{report:?}")
}

fn transpiler(input: LanguageId, output: LanguageId, idiomatic: bool) -> CliResult<Transpiler> {
    let config = TranspileConfig::new()
        .with_input(input)
        .with_output(output)
        .with_idiomatic(idiomatic);
    Transpiler::new(config).map_err(|e| CliError::failure(e.to_string()))
}

/// Translate a source expression and print the result.
pub fn compile(args: &SourceArgs, options: &CompileOptions) -> CliResult<ExitCode> {
    let input = parse_language(&args.from, LanguageRole::Input)?;
    let output = parse_language(&options.to, LanguageRole::Output)?;
    let source = read_source(args)?;
    let mut transpiler = transpiler(input, output, options.idiomatic)?;

    if output == LanguageId::Object {
        return match transpiler.to_value(&source.text) {
            Ok(value) => {
                let rendered = serde_json::to_string_pretty(&value.to_extended_json())
                    .map_err(|e| CliError::failure(format!("Error serializing value: {e}")))?;
                println!("{rendered}");
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => fail(err, &source, options.json),
        };
    }

    match transpiler.compile(&source.text) {
        Ok(rendered) => {
            let imports = transpiler.imports();
            if options.json {
                println!("{}", json!({ "output": rendered, "imports": imports }));
            } else {
                if options.imports && !imports.is_empty() {
                    println!("{imports}\n");
                }
                println!("{rendered}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail(err, &source, options.json),
    }
}

fn fail(err: TranspileError, source: &Source, as_json: bool) -> CliResult<ExitCode> {
    tracing::debug!(code = err.code(), "compile failed");
    if as_json {
        println!("{}", json!({ "error": { "code": err.code(), "message": err.message() } }));
        return Ok(ExitCode::FAILURE);
    }
    Err(CliError::failure(report(err, source)))
}

/// Parse and type-check without printing output.
pub fn check(args: &SourceArgs) -> CliResult<ExitCode> {
    let input = parse_language(&args.from, LanguageRole::Input)?;
    let source = read_source(args)?;
    let mut transpiler = transpiler(input, LanguageId::Shell, false)?;
    match transpiler.compile(&source.text) {
        Ok(_) => {
            println!("✓ {} is valid {input}", source.name);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => Err(CliError::failure(report(err, &source))),
    }
}

/// Print the language registry.
pub fn list_languages() -> CliResult<ExitCode> {
    for info in languages::LANGUAGES {
        let roles: Vec<&str> = info
            .roles
            .iter()
            .map(|role| match role {
                LanguageRole::Input => "input",
                LanguageRole::Output => "output",
            })
            .collect();
        let aliases = if info.aliases.is_empty() {
            String::new()
        } else {
            format!(" (aliases: {})", info.aliases.join(", "))
        };
        println!("{:<12} {:<14} {}{aliases}", info.canonical, roles.join("+"), info.description);
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_roles() {
        assert_eq!(parse_language("js", LanguageRole::Input).unwrap(), LanguageId::JavaScript);
        let err = parse_language("java", LanguageRole::Input).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::USAGE);
        let err = parse_language("cobol", LanguageRole::Output).unwrap_err();
        assert_eq!(err.message, "Unknown language 'cobol'");
    }

    #[test]
    fn test_read_source_prefers_expression() {
        let args = SourceArgs {
            file: None,
            expression: Some("{x: 1}".into()),
            from: "shell".into(),
        };
        let source = read_source(&args).unwrap();
        assert_eq!(source.name, "<expression>");
        assert_eq!(source.text, "{x: 1}");
    }

    #[test]
    fn test_read_source_missing_file() {
        let args = SourceArgs {
            file: Some("/nonexistent/query.js".into()),
            expression: None,
            from: "shell".into(),
        };
        assert!(read_source(&args).is_err());
    }
}

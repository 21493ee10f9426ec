//! Command-line interface.
//!
//! ## Commands
//!
//! - `compile [FILE] --from <lang> --to <lang>` - Translate an expression
//! - `check [FILE] --from <lang>` - Parse and type-check without printing output
//! - `languages` - List supported languages
//!
//! ## Design
//!
//! Command functions return `CliResult<T>` instead of calling `process::exit`. Only the top-level `run()` handles
//! errors and exits. Exit codes: 0 on success, 1 when the source fails to compile, 2 for usage errors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    pub const USAGE: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point catches these errors, prints the message, and
/// exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Create a usage error (exit code 2).
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::USAGE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Translate BSON-bearing expressions between languages
#[derive(Parser, Debug)]
#[command(name = "bsonshift")]
#[command(version = VERSION)]
#[command(about = "Translate BSON-bearing expressions between languages", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Where the source text comes from.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Source file (reads stdin when neither FILE nor -e is given)
    #[arg(value_name = "FILE", conflicts_with = "expression")]
    pub file: Option<PathBuf>,

    /// Inline source expression
    #[arg(short = 'e', long = "expression", value_name = "CODE")]
    pub expression: Option<String>,

    /// Input language (javascript, shell, python)
    #[arg(long = "from", value_name = "LANG", default_value = "shell")]
    pub from: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate an expression into another language
    Compile {
        #[command(flatten)]
        source: SourceArgs,

        /// Output language (java, csharp, python, javascript, shell, object)
        #[arg(long = "to", value_name = "LANG")]
        to: String,

        /// Render documents generically instead of in the target's native form
        #[arg(long = "no-idiomatic")]
        no_idiomatic: bool,

        /// Print the required import lines before the output
        #[arg(long)]
        imports: bool,

        /// Print a JSON object with `output` and `imports` (or `error`)
        #[arg(long)]
        json: bool,
    },

    /// Parse and type-check an expression
    Check {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// List supported languages
    Languages,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Compile {
            source,
            to,
            no_idiomatic,
            imports,
            json,
        } => commands::compile(
            &source,
            &commands::CompileOptions {
                to,
                idiomatic: !no_idiomatic,
                imports,
                json,
            },
        ),
        Command::Check { source } => commands::check(&source),
        Command::Languages => commands::list_languages(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_compile() {
        let cli = Cli::try_parse_from(["bsonshift", "compile", "-e", "{x: 1}", "--from", "javascript", "--to", "java"])
            .unwrap();
        let Command::Compile { source, to, no_idiomatic, .. } = cli.command else {
            panic!("Expected Compile command");
        };
        assert_eq!(source.expression.as_deref(), Some("{x: 1}"));
        assert_eq!(source.from, "javascript");
        assert_eq!(to, "java");
        assert!(!no_idiomatic);
    }

    #[test]
    fn test_cli_compile_requires_target() {
        assert!(Cli::try_parse_from(["bsonshift", "compile", "-e", "1"]).is_err());
    }

    #[test]
    fn test_cli_file_conflicts_with_expression() {
        assert!(Cli::try_parse_from(["bsonshift", "check", "a.js", "-e", "1"]).is_err());
    }

    #[test]
    fn test_cli_defaults_to_shell_input() {
        let cli = Cli::try_parse_from(["bsonshift", "check", "q.js"]).unwrap();
        let Command::Check { source } = cli.command else {
            panic!("Expected Check command");
        };
        assert_eq!(source.from, "shell");
        assert_eq!(source.file, Some(PathBuf::from("q.js")));
    }

    #[test]
    fn test_cli_parse_languages() {
        let cli = Cli::try_parse_from(["bsonshift", "languages"]).unwrap();
        assert!(matches!(cli.command, Command::Languages));
    }
}

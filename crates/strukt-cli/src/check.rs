//! # Check Subcommand
//!
//! Validates each document against one compiled schema and prints a report:
//!
//! ```text
//! OK: cards/gauge.yaml
//! FAIL: cards/broken.yaml
//!   min: Expected a value of type `number` for `min` but received `"low"`.
//! ```
//!
//! Failures at the root print as `(root)`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use strukt_core::{join_path, Value};
use strukt_schema::{Struct, ValidationError};

use crate::load::{load_struct, load_value, SchemaArgs};

/// Arguments for the `strukt check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Whole-value defaults file (JSON or YAML).
    #[arg(long, value_name = "FILE")]
    pub defaults: Option<PathBuf>,

    /// Print the coerced value of each valid document as JSON.
    #[arg(long)]
    pub print: bool,

    /// Documents to validate.
    #[arg(value_name = "DOC", required = true)]
    pub documents: Vec<PathBuf>,
}

/// Result of checking one document.
#[derive(Debug)]
pub enum Outcome {
    /// The coerced value.
    Valid(Value),
    Invalid(ValidationError),
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 when every document is valid, 1 when any is invalid.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let st = load_struct(&args.schema, args.defaults.as_deref())?;

    let mut failed = 0usize;
    for path in &args.documents {
        match check_document(&st, path)? {
            Outcome::Valid(value) => {
                println!("OK: {}", path.display());
                if args.print {
                    let json = value
                        .try_to_json()
                        .with_context(|| format!("cannot print {}", path.display()))?;
                    let rendered = serde_json::to_string_pretty(&json)
                        .context("failed to render coerced value")?;
                    println!("{rendered}");
                }
            }
            Outcome::Invalid(error) => {
                failed += 1;
                println!("FAIL: {}", path.display());
                for line in report_lines(&error) {
                    println!("{line}");
                }
            }
        }
    }

    tracing::info!(
        documents = args.documents.len(),
        failed,
        "check complete"
    );

    Ok(if failed > 0 { 1 } else { 0 })
}

/// Validate one document file.
pub fn check_document(st: &Struct, path: &Path) -> Result<Outcome> {
    let value = load_value(path)?;
    Ok(match st.validate(&value) {
        Ok(coerced) => Outcome::Valid(coerced),
        Err(e) => Outcome::Invalid(e.into_validation()),
    })
}

/// One indented line per failure. The first line carries the error's own
/// message, which names a union's combined type.
pub fn report_lines(error: &ValidationError) -> Vec<String> {
    error
        .errors()
        .iter()
        .enumerate()
        .map(|(i, failure)| {
            let location = if failure.path.is_empty() {
                "(root)".to_string()
            } else {
                join_path(&failure.path)
            };
            let message = if i == 0 {
                error.message()
            } else {
                failure.message()
            };
            format!("  {location}: {message}")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strukt_schema::{Description, Structs};

    #[test]
    fn test_report_lines_for_nested_failures() {
        let st = Structs::new()
            .compile(Description::shape([
                ("name", Description::from("string")),
                ("tags", Description::items(["string"])),
            ]))
            .unwrap();
        let input = Value::object([
            ("name", Value::from(1)),
            ("tags", Value::array([Value::from("a"), Value::from(2)])),
        ]);
        let error = st.validate(&input).unwrap_err().into_validation();
        assert_eq!(
            report_lines(&error),
            [
                "  name: Expected a value of type `string` for `name` but received `1`.",
                "  tags.1: Expected a value of type `string` for `tags.1` but received `2`.",
            ]
        );
    }

    #[test]
    fn test_report_lines_at_root() {
        let st = Structs::new().compile("string | number").unwrap();
        let error = st.validate(&Value::Bool(true)).unwrap_err().into_validation();
        assert_eq!(
            report_lines(&error),
            ["  (root): Expected a value of type `string | number` but received `true`."]
        );
    }
}

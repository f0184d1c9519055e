//! # Check Subcommand Integration
//!
//! Runs `check` and `describe` over temp files and asserts on exit codes
//! and per-document outcomes.

use std::io::Write;
use std::path::PathBuf;

use strukt_cli::check::{check_document, run_check, CheckArgs, Outcome};
use strukt_cli::describe::{run_describe, DescribeArgs};
use strukt_cli::load::{load_struct, SchemaArgs};
use strukt_core::{PathSegment, Value};

const CARD_SCHEMA: &str = "type: string\nentity: entity-id\nmin: number\nname: string?\n";

const TYPES: &str = r#"
types:
  entity-id:
    type: string
    pattern: '^[a-z_]+\.[a-z0-9_]+$'
    message: "entity id should be in the format 'domain.entity'"
"#;

/// Helper: write `content` to a temp file with the given extension.
fn temp_file(extension: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(&format!(".{extension}"))
        .tempfile()
        .expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

/// Helper: check arguments for the card schema.
fn card_args(
    schema: &tempfile::NamedTempFile,
    config: &tempfile::NamedTempFile,
    documents: Vec<PathBuf>,
) -> CheckArgs {
    CheckArgs {
        schema: SchemaArgs {
            schema: schema.path().to_path_buf(),
            config: Some(config.path().to_path_buf()),
        },
        defaults: None,
        print: false,
        documents,
    }
}

// -- Exit codes -------------------------------------------------------------------

#[test]
fn test_all_valid_documents_exit_zero() {
    let schema = temp_file("yaml", CARD_SCHEMA);
    let config = temp_file("yaml", TYPES);
    let doc = temp_file("yaml", "type: gauge\nentity: sensor.cpu\nmin: 0\n");
    let args = card_args(&schema, &config, vec![doc.path().to_path_buf()]);
    assert_eq!(run_check(&args).unwrap(), 0);
}

#[test]
fn test_any_invalid_document_exits_one() {
    let schema = temp_file("yaml", CARD_SCHEMA);
    let config = temp_file("yaml", TYPES);
    let good = temp_file("json", r#"{"type": "gauge", "entity": "sensor.cpu", "min": 1}"#);
    let bad = temp_file("json", r#"{"type": "gauge", "entity": "cpu", "min": 1}"#);
    let args = card_args(
        &schema,
        &config,
        vec![good.path().to_path_buf(), bad.path().to_path_buf()],
    );
    assert_eq!(run_check(&args).unwrap(), 1);
}

#[test]
fn test_print_renders_coerced_documents() {
    let schema = temp_file("yaml", CARD_SCHEMA);
    let config = temp_file("yaml", TYPES);
    let doc = temp_file("yaml", "type: gauge\nentity: sensor.cpu\nmin: 0\n");
    let mut args = card_args(&schema, &config, vec![doc.path().to_path_buf()]);
    args.print = true;
    assert_eq!(run_check(&args).unwrap(), 0);
}

#[test]
fn test_unreadable_document_is_an_error() {
    let schema = temp_file("yaml", CARD_SCHEMA);
    let config = temp_file("yaml", TYPES);
    let args = card_args(
        &schema,
        &config,
        vec![PathBuf::from("/nonexistent/strukt/card.yaml")],
    );
    assert!(run_check(&args).is_err());
}

#[test]
fn test_bad_config_is_an_error() {
    let schema = temp_file("yaml", CARD_SCHEMA);
    let config = temp_file("yaml", "types:\n  entity-id:\n    pattern: '('\n");
    let doc = temp_file("yaml", "type: gauge\n");
    let args = card_args(&schema, &config, vec![doc.path().to_path_buf()]);
    let err = run_check(&args).unwrap_err();
    assert!(format!("{err:#}").contains("invalid type config"));
}

// -- Outcomes ---------------------------------------------------------------------

#[test]
fn test_invalid_outcome_carries_every_failure() {
    let schema = temp_file("yaml", CARD_SCHEMA);
    let config = temp_file("yaml", TYPES);
    let args = SchemaArgs {
        schema: schema.path().to_path_buf(),
        config: Some(config.path().to_path_buf()),
    };
    let st = load_struct(&args, None).unwrap();
    let doc = temp_file("yaml", "type: gauge\nentity: cpu\nmin: low\n");

    let Outcome::Invalid(error) = check_document(&st, doc.path()).unwrap() else {
        panic!("expected an invalid outcome");
    };
    let paths: Vec<&[PathSegment]> = error.errors().iter().map(|f| f.path.as_slice()).collect();
    assert_eq!(
        paths,
        [&[PathSegment::from("entity")][..], &[PathSegment::from("min")][..]]
    );
    assert_eq!(
        error.reason(),
        Some("entity id should be in the format 'domain.entity'")
    );
}

#[test]
fn test_valid_outcome_applies_defaults_file() {
    let schema = temp_file("yaml", CARD_SCHEMA);
    let config = temp_file("yaml", TYPES);
    let defaults = temp_file("yaml", "min: 0\nname: Gauge\n");
    let args = SchemaArgs {
        schema: schema.path().to_path_buf(),
        config: Some(config.path().to_path_buf()),
    };
    let st = load_struct(&args, Some(defaults.path())).unwrap();
    let doc = temp_file("yaml", "type: gauge\nentity: sensor.cpu\n");

    let Outcome::Valid(value) = check_document(&st, doc.path()).unwrap() else {
        panic!("expected a valid outcome");
    };
    assert_eq!(value.get("min"), Some(&Value::from(0)));
    assert_eq!(value.get("name"), Some(&Value::from("Gauge")));
}

#[test]
fn test_describe_exits_zero() {
    let schema = temp_file("json", r#"["string", "number"]"#);
    let args = DescribeArgs {
        schema: SchemaArgs {
            schema: schema.path().to_path_buf(),
            config: None,
        },
    };
    assert_eq!(run_describe(&args).unwrap(), 0);
}

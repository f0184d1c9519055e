//! # File Loading
//!
//! Shared by every subcommand: builds the factory from an optional type
//! config, compiles the schema file, and reads documents.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use strukt_core::Value;
use strukt_schema::{read_document, Defaults, Description, Struct, Structs, StruktConfig};

/// Schema selection flags, flattened into each subcommand.
#[derive(Args, Debug, Clone)]
pub struct SchemaArgs {
    /// Schema description file (JSON or YAML).
    #[arg(long, value_name = "FILE")]
    pub schema: PathBuf,

    /// Config file declaring custom types.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Build a factory with the built-in types plus those declared in `config`.
pub fn load_factory(config: Option<&Path>) -> Result<Structs> {
    let Some(path) = config else {
        return Ok(Structs::new());
    };
    let config = StruktConfig::load(path)
        .with_context(|| format!("failed to load type config {}", path.display()))?;
    let structs = Structs::from_config(&config)
        .with_context(|| format!("invalid type config {}", path.display()))?;
    tracing::info!(
        config = %path.display(),
        types = config.types.len(),
        "loaded custom types"
    );
    Ok(structs)
}

/// Compile the schema file, with whole-value defaults read from `defaults`.
pub fn load_struct(args: &SchemaArgs, defaults: Option<&Path>) -> Result<Struct> {
    let structs = load_factory(args.config.as_deref())?;
    let structs = match defaults {
        Some(path) => structs.with_defaults(Defaults::Value(load_value(path)?)),
        None => structs,
    };
    let document = read_document(&args.schema)
        .with_context(|| format!("failed to read schema {}", args.schema.display()))?;
    let st = structs
        .compile(Description::from(document))
        .with_context(|| format!("failed to compile schema {}", args.schema.display()))?;
    tracing::info!(
        schema = %args.schema.display(),
        kind = %st.kind(),
        "compiled schema"
    );
    Ok(st)
}

/// Read a JSON or YAML document as a value.
pub fn load_value(path: &Path) -> Result<Value> {
    let document = read_document(path)
        .with_context(|| format!("failed to read document {}", path.display()))?;
    Ok(Value::from(document))
}

//! # strukt-cli: Command-Line Front End
//!
//! Provides the `strukt` binary, a thin caller of `strukt-schema` for shell
//! pipelines and CI jobs.
//!
//! ## Subcommands
//!
//! - `strukt check`: validate JSON/YAML documents against a schema file.
//! - `strukt describe`: print the compiled kind and type of a schema file.
//!
//! ```bash
//! strukt check --schema card.yaml --config types.yaml cards/*.yaml
//! strukt check --schema card.yaml --defaults card-defaults.json --print card.json
//! strukt describe --schema card.yaml
//! ```
//!
//! Schema and config files are parsed as JSON when their extension is
//! `.json` and as YAML otherwise.

pub mod check;
pub mod describe;
pub mod load;

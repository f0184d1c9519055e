//! # Describe Subcommand
//!
//! Compiles a schema file and prints what it compiled to.

use anyhow::Result;
use clap::Args;

use strukt_schema::Struct;

use crate::load::{load_struct, SchemaArgs};

/// Arguments for the `strukt describe` subcommand.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,
}

/// Execute the describe subcommand.
pub fn run_describe(args: &DescribeArgs) -> Result<u8> {
    let st = load_struct(&args.schema, None)?;
    println!("{}", describe(&st));
    Ok(0)
}

pub fn describe(st: &Struct) -> String {
    format!("kind: {}\ntype: {}", st.kind(), st.type_description())
}

//! # strukt-schema: Runtime Schema Validation
//!
//! Compiles declarative schema descriptions into validators. A description
//! is a shorthand string (`"string"`, `"number?"`, `"string | number"`), a
//! list, an object shape, a custom predicate, or a compiled schema; the
//! compiler turns it into a tree of [`Schema`] nodes, and a [`Struct`]
//! wraps the root with `assert`, `test` and `validate`.
//!
//! ## Validation Model
//!
//! Validation returns either the coerced value (defaults applied) or a
//! [`ValidationError`] listing every failing site with its path, failing
//! sub-value and expected type. The first failure is the representative
//! one and supplies the error's message:
//!
//! ```text
//! Expected a value of type `number` for `limits.0` but received `"low"`.
//! ```
//!
//! ## Modules
//!
//! - [`registry`]: named scalar types, built-in and custom.
//! - [`description`]: the declarative input.
//! - [`compile`] and [`combinators`]: description → node tree.
//! - [`node`]: the compiled nodes and their validation semantics.
//! - [`factory`]: [`Structs`] and [`Struct`].
//! - [`config`]: custom types declared in YAML or JSON.
//!
//! ## Crate Policy
//!
//! - Depends only on `strukt-core` internally.
//! - Malformed schemas are [`SchemaError`]s at build time, never deferred
//!   to validation.
//! - Validation never panics and never mutates its input.

mod aggregate;
pub mod combinators;
pub mod compile;
pub mod config;
pub mod defaults;
pub mod description;
pub mod error;
pub mod factory;
pub mod node;
pub mod registry;

pub use compile::Compiler;
pub use config::{read_document, StruktConfig, TypeSpec};
pub use defaults::{DefaultFn, Defaults};
pub use description::Description;
pub use error::{Failure, SchemaError, StructError, ValidationError};
pub use factory::{Struct, StructOptions, Structs};
pub use node::{Kind, Schema, Selector, Thunk};
pub use registry::{ErrorPatch, Predicate, TypeRegistry, Verdict};

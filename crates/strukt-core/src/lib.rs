//! # strukt-core: Foundational Types for strukt
//!
//! This crate is the leaf of the strukt workspace. It defines the dynamic
//! value model that every schema check operates on, and the single
//! classification function that maps a value onto its shape category.
//! Every other crate in the workspace depends on `strukt-core`; it depends
//! on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One closed `Value` enum.** Every runtime shape a validator can be
//!    handed (primitives, arrays, objects, dates, regexps, maps, sets, typed
//!    arrays, host callables, opaque host objects) is a variant. Nothing is
//!    stringly typed.
//!
//! 2. **One classifier.** [`classify`] is the only place that decides what
//!    kind of value something is. Consumers match on [`TypeTag`]
//!    exhaustively instead of comparing strings.
//!
//! 3. **JSON rendering follows `JSON.stringify`.** Error messages quote the
//!    offending value exactly as a JSON-first caller would expect:
//!    integral numbers without a fraction, `undefined` and functions dropped
//!    from objects, dates as ISO-8601 strings.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `strukt-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod classify;
pub mod error;
pub mod json;
pub mod path;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use classify::{classify, TypeTag};
pub use error::ValueError;
pub use path::{join_path, PathSegment};
pub use value::{ErrorValue, Function, HostObject, Object, RegExp, TypedArray, Value};

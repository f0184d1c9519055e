//! # Error Types
//!
//! Errors raised by the value model itself. Schema definition and
//! validation errors live in `strukt-schema`; this crate only fails when a
//! value cannot cross the JSON boundary.

use thiserror::Error;

use crate::classify::TypeTag;

/// Error converting a [`Value`](crate::Value) to another representation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    /// The value has no JSON representation (`JSON.stringify` would
    /// yield `undefined`).
    #[error("a value of type `{0}` has no JSON representation")]
    NotRepresentable(TypeTag),
}

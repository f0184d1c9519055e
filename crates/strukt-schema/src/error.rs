//! # Error Types
//!
//! Two error classes with different owners:
//!
//! - [`SchemaError`] is a programmer error: a malformed description, an
//!   unknown type name, a bad configuration. It is returned when a schema
//!   is built and never deferred to validation time.
//! - [`ValidationError`] is expected and data-dependent: the value did not
//!   fit. It carries every [`Failure`] found, each with its path, the
//!   offending sub-value and the expected type description.
//!
//! [`StructError`] wraps a `ValidationError` with its formatted message for
//! callers that want a `std::error::Error` from `assert`.

use std::fmt;

use strukt_core::{join_path, PathSegment, Value};
use thiserror::Error;

/// Error in a schema definition. Never recoverable at runtime.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The description has no schema meaning (an empty list, a number, ...).
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// A scalar name is not present in the type registry.
    #[error("Invalid type: {0}")]
    InvalidType(String),

    /// A configuration-declared pattern did not compile.
    #[error("Invalid pattern for type `{name}`: {source}")]
    InvalidPattern {
        /// Name of the declared type.
        name: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// A configuration entry is well formed but meaningless.
    #[error("Invalid config for type `{name}`: {reason}")]
    InvalidConfig {
        /// Name of the declared type.
        name: String,
        /// Reason the entry was rejected.
        reason: String,
    },

    /// A schema or configuration file could not be read or parsed.
    #[error("failed to load '{origin}': {reason}")]
    Load {
        /// File path or other origin of the document.
        origin: String,
        /// Reason the document was rejected.
        reason: String,
    },
}

/// One failing site found during validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    /// The outermost value being validated when the failure surfaced.
    pub data: Value,
    /// Keys and indices from `data` down to the failing sub-value.
    pub path: Vec<PathSegment>,
    /// The failing sub-value.
    pub value: Value,
    /// Human reason supplied by a custom predicate.
    pub reason: Option<String>,
    /// Description of the expected type.
    pub expected: String,
}

impl Failure {
    /// A failure at the root of `value`.
    pub fn new(value: Value, expected: impl Into<String>) -> Self {
        Self {
            data: value.clone(),
            path: Vec::new(),
            value,
            reason: None,
            expected: expected.into(),
        }
    }

    /// The standard one-line message for this failure.
    pub fn message(&self) -> String {
        StructError::format(self)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// The outcome of a failed validation.
///
/// Holds at least one [`Failure`]. The first is the representative: the
/// error's own [`path`](Self::path) and [`value`](Self::value) are those of
/// `errors()[0]`. Its [`expected`](Self::expected) type is too, unless a
/// union or intersection reported the error under its combined type. That
/// override belongs to the error, not to the failure records, and is
/// dropped when a container collects the failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    expected: Option<String>,
    failures: Vec<Failure>,
}

impl ValidationError {
    /// An error with a single failure.
    pub fn new(failure: Failure) -> Self {
        Self {
            expected: None,
            failures: vec![failure],
        }
    }

    /// Build from a list of failures; `None` when the list is empty.
    pub fn from_failures(failures: Vec<Failure>) -> Option<Self> {
        if failures.is_empty() {
            None
        } else {
            Some(Self {
                expected: None,
                failures,
            })
        }
    }

    /// The representative failure.
    pub fn first(&self) -> &Failure {
        // Non-empty by construction.
        &self.failures[0]
    }

    /// Every failure, in discovery order.
    pub fn errors(&self) -> &[Failure] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<Failure> {
        self.failures
    }

    pub fn data(&self) -> &Value {
        &self.first().data
    }

    pub fn path(&self) -> &[PathSegment] {
        &self.first().path
    }

    pub fn value(&self) -> &Value {
        &self.first().value
    }

    pub fn reason(&self) -> Option<&str> {
        self.first().reason.as_deref()
    }

    pub fn expected(&self) -> &str {
        self.expected
            .as_deref()
            .unwrap_or(&self.first().expected)
    }

    /// Report the error under `expected`, leaving the failures untouched.
    pub(crate) fn retype(&mut self, expected: &str) {
        self.expected = Some(expected.to_string());
    }

    /// Write a pending type override onto the representative failure, so
    /// the error and `errors()[0]` agree once the error leaves its struct.
    pub(crate) fn settle(mut self) -> Self {
        if let Some(expected) = self.expected.take() {
            if let Some(first) = self.failures.first_mut() {
                first.expected = expected;
            }
        }
        self
    }

    /// Replace the expected type of the representative failure itself.
    pub(crate) fn retype_first(&mut self, expected: &str) {
        self.expected = None;
        if let Some(first) = self.failures.first_mut() {
            first.expected = expected.to_string();
        }
    }

    /// Prefix every failure's path with `segment` and re-anchor its
    /// `data` on `container`.
    pub(crate) fn nest(&mut self, segment: &PathSegment, container: &Value) {
        for failure in &mut self.failures {
            failure.path.insert(0, segment.clone());
            failure.data = container.clone();
        }
    }

    pub fn message(&self) -> String {
        match &self.expected {
            Some(expected) => StructError::format(&Failure {
                expected: expected.clone(),
                ..self.first().clone()
            }),
            None => self.first().message(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Error returned by [`Struct::assert`](crate::Struct::assert).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct StructError {
    message: String,
    error: ValidationError,
}

impl StructError {
    pub fn new(error: ValidationError) -> Self {
        Self {
            message: error.message(),
            error,
        }
    }

    /// Format a failure:
    /// ``Expected a value of type `T` for `a.b` but received `V`.``
    /// The `for` clause is omitted at the root.
    pub fn format(failure: &Failure) -> String {
        let location = if failure.path.is_empty() {
            String::new()
        } else {
            format!(" for `{}`", join_path(&failure.path))
        };
        format!(
            "Expected a value of type `{}`{} but received `{}`.",
            failure.expected,
            location,
            failure.value.stringify()
        )
    }

    pub fn validation(&self) -> &ValidationError {
        &self.error
    }

    pub fn into_validation(self) -> ValidationError {
        self.error
    }

    pub fn errors(&self) -> &[Failure] {
        self.error.errors()
    }

    pub fn path(&self) -> &[PathSegment] {
        self.error.path()
    }

    pub fn value(&self) -> &Value {
        self.error.value()
    }

    pub fn data(&self) -> &Value {
        self.error.data()
    }

    pub fn reason(&self) -> Option<&str> {
        self.error.reason()
    }

    pub fn expected(&self) -> &str {
        self.error.expected()
    }
}

impl From<ValidationError> for StructError {
    fn from(error: ValidationError) -> Self {
        StructError::new(error)
    }
}

//! Failure aggregation for composite nodes.
//!
//! Child failures are prefixed with the key or index they were found under
//! and re-anchored on the container, so by the time an error reaches the
//! caller every failure's `data` is the outermost value and its `path` runs
//! from there. Order is discovery order.

use strukt_core::{PathSegment, Value};

use crate::error::{Failure, ValidationError};

pub(crate) struct Aggregator<'a> {
    container: &'a Value,
    failures: Vec<Failure>,
}

impl<'a> Aggregator<'a> {
    pub(crate) fn new(container: &'a Value) -> Self {
        Self {
            container,
            failures: Vec::new(),
        }
    }

    /// Merge a child's error found under `segment`.
    pub(crate) fn absorb(&mut self, segment: PathSegment, mut err: ValidationError) {
        err.nest(&segment, self.container);
        tracing::trace!(
            segment = %segment,
            failures = err.errors().len(),
            "child validation failed"
        );
        self.failures.extend(err.into_failures());
    }

    /// Record a failure already anchored on the container.
    pub(crate) fn push(&mut self, failure: Failure) {
        self.failures.push(failure);
    }

    /// `Ok(output)` when nothing failed, otherwise every failure collected.
    pub(crate) fn finish(self, output: Value) -> Result<Value, ValidationError> {
        match ValidationError::from_failures(self.failures) {
            Some(err) => Err(err),
            None => Ok(output),
        }
    }
}

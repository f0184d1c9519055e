//! # Schema Compiler
//!
//! Turns a [`Description`] into a [`Schema`] node tree, resolving scalar
//! names against the compiler's [`TypeRegistry`].
//!
//! ## Dispatch
//!
//! | Description | Node |
//! |---|---|
//! | compiled schema or struct | itself |
//! | predicate | function |
//! | one item | list of the item |
//! | several items | tuple |
//! | no items | `Invalid schema` |
//! | shape | object |
//! | `T?` | optional `T` |
//! | `A \| B` | union |
//! | `A & B` | intersection |
//! | other string | scalar from the registry |
//! | anything else | `Invalid schema` |
//!
//! The `?` suffix is tested first, then `|`, then `&`. Each fragment is
//! compiled again as a shorthand, so `|` binds looser than `&`:
//! `a | b & c` is a union of `a` and the intersection `b & c`.

use crate::defaults::Defaults;
use crate::description::Description;
use crate::error::SchemaError;
use crate::node::Schema;
use crate::registry::TypeRegistry;

/// Compiles descriptions against one registry.
#[derive(Debug, Clone, Copy)]
pub struct Compiler<'r> {
    registry: &'r TypeRegistry,
}

impl<'r> Compiler<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Compile a description, attaching `defaults` to the resulting node.
    ///
    /// Compiled schemas and structs are returned unchanged and keep their
    /// own defaults.
    pub fn compile(
        &self,
        description: &Description,
        defaults: Option<&Defaults>,
    ) -> Result<Schema, SchemaError> {
        match description {
            Description::Node(schema) => Ok(schema.clone()),
            Description::Struct(st) => Ok(st.node().clone()),
            Description::Predicate(predicate) => Ok(self.function(predicate.clone(), defaults)),
            Description::Items(items) => match items.as_slice() {
                [] => Err(SchemaError::InvalidSchema(description.to_string())),
                [element] => self.list(element, defaults),
                _ => self.tuple(items, defaults),
            },
            Description::Shape(shape) => self.object(shape, defaults),
            Description::Shorthand(text) => self.shorthand(text, defaults),
            Description::Value(_) => Err(SchemaError::InvalidSchema(description.to_string())),
        }
    }

    /// Compile a shorthand string.
    pub fn shorthand(
        &self,
        text: &str,
        defaults: Option<&Defaults>,
    ) -> Result<Schema, SchemaError> {
        if let Some(inner) = text.strip_suffix('?') {
            let inner = self.shorthand(inner, defaults)?;
            return self.optional(&Description::Node(inner), None);
        }
        if text.contains('|') {
            return self.union(&split_around(text, '|'), defaults);
        }
        if text.contains('&') {
            return self.intersection(&split_around(text, '&'), defaults);
        }
        self.scalar(text, defaults)
    }
}

/// Split on `separator`, trimming whitespace adjacent to each separator.
fn split_around(text: &str, separator: char) -> Vec<Description> {
    let parts: Vec<&str> = text.split(separator).collect();
    let last = parts.len().saturating_sub(1);
    parts
        .iter()
        .enumerate()
        .map(|(index, part)| {
            let mut part = *part;
            if index > 0 {
                part = part.trim_start();
            }
            if index < last {
                part = part.trim_end();
            }
            Description::from(part)
        })
        .collect()
}

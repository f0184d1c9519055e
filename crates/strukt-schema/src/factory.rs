//! # Struct Factory
//!
//! [`Structs`] binds a type registry (built-ins plus caller types) and
//! hands out compiled [`Struct`] validators. Every combinator is available
//! as a factory method and compiles against the same registry.
//!
//! ```ignore
//! let structs = Structs::new();
//! let user = structs.compile(Description::shape([
//!     ("name", "string"),
//!     ("age", "number?"),
//! ]))?;
//! assert!(user.test(&Value::object([("name", "x")])));
//! ```
//!
//! Defaults for the next call are attached with
//! [`with_defaults`](Structs::with_defaults):
//!
//! ```ignore
//! let gauge = structs
//!     .with_defaults(Defaults::value(Value::object([("min", 0), ("max", 100)])))
//!     .interface(shape)?;
//! ```

use std::any::Any;
use std::sync::Arc;

use strukt_core::Value;

use crate::compile::Compiler;
use crate::config::StruktConfig;
use crate::defaults::Defaults;
use crate::description::Description;
use crate::error::{SchemaError, StructError};
use crate::node::{Kind, Schema};
use crate::registry::{TypeRegistry, Verdict};

/// Factory options.
#[derive(Debug, Clone, Default)]
pub struct StructOptions {
    /// Extra scalar types, layered over the built-ins.
    pub types: TypeRegistry,
}

/// Factory of [`Struct`] validators sharing one registry.
#[derive(Debug, Clone)]
pub struct Structs {
    registry: Arc<TypeRegistry>,
    defaults: Option<Defaults>,
}

impl Default for Structs {
    fn default() -> Self {
        Self::new()
    }
}

impl Structs {
    /// A factory with only the built-in types.
    pub fn new() -> Self {
        Self::with_options(StructOptions::default())
    }

    pub fn with_options(options: StructOptions) -> Self {
        let mut registry = TypeRegistry::builtin();
        registry.extend(&options.types);
        tracing::debug!(types = registry.len(), "struct factory created");
        Self {
            registry: Arc::new(registry),
            defaults: None,
        }
    }

    /// A factory with `types` layered over the built-ins.
    pub fn with_types(types: TypeRegistry) -> Self {
        Self::with_options(StructOptions { types })
    }

    /// A factory with the types declared in `config`.
    pub fn from_config(config: &StruktConfig) -> Result<Self, SchemaError> {
        let types = config.registry(&TypeRegistry::builtin())?;
        Ok(Self::with_types(types))
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn compiler(&self) -> Compiler<'_> {
        Compiler::new(&self.registry)
    }

    /// A copy of this factory whose next combinator call attaches
    /// `defaults`.
    pub fn with_defaults(&self, defaults: impl Into<Defaults>) -> Structs {
        Structs {
            registry: Arc::clone(&self.registry),
            defaults: Some(defaults.into()),
        }
    }

    /// Compile a description.
    ///
    /// A [`Struct`] description is recompiled from its own description, so
    /// its scalar names re-resolve against this factory's registry.
    pub fn compile(&self, description: impl Into<Description>) -> Result<Struct, SchemaError> {
        self.compile_with(description, self.defaults.clone())
    }

    /// Compile a description with explicit defaults.
    pub fn compile_with(
        &self,
        description: impl Into<Description>,
        defaults: Option<Defaults>,
    ) -> Result<Struct, SchemaError> {
        let description = match description.into() {
            Description::Struct(st) => st.schema,
            other => other,
        };
        let node = self.compiler().compile(&description, defaults.as_ref())?;
        tracing::debug!(
            kind = %node.kind(),
            type_desc = node.type_description(),
            "compiled struct"
        );
        Ok(self.wrap(description, defaults, node))
    }

    fn wrap(&self, schema: Description, defaults: Option<Defaults>, node: Schema) -> Struct {
        Struct {
            schema,
            defaults,
            registry: Arc::clone(&self.registry),
            node,
        }
    }

    /// Wrap a node built by a combinator; the node doubles as its schema.
    fn built(&self, node: Schema) -> Struct {
        tracing::debug!(
            kind = %node.kind(),
            type_desc = node.type_description(),
            "compiled struct"
        );
        self.wrap(Description::Node(node.clone()), self.defaults.clone(), node)
    }

    fn built_result(&self, node: Result<Schema, SchemaError>) -> Result<Struct, SchemaError> {
        node.map(|node| self.built(node))
    }

    // -----------------------------------------------------------------------
    // Combinators
    // -----------------------------------------------------------------------

    /// Any value except `undefined`.
    pub fn any(&self) -> Result<Struct, SchemaError> {
        self.scalar("any")
    }

    pub fn scalar(&self, name: &str) -> Result<Struct, SchemaError> {
        self.built_result(self.compiler().scalar(name, self.defaults.as_ref()))
    }

    pub fn function<F>(&self, predicate: F) -> Struct
    where
        F: Fn(&Value, Option<&Value>) -> Verdict + Send + Sync + 'static,
    {
        self.built(
            self.compiler()
                .function(Arc::new(predicate), self.defaults.as_ref()),
        )
    }

    pub fn object(&self, shape: impl Into<Description>) -> Result<Struct, SchemaError> {
        match shape.into() {
            Description::Shape(shape) => {
                self.built_result(self.compiler().object(&shape, self.defaults.as_ref()))
            }
            other => Err(SchemaError::InvalidSchema(other.to_string())),
        }
    }

    pub fn partial(&self, shape: impl Into<Description>) -> Result<Struct, SchemaError> {
        match shape.into() {
            Description::Shape(shape) => {
                self.built_result(self.compiler().partial(&shape, self.defaults.as_ref()))
            }
            other => Err(SchemaError::InvalidSchema(other.to_string())),
        }
    }

    pub fn interface(&self, shape: impl Into<Description>) -> Result<Struct, SchemaError> {
        match shape.into() {
            Description::Shape(shape) => {
                self.built_result(self.compiler().interface(&shape, self.defaults.as_ref()))
            }
            other => Err(SchemaError::InvalidSchema(other.to_string())),
        }
    }

    /// `[T]`: a one-item description.
    pub fn list(&self, items: impl Into<Description>) -> Result<Struct, SchemaError> {
        match items.into() {
            Description::Items(items) if items.len() == 1 => {
                self.built_result(self.compiler().list(&items[0], self.defaults.as_ref()))
            }
            other => Err(SchemaError::InvalidSchema(other.to_string())),
        }
    }

    pub fn tuple(&self, items: impl Into<Description>) -> Result<Struct, SchemaError> {
        match items.into() {
            Description::Items(items) => {
                self.built_result(self.compiler().tuple(&items, self.defaults.as_ref()))
            }
            other => Err(SchemaError::InvalidSchema(other.to_string())),
        }
    }

    /// `[K, V]`: a two-item description.
    pub fn dict(&self, items: impl Into<Description>) -> Result<Struct, SchemaError> {
        match items.into() {
            Description::Items(items) if items.len() == 2 => self.built_result(
                self.compiler()
                    .dict(&items[0], &items[1], self.defaults.as_ref()),
            ),
            other => Err(SchemaError::InvalidSchema(other.to_string())),
        }
    }

    pub fn enumeration<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Struct {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.built(self.compiler().enumeration(&values, self.defaults.as_ref()))
    }

    pub fn enums<V: Into<Value>>(
        &self,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Struct, SchemaError> {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.built_result(self.compiler().enums(&values, self.defaults.as_ref()))
    }

    pub fn union(&self, alternatives: impl Into<Description>) -> Result<Struct, SchemaError> {
        match alternatives.into() {
            Description::Items(items) => {
                self.built_result(self.compiler().union(&items, self.defaults.as_ref()))
            }
            other => Err(SchemaError::InvalidSchema(other.to_string())),
        }
    }

    pub fn intersection(&self, parts: impl Into<Description>) -> Result<Struct, SchemaError> {
        match parts.into() {
            Description::Items(items) => {
                self.built_result(self.compiler().intersection(&items, self.defaults.as_ref()))
            }
            other => Err(SchemaError::InvalidSchema(other.to_string())),
        }
    }

    pub fn optional(&self, description: impl Into<Description>) -> Result<Struct, SchemaError> {
        self.built_result(
            self.compiler()
                .optional(&description.into(), self.defaults.as_ref()),
        )
    }

    pub fn literal(&self, value: impl Into<Value>) -> Struct {
        self.built(self.compiler().literal(value.into(), self.defaults.as_ref()))
    }

    pub fn instance<T: Any>(&self) -> Struct {
        self.built(self.compiler().instance::<T>(self.defaults.as_ref()))
    }

    /// A recursive schema: `thunk` runs on first validation.
    pub fn lazy<F, S>(&self, thunk: F) -> Struct
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Into<Schema>,
    {
        let node = self.compiler().lazy(thunk);
        tracing::debug!(type_desc = node.type_description(), "compiled lazy struct");
        self.wrap(Description::Node(node.clone()), None, node)
    }

    pub fn dynamic<F, S>(&self, selector: F) -> Struct
    where
        F: Fn(&Value, Option<&Value>) -> S + Send + Sync + 'static,
        S: Into<Schema>,
    {
        self.built(self.compiler().dynamic(selector, self.defaults.as_ref()))
    }
}

/// A compiled validator.
#[derive(Debug, Clone)]
pub struct Struct {
    schema: Description,
    defaults: Option<Defaults>,
    registry: Arc<TypeRegistry>,
    node: Schema,
}

impl Struct {
    pub fn kind(&self) -> Kind {
        self.node.kind()
    }

    pub fn type_description(&self) -> &str {
        self.node.type_description()
    }

    /// The description this struct was compiled from.
    pub fn schema(&self) -> &Description {
        &self.schema
    }

    pub fn defaults(&self) -> Option<&Defaults> {
        self.defaults.as_ref()
    }

    /// The registry the struct was compiled against.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn node(&self) -> &Schema {
        &self.node
    }

    /// The coerced value, or the error describing every failure.
    pub fn assert(&self, value: &Value) -> Result<Value, StructError> {
        self.validate(value)
    }

    /// Whether `value` is valid.
    pub fn test(&self, value: &Value) -> bool {
        self.node.validate(value, None).is_ok()
    }

    pub fn validate(&self, value: &Value) -> Result<Value, StructError> {
        self.node
            .validate(value, None)
            .map_err(|err| StructError::new(err.settle()))
    }
}

impl From<Struct> for Schema {
    fn from(st: Struct) -> Self {
        st.node
    }
}

impl From<&Struct> for Schema {
    fn from(st: &Struct) -> Self {
        st.node.clone()
    }
}

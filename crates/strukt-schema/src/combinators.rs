//! # Combinators
//!
//! One constructor per node kind. Each compiles its child descriptions with
//! the same compiler and attaches the given defaults to the new node.
//!
//! ## Type Descriptions
//!
//! | Combinator | Type |
//! |---|---|
//! | scalar | the type name |
//! | function | `<function>` |
//! | object, interface | `{a,b}` |
//! | partial | `{a,b,...}` |
//! | list | `[T]` |
//! | tuple | `[A,B]` |
//! | dict | `dict<K,V>` |
//! | enum | JSON literals joined by ` \| ` |
//! | union | child types joined by ` \| ` |
//! | intersection | child types joined by ` & ` |
//! | literal | `literal: <json>` |
//! | instance | `instance<Name>` |
//! | lazy | `lazy...` until resolved |
//! | dynamic | `dynamic...` |

use std::any::{type_name, Any};
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use strukt_core::{HostObject, Value};

use crate::compile::Compiler;
use crate::defaults::Defaults;
use crate::description::Description;
use crate::error::SchemaError;
use crate::node::{Check, Kind, Schema, Selector, ShapeMode, Thunk};
use crate::registry::Predicate;

impl<'r> Compiler<'r> {
    /// A registry type.
    pub fn scalar(&self, name: &str, defaults: Option<&Defaults>) -> Result<Schema, SchemaError> {
        let predicate = self
            .registry()
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::InvalidType(name.to_string()))?;
        Ok(Schema::new(
            Kind::Scalar,
            name,
            defaults.cloned(),
            Check::Predicate {
                predicate,
                fixed_type: true,
            },
        ))
    }

    /// A custom predicate.
    pub fn function(&self, predicate: Predicate, defaults: Option<&Defaults>) -> Schema {
        Schema::new(
            Kind::Function,
            "<function>",
            defaults.cloned(),
            Check::Predicate {
                predicate,
                fixed_type: false,
            },
        )
    }

    /// Every declared key, no others.
    pub fn object(
        &self,
        shape: &IndexMap<String, Description>,
        defaults: Option<&Defaults>,
    ) -> Result<Schema, SchemaError> {
        self.shape(Kind::Object, ShapeMode::Exact, shape, defaults)
    }

    /// Declared keys may be absent; no others.
    pub fn partial(
        &self,
        shape: &IndexMap<String, Description>,
        defaults: Option<&Defaults>,
    ) -> Result<Schema, SchemaError> {
        self.shape(Kind::Partial, ShapeMode::Partial, shape, defaults)
    }

    /// Declared keys are checked; others pass through untouched.
    pub fn interface(
        &self,
        shape: &IndexMap<String, Description>,
        defaults: Option<&Defaults>,
    ) -> Result<Schema, SchemaError> {
        self.shape(Kind::Interface, ShapeMode::Open, shape, defaults)
    }

    fn shape(
        &self,
        kind: Kind,
        mode: ShapeMode,
        shape: &IndexMap<String, Description>,
        defaults: Option<&Defaults>,
    ) -> Result<Schema, SchemaError> {
        let fields = shape
            .iter()
            .map(|(key, description)| Ok((key.clone(), self.compile(description, None)?)))
            .collect::<Result<IndexMap<_, _>, SchemaError>>()?;
        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        let type_desc = match mode {
            ShapeMode::Partial => format!("{{{},...}}", keys.join(",")),
            ShapeMode::Exact | ShapeMode::Open => format!("{{{}}}", keys.join(",")),
        };
        Ok(Schema::new(
            kind,
            type_desc,
            defaults.cloned(),
            Check::Shape {
                mode,
                guard: self.scalar("object", None)?,
                fields,
            },
        ))
    }

    /// An array whose every element matches `element`.
    pub fn list(
        &self,
        element: &Description,
        defaults: Option<&Defaults>,
    ) -> Result<Schema, SchemaError> {
        let element = self.compile(element, None)?;
        Ok(Schema::new(
            Kind::List,
            format!("[{}]", element.type_description()),
            defaults.cloned(),
            Check::List {
                guard: self.scalar("array", None)?,
                element,
            },
        ))
    }

    /// A fixed-length array, one schema per position.
    pub fn tuple(
        &self,
        items: &[Description],
        defaults: Option<&Defaults>,
    ) -> Result<Schema, SchemaError> {
        let items = items
            .iter()
            .map(|item| self.compile(item, None))
            .collect::<Result<Vec<_>, _>>()?;
        let types: Vec<&str> = items.iter().map(Schema::type_description).collect();
        Ok(Schema::new(
            Kind::Tuple,
            format!("[{}]", types.join(",")),
            defaults.cloned(),
            Check::Tuple {
                guard: self.scalar("array", None)?,
                items,
            },
        ))
    }

    /// An object whose keys match `key` and whose values match `value`.
    pub fn dict(
        &self,
        key: &Description,
        value: &Description,
        defaults: Option<&Defaults>,
    ) -> Result<Schema, SchemaError> {
        let key = self.compile(key, None)?;
        let value = self.compile(value, None)?;
        Ok(Schema::new(
            Kind::Dict,
            format!("dict<{},{}>", key.type_description(), value.type_description()),
            defaults.cloned(),
            Check::Dict {
                guard: self.scalar("object", None)?,
                key,
                value,
            },
        ))
    }

    /// One of a fixed set of values.
    pub fn enumeration(&self, values: &[Value], defaults: Option<&Defaults>) -> Schema {
        Schema::new(
            Kind::Enum,
            join_literals(values),
            defaults.cloned(),
            Check::Enum(values.to_vec()),
        )
    }

    /// A list of [`enumeration`](Self::enumeration) values.
    pub fn enums(
        &self,
        values: &[Value],
        defaults: Option<&Defaults>,
    ) -> Result<Schema, SchemaError> {
        let element = self.enumeration(values, None);
        self.list(&Description::Node(element), defaults)
    }

    /// The first alternative that accepts the value.
    pub fn union(
        &self,
        alternatives: &[Description],
        defaults: Option<&Defaults>,
    ) -> Result<Schema, SchemaError> {
        let alternatives = self.compile_all(alternatives, "union")?;
        let types: Vec<&str> = alternatives.iter().map(Schema::type_description).collect();
        Ok(Schema::new(
            Kind::Union,
            types.join(" | "),
            defaults.cloned(),
            Check::Union(alternatives),
        ))
    }

    /// Every part in turn, each receiving the previous part's output.
    pub fn intersection(
        &self,
        parts: &[Description],
        defaults: Option<&Defaults>,
    ) -> Result<Schema, SchemaError> {
        let parts = self.compile_all(parts, "intersection")?;
        let types: Vec<&str> = parts.iter().map(Schema::type_description).collect();
        Ok(Schema::new(
            Kind::Intersection,
            types.join(" & "),
            defaults.cloned(),
            Check::Intersection(parts),
        ))
    }

    /// `description` or `undefined`.
    pub fn optional(
        &self,
        description: &Description,
        defaults: Option<&Defaults>,
    ) -> Result<Schema, SchemaError> {
        self.union(
            &[description.clone(), Description::from("undefined")],
            defaults,
        )
    }

    /// Exactly `value`, compared with `===`.
    pub fn literal(&self, value: Value, defaults: Option<&Defaults>) -> Schema {
        Schema::new(
            Kind::Literal,
            format!("literal: {}", value.stringify()),
            defaults.cloned(),
            Check::Literal(value),
        )
    }

    /// A host object whose payload is a `T`.
    pub fn instance<T: Any>(&self, defaults: Option<&Defaults>) -> Schema {
        Schema::new(
            Kind::Instance,
            format!("instance<{}>", short_type_name::<T>()),
            defaults.cloned(),
            Check::Instance(holds::<T>),
        )
    }

    /// A schema built on first use. The thunk runs at most once.
    pub fn lazy<F, S>(&self, thunk: F) -> Schema
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Into<Schema>,
    {
        let thunk: Thunk = Arc::new(move || thunk().into());
        Schema::new(
            Kind::Lazy,
            "lazy...",
            None,
            Check::Lazy {
                thunk,
                target: OnceLock::new(),
            },
        )
    }

    /// A schema chosen per value by `selector(value, parent)`.
    pub fn dynamic<F, S>(&self, selector: F, defaults: Option<&Defaults>) -> Schema
    where
        F: Fn(&Value, Option<&Value>) -> S + Send + Sync + 'static,
        S: Into<Schema>,
    {
        let selector: Selector =
            Arc::new(move |value: &Value, parent: Option<&Value>| selector(value, parent).into());
        Schema::new(Kind::Dynamic, "dynamic...", defaults.cloned(), Check::Dynamic(selector))
    }

    fn compile_all(
        &self,
        descriptions: &[Description],
        what: &str,
    ) -> Result<Vec<Schema>, SchemaError> {
        if descriptions.is_empty() {
            return Err(SchemaError::InvalidSchema(format!("empty {what}")));
        }
        descriptions
            .iter()
            .map(|description| self.compile(description, None))
            .collect()
    }
}

fn holds<T: Any>(host: &HostObject) -> bool {
    host.is::<T>()
}

/// `type_name` without module paths: `my_crate::model::Point` → `Point`.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(index) => &full[index + 2..],
        None => full,
    }
}

fn join_literals(values: &[Value]) -> String {
    values
        .iter()
        .map(Value::stringify)
        .collect::<Vec<_>>()
        .join(" | ")
}

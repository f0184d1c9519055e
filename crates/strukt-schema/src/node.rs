//! # Schema Nodes
//!
//! A [`Schema`] is a compiled validation node: a kind, a type description
//! and the check it performs. Nodes are immutable and reference-counted, so
//! composite nodes share their children and a compiled schema can be used
//! from several threads at once.
//!
//! ## Validation
//!
//! [`Schema::validate`] takes the value and, for nodes nested in a
//! container, the container itself as `parent`. It returns the coerced
//! value (defaults applied) or a [`ValidationError`] listing every failing
//! site. Validation never mutates its input.
//!
//! ## Defaults
//!
//! A node with defaults substitutes the resolved default when the input is
//! `undefined`. Interface and dict nodes instead lay the default object
//! under the input, input keys winning.

use std::fmt;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use strukt_core::{HostObject, Object, PathSegment, Value};

use crate::aggregate::Aggregator;
use crate::defaults::Defaults;
use crate::error::{Failure, ValidationError};
use crate::registry::{Predicate, Verdict};

/// Deferred schema constructor for recursive schemas.
pub type Thunk = Arc<dyn Fn() -> Schema + Send + Sync>;

/// Schema chosen per value: `(value, parent) -> schema`.
pub type Selector = Arc<dyn Fn(&Value, Option<&Value>) -> Schema + Send + Sync>;

/// The combinator a node was built by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Scalar,
    Function,
    Object,
    Partial,
    Interface,
    List,
    Tuple,
    Dict,
    Enum,
    Union,
    Intersection,
    Literal,
    Instance,
    Lazy,
    Dynamic,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Scalar => "scalar",
            Kind::Function => "function",
            Kind::Object => "object",
            Kind::Partial => "partial",
            Kind::Interface => "interface",
            Kind::List => "list",
            Kind::Tuple => "tuple",
            Kind::Dict => "dict",
            Kind::Enum => "enum",
            Kind::Union => "union",
            Kind::Intersection => "intersection",
            Kind::Literal => "literal",
            Kind::Instance => "instance",
            Kind::Lazy => "lazy",
            Kind::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an object-like node treats keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShapeMode {
    /// Every declared key is checked; undeclared keys are rejected.
    Exact,
    /// Absent declared keys are skipped; undeclared keys are rejected.
    Partial,
    /// Only declared keys are checked; other keys pass through.
    Open,
}

pub(crate) enum Check {
    Predicate {
        predicate: Predicate,
        /// Report the node's own type even when the verdict names another.
        fixed_type: bool,
    },
    Shape {
        mode: ShapeMode,
        guard: Schema,
        fields: IndexMap<String, Schema>,
    },
    List {
        guard: Schema,
        element: Schema,
    },
    Tuple {
        guard: Schema,
        items: Vec<Schema>,
    },
    Dict {
        guard: Schema,
        key: Schema,
        value: Schema,
    },
    Enum(Vec<Value>),
    Union(Vec<Schema>),
    Intersection(Vec<Schema>),
    Literal(Value),
    Instance(fn(&HostObject) -> bool),
    Lazy {
        thunk: Thunk,
        target: OnceLock<Schema>,
    },
    Dynamic(Selector),
}

pub(crate) struct Node {
    kind: Kind,
    type_desc: String,
    defaults: Option<Defaults>,
    check: Check,
}

/// A compiled, shareable validation node.
#[derive(Clone)]
pub struct Schema(Arc<Node>);

impl Schema {
    pub(crate) fn new(
        kind: Kind,
        type_desc: impl Into<String>,
        defaults: Option<Defaults>,
        check: Check,
    ) -> Self {
        Schema(Arc::new(Node {
            kind,
            type_desc: type_desc.into(),
            defaults,
            check,
        }))
    }

    /// The node's kind. A resolved lazy node reports its target's.
    pub fn kind(&self) -> Kind {
        match self.lazy_target() {
            Some(target) => target.kind(),
            None => self.0.kind,
        }
    }

    /// The node's type description, as quoted in error messages. A resolved
    /// lazy node reports its target's.
    pub fn type_description(&self) -> &str {
        match self.lazy_target() {
            Some(target) => target.type_description(),
            None => &self.0.type_desc,
        }
    }

    pub fn defaults(&self) -> Option<&Defaults> {
        self.0.defaults.as_ref()
    }

    /// Whether two handles share the same node.
    pub fn ptr_eq(&self, other: &Schema) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn lazy_target(&self) -> Option<&Schema> {
        match &self.0.check {
            Check::Lazy { target, .. } => target.get(),
            _ => None,
        }
    }

    /// Validate `value`, with `parent` the enclosing container if any.
    pub fn validate(
        &self,
        value: &Value,
        parent: Option<&Value>,
    ) -> Result<Value, ValidationError> {
        let node = &*self.0;
        let Some(defaults) = &node.defaults else {
            return self.run(value, parent);
        };
        match &node.check {
            Check::Shape {
                mode: ShapeMode::Open,
                ..
            }
            | Check::Dict { .. } => self.run(&defaults.merge_under(value), parent),
            _ if value.is_undefined() => self.run(&defaults.resolve(parent), parent),
            _ => self.run(value, parent),
        }
    }

    fn run(&self, value: &Value, parent: Option<&Value>) -> Result<Value, ValidationError> {
        match &self.0.check {
            Check::Predicate {
                predicate,
                fixed_type,
            } => self.check_predicate(predicate, *fixed_type, value, parent),
            Check::Shape {
                mode,
                guard,
                fields,
            } => {
                self.guard(guard, value)?;
                self.check_shape(*mode, fields, value)
            }
            Check::List { guard, element } => {
                self.guard(guard, value)?;
                self.check_list(element, value)
            }
            Check::Tuple { guard, items } => {
                self.guard(guard, value)?;
                self.check_tuple(items, value)
            }
            Check::Dict { guard, key, value: item } => {
                self.guard(guard, value)?;
                self.check_dict(key, item, value)
            }
            Check::Enum(values) => {
                if values.iter().any(|v| v.same_value_zero(value)) {
                    Ok(value.clone())
                } else {
                    Err(self.mismatch(value))
                }
            }
            Check::Union(alternatives) => {
                let mut first = None;
                for alternative in alternatives {
                    match alternative.validate(value, parent) {
                        Ok(coerced) => return Ok(coerced),
                        Err(err) => {
                            first.get_or_insert(err);
                        }
                    }
                }
                let mut err = first.unwrap_or_else(|| self.mismatch(value));
                err.retype(&self.0.type_desc);
                Err(err)
            }
            Check::Intersection(parts) => {
                let mut current = value.clone();
                for part in parts {
                    match part.validate(&current, parent) {
                        Ok(coerced) => current = coerced,
                        Err(mut err) => {
                            err.retype(&self.0.type_desc);
                            return Err(err);
                        }
                    }
                }
                Ok(current)
            }
            Check::Literal(expected) => {
                if expected.strict_equals(value) {
                    Ok(value.clone())
                } else {
                    Err(self.mismatch(value))
                }
            }
            Check::Instance(accepts) => match value.as_host() {
                Some(host) if accepts(host) => Ok(value.clone()),
                _ => Err(self.mismatch(value)),
            },
            Check::Lazy { thunk, target } => {
                let target = target.get_or_init(|| {
                    let resolved = thunk();
                    tracing::trace!(
                        kind = %resolved.kind(),
                        type_desc = resolved.type_description(),
                        "resolved lazy schema"
                    );
                    resolved
                });
                target.validate(value, parent)
            }
            Check::Dynamic(selector) => selector(value, parent).validate(value, parent),
        }
    }

    /// A root failure for `value` reporting this node's type.
    fn mismatch(&self, value: &Value) -> ValidationError {
        ValidationError::new(Failure::new(value.clone(), self.0.type_desc.as_str()))
    }

    /// Run a container guard; its failure is reported under this node's type.
    fn guard(&self, guard: &Schema, value: &Value) -> Result<(), ValidationError> {
        guard.validate(value, None).map(drop).map_err(|mut err| {
            err.retype_first(&self.0.type_desc);
            err
        })
    }

    fn check_predicate(
        &self,
        predicate: &Predicate,
        fixed_type: bool,
        value: &Value,
        parent: Option<&Value>,
    ) -> Result<Value, ValidationError> {
        let failure = match predicate(value, parent) {
            Verdict::Pass => return Ok(value.clone()),
            Verdict::Fail => Failure::new(value.clone(), self.0.type_desc.as_str()),
            Verdict::Reason(reason) => Failure {
                reason: Some(reason),
                ..Failure::new(value.clone(), self.0.type_desc.as_str())
            },
            Verdict::Detailed(patch) => {
                let expected = match patch.expected {
                    Some(expected) if !fixed_type => expected,
                    _ => self.0.type_desc.clone(),
                };
                Failure {
                    data: value.clone(),
                    path: patch.path,
                    value: patch.value.unwrap_or_else(|| value.clone()),
                    reason: patch.reason,
                    expected,
                }
            }
        };
        Err(ValidationError::new(failure))
    }

    fn check_shape(
        &self,
        mode: ShapeMode,
        fields: &IndexMap<String, Schema>,
        value: &Value,
    ) -> Result<Value, ValidationError> {
        let Some(input) = value.as_object() else {
            return Err(self.mismatch(value));
        };
        let defaults = self.0.defaults.as_ref();
        let mut aggregator = Aggregator::new(value);

        if mode == ShapeMode::Open {
            let mut output = input.clone();
            for (key, field) in fields {
                let present = input.get(key);
                let candidate = field_value(present, defaults, key, value);
                match field.validate(&candidate, Some(value)) {
                    Ok(coerced) => {
                        if present.is_some() || !coerced.is_undefined() {
                            output.insert(key.clone(), coerced);
                        }
                    }
                    Err(err) => aggregator.absorb(PathSegment::Key(key.clone()), err),
                }
            }
            return aggregator.finish(Value::Object(output));
        }

        let keys = input
            .keys()
            .chain(fields.keys().filter(|key| !input.contains_key(*key)));
        let mut output = Object::new();
        for key in keys {
            let present = input.get(key);
            let Some(field) = fields.get(key) else {
                let mut failure = Failure::new(
                    present.cloned().unwrap_or_default(),
                    "undefined",
                );
                failure.path = vec![PathSegment::Key(key.clone())];
                failure.data = value.clone();
                aggregator.push(failure);
                continue;
            };
            let candidate = field_value(present, defaults, key, value);
            if mode == ShapeMode::Partial && present.is_none() && candidate.is_undefined() {
                continue;
            }
            match field.validate(&candidate, Some(value)) {
                Ok(coerced) => {
                    if present.is_some() || !coerced.is_undefined() {
                        output.insert(key.clone(), coerced);
                    }
                }
                Err(err) => aggregator.absorb(PathSegment::Key(key.clone()), err),
            }
        }
        aggregator.finish(Value::Object(output))
    }

    fn check_list(&self, element: &Schema, value: &Value) -> Result<Value, ValidationError> {
        let Some(items) = value.as_array() else {
            return Err(self.mismatch(value));
        };
        let mut aggregator = Aggregator::new(value);
        let mut output = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match element.validate(item, Some(value)) {
                Ok(coerced) => output.push(coerced),
                Err(err) => aggregator.absorb(PathSegment::Index(index), err),
            }
        }
        aggregator.finish(Value::Array(output))
    }

    fn check_tuple(&self, schemas: &[Schema], value: &Value) -> Result<Value, ValidationError> {
        let Some(items) = value.as_array() else {
            return Err(self.mismatch(value));
        };
        let mut aggregator = Aggregator::new(value);
        let length = items.len().max(schemas.len());
        let mut output = Vec::with_capacity(length);
        for index in 0..length {
            let item = items.get(index).cloned().unwrap_or_default();
            let Some(schema) = schemas.get(index) else {
                let mut failure = Failure::new(item, "undefined");
                failure.path = vec![PathSegment::Index(index)];
                failure.data = value.clone();
                aggregator.push(failure);
                continue;
            };
            match schema.validate(&item, Some(value)) {
                Ok(coerced) => output.push(coerced),
                Err(err) => aggregator.absorb(PathSegment::Index(index), err),
            }
        }
        aggregator.finish(Value::Array(output))
    }

    fn check_dict(
        &self,
        key: &Schema,
        item: &Schema,
        value: &Value,
    ) -> Result<Value, ValidationError> {
        let Some(input) = value.as_object() else {
            return Err(self.mismatch(value));
        };
        let mut aggregator = Aggregator::new(value);
        let mut output = Object::new();
        for (name, entry) in input {
            let coerced_key = match key.validate(&Value::String(name.clone()), Some(value)) {
                Ok(coerced) => match coerced {
                    Value::String(s) => s,
                    other => other.to_js_string(),
                },
                Err(err) => {
                    aggregator.absorb(PathSegment::Key(name.clone()), err);
                    continue;
                }
            };
            match item.validate(entry, Some(value)) {
                Ok(coerced) => {
                    output.insert(coerced_key, coerced);
                }
                Err(err) => aggregator.absorb(PathSegment::Key(coerced_key), err),
            }
        }
        aggregator.finish(Value::Object(output))
    }
}

/// The value to check for a declared key: the present value, or the key's
/// default when it is absent or `undefined`.
fn field_value(
    present: Option<&Value>,
    defaults: Option<&Defaults>,
    key: &str,
    parent: &Value,
) -> Value {
    match (present, defaults) {
        (Some(v), _) if !v.is_undefined() => v.clone(),
        (_, Some(defaults)) => defaults.resolve_field(key, parent),
        _ => Value::Undefined,
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("kind", &self.kind())
            .field("type", &self.type_description())
            .finish()
    }
}

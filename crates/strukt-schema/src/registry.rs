//! # Type Registry
//!
//! Named primitive validators. A scalar name in a schema (`"string"`,
//! `"entity-id"`) is resolved against a [`TypeRegistry`] when the schema is
//! compiled. The registry is an explicit value passed to the compiler, so
//! two factories with different custom types never interfere.
//!
//! ## Built-in Types
//!
//! - `any`: every value except `undefined`.
//! - one entry per classic [`TypeTag`] name, accepting exactly the values
//!   that classify to it.
//! - `date`: a date whose time value is not NaN.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use strukt_core::{classify, PathSegment, TypeTag, Value};

/// Signature of a custom predicate: `(value, parent) -> Verdict`.
pub type Predicate = Arc<dyn Fn(&Value, Option<&Value>) -> Verdict + Send + Sync>;

/// The result of a predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// The value is acceptable.
    Pass,
    /// The value is rejected without explanation.
    Fail,
    /// The value is rejected; the string becomes the failure's `reason`.
    Reason(String),
    /// The value is rejected; the patch overrides parts of the failure.
    Detailed(ErrorPatch),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

impl From<bool> for Verdict {
    fn from(ok: bool) -> Self {
        if ok {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}

impl From<&str> for Verdict {
    fn from(reason: &str) -> Self {
        Verdict::Reason(reason.to_string())
    }
}

impl From<String> for Verdict {
    fn from(reason: String) -> Self {
        Verdict::Reason(reason)
    }
}

impl From<ErrorPatch> for Verdict {
    fn from(patch: ErrorPatch) -> Self {
        Verdict::Detailed(patch)
    }
}

/// Overrides a predicate may apply to the failure it reports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorPatch {
    /// Path relative to the checked value.
    pub path: Vec<PathSegment>,
    pub reason: Option<String>,
    /// Replaces the expected type (ignored for registry scalars, which always
    /// report their own name).
    pub expected: Option<String>,
    /// Replaces the reported failing value.
    pub value: Option<Value>,
}

impl ErrorPatch {
    pub fn reason(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn at(mut self, path: impl IntoIterator<Item = PathSegment>) -> Self {
        self.path = path.into_iter().collect();
        self
    }
}

/// Tag names registered as built-in scalars (in addition to `any` and
/// `date`).
const BUILTIN_TAGS: [TypeTag; 28] = [
    TypeTag::Arguments,
    TypeTag::Array,
    TypeTag::Boolean,
    TypeTag::Buffer,
    TypeTag::Error,
    TypeTag::Float32Array,
    TypeTag::Float64Array,
    TypeTag::Function,
    TypeTag::GeneratorFunction,
    TypeTag::Int16Array,
    TypeTag::Int32Array,
    TypeTag::Int8Array,
    TypeTag::Map,
    TypeTag::Null,
    TypeTag::Number,
    TypeTag::Object,
    TypeTag::Promise,
    TypeTag::RegExp,
    TypeTag::Set,
    TypeTag::String,
    TypeTag::Symbol,
    TypeTag::Uint16Array,
    TypeTag::Uint32Array,
    TypeTag::Uint8Array,
    TypeTag::Uint8ClampedArray,
    TypeTag::Undefined,
    TypeTag::WeakMap,
    TypeTag::WeakSet,
];

/// Mapping from scalar type name to predicate.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<String, Predicate>,
}

impl TypeRegistry {
    /// A registry with no entries. Object, list, tuple and dict schemas
    /// need `object`/`array` entries to compile.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in types.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("any", |value: &Value, _: Option<&Value>| {
            Verdict::from(!value.is_undefined())
        });
        for tag in BUILTIN_TAGS.iter().cloned() {
            let name = tag.as_str().to_string();
            registry.register(name, move |value: &Value, _: Option<&Value>| {
                Verdict::from(classify(value) == tag)
            });
        }
        registry.register("date", |value: &Value, _: Option<&Value>| {
            Verdict::from(matches!(value, Value::Date(Some(_))))
        });
        registry
    }

    /// Add or replace a type.
    pub fn register<F>(&mut self, name: impl Into<String>, predicate: F) -> &mut Self
    where
        F: Fn(&Value, Option<&Value>) -> Verdict + Send + Sync + 'static,
    {
        self.types.insert(name.into(), Arc::new(predicate));
        self
    }

    /// Add or replace a type from an existing predicate.
    pub fn register_predicate(
        &mut self,
        name: impl Into<String>,
        predicate: Predicate,
    ) -> &mut Self {
        self.types.insert(name.into(), predicate);
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value, Option<&Value>) -> Verdict + Send + Sync + 'static,
    {
        self.register(name, predicate);
        self
    }

    /// Merge `other` into `self`; entries in `other` win.
    pub fn extend(&mut self, other: &TypeRegistry) -> &mut Self {
        for (name, predicate) in &other.types {
            self.types.insert(name.clone(), Arc::clone(predicate));
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Predicate> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered names, sorted alphabetically.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.names())
            .finish()
    }
}

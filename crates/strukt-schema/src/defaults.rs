//! # Defaults
//!
//! Values substituted for `undefined` input. A default never runs for a
//! key that is present with a non-`undefined` value.
//!
//! For object-like schemas the default is looked up per key: a
//! [`Defaults::Fields`] entry (or a property of a [`Defaults::Value`]
//! object) supplies the key's default, and a computed default receives the
//! parent object being validated.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use strukt_core::Value;

/// Signature of a computed default: `(parent) -> value`.
pub type DefaultFn = Arc<dyn Fn(Option<&Value>) -> Value + Send + Sync>;

/// A default value, a value-producing function, or per-key defaults.
#[derive(Clone)]
pub enum Defaults {
    /// A literal default. When it is an object its properties double as
    /// per-key defaults.
    Value(Value),
    /// A computed default, called with the parent value (if any).
    Compute(DefaultFn),
    /// Per-key defaults for object-like schemas.
    Fields(IndexMap<String, Defaults>),
}

impl Defaults {
    pub fn value(value: impl Into<Value>) -> Self {
        Defaults::Value(value.into())
    }

    pub fn compute<F>(f: F) -> Self
    where
        F: Fn(Option<&Value>) -> Value + Send + Sync + 'static,
    {
        Defaults::Compute(Arc::new(f))
    }

    pub fn fields<K: Into<String>>(entries: impl IntoIterator<Item = (K, Defaults)>) -> Self {
        Defaults::Fields(entries.into_iter().map(|(k, d)| (k.into(), d)).collect())
    }

    /// Resolve to a concrete value. Per-key tables resolve to an object of
    /// their literal entries; computed entries are left out so that they
    /// run per key, with the parent object.
    pub fn resolve(&self, parent: Option<&Value>) -> Value {
        match self {
            Defaults::Value(value) => value.clone(),
            Defaults::Compute(f) => f(parent),
            Defaults::Fields(fields) => Value::Object(
                fields
                    .iter()
                    .filter(|(_, d)| !matches!(d, Defaults::Compute(_)))
                    .map(|(k, d)| (k.clone(), d.resolve(parent)))
                    .collect(),
            ),
        }
    }

    /// Resolve the default for `key` of `parent`, or `undefined` when there
    /// is none.
    pub fn resolve_field(&self, key: &str, parent: &Value) -> Value {
        match self {
            Defaults::Fields(fields) => fields
                .get(key)
                .map_or(Value::Undefined, |d| d.resolve(Some(parent))),
            Defaults::Value(value) => value.get(key).cloned().unwrap_or_default(),
            Defaults::Compute(_) => Value::Undefined,
        }
    }

    /// Lay the resolved default object under `value`: keys of `value` win.
    /// Non-object defaults only replace an `undefined` value.
    pub fn merge_under(&self, value: &Value) -> Value {
        match (self.resolve(None), value) {
            (Value::Object(mut base), Value::Object(own)) => {
                for (k, v) in own {
                    base.insert(k.clone(), v.clone());
                }
                Value::Object(base)
            }
            (resolved, Value::Undefined) => resolved,
            (_, own) => own.clone(),
        }
    }
}

impl fmt::Debug for Defaults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Defaults::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Defaults::Compute(_) => f.write_str("Compute(<function>)"),
            Defaults::Fields(fields) => f.debug_tuple("Fields").field(fields).finish(),
        }
    }
}

impl From<Value> for Defaults {
    fn from(value: Value) -> Self {
        Defaults::Value(value)
    }
}

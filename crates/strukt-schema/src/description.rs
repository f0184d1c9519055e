//! # Schema Descriptions
//!
//! A [`Description`] is the declarative input to the compiler: a shorthand
//! string, a list, a shape (key → description), a custom predicate, or an
//! already compiled [`Schema`] or [`Struct`].
//!
//! Descriptions convert from Rust literals (`"string?"`, `vec![...]`,
//! key/value arrays) and from `serde_json::Value`, so schemas can be read
//! from JSON or YAML files. JSON values with no schema meaning (numbers,
//! booleans, null) are kept as [`Description::Value`] and rejected when
//! compiled.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use strukt_core::Value;

use crate::factory::Struct;
use crate::node::Schema;
use crate::registry::{Predicate, Verdict};

/// Declarative schema expression.
#[derive(Clone)]
pub enum Description {
    /// Shorthand: a type name, `T?`, `A | B`, or `A & B`.
    Shorthand(String),
    /// One item: a list of that item. More: a tuple.
    Items(Vec<Description>),
    /// An object shape, in declaration order.
    Shape(IndexMap<String, Description>),
    /// A custom predicate.
    Predicate(Predicate),
    /// A compiled schema, used as-is.
    Node(Schema),
    /// A compiled struct; its node is used as-is.
    Struct(Box<Struct>),
    /// A value with no schema meaning.
    Value(Value),
}

impl Description {
    /// A custom predicate description.
    pub fn function<F>(predicate: F) -> Self
    where
        F: Fn(&Value, Option<&Value>) -> Verdict + Send + Sync + 'static,
    {
        Description::Predicate(Arc::new(predicate))
    }

    /// An object shape from key/description pairs.
    pub fn shape<K, D>(entries: impl IntoIterator<Item = (K, D)>) -> Self
    where
        K: Into<String>,
        D: Into<Description>,
    {
        Description::Shape(
            entries
                .into_iter()
                .map(|(k, d)| (k.into(), d.into()))
                .collect(),
        )
    }

    /// A list or tuple description from items.
    pub fn items<D: Into<Description>>(items: impl IntoIterator<Item = D>) -> Self {
        Description::Items(items.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Description {
    /// String conversion of the description, as quoted in
    /// `Invalid schema: ...` messages.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Description::Shorthand(s) => f.write_str(s),
            Description::Items(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                f.write_str(&parts.join(","))
            }
            Description::Shape(_) => f.write_str("[object Object]"),
            Description::Predicate(_) => f.write_str("<function>"),
            Description::Node(schema) => f.write_str(schema.type_description()),
            Description::Struct(st) => f.write_str(st.type_description()),
            Description::Value(value) => f.write_str(&value.to_js_string()),
        }
    }
}

impl fmt::Debug for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Description::Shorthand(s) => f.debug_tuple("Shorthand").field(s).finish(),
            Description::Items(items) => f.debug_tuple("Items").field(items).finish(),
            Description::Shape(shape) => f.debug_tuple("Shape").field(shape).finish(),
            Description::Predicate(_) => f.write_str("Predicate(<function>)"),
            Description::Node(schema) => f.debug_tuple("Node").field(schema).finish(),
            Description::Struct(st) => f.debug_tuple("Struct").field(st).finish(),
            Description::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

impl From<&str> for Description {
    fn from(s: &str) -> Self {
        Description::Shorthand(s.to_string())
    }
}

impl From<String> for Description {
    fn from(s: String) -> Self {
        Description::Shorthand(s)
    }
}

impl From<Vec<Description>> for Description {
    fn from(items: Vec<Description>) -> Self {
        Description::Items(items)
    }
}

impl<const N: usize> From<[&str; N]> for Description {
    fn from(items: [&str; N]) -> Self {
        Description::items(items)
    }
}

impl<const N: usize> From<[Description; N]> for Description {
    fn from(items: [Description; N]) -> Self {
        Description::Items(items.into())
    }
}

impl<K: Into<String>, D: Into<Description>, const N: usize> From<[(K, D); N]> for Description {
    fn from(entries: [(K, D); N]) -> Self {
        Description::shape(entries)
    }
}

impl From<IndexMap<String, Description>> for Description {
    fn from(shape: IndexMap<String, Description>) -> Self {
        Description::Shape(shape)
    }
}

impl From<Schema> for Description {
    fn from(schema: Schema) -> Self {
        Description::Node(schema)
    }
}

impl From<&Schema> for Description {
    fn from(schema: &Schema) -> Self {
        Description::Node(schema.clone())
    }
}

impl From<Struct> for Description {
    fn from(st: Struct) -> Self {
        Description::Struct(Box::new(st))
    }
}

impl From<&Struct> for Description {
    fn from(st: &Struct) -> Self {
        Description::Struct(Box::new(st.clone()))
    }
}

impl From<serde_json::Value> for Description {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::String(s) => Description::Shorthand(s),
            serde_json::Value::Array(items) => {
                Description::Items(items.into_iter().map(Description::from).collect())
            }
            serde_json::Value::Object(map) => Description::Shape(
                map.into_iter()
                    .map(|(k, v)| (k, Description::from(v)))
                    .collect(),
            ),
            other => Description::Value(Value::from(other)),
        }
    }
}

impl From<&serde_json::Value> for Description {
    fn from(json: &serde_json::Value) -> Self {
        Description::from(json.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_structure() {
        let d = Description::from(json!({"a": "string", "b": ["number"], "c": 5}));
        let Description::Shape(shape) = d else {
            panic!("expected a shape");
        };
        let keys: Vec<&str> = shape.keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "b", "c"]);
        assert!(matches!(shape["a"], Description::Shorthand(ref s) if s == "string"));
        assert!(matches!(shape["b"], Description::Items(ref items) if items.len() == 1));
        assert!(matches!(shape["c"], Description::Value(Value::Number(n)) if n == 5.0));
    }

    #[test]
    fn test_display_matches_string_conversion() {
        assert_eq!(Description::from("number?").to_string(), "number?");
        assert_eq!(
            Description::items(["string", "number"]).to_string(),
            "string,number"
        );
        assert_eq!(Description::shape([("a", "string")]).to_string(), "[object Object]");
        assert_eq!(Description::from(json!(5)).to_string(), "5");
        assert_eq!(Description::from(json!(null)).to_string(), "null");
    }
}

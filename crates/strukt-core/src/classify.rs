//! # Value Classifier
//!
//! Maps a [`Value`] onto a canonical [`TypeTag`]. This is the single
//! dispatch point behind every built-in type name (`"string"`, `"date"`,
//! `"uint8array"`, ...), so the rules here decide what each name accepts.
//!
//! ## Resolution Order
//!
//! 1. Primitives and the structural variants map directly.
//! 2. Host objects are checked by class tag for the well-known host
//!    classes (`Promise`, `WeakMap`, `WeakSet`, `Symbol`).
//! 3. Host objects flagged as generators classify as `generator`.
//! 4. Otherwise the class tag is lower-cased with whitespace stripped
//!    (`"Map Iterator"` → `mapiterator`); unknown names become
//!    [`TypeTag::Other`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::{TypedArray, Value};

/// Canonical shape category of a runtime value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum TypeTag {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Symbol,
    Array,
    Object,
    Arguments,
    Buffer,
    Function,
    GeneratorFunction,
    Date,
    Error,
    RegExp,
    Map,
    Set,
    WeakMap,
    WeakSet,
    Promise,
    Int8Array,
    Uint8Array,
    Uint8ClampedArray,
    Int16Array,
    Uint16Array,
    Int32Array,
    Uint32Array,
    Float32Array,
    Float64Array,
    Generator,
    MapIterator,
    SetIterator,
    StringIterator,
    ArrayIterator,
    /// Class-tag fallback, already lower-cased with whitespace removed.
    Other(String),
}

impl TypeTag {
    /// Every named (non-fallback) tag.
    pub const NAMED: [TypeTag; 34] = [
        TypeTag::Undefined,
        TypeTag::Null,
        TypeTag::Boolean,
        TypeTag::Number,
        TypeTag::String,
        TypeTag::Symbol,
        TypeTag::Array,
        TypeTag::Object,
        TypeTag::Arguments,
        TypeTag::Buffer,
        TypeTag::Function,
        TypeTag::GeneratorFunction,
        TypeTag::Date,
        TypeTag::Error,
        TypeTag::RegExp,
        TypeTag::Map,
        TypeTag::Set,
        TypeTag::WeakMap,
        TypeTag::WeakSet,
        TypeTag::Promise,
        TypeTag::Int8Array,
        TypeTag::Uint8Array,
        TypeTag::Uint8ClampedArray,
        TypeTag::Int16Array,
        TypeTag::Uint16Array,
        TypeTag::Int32Array,
        TypeTag::Uint32Array,
        TypeTag::Float32Array,
        TypeTag::Float64Array,
        TypeTag::Generator,
        TypeTag::MapIterator,
        TypeTag::SetIterator,
        TypeTag::StringIterator,
        TypeTag::ArrayIterator,
    ];

    /// The lower-case name used in schema strings.
    pub fn as_str(&self) -> &str {
        match self {
            TypeTag::Undefined => "undefined",
            TypeTag::Null => "null",
            TypeTag::Boolean => "boolean",
            TypeTag::Number => "number",
            TypeTag::String => "string",
            TypeTag::Symbol => "symbol",
            TypeTag::Array => "array",
            TypeTag::Object => "object",
            TypeTag::Arguments => "arguments",
            TypeTag::Buffer => "buffer",
            TypeTag::Function => "function",
            TypeTag::GeneratorFunction => "generatorfunction",
            TypeTag::Date => "date",
            TypeTag::Error => "error",
            TypeTag::RegExp => "regexp",
            TypeTag::Map => "map",
            TypeTag::Set => "set",
            TypeTag::WeakMap => "weakmap",
            TypeTag::WeakSet => "weakset",
            TypeTag::Promise => "promise",
            TypeTag::Int8Array => "int8array",
            TypeTag::Uint8Array => "uint8array",
            TypeTag::Uint8ClampedArray => "uint8clampedarray",
            TypeTag::Int16Array => "int16array",
            TypeTag::Uint16Array => "uint16array",
            TypeTag::Int32Array => "int32array",
            TypeTag::Uint32Array => "uint32array",
            TypeTag::Float32Array => "float32array",
            TypeTag::Float64Array => "float64array",
            TypeTag::Generator => "generator",
            TypeTag::MapIterator => "mapiterator",
            TypeTag::SetIterator => "setiterator",
            TypeTag::StringIterator => "stringiterator",
            TypeTag::ArrayIterator => "arrayiterator",
            TypeTag::Other(name) => name,
        }
    }

    /// Parse a tag name. Unknown names become [`TypeTag::Other`].
    pub fn from_name(name: &str) -> TypeTag {
        TypeTag::NAMED
            .iter()
            .find(|tag| tag.as_str() == name)
            .cloned()
            .unwrap_or_else(|| TypeTag::Other(name.to_string()))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TypeTag> for String {
    fn from(tag: TypeTag) -> Self {
        tag.as_str().to_string()
    }
}

impl From<String> for TypeTag {
    fn from(name: String) -> Self {
        TypeTag::from_name(&name)
    }
}

/// Classify a value. Total: every value has exactly one tag.
pub fn classify(value: &Value) -> TypeTag {
    match value {
        Value::Undefined => TypeTag::Undefined,
        Value::Null => TypeTag::Null,
        Value::Bool(_) => TypeTag::Boolean,
        Value::Number(_) => TypeTag::Number,
        Value::String(_) => TypeTag::String,
        Value::Symbol(_) => TypeTag::Symbol,
        Value::Function(func) if func.is_generator() => TypeTag::GeneratorFunction,
        Value::Function(_) => TypeTag::Function,
        Value::Array(_) => TypeTag::Array,
        Value::Buffer(_) => TypeTag::Buffer,
        Value::Arguments(_) => TypeTag::Arguments,
        Value::Date(_) => TypeTag::Date,
        Value::Error(_) => TypeTag::Error,
        Value::RegExp(_) => TypeTag::RegExp,
        Value::Map(_) => TypeTag::Map,
        Value::Set(_) => TypeTag::Set,
        Value::TypedArray(array) => typed_array_tag(array),
        Value::Object(_) => TypeTag::Object,
        Value::Host(host) => match host.class_tag() {
            "Symbol" => TypeTag::Symbol,
            "Promise" => TypeTag::Promise,
            "WeakMap" => TypeTag::WeakMap,
            "WeakSet" => TypeTag::WeakSet,
            _ if host.is_generator() => TypeTag::Generator,
            tag => class_tag_fallback(tag),
        },
    }
}

fn typed_array_tag(array: &TypedArray) -> TypeTag {
    match array {
        TypedArray::Int8(_) => TypeTag::Int8Array,
        TypedArray::Uint8(_) => TypeTag::Uint8Array,
        TypedArray::Uint8Clamped(_) => TypeTag::Uint8ClampedArray,
        TypedArray::Int16(_) => TypeTag::Int16Array,
        TypedArray::Uint16(_) => TypeTag::Uint16Array,
        TypedArray::Int32(_) => TypeTag::Int32Array,
        TypedArray::Uint32(_) => TypeTag::Uint32Array,
        TypedArray::Float32(_) => TypeTag::Float32Array,
        TypedArray::Float64(_) => TypeTag::Float64Array,
    }
}

fn class_tag_fallback(tag: &str) -> TypeTag {
    let name: String = tag
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    TypeTag::from_name(&name)
}

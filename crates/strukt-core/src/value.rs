//! # Dynamic Value Model
//!
//! [`Value`] is the runtime value a schema is checked against. It models the
//! full set of shapes a loosely typed caller can hand over, not just the
//! JSON subset, so that type names such as `date`, `regexp`, `map` or
//! `uint8array` have something concrete to match.
//!
//! ## Identity
//!
//! Owned values have no identity. Structural comparison is `==`
//! ([`PartialEq`]); reference-style comparison (`===`) is
//! [`Value::strict_equals`], under which only primitives, host callables and
//! host objects can ever be equal.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

/// Insertion-ordered string-keyed map backing [`Value::Object`].
pub type Object = IndexMap<String, Value>;

/// Signature of a host callable stored in [`Value::Function`].
pub type NativeFn = dyn Fn(&[Value]) -> Value + Send + Sync;

/// A dynamically typed runtime value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// The absence of a value. Distinct from `Null`.
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// A symbol, identified by its description.
    Symbol(String),
    Array(Vec<Value>),
    Object(Object),
    /// An arguments list captured from a call site.
    Arguments(Vec<Value>),
    /// A date; `None` is an invalid date (its time value is NaN).
    Date(Option<DateTime<Utc>>),
    RegExp(RegExp),
    Error(ErrorValue),
    /// Ordered key/value entries. Keys may be any value.
    Map(Vec<(Value, Value)>),
    Set(Vec<Value>),
    /// Raw bytes.
    Buffer(Vec<u8>),
    TypedArray(TypedArray),
    Function(Function),
    /// An opaque object owned by the host.
    Host(HostObject),
}

/// A regular expression literal, kept as source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegExp {
    pub source: String,
    pub flags: String,
}

impl RegExp {
    pub fn new(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            flags: flags.into(),
        }
    }
}

/// An error object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorValue {
    pub name: String,
    pub message: String,
}

impl ErrorValue {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// A numeric typed array.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedArray {
    Int8(Vec<i8>),
    Uint8(Vec<u8>),
    Uint8Clamped(Vec<u8>),
    Int16(Vec<i16>),
    Uint16(Vec<u16>),
    Int32(Vec<i32>),
    Uint32(Vec<u32>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl TypedArray {
    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            TypedArray::Int8(v) => v.len(),
            TypedArray::Uint8(v) | TypedArray::Uint8Clamped(v) => v.len(),
            TypedArray::Int16(v) => v.len(),
            TypedArray::Uint16(v) => v.len(),
            TypedArray::Int32(v) => v.len(),
            TypedArray::Uint32(v) => v.len(),
            TypedArray::Float32(v) => v.len(),
            TypedArray::Float64(v) => v.len(),
        }
    }

    /// Returns true if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements widened to `f64`, in order.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            TypedArray::Int8(v) => v.iter().map(|&x| f64::from(x)).collect(),
            TypedArray::Uint8(v) | TypedArray::Uint8Clamped(v) => {
                v.iter().map(|&x| f64::from(x)).collect()
            }
            TypedArray::Int16(v) => v.iter().map(|&x| f64::from(x)).collect(),
            TypedArray::Uint16(v) => v.iter().map(|&x| f64::from(x)).collect(),
            TypedArray::Int32(v) => v.iter().map(|&x| f64::from(x)).collect(),
            TypedArray::Uint32(v) => v.iter().map(|&x| f64::from(x)).collect(),
            TypedArray::Float32(v) => v.iter().map(|&x| f64::from(x)).collect(),
            TypedArray::Float64(v) => v.clone(),
        }
    }
}

/// A host callable.
///
/// Two `Function`s are equal only if they share the same underlying closure.
#[derive(Clone)]
pub struct Function {
    name: String,
    generator: bool,
    call: Arc<NativeFn>,
}

impl Function {
    /// Wrap a closure as a plain function.
    pub fn new(
        name: impl Into<String>,
        call: impl Fn(&[Value]) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            generator: false,
            call: Arc::new(call),
        }
    }

    /// Wrap a closure as a generator function.
    pub fn generator(
        name: impl Into<String>,
        call: impl Fn(&[Value]) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            generator: true,
            ..Self::new(name, call)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_generator(&self) -> bool {
        self.generator
    }

    /// Invoke the function.
    pub fn call(&self, args: &[Value]) -> Value {
        (self.call)(args)
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.call, &other.call)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("generator", &self.generator)
            .finish_non_exhaustive()
    }
}

/// An opaque object owned by the host, carrying a Rust payload.
///
/// The class tag plays the role of `Object.prototype.toString`'s
/// `[object <Tag>]`: it is what the classifier falls back to when no other
/// rule matches. Plain class instances use the tag `"Object"`.
#[derive(Clone)]
pub struct HostObject {
    class_tag: String,
    generator: bool,
    type_name: &'static str,
    payload: Arc<dyn Any + Send + Sync>,
}

impl HostObject {
    /// Wrap a payload as a plain class instance.
    pub fn new<T: Any + Send + Sync>(payload: T) -> Self {
        Self::tagged("Object", payload)
    }

    /// Wrap a payload under an explicit class tag (e.g. `"Promise"`,
    /// `"WeakMap"`, `"Map Iterator"`).
    pub fn tagged<T: Any + Send + Sync>(class_tag: impl Into<String>, payload: T) -> Self {
        Self {
            class_tag: class_tag.into(),
            generator: false,
            type_name: std::any::type_name::<T>(),
            payload: Arc::new(payload),
        }
    }

    /// Wrap a payload as a generator object (one exposing `next`, `throw`
    /// and `return`).
    pub fn generator<T: Any + Send + Sync>(payload: T) -> Self {
        Self {
            generator: true,
            ..Self::tagged("Generator", payload)
        }
    }

    pub fn class_tag(&self) -> &str {
        &self.class_tag
    }

    pub fn is_generator(&self) -> bool {
        self.generator
    }

    /// Returns true if the payload is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.payload.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &HostObject) -> bool {
        Arc::ptr_eq(&self.payload, &other.payload)
    }
}

impl PartialEq for HostObject {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostObject")
            .field("class_tag", &self.class_tag)
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

impl Value {
    /// Build an object from key/value pairs, preserving order.
    pub fn object<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build an array from anything convertible to values.
    pub fn array<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }

    /// A valid date at the given instant.
    pub fn date(at: DateTime<Utc>) -> Self {
        Value::Date(Some(at))
    }

    /// An invalid date.
    pub fn invalid_date() -> Self {
        Value::Date(None)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_host(&self) -> Option<&HostObject> {
        match self {
            Value::Host(host) => Some(host),
            _ => None,
        }
    }

    /// Look up an own property of an object. Any other value has none.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// `===`: primitives compare by value (NaN is unequal to itself),
    /// callables and host objects by identity. Every other compound value
    /// is a fresh allocation and never strictly equal to anything.
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) | (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Host(a), Value::Host(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// SameValueZero, the comparison used by array inclusion: like
    /// [`strict_equals`](Self::strict_equals) except NaN equals NaN.
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) if a.is_nan() && b.is_nan() => true,
            _ => self.strict_equals(other),
        }
    }

    /// String conversion as performed by template interpolation.
    pub fn to_js_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Symbol(desc) => format!("Symbol({desc})"),
            Value::Array(items) => join_items(items),
            Value::Arguments(_) => "[object Arguments]".to_string(),
            Value::Object(_) => "[object Object]".to_string(),
            Value::Date(Some(at)) => at.to_rfc2822(),
            Value::Date(None) => "Invalid Date".to_string(),
            Value::RegExp(re) => format!("/{}/{}", re.source, re.flags),
            Value::Error(err) if err.message.is_empty() => err.name.clone(),
            Value::Error(err) => format!("{}: {}", err.name, err.message),
            Value::Map(_) => "[object Map]".to_string(),
            Value::Set(_) => "[object Set]".to_string(),
            Value::Buffer(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Value::TypedArray(array) => array
                .to_f64_vec()
                .into_iter()
                .map(format_number)
                .collect::<Vec<_>>()
                .join(","),
            Value::Function(func) => {
                format!("function {}() {{ [native code] }}", func.name())
            }
            Value::Host(host) => format!("[object {}]", host.class_tag()),
        }
    }
}

fn join_items(items: &[Value]) -> String {
    items
        .iter()
        .map(|item| match item {
            Value::Undefined | Value::Null => String::new(),
            other => other.to_js_string(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Number-to-string conversion: integral values print without a fraction.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

// ---------------------------------------------------------------------------
// Conversions from Rust primitives
// ---------------------------------------------------------------------------

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Object> for Value {
    fn from(map: Object) -> Self {
        Value::Object(map)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(at: DateTime<Utc>) -> Self {
        Value::Date(Some(at))
    }
}

impl From<RegExp> for Value {
    fn from(re: RegExp) -> Self {
        Value::RegExp(re)
    }
}

impl From<ErrorValue> for Value {
    fn from(err: ErrorValue) -> Self {
        Value::Error(err)
    }
}

impl From<TypedArray> for Value {
    fn from(array: TypedArray) -> Self {
        Value::TypedArray(array)
    }
}

impl From<Function> for Value {
    fn from(func: Function) -> Self {
        Value::Function(func)
    }
}

impl From<HostObject> for Value {
    fn from(host: HostObject) -> Self {
        Value::Host(host)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Undefined, Into::into)
    }
}

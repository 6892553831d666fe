//! Wire values exchanged with the daemon
//!
//! Only the value shapes the call-manager contract actually uses are
//! modeled. Argument and reply tuples are plain `Vec<Value>`.

use std::fmt;

/// A string-keyed dictionary of variants (`a{sv}`), in wire order
pub type VariantDict = Vec<(String, Value)>;

/// A single typed wire value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `b`
    Bool(bool),
    /// `y`
    Byte(u8),
    /// `i`
    Int32(i32),
    /// `u`
    UInt32(u32),
    /// `x`
    Int64(i64),
    /// `s`
    Str(String),
    /// `a{sv}`
    Dict(VariantDict),
    /// `aa{sv}`
    DictArray(Vec<VariantDict>),
}

impl Value {
    /// Type signature of this value
    pub fn signature(&self) -> &'static str {
        match self {
            Value::Bool(_) => "b",
            Value::Byte(_) => "y",
            Value::Int32(_) => "i",
            Value::UInt32(_) => "u",
            Value::Int64(_) => "x",
            Value::Str(_) => "s",
            Value::Dict(_) => "a{sv}",
            Value::DictArray(_) => "aa{sv}",
        }
    }

    /// Integer view accepting both 32-bit widths when the value fits
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => Some(*v),
            Value::UInt32(v) => i32::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Unsigned view accepting both 32-bit widths when the value fits
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::UInt32(v) => Some(*v),
            Value::Int32(v) => u32::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            Value::Int32(v) => Some(i64::from(*v)),
            Value::UInt32(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Dict(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Byte(v) => write!(f, "0x{:02x}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::UInt32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::Str(v) => write!(f, "{:?}", v),
            Value::Dict(v) => write!(f, "{{{} entries}}", v.len()),
            Value::DictArray(v) => write!(f, "[{} dicts]", v.len()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::Byte(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::UInt32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

/// Tuple signature of an argument or reply list, e.g. `(iis)`
pub fn tuple_signature(values: &[Value]) -> String {
    let mut sig = String::from("(");
    for value in values {
        sig.push_str(value.signature());
    }
    sig.push(')');
    sig
}

/// Build a [`VariantDict`] from `(key, value)` pairs
pub fn dict<K, V, I>(entries: I) -> VariantDict
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

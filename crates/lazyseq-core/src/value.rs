//! Dynamically-typed scalar values and the "is instance of" capability.
//!
//! `Value` is a closed tagged union; `InstanceOf<T>` is the query that type
//! filtering uses to ask whether an element holds a `T`. `Box<dyn Any>` gets a
//! blanket implementation backed by a runtime downcast, so open sets of types
//! work too.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Runtime type query: hand back the element as a `T`, or return it untouched.
pub trait InstanceOf<T>: Sized {
    fn instance_of(self) -> Result<T, Self>;
}

impl<T: Any> InstanceOf<T> for Box<dyn Any> {
    fn instance_of(self) -> Result<T, Self> {
        self.downcast::<T>().map(|b| *b)
    }
}

impl<T: Any> InstanceOf<T> for Box<dyn Any + Send> {
    fn instance_of(self) -> Result<T, Self> {
        self.downcast::<T>().map(|b| *b)
    }
}

/// Scalar element as it appears in JSON input.
///
/// Equality, hashing and ordering are total: floats compare with
/// `f64::total_cmp`, and values of different kinds order by kind
/// (`Null < Bool < Int < Float < Str`). `Int(1)` and `Float(1.0)` are distinct.
///
/// Deserializing a JSON integer that does not fit in `i64` falls through to
/// `Float` and loses precision; `lazyseq_pipeline` input decoding rejects those.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Str,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "str",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "null" => Ok(ValueKind::Null),
            "bool" | "boolean" => Ok(ValueKind::Bool),
            "int" | "i64" | "integer" => Ok(ValueKind::Int),
            "float" | "f64" => Ok(ValueKind::Float),
            "str" | "string" => Ok(ValueKind::Str),
            other => Err(format!("unknown value kind '{other}'")),
        }
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view used by mixed int/float comparisons.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        use Value::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Str(a), Str(b)) => a.cmp(b),
            // Mixed kinds: order by kind
            _ => self.kind().cmp(&other.kind()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Kind first so equal payload bits of different kinds stay apart.
        self.kind().hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Str(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl InstanceOf<()> for Value {
    fn instance_of(self) -> Result<(), Self> {
        match self {
            Value::Null => Ok(()),
            other => Err(other),
        }
    }
}

impl InstanceOf<bool> for Value {
    fn instance_of(self) -> Result<bool, Self> {
        match self {
            Value::Bool(b) => Ok(b),
            other => Err(other),
        }
    }
}

impl InstanceOf<i64> for Value {
    fn instance_of(self) -> Result<i64, Self> {
        match self {
            Value::Int(i) => Ok(i),
            other => Err(other),
        }
    }
}

impl InstanceOf<f64> for Value {
    fn instance_of(self) -> Result<f64, Self> {
        match self {
            Value::Float(f) => Ok(f),
            other => Err(other),
        }
    }
}

impl InstanceOf<String> for Value {
    fn instance_of(self) -> Result<String, Self> {
        match self {
            Value::Str(s) => Ok(s),
            other => Err(other),
        }
    }
}

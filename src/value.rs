//! Column values with tolerance-aware equality

use serde::Serialize;
use std::fmt;

/// Relative tolerance used when comparing two Float values
pub const REL_TOL: f64 = 1e-6;

/// Absolute tolerance used when comparing two Float values
pub const ABS_TOL: f64 = 0.0;

/// One column's content, as read from a table snapshot.
///
/// Values are immutable once constructed. Equality is kind-strict: two
/// values of different kinds never compare equal, and floats compare
/// equal within a relative tolerance (see [`approx_eq`]).
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => approx_eq(*a, *b),
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl Value {
    /// Short kind name used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
        }
    }
}

/// Float equality within `max(REL_TOL * max(|a|,|b|), ABS_TOL)`
pub fn approx_eq(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    let tol = f64::max(REL_TOL * f64::max(a.abs(), b.abs()), ABS_TOL);
    (a - b).abs() <= tol
}

//! Raw selection values.

use std::fmt;

use serde::Serialize;

/// A single raw value as supplied by the caller.
///
/// Vocabulary checks compare the [`Display`](fmt::Display) form against
/// the category's terms, so `InputValue::Int(50)` is accepted wherever the
/// term `"50"` is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InputValue {
    /// Text.
    Text(String),
    /// Integer.
    Int(i64),
    /// Floating point.
    Float(f64),
    /// Boolean flag.
    Bool(bool),
}

impl InputValue {
    /// Text content, if the value is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            InputValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer content. Text that parses as an integer and integral floats
    /// are accepted.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            InputValue::Int(i) => Some(*i),
            InputValue::Text(s) => s.trim().parse().ok(),
            InputValue::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            _ => None,
        }
    }

    /// Numeric content.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            InputValue::Float(f) => Some(*f),
            InputValue::Int(i) => Some(*i as f64),
            InputValue::Text(s) => s.trim().parse().ok(),
            InputValue::Bool(_) => None,
        }
    }

    /// Boolean content. Only genuine booleans qualify.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            InputValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputValue::Text(s) => f.write_str(s),
            InputValue::Int(i) => write!(f, "{i}"),
            InputValue::Float(x) => write!(f, "{x}"),
            InputValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for InputValue {
    fn from(s: &str) -> Self {
        InputValue::Text(s.to_string())
    }
}

impl From<String> for InputValue {
    fn from(s: String) -> Self {
        InputValue::Text(s)
    }
}

impl From<i64> for InputValue {
    fn from(i: i64) -> Self {
        InputValue::Int(i)
    }
}

impl From<i32> for InputValue {
    fn from(i: i32) -> Self {
        InputValue::Int(i64::from(i))
    }
}

impl From<f64> for InputValue {
    fn from(x: f64) -> Self {
        InputValue::Float(x)
    }
}

impl From<bool> for InputValue {
    fn from(b: bool) -> Self {
        InputValue::Bool(b)
    }
}

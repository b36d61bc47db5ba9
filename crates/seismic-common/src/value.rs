//! Decoded header values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A numeric value decoded from a header field.
///
/// Integer encodings produce `Int`, float encodings produce `Float`. Both
/// serialize as bare JSON numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
}

impl FieldValue {
    pub fn as_f64(&self) -> f64 {
        match *self {
            FieldValue::Int(v) => v as f64,
            FieldValue::Float(v) => v,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            FieldValue::Int(v) => Some(v),
            FieldValue::Float(_) => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        match *self {
            FieldValue::Int(v) => v == 0,
            FieldValue::Float(v) => v == 0.0,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_bare_number() {
        assert_eq!(serde_json::to_string(&FieldValue::Int(-12)).unwrap(), "-12");
        assert_eq!(serde_json::to_string(&FieldValue::Float(1.5)).unwrap(), "1.5");
    }

    #[test]
    fn test_zero_detection() {
        assert!(FieldValue::Int(0).is_zero());
        assert!(FieldValue::Float(-0.0).is_zero());
        assert!(!FieldValue::Float(1e-30).is_zero());
        assert_eq!(FieldValue::Int(7).to_string(), "7");
    }
}

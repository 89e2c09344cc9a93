//! Core type definitions for cell values and declared column types.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CodebookError;

/// Declared scalar type for a column after cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// Text values.
    #[serde(alias = "string", alias = "text")]
    Str,
    /// Boolean values.
    #[serde(alias = "boolean")]
    Bool,
    /// Whole numbers.
    #[serde(alias = "integer")]
    Int,
    /// Floating-point numbers.
    Float,
}

impl DataType {
    /// Short name used in logs (`to bool`, `to float`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Str => "str",
            DataType::Bool => "bool",
            DataType::Int => "int",
            DataType::Float => "float",
        }
    }

    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int | DataType::Float)
    }

    /// Check whether a non-missing value already has this type.
    pub fn conforms(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (_, Value::Missing)
                | (DataType::Str, Value::Str(_))
                | (DataType::Bool, Value::Bool(_))
                | (DataType::Int, Value::Int(_))
                | (DataType::Float, Value::Float(_))
        )
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataType {
    type Err = CodebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "str" | "string" | "text" => Ok(DataType::Str),
            "bool" | "boolean" => Ok(DataType::Bool),
            "int" | "integer" => Ok(DataType::Int),
            "float" => Ok(DataType::Float),
            _ => Err(CodebookError::UnknownDataType(s.to_string())),
        }
    }
}

/// A single cell in a metadata map.
///
/// `Missing` is the one "no data" marker for every data type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Missing,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Returns true for the not-a-value marker.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Returns true for integer and float cells.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Borrow the text of a string cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of integer and float cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Build a float cell, folding NaN into `Missing`.
    pub fn float(f: f64) -> Self {
        if f.is_nan() { Value::Missing } else { Value::Float(f) }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Missing, Value::Missing) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => false,
        }
    }
}

// NaN floats compare equal to each other, so equality is total.
impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Missing => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            // -0.0 == 0.0 and NaN == NaN, so each pair must hash alike
            Value::Float(f) => {
                let f = if *f == 0.0 {
                    0.0
                } else if f.is_nan() {
                    f64::NAN
                } else {
                    *f
                };
                f.to_bits().hash(state)
            }
            Value::Str(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
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

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::float(f)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_type() {
        assert_eq!("str".parse::<DataType>().unwrap(), DataType::Str);
        assert_eq!("Boolean".parse::<DataType>().unwrap(), DataType::Bool);
        assert_eq!("integer".parse::<DataType>().unwrap(), DataType::Int);
        assert!(matches!(
            "tuple".parse::<DataType>(),
            Err(CodebookError::UnknownDataType(_))
        ));
    }

    #[test]
    fn test_nan_is_missing() {
        assert_eq!(Value::from(f64::NAN), Value::Missing);
        assert_eq!(Value::from(2.5), Value::Float(2.5));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Missing.to_string(), "");
    }

    #[test]
    fn test_signed_zero_hashes_alike() {
        use std::collections::HashSet;
        let set: HashSet<Value> = [Value::Float(0.0), Value::Float(-0.0)].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_directly_built_nan_is_reflexive() {
        use std::collections::HashSet;
        let nan = Value::Float(f64::NAN);
        assert_eq!(nan, nan.clone());
        let set: HashSet<Value> = [nan, Value::Float(-f64::NAN)].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_conforms() {
        assert!(DataType::Bool.conforms(&Value::Bool(false)));
        assert!(DataType::Int.conforms(&Value::Missing));
        assert!(!DataType::Int.conforms(&Value::Float(1.0)));
    }

    #[test]
    fn test_json_round_trip_shapes() {
        let values: Vec<Value> = serde_json::from_str(r#"[null, true, 2, 2.5, "D-man"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Missing,
                Value::Bool(true),
                Value::Int(2),
                Value::Float(2.5),
                Value::from("D-man"),
            ]
        );
    }
}

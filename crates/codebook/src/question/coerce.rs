//! Cell-level casting rules used by dtype remapping.

use crate::schema::{DataType, Value};

/// Cast one non-missing cell to `dtype`.
///
/// Returns `None` when the value has no interpretation in the target type.
pub(crate) fn coerce(value: &Value, dtype: DataType) -> Option<Value> {
    if value.is_missing() || matches!(value, Value::Float(f) if f.is_nan()) {
        return Some(Value::Missing);
    }

    match dtype {
        DataType::Bool => match value {
            Value::Bool(b) => Some(Value::Bool(*b)),
            Value::Int(0) => Some(Value::Bool(false)),
            Value::Int(1) => Some(Value::Bool(true)),
            Value::Float(f) if *f == 0.0 => Some(Value::Bool(false)),
            Value::Float(f) if *f == 1.0 => Some(Value::Bool(true)),
            Value::Str(s) if s == "True" => Some(Value::Bool(true)),
            Value::Str(s) if s == "False" => Some(Value::Bool(false)),
            _ => None,
        },
        DataType::Int => match value {
            Value::Int(i) => Some(Value::Int(*i)),
            Value::Bool(b) => Some(Value::Int(i64::from(*b))),
            Value::Float(f) => whole_float(*f),
            Value::Str(s) => {
                let trimmed = s.trim();
                match trimmed.parse::<i64>() {
                    Ok(i) => Some(Value::Int(i)),
                    // Whole-number text such as "4.0" is accepted
                    Err(_) => trimmed.parse::<f64>().ok().and_then(whole_float),
                }
            }
            Value::Missing => Some(Value::Missing),
        },
        DataType::Float => match value {
            Value::Float(f) => Some(Value::float(*f)),
            Value::Int(i) => Some(Value::Float(*i as f64)),
            Value::Bool(b) => Some(Value::Float(if *b { 1.0 } else { 0.0 })),
            Value::Str(s) => s.trim().parse::<f64>().ok().map(Value::float),
            Value::Missing => Some(Value::Missing),
        },
        DataType::Str => match value {
            Value::Str(s) => Some(Value::Str(s.clone())),
            other => Some(Value::Str(other.to_string())),
        },
    }
}

fn whole_float(f: f64) -> Option<Value> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(Value::Int(f as i64))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_literals_are_case_sensitive() {
        assert_eq!(coerce(&Value::from("True"), DataType::Bool), Some(Value::Bool(true)));
        assert_eq!(coerce(&Value::from("False"), DataType::Bool), Some(Value::Bool(false)));
        assert_eq!(coerce(&Value::from("true"), DataType::Bool), None);
        assert_eq!(coerce(&Value::from("yes"), DataType::Bool), None);
    }

    #[test]
    fn test_bool_from_zero_one() {
        assert_eq!(coerce(&Value::Int(0), DataType::Bool), Some(Value::Bool(false)));
        assert_eq!(coerce(&Value::Int(1), DataType::Bool), Some(Value::Bool(true)));
        assert_eq!(coerce(&Value::Int(2), DataType::Bool), None);
    }

    #[test]
    fn test_int_parsing() {
        assert_eq!(coerce(&Value::from(" 4 "), DataType::Int), Some(Value::Int(4)));
        assert_eq!(coerce(&Value::from("4.0"), DataType::Int), Some(Value::Int(4)));
        assert_eq!(coerce(&Value::from("4.5"), DataType::Int), None);
        assert_eq!(coerce(&Value::from("four"), DataType::Int), None);
    }

    #[test]
    fn test_float_parsing() {
        assert_eq!(coerce(&Value::from("2"), DataType::Float), Some(Value::Float(2.0)));
        assert_eq!(coerce(&Value::Int(3), DataType::Float), Some(Value::Float(3.0)));
        assert_eq!(coerce(&Value::from("nan"), DataType::Float), Some(Value::Missing));
        assert_eq!(coerce(&Value::from("Goalie"), DataType::Float), None);
    }

    #[test]
    fn test_nan_cell_casts_to_missing() {
        let nan = Value::Float(f64::NAN);
        for dtype in [DataType::Str, DataType::Bool, DataType::Int, DataType::Float] {
            assert_eq!(coerce(&nan, dtype), Some(Value::Missing));
        }
    }

    #[test]
    fn test_text_uses_display() {
        assert_eq!(coerce(&Value::Bool(true), DataType::Str), Some(Value::from("True")));
        assert_eq!(coerce(&Value::Int(7), DataType::Str), Some(Value::from("7")));
    }

    #[test]
    fn test_missing_passes_through() {
        for dtype in [DataType::Str, DataType::Bool, DataType::Int, DataType::Float] {
            assert_eq!(coerce(&Value::Missing, dtype), Some(Value::Missing));
        }
    }
}

//! Numeric measurement column contracts.

use serde::Serialize;

use crate::error::{CodebookError, Result};
use crate::provenance::TransformType;
use crate::schema::{DataType, MetadataMap, Value};

use super::base::Question;
use super::options::ContinuousOptions;

/// A column holding a numeric measurement with an optional plausible range.
#[derive(Debug, Clone, Serialize)]
pub struct Continuous {
    #[serde(flatten)]
    question: Question,
    unit: Option<String>,
    lower: Option<f64>,
    upper: Option<f64>,
    rounding: Option<u32>,
}

impl Continuous {
    /// Create a float column with default options.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Result<Self> {
        Self::with_options(name, description, None, ContinuousOptions::default())
    }

    /// Create a continuous contract.
    ///
    /// `dtype` defaults to float and must be numeric; limits must satisfy
    /// `lower <= upper`.
    pub fn with_options(
        name: impl Into<String>,
        description: impl Into<String>,
        dtype: Option<DataType>,
        options: ContinuousOptions,
    ) -> Result<Self> {
        let dtype = dtype.unwrap_or(DataType::Float);
        let ContinuousOptions {
            unit,
            limits,
            rounding,
            question,
        } = options;

        let mut question = Question::with_options(name, description, dtype, question)?;
        if !dtype.is_numeric() {
            return Err(CodebookError::construction(
                "dtype",
                format!("'{}' is continuous and needs a numeric type, not {}", question.name(), dtype),
            ));
        }
        question.set_free_response(false);
        let (lower, upper) = check_limits(question.name(), limits)?;

        Ok(Self {
            question,
            unit,
            lower,
            upper,
            rounding,
        })
    }

    /// The embedded base contract.
    pub fn question(&self) -> &Question {
        &self.question
    }

    /// Mutable access to the embedded base contract.
    pub fn question_mut(&mut self) -> &mut Question {
        &mut self.question
    }

    /// Unit of measure.
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Lower limit, inclusive.
    pub fn lower(&self) -> Option<f64> {
        self.lower
    }

    /// Upper limit, inclusive.
    pub fn upper(&self) -> Option<f64> {
        self.upper
    }

    /// Digits results should be rounded to.
    pub fn rounding(&self) -> Option<u32> {
        self.rounding
    }

    /// Replace the limits.
    pub fn set_limits(&mut self, lower: f64, upper: f64) -> Result<()> {
        let (lower, upper) = check_limits(self.question.name(), Some((lower, upper)))?;
        self.lower = lower;
        self.upper = upper;
        Ok(())
    }

    /// Cast the column, then blank every value outside the limits.
    #[doc(alias = "analysis_drop_outliers")]
    pub fn drop_outliers(&mut self, map: &mut MetadataMap) -> Result<()> {
        self.question.check_map(map)?;
        self.question.remap_dtype(map)?;
        let (Some(lower), Some(upper)) = (self.lower, self.upper) else {
            return Ok(());
        };

        let changed = self.question.remap_column(map, |v| match v.as_f64() {
            Some(x) if x < lower || x > upper => Value::Missing,
            _ => v.clone(),
        })?;
        self.question.record(
            "drop outliers",
            TransformType::Drop,
            format!("values outside [{:.6}, {:.6}]", lower, upper),
        );
        tracing::debug!(column = %self.question.name(), lower, upper, cells = changed, "dropped outliers");
        Ok(())
    }
}

fn check_limits(name: &str, limits: Option<(f64, f64)>) -> Result<(Option<f64>, Option<f64>)> {
    match limits {
        None => Ok((None, None)),
        Some((lower, upper)) if lower.is_nan() || upper.is_nan() => Err(CodebookError::construction(
            "limits",
            format!("the limits of '{}' must be numbers", name),
        )),
        Some((lower, upper)) if lower > upper => Err(CodebookError::construction(
            "limits",
            format!("the lower limit of '{}' cannot be greater than the upper", name),
        )),
        Some((lower, upper)) => Ok((Some(lower), Some(upper))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_float() {
        let q = Continuous::new("years_on_team", "Seasons played").unwrap();
        assert_eq!(q.question().dtype(), DataType::Float);
        assert!(!q.question().free_response());
        assert_eq!(q.lower(), None);
    }

    #[test]
    fn test_rejects_inverted_limits() {
        let err = Continuous::with_options(
            "years_on_team",
            "Seasons played",
            None,
            ContinuousOptions::new().with_limits(4.0, 1.0),
        )
        .unwrap_err();
        assert!(matches!(err, CodebookError::Construction { field: "limits", .. }));
    }

    #[test]
    fn test_rejects_text_dtype() {
        let err = Continuous::with_options(
            "years_on_team",
            "Seasons played",
            Some(DataType::Str),
            ContinuousOptions::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CodebookError::Construction { field: "dtype", .. }));
    }

    #[test]
    fn test_set_limits_validates() {
        let mut q = Continuous::new("years_on_team", "Seasons played").unwrap();
        assert!(q.set_limits(5.0, 2.0).is_err());
        q.set_limits(2.0, 4.0).unwrap();
        assert_eq!((q.lower(), q.upper()), (Some(2.0), Some(4.0)));
    }
}

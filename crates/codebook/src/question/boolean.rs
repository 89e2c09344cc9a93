//! Yes/no column contracts.

use serde::Serialize;

use crate::error::Result;
use crate::provenance::TransformType;
use crate::schema::{DataType, MetadataMap, Value};

use super::base::Question;
use super::categorical::Categorical;
use super::options::{BoolOptions, CategoricalOptions};

/// A categorical column with exactly two meaningful answers.
///
/// The raw map spells true and false with the `bool_format` literals
/// (`"true"`/`"false"` unless told otherwise). An optional ambiguous literal
/// records "unsure" answers, which are distinct from no answer at all.
#[derive(Debug, Clone, Serialize)]
pub struct Bool {
    #[serde(flatten)]
    categorical: Categorical,
    true_format: Value,
    false_format: Value,
}

impl Bool {
    /// Create a yes/no contract with the default literals.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Result<Self> {
        Self::with_options(name, description, BoolOptions::default())
    }

    /// Create a yes/no contract.
    pub fn with_options(
        name: impl Into<String>,
        description: impl Into<String>,
        options: BoolOptions,
    ) -> Result<Self> {
        let BoolOptions {
            bool_format,
            ambiguous_value,
            question,
        } = options;
        let [true_format, false_format] =
            bool_format.unwrap_or_else(|| [Value::from("true"), Value::from("false")]);

        let mut order = vec![true_format.clone(), false_format.clone()];
        let mut categorical_options = CategoricalOptions::new()
            .with_extremes(true_format.clone(), false_format.clone())
            .with_question(question);
        if let Some(ambiguous) = ambiguous_value {
            order.push(ambiguous.clone());
            categorical_options = categorical_options.with_ambiguous_values([ambiguous]);
        }

        let categorical =
            Categorical::with_literals(name, description, DataType::Bool, order, categorical_options)?;
        Ok(Self {
            categorical,
            true_format,
            false_format,
        })
    }

    /// The embedded categorical contract.
    pub fn categorical(&self) -> &Categorical {
        &self.categorical
    }

    /// Mutable access to the embedded categorical contract.
    pub fn categorical_mut(&mut self) -> &mut Categorical {
        &mut self.categorical
    }

    /// The embedded base contract.
    pub fn question(&self) -> &Question {
        self.categorical.question()
    }

    /// Mutable access to the embedded base contract.
    pub fn question_mut(&mut self) -> &mut Question {
        self.categorical.question_mut()
    }

    /// Literals used for true and false in the raw map.
    pub fn bool_format(&self) -> (&Value, &Value) {
        (&self.true_format, &self.false_format)
    }

    /// Read the true/false literals as booleans, then cast the column.
    ///
    /// The order is rewritten the same way so it keeps matching the column.
    pub fn remap_dtype(&mut self, map: &mut MetadataMap) -> Result<()> {
        let (true_format, false_format) = (self.true_format.clone(), self.false_format.clone());
        let to_bool = move |v: &Value| {
            if *v == true_format {
                Value::Bool(true)
            } else if *v == false_format {
                Value::Bool(false)
            } else {
                v.clone()
            }
        };
        self.categorical.question_mut().remap_dtype_with(map, &to_bool)?;
        self.categorical.update_order(&to_bool);
        Ok(())
    }

    /// Rewrite booleans as `"yes"` and `"no"`.
    #[doc(alias = "analysis_convert_to_word")]
    pub fn convert_to_word(&mut self, map: &mut MetadataMap) -> Result<()> {
        self.remap_dtype(map)?;

        let to_word = |v: &Value| match v {
            Value::Bool(true) => Value::from("yes"),
            Value::Bool(false) => Value::from("no"),
            other => other.clone(),
        };
        let changed = self.question().remap_column(map, to_word)?;
        self.categorical.update_order(to_word);

        self.question_mut()
            .record("convert boolean", TransformType::Replace, "standarize to yes/no");
        tracing::debug!(column = %self.question().name(), cells = changed, "converted booleans to words");
        Ok(())
    }
}

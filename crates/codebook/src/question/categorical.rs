//! Ordered, enumerated-value column contracts.

use indexmap::IndexSet;
use serde::Serialize;

use crate::error::{CodebookError, Result};
use crate::provenance::TransformType;
use crate::schema::{DataType, MetadataMap, Value};

use super::base::Question;
use super::coerce::coerce;
use super::options::CategoricalOptions;

/// A column whose values come from a ranked list of categories.
///
/// `order` and `extremes` are only ever rewritten together through
/// [`Categorical::update_order`], so every extreme is always a member of the
/// order and the order never holds duplicates.
#[derive(Debug, Clone, Serialize)]
pub struct Categorical {
    #[serde(flatten)]
    question: Question,
    order: Vec<Value>,
    extremes: Vec<Value>,
    frequency_cutoff: Option<usize>,
    ambiguous_values: Option<IndexSet<Value>>,
}

impl Categorical {
    /// Create a categorical contract with default options.
    pub fn new<I, V>(
        name: impl Into<String>,
        description: impl Into<String>,
        dtype: DataType,
        order: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::with_options(name, description, dtype, order, CategoricalOptions::default())
    }

    /// Create a categorical contract.
    ///
    /// Categories, extremes and ambiguous values are cast to `dtype`. The
    /// order must be non-empty and free of duplicates once cast. Extremes
    /// default to the first and last category and must both be in the order.
    pub fn with_options<I, V>(
        name: impl Into<String>,
        description: impl Into<String>,
        dtype: DataType,
        order: I,
        options: CategoricalOptions,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::build(name, description, dtype, order, options, true)
    }

    /// Create a contract whose categories are raw literals, left uncast
    /// until the column itself is cast.
    pub(crate) fn with_literals<I, V>(
        name: impl Into<String>,
        description: impl Into<String>,
        dtype: DataType,
        order: I,
        options: CategoricalOptions,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::build(name, description, dtype, order, options, false)
    }

    fn build<I, V>(
        name: impl Into<String>,
        description: impl Into<String>,
        dtype: DataType,
        order: I,
        options: CategoricalOptions,
        cast: bool,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let order: Vec<Value> = order.into_iter().map(Into::into).collect();
        let CategoricalOptions {
            extremes,
            frequency_cutoff,
            ambiguous_values,
            question,
        } = options;

        let question = Question::with_options(name, description, dtype, question)?;
        let (order, extremes, ambiguous_values) = if cast {
            (
                cast_categories(&question, "order", order)?,
                extremes.map(|e| cast_categories(&question, "extremes", e)).transpose()?,
                ambiguous_values
                    .map(|a| cast_categories(&question, "ambiguous_values", a))
                    .transpose()?,
            )
        } else {
            (order, extremes, ambiguous_values)
        };
        let order = validate_order(question.name(), order)?;
        let extremes = validate_extremes(question.name(), &order, extremes)?;

        Ok(Self {
            question,
            order,
            extremes,
            frequency_cutoff,
            ambiguous_values: ambiguous_values.map(|v| v.into_iter().collect()),
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

    /// Ranked categories.
    pub fn order(&self) -> &[Value] {
        &self.order
    }

    /// Low and high endpoints of the order.
    pub fn extremes(&self) -> &[Value] {
        &self.extremes
    }

    /// Count at or below which a category is dropped.
    pub fn frequency_cutoff(&self) -> Option<usize> {
        self.frequency_cutoff
    }

    /// Categories considered uninterpretable.
    pub fn ambiguous_values(&self) -> Option<&IndexSet<Value>> {
        self.ambiguous_values.as_ref()
    }

    /// Set or clear the frequency cutoff.
    pub fn set_frequency_cutoff(&mut self, cutoff: Option<usize>) {
        self.frequency_cutoff = cutoff;
    }

    /// Set or clear the ambiguous values.
    pub fn set_ambiguous_values<I, V>(&mut self, values: Option<I>)
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.ambiguous_values = values.map(|v| v.into_iter().map(Into::into).collect());
    }

    /// Rank of a cell in the order, matching the cell as-is or cast to the
    /// declared type.
    pub fn position(&self, value: &Value) -> Option<usize> {
        if value.is_missing() {
            return None;
        }
        self.order.iter().position(|o| o == value).or_else(|| {
            let cast = coerce(value, self.question.dtype())?;
            self.order.iter().position(|o| *o == cast)
        })
    }

    /// Rewrite the order and extremes through `remap`.
    ///
    /// Results that are `Missing` or already present are collapsed, keeping
    /// the first occurrence.
    pub fn update_order<F>(&mut self, remap: F)
    where
        F: Fn(&Value) -> Value,
    {
        let order: IndexSet<Value> = self
            .order
            .iter()
            .map(&remap)
            .filter(|v| !v.is_missing())
            .collect();
        let extremes: IndexSet<Value> = self
            .extremes
            .iter()
            .map(&remap)
            .filter(|v| order.contains(v))
            .collect();
        self.order = order.into_iter().collect();
        self.extremes = extremes.into_iter().collect();
    }

    /// Cast the column to the declared type and the order along with it.
    pub fn remap_dtype(&mut self, map: &mut MetadataMap) -> Result<()> {
        self.question.remap_dtype(map)?;
        let dtype = self.question.dtype();
        let missing = self.question.missing().clone();
        self.update_order(|v| match v {
            Value::Str(s) if missing.contains(s) => v.clone(),
            _ => coerce(v, dtype).unwrap_or_else(|| v.clone()),
        });
        Ok(())
    }

    /// Drop every category seen `frequency_cutoff` times or fewer.
    ///
    /// Categories that never appear in the column count as zero and are
    /// dropped too. Nothing happens when no cutoff is set.
    #[doc(alias = "analysis_drop_infrequent")]
    pub fn drop_infrequent(&mut self, map: &mut MetadataMap) -> Result<()> {
        self.question.check_map(map)?;
        let Some(cutoff) = self.frequency_cutoff else {
            return Ok(());
        };

        let mut counts = vec![0usize; self.order.len()];
        for cell in map.column(self.question.name()).unwrap_or_default() {
            if let Some(rank) = self.position(cell) {
                counts[rank] += 1;
            }
        }
        let below: IndexSet<Value> = self
            .order
            .iter()
            .zip(&counts)
            .filter(|(_, count)| **count <= cutoff)
            .map(|(category, _)| category.clone())
            .collect();

        let changed = self.question.remap_column(map, |v| match self.position(v) {
            Some(rank) if below.contains(&self.order[rank]) => Value::Missing,
            _ => v.clone(),
        })?;
        self.update_order(|v| if below.contains(v) { Value::Missing } else { v.clone() });

        self.question
            .record("drop infrequent values", TransformType::Drop, join_values(&below));
        tracing::debug!(
            column = %self.question.name(),
            cutoff,
            dropped = below.len(),
            cells = changed,
            "dropped infrequent categories"
        );
        Ok(())
    }

    /// Blank every cell holding an ambiguous value and drop those values
    /// from the order.
    #[doc(alias = "analyis_remove_ambiguious")]
    #[doc(alias = "analysis_remove_ambiguous")]
    pub fn remove_ambiguous(&mut self, map: &mut MetadataMap) -> Result<()> {
        self.question.check_map(map)?;
        let Some(ambiguous) = self.ambiguous_values.clone() else {
            return Ok(());
        };

        let dtype = self.question.dtype();
        let is_ambiguous = |v: &Value| {
            ambiguous.contains(v) || coerce(v, dtype).is_some_and(|c| ambiguous.contains(&c))
        };
        let changed = self.question.remap_column(map, |v| {
            if is_ambiguous(v) { Value::Missing } else { v.clone() }
        })?;
        self.update_order(|v| if is_ambiguous(v) { Value::Missing } else { v.clone() });

        self.question
            .record("remove ambigious values", TransformType::Drop, join_values(&ambiguous));
        tracing::debug!(column = %self.question.name(), cells = changed, "removed ambiguous values");
        Ok(())
    }

    /// Replace each category with its zero-based rank.
    ///
    /// Numeric cells that are not categories are kept; any other value
    /// outside the order becomes `Missing`. The order becomes `0..n`.
    #[doc(alias = "analysis_convert_to_numeric")]
    pub fn convert_to_numeric(&mut self, map: &mut MetadataMap) -> Result<()> {
        self.question.check_map(map)?;
        let ranks: Vec<(Value, Value)> = self
            .order
            .iter()
            .enumerate()
            .map(|(rank, category)| (category.clone(), Value::Int(rank as i64)))
            .collect();
        self.relabel(map, "convert to numeric", ranks)
    }

    /// Prefix each category with its rank, e.g. `"(0) Striker"`.
    #[doc(alias = "analysis_label_order")]
    pub fn label_order(&mut self, map: &mut MetadataMap) -> Result<()> {
        self.question.check_map(map)?;
        let labels: Vec<(Value, Value)> = self
            .order
            .iter()
            .enumerate()
            .map(|(rank, category)| {
                (category.clone(), Value::Str(format!("({}) {}", rank, category)))
            })
            .collect();
        self.relabel(map, "label order", labels)
    }

    fn relabel(
        &mut self,
        map: &mut MetadataMap,
        command: &str,
        mapping: Vec<(Value, Value)>,
    ) -> Result<()> {
        let remap = |v: &Value| match self.position(v) {
            Some(rank) => mapping[rank].1.clone(),
            None if v.is_numeric() => v.clone(),
            None => Value::Missing,
        };
        let changed = self.question.remap_column(map, remap)?;

        let order_remap = |v: &Value| {
            mapping
                .iter()
                .find(|(from, _)| from == v)
                .map(|(_, to)| to.clone())
                .unwrap_or(Value::Missing)
        };
        self.update_order(order_remap);

        let description = mapping
            .iter()
            .map(|(from, to)| format!("{} >>> {}", from, to))
            .collect::<Vec<_>>()
            .join(" | ");
        self.question
            .record(command, TransformType::Transformation, description);
        tracing::debug!(column = %self.question.name(), command, cells = changed, "relabelled categories");
        Ok(())
    }

    /// Blank every cell holding a missing-vocabulary value and drop those
    /// values from the order.
    #[doc(alias = "analysis_remap_null")]
    pub fn remap_null(&mut self, map: &mut MetadataMap) -> Result<()> {
        self.question.check_map(map)?;
        let missing = self.question.missing().clone();
        let is_null = |v: &Value| matches!(v, Value::Str(s) if missing.contains(s));

        let changed = self.question.remap_column(map, |v| {
            if is_null(v) { Value::Missing } else { v.clone() }
        })?;
        self.update_order(|v| if is_null(v) { Value::Missing } else { v.clone() });

        let values = missing.iter().map(String::as_str).collect::<Vec<_>>().join(" | ");
        self.question
            .record("correct null values", TransformType::Drop, values);
        tracing::debug!(column = %self.question.name(), cells = changed, "remapped null values");
        Ok(())
    }

    /// Check the column exists and holds only categories or missing values.
    pub fn validate_map(&mut self, map: &MetadataMap) -> Result<()> {
        self.question.check_map(map)?;
        let invalid: IndexSet<String> = map
            .column(self.question.name())
            .unwrap_or_default()
            .iter()
            .filter(|v| !self.question.is_missing_value(v) && self.position(v).is_none())
            .map(|v| v.to_string())
            .collect();
        self.question.finish_validation(invalid)
    }
}

/// Cast construction-time categories to the declared type. Missing
/// vocabulary strings are kept as written.
fn cast_categories(question: &Question, field: &'static str, values: Vec<Value>) -> Result<Vec<Value>> {
    let dtype = question.dtype();
    let mut failures = Vec::new();
    let cast: Vec<Value> = values
        .into_iter()
        .map(|v| {
            if question.is_missing_value(&v) {
                return v;
            }
            coerce(&v, dtype).unwrap_or_else(|| {
                failures.push(v.to_string());
                v
            })
        })
        .collect();
    if !failures.is_empty() {
        return Err(CodebookError::construction(
            field,
            format!(
                "{} of '{}' cannot be cast to {}: {}",
                field,
                question.name(),
                dtype,
                failures.join(" | ")
            ),
        ));
    }
    Ok(cast)
}

fn validate_order(name: &str, order: Vec<Value>) -> Result<Vec<Value>> {
    if order.is_empty() {
        return Err(CodebookError::construction(
            "order",
            format!("the order of '{}' must list at least one category", name),
        ));
    }
    if order.iter().any(Value::is_missing) {
        return Err(CodebookError::construction(
            "order",
            format!("the order of '{}' cannot contain an empty value", name),
        ));
    }
    let unique: IndexSet<&Value> = order.iter().collect();
    if unique.len() != order.len() {
        return Err(CodebookError::construction(
            "order",
            format!("the order of '{}' cannot contain duplicate values", name),
        ));
    }
    Ok(order)
}

fn validate_extremes(name: &str, order: &[Value], extremes: Option<Vec<Value>>) -> Result<Vec<Value>> {
    let extremes = match extremes {
        Some(extremes) => extremes,
        None => {
            let first = order.first().cloned().unwrap_or_default();
            let last = order.last().cloned().unwrap_or_default();
            return Ok(vec![first, last]);
        }
    };
    if extremes.len() != 2 {
        return Err(CodebookError::construction(
            "extremes",
            format!("'{}' needs exactly two extremes, found {}", name, extremes.len()),
        ));
    }
    if let Some(stray) = extremes.iter().find(|e| !order.contains(e)) {
        return Err(CodebookError::construction(
            "extremes",
            format!("extreme '{}' of '{}' is not in the order", stray, name),
        ));
    }
    Ok(extremes)
}

fn join_values<'a>(values: impl IntoIterator<Item = &'a Value>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions() -> Categorical {
        Categorical::new(
            "position",
            "Position on the ice",
            DataType::Str,
            ["Striker", "D-man", "Goalie"],
        )
        .unwrap()
    }

    #[test]
    fn test_default_extremes() {
        let q = positions();
        assert_eq!(q.extremes(), &[Value::from("Striker"), Value::from("Goalie")]);
    }

    #[test]
    fn test_rejects_bad_order() {
        let err = Categorical::new("position", "Position", DataType::Str, Vec::<Value>::new())
            .unwrap_err();
        assert!(matches!(err, CodebookError::Construction { field: "order", .. }));

        let err = Categorical::new("position", "Position", DataType::Str, ["D-man", "D-man"])
            .unwrap_err();
        assert!(matches!(err, CodebookError::Construction { field: "order", .. }));
    }

    #[test]
    fn test_rejects_bad_extremes() {
        let options = CategoricalOptions::new().with_extremes("Striker", "Zamboni");
        let err = Categorical::with_options(
            "position",
            "Position",
            DataType::Str,
            ["Striker", "D-man", "Goalie"],
            options,
        )
        .unwrap_err();
        assert!(matches!(err, CodebookError::Construction { field: "extremes", .. }));

        let options = CategoricalOptions {
            extremes: Some(vec![Value::from("Striker")]),
            ..Default::default()
        };
        assert!(Categorical::with_options("position", "Position", DataType::Str, ["Striker"], options)
            .is_err());
    }

    #[test]
    fn test_update_order_collapses() {
        let mut q = positions();
        q.update_order(|v| match v.as_str() {
            Some("Goalie") => Value::Missing,
            Some("D-man") => Value::from("Striker"),
            _ => v.clone(),
        });
        assert_eq!(q.order(), &[Value::from("Striker")]);
        assert_eq!(q.extremes(), &[Value::from("Striker")]);
    }

    #[test]
    fn test_position_uses_declared_type() {
        let q = Categorical::new("years_on_team", "Seasons", DataType::Int, [1i64, 2, 3, 4]).unwrap();
        assert_eq!(q.position(&Value::from("2")), Some(1));
        assert_eq!(q.position(&Value::Int(4)), Some(3));
        assert_eq!(q.position(&Value::from("five")), None);
    }
}

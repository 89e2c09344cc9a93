//! The base column contract.

use std::collections::BTreeSet;

use indexmap::IndexSet;
use serde::Serialize;

use crate::error::{CodebookError, Result};
use crate::provenance::{ProvenanceLog, ProvenanceTable, TransformType};
use crate::schema::{DataType, MetadataMap, Value};

use super::coerce::coerce;
use super::options::{default_missing, MissingValues, QuestionOptions};

/// Contract for a single column of a metadata map.
///
/// A question knows the column it describes, the type its values must have
/// once cleaned, and which strings mean "no data". Every action it takes on
/// a map is appended to its provenance log.
#[derive(Debug, Clone, Serialize)]
pub struct Question {
    name: String,
    description: String,
    dtype: DataType,
    clean_name: String,
    free_response: bool,
    mimarks: bool,
    ontology: Option<String>,
    ebi_required: bool,
    qiita_required: bool,
    missing: BTreeSet<String>,
    #[serde(skip)]
    log: ProvenanceLog,
}

impl Question {
    /// Create a question with default options.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        dtype: DataType,
    ) -> Result<Self> {
        Self::with_options(name, description, dtype, QuestionOptions::default())
    }

    /// Create a question, validating every field before anything is built.
    pub fn with_options(
        name: impl Into<String>,
        description: impl Into<String>,
        dtype: DataType,
        options: QuestionOptions,
    ) -> Result<Self> {
        let name = name.into();
        let description = description.into();

        if name.trim().is_empty() {
            return Err(CodebookError::construction("name", "name must be a non-empty string"));
        }
        if description.trim().is_empty() {
            return Err(CodebookError::construction(
                "description",
                format!("description of '{}' must be a non-empty string", name),
            ));
        }
        let clean_name = match options.clean_name {
            Some(clean) if clean.trim().is_empty() => {
                return Err(CodebookError::construction(
                    "clean_name",
                    format!("if supplied, the clean name of '{}' must be a non-empty string", name),
                ));
            }
            Some(clean) => clean,
            None => default_clean_name(&name),
        };
        let missing = options
            .missing
            .map(MissingValues::into_set)
            .unwrap_or_else(default_missing);

        Ok(Self {
            log: ProvenanceLog::new(name.clone()),
            name,
            description,
            dtype,
            clean_name,
            free_response: options.free_response,
            mimarks: options.mimarks,
            ontology: options.ontology,
            ebi_required: options.ebi_required,
            qiita_required: options.qiita_required,
            missing,
        })
    }

    /// Column label in the map.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Declared type after cleaning.
    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    /// Human-readable label.
    pub fn clean_name(&self) -> &str {
        &self.clean_name
    }

    /// Whether the column holds unconstrained text.
    pub fn free_response(&self) -> bool {
        self.free_response
    }

    /// Whether the column is a MIMARKS standard field.
    pub fn mimarks(&self) -> bool {
        self.mimarks
    }

    /// Ontology the values are drawn from.
    pub fn ontology(&self) -> Option<&str> {
        self.ontology.as_deref()
    }

    /// Whether EBI requires the column.
    pub fn ebi_required(&self) -> bool {
        self.ebi_required
    }

    /// Whether Qiita requires the column.
    pub fn qiita_required(&self) -> bool {
        self.qiita_required
    }

    /// Strings that mean "no data" in this column.
    pub fn missing(&self) -> &BTreeSet<String> {
        &self.missing
    }

    /// Replace the missing-value vocabulary.
    pub fn set_missing(&mut self, missing: impl Into<MissingValues>) {
        self.missing = missing.into().into_set();
    }

    /// Accumulated provenance.
    pub fn log(&self) -> &ProvenanceLog {
        &self.log
    }

    pub(crate) fn set_free_response(&mut self, free_response: bool) {
        self.free_response = free_response;
    }

    /// Check whether a cell is the missing marker or a missing sentinel.
    pub fn is_missing_value(&self, value: &Value) -> bool {
        match value {
            Value::Missing => true,
            Value::Str(s) => self.missing.contains(s),
            _ => false,
        }
    }

    /// Append a record to the log.
    pub(crate) fn record(
        &mut self,
        command: &str,
        transform_type: TransformType,
        transformation: impl Into<String>,
    ) {
        self.log.record(command, transform_type, transformation);
    }

    /// Verify the column exists in the map.
    ///
    /// The map is never touched; a failed check is recorded in the log.
    pub fn check_map(&mut self, map: &MetadataMap) -> Result<()> {
        if map.has_column(&self.name) {
            return Ok(());
        }
        self.record("column check", TransformType::Validation, "column does not exist!");
        tracing::warn!(column = %self.name, "column is not part of the map");
        Err(CodebookError::MissingColumn {
            column: self.name.clone(),
        })
    }

    /// Cast every non-missing value of the column to the declared type.
    ///
    /// All cells are cast before the map is written, so a failure leaves the
    /// column exactly as it was and reports every value that could not be
    /// cast.
    pub fn remap_dtype(&mut self, map: &mut MetadataMap) -> Result<()> {
        self.remap_dtype_with(map, Value::clone)
    }

    /// Cast after running each cell through `prepare`.
    pub(crate) fn remap_dtype_with<F>(&mut self, map: &mut MetadataMap, prepare: F) -> Result<()>
    where
        F: Fn(&Value) -> Value,
    {
        self.check_map(map)?;
        let values = self.column(map)?;

        let mut failures: IndexSet<String> = IndexSet::new();
        let cast: Vec<Value> = values
            .iter()
            .map(|raw| {
                let value = prepare(raw);
                if self.is_missing_value(&value) {
                    return value;
                }
                coerce(&value, self.dtype).unwrap_or_else(|| {
                    failures.insert(value.to_string());
                    value
                })
            })
            .collect();

        if !failures.is_empty() {
            tracing::warn!(
                column = %self.name,
                dtype = %self.dtype,
                failures = failures.len(),
                "dtype cast failed"
            );
            return Err(CodebookError::Coercion {
                column: self.name.clone(),
                dtype: self.dtype.to_string(),
                values: failures.into_iter().collect(),
            });
        }

        map.set_column(&self.name, cast)?;
        self.record(
            "Cast data type",
            TransformType::Transformation,
            format!("to {}", self.dtype),
        );
        tracing::debug!(column = %self.name, dtype = %self.dtype, "cast data type");
        Ok(())
    }

    /// Check the column exists and every value can be read as the declared type.
    pub fn validate_map(&mut self, map: &MetadataMap) -> Result<()> {
        self.check_map(map)?;
        let invalid: IndexSet<String> = self
            .column(map)?
            .iter()
            .filter(|v| !self.is_missing_value(v) && coerce(v, self.dtype).is_none())
            .map(|v| v.to_string())
            .collect();
        self.finish_validation(invalid)
    }

    /// Log and report the outcome of a domain check.
    pub(crate) fn finish_validation(&mut self, invalid: IndexSet<String>) -> Result<()> {
        if invalid.is_empty() {
            self.record(
                "Validate the mapping file",
                TransformType::Pass,
                "The column meets requirements.",
            );
            return Ok(());
        }

        let values: Vec<String> = invalid.into_iter().collect();
        self.record(
            "Validate the mapping file",
            TransformType::Error,
            format!("The following are not valid values: {}", values.join(" | ")),
        );
        tracing::warn!(column = %self.name, invalid = values.len(), "column failed validation");
        Err(CodebookError::InvalidValues {
            column: self.name.clone(),
            values,
        })
    }

    /// Rewrite every cell of the column through `remap`.
    ///
    /// Returns the number of cells whose value changed.
    pub(crate) fn remap_column<F>(&self, map: &mut MetadataMap, remap: F) -> Result<usize>
    where
        F: Fn(&Value) -> Value,
    {
        let values = self.column(map)?;
        let mut changed = 0;
        let remapped: Vec<Value> = values
            .iter()
            .map(|v| {
                let new = remap(v);
                if new != *v {
                    changed += 1;
                }
                new
            })
            .collect();
        map.set_column(&self.name, remapped)?;
        Ok(changed)
    }

    fn column<'m>(&self, map: &'m MetadataMap) -> Result<&'m [Value]> {
        map.column(&self.name).ok_or_else(|| CodebookError::MissingColumn {
            column: self.name.clone(),
        })
    }

    /// Export the log with a trailing "Write Log" marker.
    ///
    /// The marker is added to the returned table only.
    pub fn write_providence(&self) -> ProvenanceTable {
        tracing::debug!(column = %self.name, records = self.log.len(), "writing provenance");
        self.log.snapshot()
    }
}

/// Title-case each underscore-separated token of a column name.
pub fn default_clean_name(name: &str) -> String {
    name.split('_')
        .filter(|token| !token.is_empty())
        .map(|token| {
            let mut chars = token.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_clean_name() {
        assert_eq!(default_clean_name("player_name"), "Player Name");
        assert_eq!(default_clean_name("years_on_team"), "Years On Team");
        assert_eq!(default_clean_name("BMI"), "Bmi");
        assert_eq!(default_clean_name("age__years"), "Age Years");
    }

    #[test]
    fn test_rejects_empty_fields() {
        let err = Question::new("", "Samwell Hockey Players", DataType::Str).unwrap_err();
        assert!(matches!(err, CodebookError::Construction { field: "name", .. }));

        let err = Question::new("player_name", " ", DataType::Str).unwrap_err();
        assert!(matches!(err, CodebookError::Construction { field: "description", .. }));

        let err = Question::with_options(
            "player_name",
            "Samwell Hockey Players",
            DataType::Str,
            QuestionOptions::new().with_clean_name(""),
        )
        .unwrap_err();
        assert!(matches!(err, CodebookError::Construction { field: "clean_name", .. }));
    }

    #[test]
    fn test_failed_check_is_logged() {
        let map = MetadataMap::new("player", ["Bitty"]);
        let mut q = Question::new("player_name", "Samwell Hockey Players", DataType::Str).unwrap();

        assert!(q.check_map(&map).is_err());
        let record = q.log().last().unwrap();
        assert_eq!(record.command, "column check");
        assert_eq!(record.transform_type, TransformType::Validation);
    }

    #[test]
    fn test_missing_sentinels_survive_cast() {
        let mut map = MetadataMap::new("player", ["Bitty", "Ransom"])
            .with_column("years_on_team", ["2", "not provided"])
            .unwrap();
        let mut q = Question::new("years_on_team", "Seasons played", DataType::Int).unwrap();

        q.remap_dtype(&mut map).unwrap();
        assert_eq!(
            map.column("years_on_team").unwrap(),
            &[Value::Int(2), Value::from("not provided")]
        );
    }

    #[test]
    fn test_failed_cast_leaves_column_untouched() {
        let mut map = MetadataMap::new("player", ["Bitty", "Ransom", "Holster"])
            .with_column("team_captain", ["False", "TBD", "maybe"])
            .unwrap();
        let mut q = Question::new("team_captain", "Has the C or AC", DataType::Bool).unwrap();

        let err = q.remap_dtype(&mut map).unwrap_err();
        match err {
            CodebookError::Coercion { values, dtype, .. } => {
                assert_eq!(dtype, "bool");
                assert_eq!(values, vec!["TBD".to_string(), "maybe".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(map.get(0, "team_captain"), Some(&Value::from("False")));
        assert!(q.log().is_empty());
    }

    #[test]
    fn test_validate_reports_uncastable_values() {
        let map = MetadataMap::new("player", ["Bitty", "Ransom"])
            .with_column("years_on_team", ["2", "two"])
            .unwrap();
        let mut q = Question::new("years_on_team", "Seasons played", DataType::Int).unwrap();

        assert!(matches!(
            q.validate_map(&map),
            Err(CodebookError::InvalidValues { .. })
        ));
        assert_eq!(q.log().last().unwrap().transform_type, TransformType::Error);
    }
}

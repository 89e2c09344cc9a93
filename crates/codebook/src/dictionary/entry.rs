//! Declarative column entries as stored in a data dictionary file.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::question::{
    Bool, BoolOptions, Categorical, CategoricalOptions, Continuous, ContinuousOptions, Question,
    QuestionKind, QuestionOptions,
};
use crate::schema::{DataType, Value};

use super::column::{Column, Step};

/// One column of a data dictionary, tagged by `"type"`.
///
/// ```json
/// {
///   "type": "categorical",
///   "name": "position",
///   "description": "Position on the ice",
///   "dtype": "str",
///   "order": ["Striker", "D-man", "Goalie"],
///   "steps": ["validate", "convert_to_numeric"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnEntry {
    Question(QuestionEntry),
    Categorical(CategoricalEntry),
    Bool(BoolEntry),
    Continuous(ContinuousEntry),
}

/// A free-form column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionEntry {
    pub name: String,
    pub description: String,
    pub dtype: DataType,
    #[serde(flatten)]
    pub options: QuestionOptions,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<Step>,
}

/// A column with ranked categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalEntry {
    pub name: String,
    pub description: String,
    #[serde(default = "default_categorical_dtype")]
    pub dtype: DataType,
    pub order: Vec<Value>,
    #[serde(flatten)]
    pub options: CategoricalOptions,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<Step>,
}

/// A yes/no column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoolEntry {
    pub name: String,
    pub description: String,
    #[serde(flatten)]
    pub options: BoolOptions,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<Step>,
}

/// A numeric measurement column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousEntry {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dtype: Option<DataType>,
    #[serde(flatten)]
    pub options: ContinuousOptions,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<Step>,
}

fn default_categorical_dtype() -> DataType {
    DataType::Str
}

impl ColumnEntry {
    /// Column label in the map.
    pub fn name(&self) -> &str {
        match self {
            ColumnEntry::Question(e) => &e.name,
            ColumnEntry::Categorical(e) => &e.name,
            ColumnEntry::Bool(e) => &e.name,
            ColumnEntry::Continuous(e) => &e.name,
        }
    }

    /// Which kind of contract the entry builds.
    pub fn kind(&self) -> QuestionKind {
        match self {
            ColumnEntry::Question(_) => QuestionKind::Question,
            ColumnEntry::Categorical(_) => QuestionKind::Categorical,
            ColumnEntry::Bool(_) => QuestionKind::Bool,
            ColumnEntry::Continuous(_) => QuestionKind::Continuous,
        }
    }

    /// Cleaning steps to run, in order.
    pub fn steps(&self) -> &[Step] {
        match self {
            ColumnEntry::Question(e) => &e.steps,
            ColumnEntry::Categorical(e) => &e.steps,
            ColumnEntry::Bool(e) => &e.steps,
            ColumnEntry::Continuous(e) => &e.steps,
        }
    }

    /// Construct the column contract this entry describes.
    pub fn build(&self) -> Result<Column> {
        let column = match self.clone() {
            ColumnEntry::Question(e) => {
                Column::Question(Question::with_options(e.name, e.description, e.dtype, e.options)?)
            }
            ColumnEntry::Categorical(e) => Column::Categorical(Categorical::with_options(
                e.name,
                e.description,
                e.dtype,
                e.order,
                e.options,
            )?),
            ColumnEntry::Bool(e) => Column::Bool(Bool::with_options(e.name, e.description, e.options)?),
            ColumnEntry::Continuous(e) => Column::Continuous(Continuous::with_options(
                e.name,
                e.description,
                e.dtype,
                e.options,
            )?),
        };
        Ok(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_entries() {
        let json = r#"[
            {"type": "question", "name": "player_name", "description": "Player", "dtype": "str"},
            {"type": "categorical", "name": "position", "description": "Position",
             "order": ["Striker", "D-man", "Goalie"], "frequency_cutoff": 1,
             "steps": ["drop_infrequent"]},
            {"type": "bool", "name": "team_captain", "description": "Captain",
             "bool_format": ["True", "False"], "ambiguous_value": "TBD"},
            {"type": "continuous", "name": "years_on_team", "description": "Seasons",
             "limits": [2, 4], "unit": "years"}
        ]"#;
        let entries: Vec<ColumnEntry> = serde_json::from_str(json).unwrap();

        assert_eq!(entries.len(), 4);
        assert_eq!(entries[1].kind(), QuestionKind::Categorical);
        assert_eq!(entries[1].steps(), &[Step::DropInfrequent]);
        match &entries[1] {
            ColumnEntry::Categorical(e) => {
                assert_eq!(e.dtype, DataType::Str);
                assert_eq!(e.options.frequency_cutoff, Some(1));
            }
            other => panic!("unexpected entry: {other:?}"),
        }
        match &entries[3] {
            ColumnEntry::Continuous(e) => assert_eq!(e.options.limits, Some((2.0, 4.0))),
            other => panic!("unexpected entry: {other:?}"),
        }
    }

    #[test]
    fn test_build_propagates_construction_errors() {
        let entry: ColumnEntry = serde_json::from_str(
            r#"{"type": "continuous", "name": "years_on_team", "description": "Seasons",
                "limits": [4, 2]}"#,
        )
        .unwrap();
        assert!(entry.build().is_err());
    }

    #[test]
    fn test_unknown_dtype_is_rejected() {
        let result: std::result::Result<ColumnEntry, _> = serde_json::from_str(
            r#"{"type": "question", "name": "player_name", "description": "Player", "dtype": "complex"}"#,
        );
        assert!(result.is_err());
    }
}

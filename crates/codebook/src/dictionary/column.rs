//! Built column contracts and the cleaning steps they can run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CodebookError, Result};
use crate::question::{Bool, Categorical, ColumnContract, Continuous, Question, QuestionKind};
use crate::schema::MetadataMap;

/// A named operation a data dictionary can ask a column to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Check,
    Validate,
    RemapDtype,
    #[serde(alias = "remove_ambiguious")]
    RemoveAmbiguous,
    DropInfrequent,
    RemapNull,
    ConvertToNumeric,
    LabelOrder,
    ConvertToWord,
    DropOutliers,
}

impl Step {
    /// Name as written in a dictionary.
    pub fn name(&self) -> &'static str {
        match self {
            Step::Check => "check",
            Step::Validate => "validate",
            Step::RemapDtype => "remap_dtype",
            Step::RemoveAmbiguous => "remove_ambiguous",
            Step::DropInfrequent => "drop_infrequent",
            Step::RemapNull => "remap_null",
            Step::ConvertToNumeric => "convert_to_numeric",
            Step::LabelOrder => "label_order",
            Step::ConvertToWord => "convert_to_word",
            Step::DropOutliers => "drop_outliers",
        }
    }

    /// Whether a column of `kind` can run this step.
    pub fn supported_by(&self, kind: QuestionKind) -> bool {
        match self {
            Step::Check | Step::Validate | Step::RemapDtype => true,
            Step::RemoveAmbiguous
            | Step::DropInfrequent
            | Step::RemapNull
            | Step::ConvertToNumeric
            | Step::LabelOrder => matches!(kind, QuestionKind::Categorical | QuestionKind::Bool),
            Step::ConvertToWord => kind == QuestionKind::Bool,
            Step::DropOutliers => kind == QuestionKind::Continuous,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A constructed column contract of any kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Column {
    Question(Question),
    Categorical(Categorical),
    Bool(Bool),
    Continuous(Continuous),
}

impl Column {
    /// The contract behind the column as a trait object.
    pub fn contract(&self) -> &dyn ColumnContract {
        match self {
            Column::Question(q) => q,
            Column::Categorical(q) => q,
            Column::Bool(q) => q,
            Column::Continuous(q) => q,
        }
    }

    /// Mutable trait-object access to the contract.
    pub fn contract_mut(&mut self) -> &mut dyn ColumnContract {
        match self {
            Column::Question(q) => q,
            Column::Categorical(q) => q,
            Column::Bool(q) => q,
            Column::Continuous(q) => q,
        }
    }

    /// Column label in the map.
    pub fn name(&self) -> &str {
        self.contract().name()
    }

    /// Which kind of contract this is.
    pub fn kind(&self) -> QuestionKind {
        self.contract().kind()
    }

    /// The categorical part of the contract, if it has one.
    pub fn as_categorical_mut(&mut self) -> Option<&mut Categorical> {
        match self {
            Column::Categorical(q) => Some(q),
            Column::Bool(q) => Some(q.categorical_mut()),
            _ => None,
        }
    }

    /// Run one step against the map.
    pub fn apply(&mut self, step: Step, map: &mut MetadataMap) -> Result<()> {
        if !step.supported_by(self.kind()) {
            return Err(CodebookError::UnsupportedStep {
                column: self.name().to_string(),
                kind: self.kind().to_string(),
                step: step.to_string(),
            });
        }
        tracing::debug!(column = %self.name(), step = %step, "running step");

        match (step, self) {
            (Step::Check, column) => column.contract_mut().check_map(map),
            (Step::Validate, column) => column.contract_mut().validate_map(map),
            (Step::RemapDtype, column) => column.contract_mut().remap_dtype(map),
            (Step::ConvertToWord, Column::Bool(q)) => q.convert_to_word(map),
            (Step::DropOutliers, Column::Continuous(q)) => q.drop_outliers(map),
            (step, column) => {
                let kind = column.kind();
                let name = column.name().to_string();
                let Some(categorical) = column.as_categorical_mut() else {
                    return Err(CodebookError::UnsupportedStep {
                        column: name,
                        kind: kind.to_string(),
                        step: step.to_string(),
                    });
                };
                match step {
                    Step::RemoveAmbiguous => categorical.remove_ambiguous(map),
                    Step::DropInfrequent => categorical.drop_infrequent(map),
                    Step::RemapNull => categorical.remap_null(map),
                    Step::ConvertToNumeric => categorical.convert_to_numeric(map),
                    Step::LabelOrder => categorical.label_order(map),
                    _ => Err(CodebookError::UnsupportedStep {
                        column: name,
                        kind: kind.to_string(),
                        step: step.to_string(),
                    }),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DataType, Value};

    #[test]
    fn test_step_support() {
        assert!(Step::Validate.supported_by(QuestionKind::Question));
        assert!(Step::ConvertToNumeric.supported_by(QuestionKind::Bool));
        assert!(!Step::ConvertToWord.supported_by(QuestionKind::Categorical));
        assert!(!Step::DropOutliers.supported_by(QuestionKind::Bool));
    }

    #[test]
    fn test_unsupported_step_names_column() {
        let mut column = Column::Question(
            Question::new("player_name", "Samwell Hockey Players", DataType::Str).unwrap(),
        );
        let mut map = MetadataMap::new("player", ["Bitty"])
            .with_column("player_name", ["Eric Bittle"])
            .unwrap();

        match column.apply(Step::DropOutliers, &mut map).unwrap_err() {
            CodebookError::UnsupportedStep { column, kind, step } => {
                assert_eq!(column, "player_name");
                assert_eq!(kind, "question");
                assert_eq!(step, "drop_outliers");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bool_runs_categorical_steps() {
        let mut column = Column::Bool(Bool::new("team_captain", "Has the C").unwrap());
        let mut map = MetadataMap::new("player", ["Bitty", "Jack"])
            .with_column("team_captain", ["false", "true"])
            .unwrap();

        column.apply(Step::ConvertToNumeric, &mut map).unwrap();
        assert_eq!(map.column("team_captain").unwrap(), &[Value::Int(1), Value::Int(0)]);
    }
}

//! Column contracts.
//!
//! A contract describes what one column of a [`MetadataMap`] should look
//! like and knows how to check and clean it. The four kinds compose rather
//! than inherit:
//!
//! - [`Question`]: name, description, declared type, missing vocabulary
//! - [`Categorical`]: a `Question` plus a ranked list of categories
//! - [`Bool`]: a `Categorical` with two literals for true and false
//! - [`Continuous`]: a numeric `Question` with optional limits
//!
//! [`ColumnContract`] exposes the shared base behaviour of all of them.

mod base;
mod boolean;
mod categorical;
mod coerce;
mod continuous;
mod options;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::provenance::{ProvenanceLog, ProvenanceTable};
use crate::schema::MetadataMap;

pub use boolean::Bool;
pub use base::{default_clean_name, Question};
pub use categorical::Categorical;
pub use continuous::Continuous;
pub use options::{
    default_missing, BoolOptions, CategoricalOptions, ContinuousOptions, MissingValues,
    QuestionOptions, DEFAULT_MISSING,
};

/// The kind of a column contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Question,
    Categorical,
    Bool,
    Continuous,
}

impl QuestionKind {
    /// Lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            QuestionKind::Question => "question",
            QuestionKind::Categorical => "categorical",
            QuestionKind::Bool => "bool",
            QuestionKind::Continuous => "continuous",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Behaviour every column contract shares.
///
/// Implementors only provide access to their embedded [`Question`]; the
/// default methods forward to it. Kinds with their own rules override the
/// methods that differ.
pub trait ColumnContract {
    /// The embedded base contract.
    fn question(&self) -> &Question;

    /// Mutable access to the embedded base contract.
    fn question_mut(&mut self) -> &mut Question;

    /// Which kind of contract this is.
    fn kind(&self) -> QuestionKind;

    /// Column label in the map.
    fn name(&self) -> &str {
        self.question().name()
    }

    /// Accumulated provenance.
    fn log(&self) -> &ProvenanceLog {
        self.question().log()
    }

    /// Verify the column exists in the map.
    fn check_map(&mut self, map: &MetadataMap) -> Result<()> {
        self.question_mut().check_map(map)
    }

    /// Cast the column to the declared type.
    fn remap_dtype(&mut self, map: &mut MetadataMap) -> Result<()> {
        self.question_mut().remap_dtype(map)
    }

    /// Check the column's values against the contract.
    fn validate_map(&mut self, map: &MetadataMap) -> Result<()> {
        self.question_mut().validate_map(map)
    }

    /// Export the log with a trailing "Write Log" marker.
    fn write_providence(&self) -> ProvenanceTable {
        self.question().write_providence()
    }
}

impl ColumnContract for Question {
    fn question(&self) -> &Question {
        self
    }

    fn question_mut(&mut self) -> &mut Question {
        self
    }

    fn kind(&self) -> QuestionKind {
        QuestionKind::Question
    }
}

impl ColumnContract for Categorical {
    fn question(&self) -> &Question {
        Categorical::question(self)
    }

    fn question_mut(&mut self) -> &mut Question {
        Categorical::question_mut(self)
    }

    fn kind(&self) -> QuestionKind {
        QuestionKind::Categorical
    }

    fn remap_dtype(&mut self, map: &mut MetadataMap) -> Result<()> {
        Categorical::remap_dtype(self, map)
    }

    fn validate_map(&mut self, map: &MetadataMap) -> Result<()> {
        Categorical::validate_map(self, map)
    }
}

impl ColumnContract for Bool {
    fn question(&self) -> &Question {
        Bool::question(self)
    }

    fn question_mut(&mut self) -> &mut Question {
        Bool::question_mut(self)
    }

    fn kind(&self) -> QuestionKind {
        QuestionKind::Bool
    }

    fn remap_dtype(&mut self, map: &mut MetadataMap) -> Result<()> {
        Bool::remap_dtype(self, map)
    }

    fn validate_map(&mut self, map: &MetadataMap) -> Result<()> {
        self.categorical_mut().validate_map(map)
    }
}

impl ColumnContract for Continuous {
    fn question(&self) -> &Question {
        Continuous::question(self)
    }

    fn question_mut(&mut self) -> &mut Question {
        Continuous::question_mut(self)
    }

    fn kind(&self) -> QuestionKind {
        QuestionKind::Continuous
    }
}

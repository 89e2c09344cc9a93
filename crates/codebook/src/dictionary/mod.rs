//! Data dictionaries: the column contracts for a whole map, read from JSON.
//!
//! ```json
//! {
//!   "columns": [
//!     {"type": "question", "name": "player_name", "description": "Player", "dtype": "str"},
//!     {"type": "bool", "name": "team_captain", "description": "Has the C",
//!      "bool_format": ["True", "False"], "steps": ["remap_dtype", "convert_to_word"]}
//!   ]
//! }
//! ```

mod column;
mod entry;
mod persistence;
mod session;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::{CodebookError, Result};

pub use column::{Column, Step};
pub use entry::{BoolEntry, CategoricalEntry, ColumnEntry, ContinuousEntry, QuestionEntry};
pub use session::{ColumnOutcome, Session};

/// Every column contract of one map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataDictionary {
    /// Optional free-text description of the dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Column entries in the order they are processed.
    pub columns: Vec<ColumnEntry>,
}

impl DataDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry.
    pub fn with_column(mut self, entry: ColumnEntry) -> Self {
        self.columns.push(entry);
        self
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check whether the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Find an entry by column name.
    pub fn entry(&self, name: &str) -> Option<&ColumnEntry> {
        self.columns.iter().find(|e| e.name() == name)
    }

    /// Construct every column contract.
    ///
    /// Fails on the first invalid entry or on a column named twice.
    pub fn build(&self) -> Result<Vec<Column>> {
        let mut seen = IndexSet::new();
        self.columns
            .iter()
            .map(|entry| {
                if !seen.insert(entry.name()) {
                    return Err(CodebookError::construction(
                        "name",
                        format!("'{}' is described more than once", entry.name()),
                    ));
                }
                entry.build()
            })
            .collect()
    }
}

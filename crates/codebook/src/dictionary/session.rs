//! Running a dictionary's cleaning steps over one map.

use crate::error::{CodebookError, Result};
use crate::provenance::ProvenanceTable;
use crate::question::QuestionKind;
use crate::schema::MetadataMap;

use super::column::{Column, Step};
use super::DataDictionary;

/// Result of checking one column.
#[derive(Debug)]
pub struct ColumnOutcome {
    pub column: String,
    pub kind: QuestionKind,
    pub result: std::result::Result<(), CodebookError>,
}

impl ColumnOutcome {
    /// Whether the column passed.
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

/// Built columns and their steps, applied one column at a time.
#[derive(Debug, Clone)]
pub struct Session {
    columns: Vec<(Column, Vec<Step>)>,
}

impl Session {
    /// Build every column of a dictionary.
    pub fn from_dictionary(dictionary: &DataDictionary) -> Result<Self> {
        let built = dictionary.build()?;
        let columns = built
            .into_iter()
            .zip(&dictionary.columns)
            .map(|(column, entry)| (column, entry.steps().to_vec()))
            .collect();
        Ok(Self { columns })
    }

    /// Start from columns built elsewhere.
    pub fn new(columns: Vec<(Column, Vec<Step>)>) -> Self {
        Self { columns }
    }

    /// Columns in processing order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().map(|(column, _)| column)
    }

    /// Find a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns().find(|c| c.name() == name)
    }

    /// Check and validate every column without changing the map.
    ///
    /// Every column is checked even after a failure.
    pub fn validate(&mut self, map: &MetadataMap) -> Vec<ColumnOutcome> {
        self.columns
            .iter_mut()
            .map(|(column, _)| {
                let result = column.contract_mut().validate_map(map);
                if let Err(e) = &result {
                    tracing::warn!(column = %column.name(), error = %e, "validation failed");
                }
                ColumnOutcome {
                    column: column.name().to_string(),
                    kind: column.kind(),
                    result,
                }
            })
            .collect()
    }

    /// Run each column's steps in order, stopping at the first failure.
    pub fn run(&mut self, map: &mut MetadataMap) -> Result<()> {
        for (column, steps) in &mut self.columns {
            tracing::info!(column = %column.name(), steps = steps.len(), "cleaning column");
            for step in steps.iter() {
                column.apply(*step, map)?;
            }
        }
        Ok(())
    }

    /// Every column's provenance, one after another, each ending with its
    /// "Write Log" marker.
    pub fn provenance(&self) -> ProvenanceTable {
        let mut table = ProvenanceTable::new();
        for (column, _) in &self.columns {
            table.extend(column.contract().write_providence());
        }
        table
    }
}

//! The metadata map: a row-indexed table of named, typed columns.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::{CodebookError, Result};

use super::types::Value;

/// Tabular metadata with one row per entity and one column per attribute.
///
/// Columns are stored column-major and keep their insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataMap {
    /// Label of the index column (e.g. `sample_name`).
    index_name: String,
    /// Row labels.
    index: Vec<String>,
    /// Column data keyed by column label.
    columns: IndexMap<String, Vec<Value>>,
}

impl MetadataMap {
    /// Create an empty map with the given row labels.
    pub fn new<I, S>(index_name: impl Into<String>, index: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            index_name: index_name.into(),
            index: index.into_iter().map(Into::into).collect(),
            columns: IndexMap::new(),
        }
    }

    /// Builder form of [`MetadataMap::insert_column`].
    pub fn with_column<I, V>(mut self, name: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.insert_column(name, values.into_iter().map(Into::into).collect())?;
        Ok(self)
    }

    /// Add or replace a column. The column must have one value per row.
    pub fn insert_column(&mut self, name: impl Into<String>, values: Vec<Value>) -> Result<()> {
        let name = name.into();
        if values.len() != self.index.len() {
            return Err(CodebookError::Shape(format!(
                "column '{}' has {} values but the map has {} rows",
                name,
                values.len(),
                self.index.len()
            )));
        }
        self.columns.insert(name, values);
        Ok(())
    }

    /// Replace the values of an existing column.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) -> Result<()> {
        if !self.has_column(name) {
            return Err(CodebookError::MissingColumn {
                column: name.to_string(),
            });
        }
        self.insert_column(name, values)
    }

    /// Rename a column in place, keeping its position.
    pub fn rename_column(&mut self, from: &str, to: impl Into<String>) -> bool {
        match self.columns.get_index_of(from) {
            Some(idx) => {
                let to = to.into();
                if let Some((_, values)) = self.columns.shift_remove_index(idx) {
                    let (new_idx, _) = self.columns.insert_full(to, values);
                    self.columns.move_index(new_idx, idx);
                }
                true
            }
            None => false,
        }
    }

    /// Remove a column, returning its values.
    pub fn remove_column(&mut self, name: &str) -> Option<Vec<Value>> {
        self.columns.shift_remove(name)
    }

    /// Check whether a column label exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Get the values of a column.
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    /// Get all column labels in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(|k| k.as_str()).collect()
    }

    /// Get the number of columns (excluding the index).
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    /// Row labels.
    pub fn index(&self) -> &[String] {
        &self.index
    }

    /// Label of the index column.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Get a specific cell.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        self.columns.get(column).and_then(|c| c.get(row))
    }

    /// Overwrite a specific cell. Returns false if the cell does not exist.
    pub fn set(&mut self, row: usize, column: &str, value: impl Into<Value>) -> bool {
        match self.columns.get_mut(column).and_then(|c| c.get_mut(row)) {
            Some(cell) => {
                *cell = value.into();
                true
            }
            None => false,
        }
    }

    /// Get a cell by row label.
    pub fn get_by_label(&self, label: &str, column: &str) -> Option<&Value> {
        let row = self.index.iter().position(|l| l == label)?;
        self.get(row, column)
    }

    /// Distinct values of a column in first-seen order, including `Missing`.
    pub fn distinct_values(&self, name: &str) -> Option<IndexSet<Value>> {
        self.column(name).map(|c| c.iter().cloned().collect())
    }

    /// Frequency of each non-missing value of a column, in first-seen order.
    pub fn value_counts(&self, name: &str) -> Option<IndexMap<Value, usize>> {
        self.column(name).map(|c| {
            let mut counts: IndexMap<Value, usize> = IndexMap::new();
            for value in c.iter().filter(|v| !v.is_missing()) {
                *counts.entry(value.clone()).or_insert(0) += 1;
            }
            counts
        })
    }

    /// Iterate over rows as (label, cells) pairs.
    pub fn rows(&self) -> impl Iterator<Item = (&str, Vec<&Value>)> {
        self.index.iter().enumerate().map(move |(row, label)| {
            let cells = self.columns.values().map(|c| &c[row]).collect();
            (label.as_str(), cells)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hockey_map() -> MetadataMap {
        MetadataMap::new("player", ["Bitty", "Ransom", "Holster"])
            .with_column("years_on_team", ["2", "4", "4"])
            .unwrap()
            .with_column("position", ["Striker", "D-man", "D-man"])
            .unwrap()
    }

    #[test]
    fn test_basic_shape() {
        let map = hockey_map();
        assert_eq!(map.row_count(), 3);
        assert_eq!(map.column_names(), vec!["years_on_team", "position"]);
        assert_eq!(map.get(1, "position"), Some(&Value::from("D-man")));
        assert_eq!(map.get_by_label("Holster", "years_on_team"), Some(&Value::from("4")));
    }

    #[test]
    fn test_rejects_ragged_column() {
        let err = hockey_map().with_column("team_captain", ["True"]).unwrap_err();
        assert!(matches!(err, CodebookError::Shape(_)));
    }

    #[test]
    fn test_value_counts_skip_missing() {
        let mut map = hockey_map();
        map.set(0, "position", Value::Missing);
        let counts = map.value_counts("position").unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[&Value::from("D-man")], 2);
        assert!(map.distinct_values("position").unwrap().contains(&Value::Missing));
    }

    #[test]
    fn test_rename_keeps_position() {
        let mut map = hockey_map();
        assert!(map.rename_column("years_on_team", "seasons"));
        assert_eq!(map.column_names(), vec!["seasons", "position"]);
        assert!(!map.rename_column("goalie", "keeper"));
    }
}

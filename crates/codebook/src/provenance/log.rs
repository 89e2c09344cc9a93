//! Append-only provenance log for one column.

use serde::{Deserialize, Serialize};

use super::record::{ProvenanceRecord, TransformType};
use super::table::ProvenanceTable;

/// Command recorded on the marker row of an exported log.
pub const WRITE_LOG_COMMAND: &str = "Write Log";

/// Ordered audit trail of every action taken on a column.
///
/// Records can only be appended; nothing in the log is ever edited or removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceLog {
    column: String,
    records: Vec<ProvenanceRecord>,
}

impl ProvenanceLog {
    /// Create an empty log for a column.
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            records: Vec::new(),
        }
    }

    /// Append a record stamped with the current time.
    pub fn record(
        &mut self,
        command: impl Into<String>,
        transform_type: TransformType,
        transformation: impl Into<String>,
    ) -> &ProvenanceRecord {
        let record =
            ProvenanceRecord::now(self.column.clone(), command, transform_type, transformation);
        tracing::trace!(
            column = %record.column,
            command = %record.command,
            transform_type = %record.transform_type,
            "provenance recorded"
        );
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Column this log belongs to.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// All records in the order they were appended.
    pub fn records(&self) -> &[ProvenanceRecord] {
        &self.records
    }

    /// Iterate over the records.
    pub fn iter(&self) -> impl Iterator<Item = &ProvenanceRecord> {
        self.records.iter()
    }

    /// Most recent record.
    pub fn last(&self) -> Option<&ProvenanceRecord> {
        self.records.last()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether anything has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Export the log as a table with a trailing "Write Log" marker row.
    ///
    /// The marker only exists in the returned table; the live log is left as
    /// it was, so repeated exports never accumulate markers.
    pub fn snapshot(&self) -> ProvenanceTable {
        let mut rows = self.records.clone();
        rows.push(ProvenanceRecord::now(
            self.column.clone(),
            WRITE_LOG_COMMAND,
            TransformType::Recording,
            "",
        ));
        ProvenanceTable::from_records(rows)
    }
}

impl<'a> IntoIterator for &'a ProvenanceLog {
    type Item = &'a ProvenanceRecord;
    type IntoIter = std::slice::Iter<'a, ProvenanceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

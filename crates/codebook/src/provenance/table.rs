//! Tabular export of provenance logs.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CodebookError, Result};

use super::record::ProvenanceRecord;

/// Column headers of an exported provenance table, in order.
pub const PROVENANCE_COLUMNS: [&str; 5] = [
    "timestamp",
    "column",
    "command",
    "transform_type",
    "transformation",
];

/// A provenance log laid out as a table: one row per record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceTable {
    rows: Vec<ProvenanceRecord>,
}

impl ProvenanceTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap records that are already in order.
    pub fn from_records(rows: Vec<ProvenanceRecord>) -> Self {
        Self { rows }
    }

    /// Column headers.
    pub fn columns(&self) -> &'static [&'static str] {
        &PROVENANCE_COLUMNS
    }

    /// All rows.
    pub fn rows(&self) -> &[ProvenanceRecord] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check whether the table has any rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append the rows of another table after this one's.
    pub fn extend(&mut self, other: ProvenanceTable) {
        self.rows.extend(other.rows);
    }

    /// Values of one column of the table, by header name.
    pub fn column(&self, header: &str) -> Option<Vec<String>> {
        let extract: fn(&ProvenanceRecord) -> String = match header {
            "timestamp" => |r| r.timestamp.to_rfc3339(),
            "column" => |r| r.column.clone(),
            "command" => |r| r.command.clone(),
            "transform_type" => |r| r.transform_type.to_string(),
            "transformation" => |r| r.transformation.clone(),
            _ => return None,
        };
        Some(self.rows.iter().map(extract).collect())
    }

    /// Rows that belong to one map column.
    pub fn for_column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a ProvenanceRecord> {
        self.rows.iter().filter(move |r| r.column == column)
    }

    /// Write the table as delimited text with a header row.
    pub fn write_delimited<W: Write>(&self, writer: W, delimiter: u8) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_writer(writer);

        if self.rows.is_empty() {
            writer.write_record(PROVENANCE_COLUMNS)?;
        }
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Render the table as tab-separated text.
    pub fn to_tsv_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_delimited(&mut buffer, b'\t')?;
        String::from_utf8(buffer).map_err(|e| CodebookError::Parse {
            row: 0,
            column: 0,
            message: e.to_string(),
        })
    }

    /// Read a table previously written with [`ProvenanceTable::write_delimited`].
    pub fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        if headers.iter().ne(PROVENANCE_COLUMNS.iter().copied()) {
            return Err(CodebookError::Parse {
                row: 0,
                column: 0,
                message: format!(
                    "expected provenance headers [{}], found [{}]",
                    PROVENANCE_COLUMNS.join(", "),
                    headers.iter().collect::<Vec<_>>().join(", ")
                ),
            });
        }

        let rows = reader
            .deserialize::<ProvenanceRecord>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { rows })
    }

    /// Save the table as a TSV file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| CodebookError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let file = File::create(path).map_err(|e| CodebookError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.write_delimited(BufWriter::new(file), b'\t')
    }

    /// Load a table from a TSV file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| CodebookError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::read_delimited(BufReader::new(file), b'\t')
    }
}

impl FromIterator<ProvenanceRecord> for ProvenanceTable {
    fn from_iter<I: IntoIterator<Item = ProvenanceRecord>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provenance::{ProvenanceLog, TransformType};

    fn sample_table() -> ProvenanceTable {
        let mut log = ProvenanceLog::new("position");
        log.record(
            "convert to numeric",
            TransformType::Transformation,
            "Striker >>> 0 | D-man >>> 1 | Goalie >>> 2",
        );
        log.snapshot()
    }

    #[test]
    fn test_column_extraction() {
        let table = sample_table();
        assert_eq!(
            table.column("command").unwrap(),
            vec!["convert to numeric", "Write Log"]
        );
        assert_eq!(
            table.column("transform_type").unwrap(),
            vec!["transformation", "recording"]
        );
        assert!(table.column("nope").is_none());
    }

    #[test]
    fn test_tsv_has_fixed_headers() {
        let tsv = sample_table().to_tsv_string().unwrap();
        let header = tsv.lines().next().unwrap();
        assert_eq!(header, PROVENANCE_COLUMNS.join("\t"));
        assert!(tsv.contains("Striker >>> 0 | D-man >>> 1 | Goalie >>> 2"));
    }

    #[test]
    fn test_read_back_written_table() {
        let table = sample_table();
        let mut buffer = Vec::new();
        table.write_delimited(&mut buffer, b'\t').unwrap();

        let read = ProvenanceTable::read_delimited(buffer.as_slice(), b'\t').unwrap();
        assert_eq!(read, table);
    }

    #[test]
    fn test_rejects_foreign_headers() {
        let data = b"when\twhat\n2024-01-01\tsomething\n";
        let err = ProvenanceTable::read_delimited(&data[..], b'\t').unwrap_err();
        assert!(matches!(err, CodebookError::Parse { .. }));
    }

    #[test]
    fn test_empty_table_still_has_headers() {
        let tsv = ProvenanceTable::new().to_tsv_string().unwrap();
        assert_eq!(tsv.trim_end(), PROVENANCE_COLUMNS.join("\t"));
    }
}

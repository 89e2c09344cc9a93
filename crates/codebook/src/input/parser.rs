//! CSV/TSV parser with delimiter detection.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use sha2::{Digest, Sha256};

use super::source::{is_null_token, SourceMetadata, DEFAULT_NULL_TOKENS};
use crate::error::{CodebookError, Result};
use crate::schema::{MetadataMap, Value};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
    /// Cell text loaded as `Missing`, besides empty cells.
    pub null_tokens: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
            null_tokens: DEFAULT_NULL_TOKENS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Loads metadata maps from delimited text.
///
/// The first column is the row index. Null tokens load as [`Value::Missing`];
/// every other cell loads as text and is typed later by a column contract.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the map and metadata about its source.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(MetadataMap, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| CodebookError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(|e| CodebookError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let size_bytes = contents.len() as u64;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };

        let map = self.parse_bytes(&contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        tracing::debug!(
            path = %path.display(),
            format = %format,
            rows = map.row_count(),
            columns = map.column_count(),
            "loaded map"
        );

        let source = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            map.row_count(),
            map.column_count(),
        );

        Ok((map, source))
    }

    /// Parse text already in memory, detecting the delimiter if needed.
    pub fn parse_str(&self, text: &str) -> Result<MetadataMap> {
        let bytes = text.as_bytes();
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(bytes)?,
        };
        self.parse_bytes(bytes, delimiter)
    }

    fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<MetadataMap> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut records = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if self.config.max_rows.is_some_and(|max| row_idx >= max) {
                break;
            }
            records.push(result?);
        }

        let headers: Vec<String> = if self.config.has_header {
            reader.headers()?.iter().map(|s| s.trim().to_string()).collect()
        } else {
            match records.first() {
                Some(record) => std::iter::once("index".to_string())
                    .chain((1..record.len()).map(|i| format!("column_{}", i)))
                    .collect(),
                None => return Err(CodebookError::EmptyData("No data rows found".to_string())),
            }
        };

        if headers.len() < 2 {
            return Err(CodebookError::EmptyData(
                "Expected an index column and at least one data column".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        if let Some((col_idx, dup)) = headers.iter().enumerate().find(|(_, h)| !seen.insert(h.as_str())) {
            return Err(CodebookError::Parse {
                row: 0,
                column: col_idx,
                message: format!("duplicate column '{}'", dup),
            });
        }
        if records.is_empty() {
            return Err(CodebookError::EmptyData("No data rows found".to_string()));
        }

        let index: Vec<String> = records
            .iter()
            .map(|r| r.get(0).unwrap_or("").trim().to_string())
            .collect();
        let mut map = MetadataMap::new(headers[0].clone(), index);

        for (col_idx, header) in headers.iter().enumerate().skip(1) {
            let values = records
                .iter()
                .map(|record| match record.get(col_idx) {
                    Some(cell) if !is_null_token(cell, &self.config.null_tokens) => {
                        Value::Str(cell.trim().to_string())
                    }
                    _ => Value::Missing,
                })
                .collect();
            map.insert_column(header.clone(), values)?;
        }

        Ok(map)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Write a map as delimited text, index first. `Missing` becomes an empty cell.
pub fn write_map<W: Write>(map: &MetadataMap, writer: W, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    let mut header = vec![map.index_name()];
    header.extend(map.column_names());
    writer.write_record(&header)?;

    for (label, cells) in map.rows() {
        let mut record = vec![label.to_string()];
        record.extend(cells.iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

impl MetadataMap {
    /// Load a map from a delimited file with default parser settings.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Parser::new().parse_file(path).map(|(map, _)| map)
    }

    /// Save the map as delimited text; `.csv` files use commas, everything
    /// else tabs.
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

        let delimiter = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => b',',
            _ => b'\t',
        };
        let file = File::create(path).map_err(|e| CodebookError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        write_map(self, BufWriter::new(file), delimiter)
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(CodebookError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
        let variance =
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64;

        // Tabs win ties; they rarely appear inside values
        let score = if consistent {
            first_count * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOCKEY: &str = "player\tposition\tyears_on_team\n\
                          Bitty\tStriker\t2\n\
                          Ransom\tD-man\tNA\n\
                          Holster\tD-man\t4\n";

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_first_column_is_index() {
        let map = Parser::new().parse_str(HOCKEY).unwrap();
        assert_eq!(map.index_name(), "player");
        assert_eq!(map.index(), &["Bitty", "Ransom", "Holster"]);
        assert_eq!(map.column_names(), vec!["position", "years_on_team"]);
        assert_eq!(map.get(0, "position"), Some(&Value::from("Striker")));
    }

    #[test]
    fn test_null_tokens_load_as_missing() {
        let map = Parser::new().parse_str(HOCKEY).unwrap();
        assert_eq!(map.get(1, "years_on_team"), Some(&Value::Missing));
        assert_eq!(map.get(2, "years_on_team"), Some(&Value::from("4")));
    }

    #[test]
    fn test_category_like_tokens_are_kept() {
        let data = "player\tnickname\nBitty\tnone\nRansom\t-\nHolster\t.\n";
        let map = Parser::new().parse_str(data).unwrap();
        assert_eq!(
            map.column("nickname").unwrap(),
            &[Value::from("none"), Value::from("-"), Value::from(".")]
        );
    }

    #[test]
    fn test_configured_null_tokens() {
        let data = "player\tnickname\nBitty\tnone\nRansom\tNA\n";
        let parser = Parser::with_config(ParserConfig {
            null_tokens: vec!["none".to_string()],
            ..Default::default()
        });
        let map = parser.parse_str(data).unwrap();
        assert_eq!(map.column("nickname").unwrap(), &[Value::Missing, Value::from("NA")]);
    }

    #[test]
    fn test_rejects_duplicate_headers() {
        let err = Parser::new()
            .parse_str("player,position,position\nBitty,Striker,Striker\n")
            .unwrap_err();
        assert!(matches!(err, CodebookError::Parse { column: 2, .. }));
    }

    #[test]
    fn test_rejects_index_only() {
        let err = Parser::new().parse_str("player\nBitty\n").unwrap_err();
        assert!(matches!(err, CodebookError::EmptyData(_)));
    }

    #[test]
    fn test_write_renders_missing_as_empty() {
        let map = Parser::new().parse_str(HOCKEY).unwrap();
        let mut buffer = Vec::new();
        write_map(&map, &mut buffer, b'\t').unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().nth(2), Some("Ransom\tD-man\t"));
    }
}

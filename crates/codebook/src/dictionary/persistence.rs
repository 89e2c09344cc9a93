//! Persistence for data dictionaries - save/load JSON files.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::{CodebookError, Result};

use super::DataDictionary;

impl DataDictionary {
    /// Save the dictionary to a JSON file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use codebook::dictionary::DataDictionary;
    /// # fn example(dictionary: &DataDictionary) -> codebook::Result<()> {
    /// dictionary.save("hockey.dictionary.json")?;
    /// # Ok(())
    /// # }
    /// ```
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

        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        tracing::debug!(path = %path.display(), columns = self.len(), "saved dictionary");
        Ok(())
    }

    /// Load a dictionary from a JSON file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use codebook::dictionary::DataDictionary;
    /// let dictionary = DataDictionary::load("hockey.dictionary.json").unwrap();
    /// println!("Columns: {}", dictionary.len());
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| CodebookError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let dictionary: DataDictionary = serde_json::from_reader(BufReader::new(file))?;
        tracing::debug!(path = %path.display(), columns = dictionary.len(), "loaded dictionary");
        Ok(dictionary)
    }

    /// Parse a dictionary from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the dictionary as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

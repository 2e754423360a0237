//! Search history persistence
//!
//! Stores one flat record per executed search in a local file, one JSON
//! object per line. The store is not written by the search engine; the
//! caller appends a record after a search returns, then renders the
//! history table from `records()`.

use crate::error::{Error, Result};
use crate::search::SearchQuery;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Timestamp format used in history records
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One executed search, as persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Local time the search ran
    pub timestamp: String,
    /// Query text as entered
    pub query: String,
    /// Path of the document searched
    pub file_path: String,
    /// Partial-match mode flag
    pub partial: bool,
    /// Name target flag
    pub match_name: bool,
    /// Attribute target flag
    pub match_attributes: bool,
    /// Value target flag
    pub match_value: bool,
    /// Number of results returned
    pub result_count: usize,
}

impl HistoryRecord {
    /// Build a record for a search that just ran, stamped with the current
    /// local time
    pub fn from_search(query: &SearchQuery, file_path: &Path, result_count: usize) -> Self {
        HistoryRecord {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            query: query.tag.clone(),
            file_path: file_path.display().to_string(),
            partial: query.partial,
            match_name: query.match_name,
            match_attributes: query.match_attributes,
            match_value: query.match_value,
            result_count,
        }
    }
}

/// File-backed store of past searches
pub struct HistoryStore {
    path: PathBuf,
    records: Vec<HistoryRecord>,
}

impl HistoryStore {
    /// Open a history store at the given file path.
    ///
    /// A missing file yields an empty store; a malformed file is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = if path.exists() {
            read_records(&path)?
        } else {
            Vec::new()
        };
        debug!(path = %path.display(), count = records.len(), "history loaded");
        Ok(HistoryStore { path, records })
    }

    /// All records, oldest first
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    /// Append a record and persist immediately
    pub fn append(&mut self, record: HistoryRecord) -> Result<()> {
        self.records.push(record);
        self.save()
    }

    /// Remove one record by index and persist
    pub fn remove(&mut self, index: usize) -> Result<()> {
        if index >= self.records.len() {
            return Err(Error::Serialization(format!(
                "history index {} out of range",
                index
            )));
        }
        self.records.remove(index);
        self.save()
    }

    /// Drop all records; the backing file is removed
    pub fn clear(&mut self) -> Result<()> {
        self.records.clear();
        self.save()
    }

    /// Write all records to another file
    pub fn export(&self, path: impl AsRef<Path>) -> Result<()> {
        write_records(path.as_ref(), &self.records)
    }

    /// Replace the current records with those read from another file, and
    /// persist the result
    pub fn import(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let records = read_records(path.as_ref())?;
        self.records = records;
        self.save()
    }

    /// Persist the current records; an empty store removes the file
    fn save(&self) -> Result<()> {
        if self.records.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
            }
            return Ok(());
        }
        write_records(&self.path, &self.records)
    }
}

/// Read JSON-lines records from a file
fn read_records(path: &Path) -> Result<Vec<HistoryRecord>> {
    let content = fs::read_to_string(path)?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(Error::from))
        .collect()
}

/// Write records to a file, one JSON object per line
fn write_records(path: &Path, records: &[HistoryRecord]) -> Result<()> {
    let mut file = fs::File::create(path)?;
    for record in records {
        let line = serde_json::to_string(record)?;
        writeln!(file, "{}", line)?;
    }
    Ok(())
}

//! History Store
//!
//! The ordered table of recorded calculations for one session. Insertion
//! order is chronological order: timestamps assigned on insertion never go
//! backwards, even if the wall clock does.
//!
//! # Persistence
//!
//! The table round-trips through a CSV file with the header
//! `timestamp,a,b,operation,result`. Loading is all-or-nothing: the table is
//! only replaced once the whole file has been decoded.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime, SubsecRound};
use tracing::{debug, info, warn};

use crate::core::calculation::Calculation;
use crate::core::error::{CalcError, Result};
use crate::core::operations::Operation;
use crate::core::record::{CalculationRecord, CsvRow, CSV_HEADER};

/// File name of the default history file inside the data directory.
pub const DEFAULT_HISTORY_FILE: &str = "calculation_history.csv";

/// In-memory history table with CSV persistence.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    records: Vec<CalculationRecord>,
    default_path: PathBuf,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(PathBuf::from("data").join(DEFAULT_HISTORY_FILE))
    }
}

impl HistoryStore {
    /// Create an empty store whose save/load/delete default to `default_path`.
    pub fn new(default_path: impl Into<PathBuf>) -> Self {
        Self {
            records: Vec::new(),
            default_path: default_path.into(),
        }
    }

    /// The path used when no explicit path is given.
    pub fn default_path(&self) -> &Path {
        &self.default_path
    }

    fn resolve<'a>(&'a self, path: Option<&'a Path>) -> &'a Path {
        path.unwrap_or(&self.default_path)
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Append a calculation stamped with the current local time.
    pub fn add_calculation(&mut self, calculation: &Calculation) -> &CalculationRecord {
        self.add_calculation_at(calculation, Local::now().naive_local())
    }

    /// Append a calculation stamped with `timestamp`.
    ///
    /// A timestamp earlier than the latest record is raised to the latest
    /// record's timestamp.
    pub fn add_calculation_at(
        &mut self,
        calculation: &Calculation,
        timestamp: NaiveDateTime,
    ) -> &CalculationRecord {
        let mut timestamp = timestamp.trunc_subsecs(6);
        if let Some(last) = self.records.last() {
            timestamp = timestamp.max(last.timestamp);
        }

        let record = CalculationRecord::from_calculation(calculation, timestamp);
        debug!(
            operation = %record.operation,
            result = %record.result,
            "recorded calculation"
        );
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Remove every record.
    pub fn clear_history(&mut self) {
        info!(removed = self.records.len(), "history cleared");
        self.records.clear();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The full table in insertion order.
    pub fn get_history(&self) -> &[CalculationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recently appended record.
    pub fn get_latest(&self) -> Option<&CalculationRecord> {
        self.records.last()
    }

    /// Records whose operation label equals `name`, in original order.
    pub fn find_by_operation(&self, name: &str) -> Vec<CalculationRecord> {
        match Operation::from_name(name) {
            Some(operation) => self
                .records
                .iter()
                .filter(|r| r.operation == operation)
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Rebuild every row as a calculation, skipping rows that cannot be
    /// bound to their operation.
    pub fn to_calculation_list(&self) -> Vec<Calculation> {
        self.records
            .iter()
            .filter_map(CalculationRecord::to_calculation)
            .collect()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Write the table to `path` (or the default path) and return the path used.
    ///
    /// Missing parent directories are created.
    pub fn save_history(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = self.resolve(path).to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)?;
        writer.write_record(CSV_HEADER)?;
        for record in &self.records {
            writer.serialize(CsvRow::from(record))?;
        }
        writer.flush()?;

        info!(path = %path.display(), rows = self.records.len(), "history saved");
        Ok(path)
    }

    /// Replace the table with the contents of `path` (or the default path).
    ///
    /// Returns `false`, leaving the table untouched, if the file is missing
    /// or cannot be decoded.
    pub fn load_history(&mut self, path: Option<&Path>) -> bool {
        let path = self.resolve(path).to_path_buf();

        match read_history_file(&path) {
            Ok(records) => {
                info!(path = %path.display(), rows = records.len(), "history loaded");
                self.records = records;
                true
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "history not loaded");
                false
            }
        }
    }

    /// Delete the history file at `path` (or the default path).
    ///
    /// A missing file counts as failure.
    pub fn delete_history_file(&self, path: Option<&Path>) -> bool {
        let path = self.resolve(path);

        if !path.is_file() {
            warn!(path = %path.display(), "history file not found");
            return false;
        }

        match fs::remove_file(path) {
            Ok(()) => {
                info!(path = %path.display(), "history file deleted");
                true
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "history file not deleted");
                false
            }
        }
    }
}

/// Decode a whole history file.
///
/// Records come back in timestamp order; rows sharing a timestamp keep their
/// file order.
pub fn read_history_file(path: &Path) -> Result<Vec<CalculationRecord>> {
    if !path.is_file() {
        return Err(CalcError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;

    let headers = reader.headers()?.clone();
    for column in CSV_HEADER {
        if !headers.iter().any(|h| h == column) {
            return Err(CalcError::MalformedRow {
                line: 1,
                message: format!("missing column '{}'", column),
            });
        }
    }

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<CsvRow>().enumerate() {
        // header is line 1
        let line = index as u64 + 2;
        match row?.into_record(line)? {
            Some(record) => records.push(record),
            None => debug!(line, "skipped row with unknown operation"),
        }
    }

    if !records.windows(2).all(|w| w[0].timestamp <= w[1].timestamp) {
        debug!(path = %path.display(), "reordered rows by timestamp");
        records.sort_by_key(|r| r.timestamp);
    }

    Ok(records)
}

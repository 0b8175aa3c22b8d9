//! The in-memory record table the engine classifies.

use crate::classifier::Outcome;
use std::path::Path;

/// Required source-text column, matched exactly.
pub const SUMMARY_COLUMN: &str = "summary";

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("MissingRequiredColumn: input table has no {0:?} column")]
    MissingRequiredColumn(&'static str),
    #[error("CsvError: {0}")]
    Csv(#[from] csv::Error),
    #[error("IoError: {0}")]
    Io(#[from] std::io::Error),
}

/// One input row: its position, every original field, and the two label slots the runner fills.
#[derive(Debug, Clone)]
pub struct Record {
    pub row: usize,
    pub fields: Vec<String>,
    pub problem_label: Option<Outcome>,
    pub solution_label: Option<Outcome>,
}

/// The full input table, ordered as loaded. Records are created once at load time and never
/// removed; only their label slots are written during a run.
#[derive(Debug, Clone)]
pub struct RecordTable {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
    summary_idx: Option<usize>,
}

impl RecordTable {
    /// Build a table from headers and rows. The `summary` column is located here but its absence
    /// is only an error once a run starts, so partially-formed tables can still be inspected.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let summary_idx = headers.iter().position(|h| h == SUMMARY_COLUMN);
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(row, mut fields)| {
                fields.resize(headers.len(), String::new());
                Record {
                    row,
                    fields,
                    problem_label: None,
                    solution_label: None,
                }
            })
            .collect();
        Self {
            headers,
            records,
            summary_idx,
        }
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn from_csv_reader<R: std::io::Read>(reader: R) -> Result<Self, TableError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            rows.push(record.iter().map(|f| f.to_string()).collect());
        }
        Ok(Self::new(headers, rows))
    }

    /// Confirms the required text column is present. Called by the runner before any
    /// classification call is made.
    pub fn require_summary_column(&self) -> Result<(), TableError> {
        match self.summary_idx {
            Some(_) => Ok(()),
            None => Err(TableError::MissingRequiredColumn(SUMMARY_COLUMN)),
        }
    }

    /// Source text of the given row. Empty when the summary column is absent.
    pub fn summary(&self, row: usize) -> &str {
        match self.summary_idx {
            Some(idx) => self.records[row].fields.get(idx).map_or("", |s| s.as_str()),
            None => "",
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

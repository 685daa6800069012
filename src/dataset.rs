//! CSV dataset ingestion
//!
//! Loads a headered CSV file into a column-major table. Columns are typed on
//! load: a column is numeric when every non-empty cell parses as f64, text
//! otherwise. The table is read-only for the rest of the run.

use std::path::Path;
use thiserror::Error;

/// Errors for dataset loading and column access
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {message}")]
    Csv { path: String, message: String },

    #[error("dataset has no data rows")]
    Empty,

    #[error("row {row} has {actual} fields, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("no column named '{0}' (available: {1})")]
    MissingColumn(String, String),

    #[error("column '{0}' is not numeric")]
    NotNumeric(String),

    #[error("column '{0}' is not categorical text")]
    NotText(String),
}

pub type Result<T> = std::result::Result<T, DatasetError>;

fn map_csv_error(path: &str, error: csv::Error) -> DatasetError {
    let message = error.to_string();
    match error.into_kind() {
        csv::ErrorKind::Io(source) => DatasetError::Io {
            path: path.to_string(),
            source,
        },
        _ => DatasetError::Csv {
            path: path.to_string(),
            message,
        },
    }
}

/// A single typed column
#[derive(Debug, Clone)]
pub enum Column {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl Column {
    /// Human-readable type name for info output
    pub fn type_name(&self) -> &'static str {
        match self {
            Column::Numeric(_) => "numeric",
            Column::Text(_) => "text",
        }
    }
}

/// Column-major table with a header row
#[derive(Debug, Clone)]
pub struct Dataset {
    headers: Vec<String>,
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    /// Load a CSV file with a header row
    pub fn from_path(path: &Path) -> Result<Self> {
        let display = path.display().to_string();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)
            .map_err(|e| map_csv_error(&display, e))?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| map_csv_error(&display, e))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        let mut rows = 0usize;

        for (i, record) in reader.records().enumerate() {
            let record = record.map_err(|e| map_csv_error(&display, e))?;

            if record.len() != headers.len() {
                return Err(DatasetError::RaggedRow {
                    row: i + 2, // 1-based, after the header line
                    expected: headers.len(),
                    actual: record.len(),
                });
            }

            for (col, field) in record.iter().enumerate() {
                cells[col].push(field.to_string());
            }
            rows += 1;
        }

        if rows == 0 {
            return Err(DatasetError::Empty);
        }

        let columns = cells.into_iter().map(Self::type_column).collect();

        Ok(Self {
            headers,
            columns,
            rows,
        })
    }

    /// Infer a column type: numeric iff every non-empty cell parses as f64
    fn type_column(cells: Vec<String>) -> Column {
        let all_numeric = cells
            .iter()
            .filter(|c| !c.is_empty())
            .all(|c| c.parse::<f64>().is_ok());

        if all_numeric && cells.iter().any(|c| !c.is_empty()) {
            Column::Numeric(
                cells
                    .iter()
                    .map(|c| c.parse::<f64>().unwrap_or(f64::NAN))
                    .collect(),
            )
        } else {
            Column::Text(cells)
        }
    }

    /// Column names in file order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.headers.iter().position(|h| h == name).ok_or_else(|| {
            DatasetError::MissingColumn(name.to_string(), self.headers.join(", "))
        })
    }

    /// Typed column by name
    pub fn column(&self, name: &str) -> Result<&Column> {
        Ok(&self.columns[self.index_of(name)?])
    }

    /// Numeric column values by name
    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        match self.column(name)? {
            Column::Numeric(values) => Ok(values),
            Column::Text(_) => Err(DatasetError::NotNumeric(name.to_string())),
        }
    }

    /// Text column values by name
    pub fn text(&self, name: &str) -> Result<&[String]> {
        match self.column(name)? {
            Column::Text(values) => Ok(values),
            Column::Numeric(_) => Err(DatasetError::NotText(name.to_string())),
        }
    }

    /// (name, type) pairs for the info block of reports
    pub fn schema(&self) -> Vec<(String, &'static str)> {
        self.headers
            .iter()
            .zip(&self.columns)
            .map(|(h, c)| (h.clone(), c.type_name()))
            .collect()
    }
}

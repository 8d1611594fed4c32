use chrono::NaiveDate;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Failed to read historical series CSV '{path}'")]
    CsvRead {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("Required column '{0}' not found in historical series")]
    ColumnNotFound(String, #[source] PolarsError),

    #[error("Failed to convert column '{column}' to numeric values")]
    ColumnCast {
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error("Missing date value at row {row}")]
    MissingDate { row: usize },

    #[error("Unparseable date '{value}' at row {row}")]
    DateParse {
        row: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Dates must be strictly increasing: {previous} is followed by {next}")]
    UnorderedDates {
        previous: NaiveDate,
        next: NaiveDate,
    },

    #[error("Column '{column}' has {found} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Historical series '{0}' contains no rows")]
    EmptySeries(PathBuf),
}

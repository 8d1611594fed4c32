use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StationError {
    #[error("Failed to read station metadata CSV '{path}'")]
    CsvRead {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("Required column '{0}' not found in station metadata")]
    ColumnNotFound(String, #[source] PolarsError),

    #[error("Failed to convert metadata column '{column}'")]
    ColumnCast {
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error("Missing value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },

    #[error("Duplicate station code '{0}' in metadata")]
    DuplicateCode(String),

    #[error("Station metadata '{0}' contains no rows")]
    EmptyMetadata(PathBuf),
}

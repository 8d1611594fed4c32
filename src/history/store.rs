//! Loads the pre-imputed historical observation table from CSV.

use crate::history::error::HistoryError;
use crate::history::series::HistoricalSeries;
use chrono::NaiveDate;
use log::info;
use polars::prelude::*;
use std::path::Path;

/// Name of the date column in the historical series CSV.
pub const DATE_COLUMN: &str = "date";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reads a historical series CSV into a validated [`HistoricalSeries`].
///
/// The file must carry a `date` column in `YYYY-MM-DD` form; every other
/// column is read as `f64`, with empty cells mapped to `NaN`.
pub fn load_historical_series(path: &Path) -> Result<HistoricalSeries, HistoryError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| HistoryError::CsvRead {
            path: path.to_path_buf(),
            source: e,
        })?
        .finish()
        .map_err(|e| HistoryError::CsvRead {
            path: path.to_path_buf(),
            source: e,
        })?;

    if df.height() == 0 {
        return Err(HistoryError::EmptySeries(path.to_path_buf()));
    }

    let dates = extract_dates(&df)?;

    let mut columns = Vec::with_capacity(df.width().saturating_sub(1));
    for column in df.get_columns() {
        let name = column.name().as_str();
        if name == DATE_COLUMN {
            continue;
        }
        columns.push((name.to_string(), extract_floats(column, name)?));
    }

    let series = HistoricalSeries::new(dates, columns)?;
    info!(
        "Loaded historical series from {:?}: {} rows, {} stations",
        path,
        series.len(),
        series.target_columns().len()
    );
    Ok(series)
}

fn extract_dates(df: &DataFrame) -> Result<Vec<NaiveDate>, HistoryError> {
    let column = df
        .column(DATE_COLUMN)
        .map_err(|e| HistoryError::ColumnNotFound(DATE_COLUMN.to_string(), e))?;
    let as_str = column
        .cast(&DataType::String)
        .map_err(|e| HistoryError::ColumnCast {
            column: DATE_COLUMN.to_string(),
            source: e,
        })?;
    let chunked = as_str.str().map_err(|e| HistoryError::ColumnCast {
        column: DATE_COLUMN.to_string(),
        source: e,
    })?;

    let mut dates = Vec::with_capacity(df.height());
    for (row, value) in chunked.into_iter().enumerate() {
        let value = value.ok_or(HistoryError::MissingDate { row })?;
        let date = NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| {
            HistoryError::DateParse {
                row,
                value: value.to_string(),
                source: e,
            }
        })?;
        dates.push(date);
    }
    Ok(dates)
}

fn extract_floats(column: &Column, name: &str) -> Result<Vec<f64>, HistoryError> {
    let as_f64 = column
        .cast(&DataType::Float64)
        .map_err(|e| HistoryError::ColumnCast {
            column: name.to_string(),
            source: e,
        })?;
    let chunked = as_f64.f64().map_err(|e| HistoryError::ColumnCast {
        column: name.to_string(),
        source: e,
    })?;
    Ok(chunked
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_csv_with_missing_cells() {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        writeln!(file, "date,tmin_a,prec_x").unwrap();
        writeln!(file, "2024-01-01,3.5,0.0").unwrap();
        writeln!(file, "2024-01-02,,1.5").unwrap();
        writeln!(file, "2024-01-03,4.25,").unwrap();
        file.flush().unwrap();

        let series = load_historical_series(file.path()).unwrap();
        assert_eq!(series.len(), 3);
        let tmin = series.column("tmin_a").unwrap();
        assert_eq!(tmin[0], 3.5);
        assert!(tmin[1].is_nan());
        assert_eq!(tmin[2], 4.25);
        let prec = series.column("prec_x").unwrap();
        assert!(prec[2].is_nan());
        assert_eq!(series.target_columns().len(), 1);
    }

    #[test]
    fn rejects_bad_dates() {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        writeln!(file, "date,tmin_a").unwrap();
        writeln!(file, "01/02/2024,3.5").unwrap();
        file.flush().unwrap();

        let err = load_historical_series(file.path()).unwrap_err();
        assert!(matches!(err, HistoryError::DateParse { row: 0, .. }));
    }
}

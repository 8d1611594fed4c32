//! Loads station reference metadata from CSV.

use crate::stations::error::StationError;
use crate::types::station::StationMetadata;
use log::info;
use polars::prelude::*;
use std::collections::HashMap;
use std::path::Path;

const COL_CODE: &str = "code";
const COL_NAME: &str = "name";
const COL_LAT: &str = "lat";
const COL_LON: &str = "lon";
const COL_ALT: &str = "alt";

/// Reads a `code,name,lat,lon,alt` CSV into a map keyed by station code.
pub fn load_station_metadata(
    path: &Path,
) -> Result<HashMap<String, StationMetadata>, StationError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| StationError::CsvRead {
            path: path.to_path_buf(),
            source: e,
        })?
        .finish()
        .map_err(|e| StationError::CsvRead {
            path: path.to_path_buf(),
            source: e,
        })?;

    if df.height() == 0 {
        return Err(StationError::EmptyMetadata(path.to_path_buf()));
    }

    let codes = string_column(&df, COL_CODE)?;
    let names = string_column(&df, COL_NAME)?;
    let lats = float_column(&df, COL_LAT)?;
    let lons = float_column(&df, COL_LON)?;
    let alts = float_column(&df, COL_ALT)?;

    let mut stations = HashMap::with_capacity(df.height());
    for row in 0..df.height() {
        let code = codes[row]
            .clone()
            .ok_or_else(|| missing(COL_CODE, row))?;
        let name = names[row]
            .clone()
            .ok_or_else(|| missing(COL_NAME, row))?;
        let station = StationMetadata {
            code: code.clone(),
            name,
            lat: lats[row].ok_or_else(|| missing(COL_LAT, row))?,
            lon: lons[row].ok_or_else(|| missing(COL_LON, row))?,
            altitude_m: alts[row].ok_or_else(|| missing(COL_ALT, row))?,
        };
        if stations.insert(code.clone(), station).is_some() {
            return Err(StationError::DuplicateCode(code));
        }
    }
    info!("Loaded metadata for {} stations from {:?}", stations.len(), path);
    Ok(stations)
}

fn missing(column: &str, row: usize) -> StationError {
    StationError::MissingValue {
        column: column.to_string(),
        row,
    }
}

fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, StationError> {
    let column = df
        .column(name)
        .map_err(|e| StationError::ColumnNotFound(name.to_string(), e))?;
    let cast = column
        .cast(&DataType::String)
        .map_err(|e| StationError::ColumnCast {
            column: name.to_string(),
            source: e,
        })?;
    let chunked = cast.str().map_err(|e| StationError::ColumnCast {
        column: name.to_string(),
        source: e,
    })?;
    Ok(chunked
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, StationError> {
    let column = df
        .column(name)
        .map_err(|e| StationError::ColumnNotFound(name.to_string(), e))?;
    let cast = column
        .cast(&DataType::Float64)
        .map_err(|e| StationError::ColumnCast {
            column: name.to_string(),
            source: e,
        })?;
    let chunked = cast.f64().map_err(|e| StationError::ColumnCast {
        column: name.to_string(),
        source: e,
    })?;
    Ok(chunked.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_metadata_keyed_by_code() {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        writeln!(file, "code,name,lat,lon,alt").unwrap();
        writeln!(file, "21205880,Flores Chibcha,4.7897,-74.2648,2600").unwrap();
        writeln!(file, "21206060,Vega Alta,4.75,-74.3,2550").unwrap();
        file.flush().unwrap();

        let stations = load_station_metadata(file.path()).unwrap();
        assert_eq!(stations.len(), 2);
        let primary = &stations["21205880"];
        assert_eq!(primary.name, "Flores Chibcha");
        assert!((primary.lat - 4.7897).abs() < 1e-9);
        assert_eq!(primary.altitude_m, 2600.0);
    }

    #[test]
    fn duplicate_codes_are_rejected() {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        writeln!(file, "code,name,lat,lon,alt").unwrap();
        writeln!(file, "1,A,0,0,0").unwrap();
        writeln!(file, "1,B,1,1,1").unwrap();
        file.flush().unwrap();

        let err = load_station_metadata(file.path()).unwrap_err();
        assert!(matches!(err, StationError::DuplicateCode(code) if code == "1"));
    }
}

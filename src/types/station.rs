//! Reference metadata for the weather stations served by the predictor.

use serde::{Deserialize, Serialize};

/// A fixed-location weather station producing a daily minimum-temperature
/// series (and optionally precipitation / maximum-temperature covariates).
///
/// Loaded once from the metadata store and never mutated afterwards.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StationMetadata {
    /// Unique station code (e.g. "21205880").
    pub code: String,
    /// Display name of the station.
    pub name: String,
    /// Latitude in decimal degrees (positive north).
    pub lat: f64,
    /// Longitude in decimal degrees (positive east).
    pub lon: f64,
    /// Elevation above sea level in meters.
    pub altitude_m: f64,
}

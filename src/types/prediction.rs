//! Result types produced by a prediction run.

use crate::types::risk::RiskTier;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Next-day forecast for a single station.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StationPrediction {
    /// Station code the forecast belongs to.
    pub code: String,
    /// Station display name.
    pub name: String,
    /// Predicted next-day minimum temperature in °C.
    pub temperature_c: f64,
    /// Frost probability as a percentage in `[0, 100]`.
    pub frost_probability_pct: f64,
    /// Whether the frost classifier's decision score was positive.
    pub frost_expected: bool,
    /// Risk tier derived from `temperature_c`.
    pub risk: RiskTier,
    /// Station latitude in decimal degrees.
    pub lat: f64,
    /// Station longitude in decimal degrees.
    pub lon: f64,
    /// Station elevation in meters.
    pub altitude_m: f64,
}

/// One complete prediction run over all known stations.
///
/// Batches are immutable once assembled; the predictor caches the most recent
/// one and returns it unchanged for repeated queries of the same date.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PredictionBatch {
    /// The (day-granular) date the query was made for.
    pub query_date: NaiveDate,
    /// The date being forecast: always `query_date + 1 day`.
    pub prediction_date: NaiveDate,
    /// Number of history rows the models were fed.
    pub rows_used: usize,
    /// True when the history had to be extended with synthetic
    /// (climatological-mean) rows to reach `query_date`.
    pub synthetic_tail: bool,
    /// Per-station forecasts; stations that failed are absent.
    pub stations: Vec<StationPrediction>,
}

impl PredictionBatch {
    /// Looks up the forecast for a station code, if it survived the run.
    pub fn station(&self, code: &str) -> Option<&StationPrediction> {
        self.stations.iter().find(|p| p.code == code)
    }
}

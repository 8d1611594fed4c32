//! Tunable parameters for the prediction pipeline.
//!
//! These were fixed constants in earlier revisions of the pipeline; they are
//! grouped here so deployments can adjust them without touching the core.

/// Configuration for a [`crate::Predictor`] and the spatial interpolator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictorConfig {
    /// Minimum number of usable history rows required to attempt a batch.
    pub min_history_rows: usize,
    /// Standard deviation (degrees Celsius) of the Gaussian noise added to
    /// synthetic minimum-temperature values produced by the gap filler.
    pub noise_sigma_c: f64,
    /// Distance (kilometers) under which an interpolation query snaps to the
    /// nearest station's value instead of weighting all stations.
    pub near_station_km: f64,
    /// Default exponent for inverse-distance weighting.
    pub idw_power: f64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            min_history_rows: 50,
            noise_sigma_c: 0.5,
            near_station_km: 0.1,
            idw_power: 2.0,
        }
    }
}

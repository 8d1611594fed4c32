//! The prediction pipeline: gap-fill, truncate, featurize and score every
//! station for a query date, assembling one [`PredictionBatch`].

use crate::config::PredictorConfig;
use crate::features::{frost_features, temperature_features, FeatureError};
use crate::history::gap_filler::GapFiller;
use crate::history::series::{HistoricalSeries, MAX_TEMP_PREFIX, PRECIPITATION_PREFIX};
use crate::models::error::ModelError;
use crate::models::registry::ModelRegistry;
use crate::types::prediction::{PredictionBatch, StationPrediction};
use crate::types::risk::RiskTier;
use crate::types::station::StationMetadata;
use bon::bon;
use chrono::{Days, Local, NaiveDate};
use log::{debug, info, warn};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Errors that abort a whole prediction run.
///
/// Per-station problems never surface here; those stations are logged and
/// dropped from the batch instead.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("The historical series contains no rows")]
    EmptyHistory,
    #[error("Only {rows} history rows available, {required} required")]
    InsufficientData { rows: usize, required: usize },
    #[error("No station produced a prediction for {date}")]
    NoPredictions { date: NaiveDate },
}

/// Why one station was dropped from a batch.
#[derive(Debug, Error)]
enum StationFailure {
    #[error("no metadata for this station")]
    MissingMetadata,
    #[error("no models resolved for this station")]
    MissingModels,
    #[error(transparent)]
    Feature(#[from] FeatureError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Summary statistics over the loaded history, per target column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetStats {
    pub code: String,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Days with a recorded minimum at or below 0 °C.
    pub frost_days: usize,
    pub frost_share_pct: Option<f64>,
}

/// Shape and per-station summary of the loaded history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryStats {
    pub rows: usize,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub targets: Vec<TargetStats>,
}

/// Scores every station's next-day minimum temperature and frost probability
/// for a query date.
///
/// The predictor owns an immutable history table, station metadata and a
/// resolved model registry. Batches are cached by query date; repeated calls
/// for the same date return the cached batch unchanged, so the Gaussian noise
/// injected into any synthetic tail is sampled at most once per date.
#[derive(Debug)]
pub struct Predictor {
    config: PredictorConfig,
    history: HistoricalSeries,
    stations: HashMap<String, StationMetadata>,
    registry: ModelRegistry,
    gap_filler: GapFiller,
    cache: Mutex<Option<PredictionBatch>>,
}

impl Predictor {
    /// Assembles a predictor over an already-loaded history, metadata map and
    /// registry. The history must contain at least one row.
    pub fn new(
        history: HistoricalSeries,
        stations: HashMap<String, StationMetadata>,
        registry: ModelRegistry,
        config: PredictorConfig,
    ) -> Result<Self, PredictError> {
        if history.is_empty() {
            return Err(PredictError::EmptyHistory);
        }
        let gap_filler = GapFiller::new(config.noise_sigma_c);
        Ok(Self {
            config,
            history,
            stations,
            registry,
            gap_filler,
            cache: Mutex::new(None),
        })
    }

    /// Summary statistics of the loaded history.
    pub fn history_stats(&self) -> HistoryStats {
        let dates = self.history.dates();
        let targets = self
            .history
            .target_columns()
            .into_iter()
            .map(|(code, column)| {
                let values = self.history.column(&column).unwrap_or(&[]);
                let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
                let frost_days = finite.iter().filter(|v| **v <= 0.0).count();
                TargetStats {
                    code,
                    mean: (!finite.is_empty())
                        .then(|| finite.iter().sum::<f64>() / finite.len() as f64),
                    min: finite.iter().copied().reduce(f64::min),
                    max: finite.iter().copied().reduce(f64::max),
                    frost_days,
                    frost_share_pct: (!finite.is_empty())
                        .then(|| 100.0 * frost_days as f64 / finite.len() as f64),
                }
            })
            .collect();
        HistoryStats {
            rows: dates.len(),
            start: dates[0],
            end: dates[dates.len() - 1],
            targets,
        }
    }

    fn compute_batch(&self, query_date: NaiveDate) -> Result<PredictionBatch, PredictError> {
        let mut rng = rand::rng();
        let filled = self.gap_filler.fill(&self.history, query_date, &mut rng);
        let series = filled.up_to(query_date);

        if series.len() < self.config.min_history_rows {
            return Err(PredictError::InsufficientData {
                rows: series.len(),
                required: self.config.min_history_rows,
            });
        }

        let mut stations = Vec::new();
        for (code, column) in series.target_columns() {
            match self.predict_station(&series, &code, &column) {
                Ok(prediction) => stations.push(prediction),
                Err(e) => warn!("Skipping station {code} for {query_date}: {e}"),
            }
        }
        if stations.is_empty() {
            return Err(PredictError::NoPredictions { date: query_date });
        }

        // The constructor guarantees a non-empty history.
        let synthetic_tail = self
            .history
            .last_date()
            .is_some_and(|last| query_date > last);
        info!(
            "Predicted {} stations for {} ({} rows{})",
            stations.len(),
            query_date,
            series.len(),
            if synthetic_tail { ", synthetic tail" } else { "" }
        );
        Ok(PredictionBatch {
            query_date,
            prediction_date: query_date
                .checked_add_days(Days::new(1))
                .unwrap_or(NaiveDate::MAX),
            rows_used: series.len(),
            synthetic_tail,
            stations,
        })
    }

    fn predict_station(
        &self,
        series: &HistoricalSeries,
        code: &str,
        column: &str,
    ) -> Result<StationPrediction, StationFailure> {
        let meta = self
            .stations
            .get(code)
            .ok_or(StationFailure::MissingMetadata)?;
        let models = self
            .registry
            .models_for(code)
            .ok_or(StationFailure::MissingModels)?;
        let set = models.feature_set();
        let pair = models.pair();

        let target = series.column(column).unwrap_or(&[]);
        let keep: Vec<usize> = (0..target.len())
            .filter(|&i| target[i].is_finite())
            .collect();
        let dates: Vec<NaiveDate> = keep.iter().map(|&i| series.dates()[i]).collect();
        let target: Vec<f64> = keep.iter().map(|&i| target[i]).collect();
        debug!(
            "Station {code}: {} usable rows, {:?} feature layout",
            target.len(),
            set
        );

        let temp_table = temperature_features(&dates, &target, set);
        let temp_row = temp_table.latest_complete_row()?;
        let temperature_c = pair.temperature.score(&temp_row)?;

        let prec = covariate_columns(series, PRECIPITATION_PREFIX, &keep);
        let tmax = covariate_columns(series, MAX_TEMP_PREFIX, &keep);
        let frost_table = frost_features(&dates, &target, &prec, &tmax, set);
        let frost_row = frost_table.latest_complete_row()?;
        let frost_score = pair.frost.score(&frost_row)?;
        let frost_probability_pct = 100.0 * (1.0 / (1.0 + (-frost_score).exp()));

        Ok(StationPrediction {
            code: code.to_string(),
            name: meta.name.clone(),
            temperature_c,
            frost_probability_pct,
            frost_expected: frost_score > 0.0,
            risk: RiskTier::from_temperature(temperature_c),
            lat: meta.lat,
            lon: meta.lon,
            altitude_m: meta.altitude_m,
        })
    }
}

#[bon]
impl Predictor {
    /// Produces (or returns the cached) prediction batch for a query date.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.query_date(NaiveDate)`: Optional. The day the query is made for;
    ///   the forecast targets the following day. Defaults to the current
    ///   local date.
    /// * `.force_recompute(bool)`: Optional. Discards any cached batch for
    ///   this date and recomputes. Defaults to `false`.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::InsufficientData`] when the truncated history
    /// is shorter than the configured minimum, and
    /// [`PredictError::NoPredictions`] when every station fails.
    #[builder]
    pub fn predict(
        &self,
        query_date: Option<NaiveDate>,
        force_recompute: Option<bool>,
    ) -> Result<PredictionBatch, PredictError> {
        let query_date = query_date.unwrap_or_else(|| Local::now().date_naive());
        let force_recompute = force_recompute.unwrap_or(false);

        // The lock is held across check and recompute so concurrent callers
        // asking for the same date get one computation, not several.
        let mut cache = self.cache.lock();
        if !force_recompute {
            if let Some(batch) = cache.as_ref() {
                if batch.query_date == query_date {
                    debug!("Returning cached batch for {query_date}");
                    return Ok(batch.clone());
                }
            }
        }
        let batch = self.compute_batch(query_date)?;
        *cache = Some(batch.clone());
        Ok(batch)
    }
}

/// Extracts prefixed covariate columns restricted to `keep` rows, filling any
/// remaining missing value with the column mean so a sparse covariate never
/// erases a station's frost features.
fn covariate_columns(
    series: &HistoricalSeries,
    prefix: &str,
    keep: &[usize],
) -> Vec<(String, Vec<f64>)> {
    series
        .columns_with_prefix(prefix)
        .into_iter()
        .map(|(name, values)| {
            let mut column: Vec<f64> = keep.iter().map(|&i| values[i]).collect();
            let finite: Vec<f64> = column.iter().copied().filter(|v| v.is_finite()).collect();
            let fill = if finite.is_empty() {
                0.0
            } else {
                finite.iter().sum::<f64>() / finite.len() as f64
            };
            for v in &mut column {
                if !v.is_finite() {
                    *v = fill;
                }
            }
            (name.to_string(), column)
        })
        .collect()
}

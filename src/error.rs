use crate::features::FeatureError;
use crate::history::error::HistoryError;
use crate::models::error::ModelError;
use crate::predictor::PredictError;
use crate::stations::error::StationError;
use thiserror::Error;

/// Top-level error for the frostcast pipeline, wrapping each stage's own
/// error type.
#[derive(Debug, Error)]
pub enum FrostcastError {
    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Station(#[from] StationError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error(transparent)]
    Predict(#[from] PredictError),
}

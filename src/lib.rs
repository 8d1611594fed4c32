mod config;
mod error;
mod features;
mod history;
mod models;
mod predictor;
mod spatial;
mod stations;
mod types;

pub use config::PredictorConfig;
pub use error::FrostcastError;
pub use predictor::{HistoryStats, PredictError, Predictor, TargetStats};
pub use spatial::{point_in_region, SpatialInterpolator};

pub use types::prediction::{PredictionBatch, StationPrediction};
pub use types::risk::RiskTier;
pub use types::station::StationMetadata;

pub use history::error::HistoryError;
pub use history::gap_filler::GapFiller;
pub use history::series::{
    HistoricalSeries, MAX_TEMP_PREFIX, PRECIPITATION_PREFIX, TARGET_PREFIX,
};
pub use history::store::load_historical_series;

pub use features::{
    frost_features, temperature_features, FeatureError, FeatureRow, FeatureSet, FeatureTable,
};

pub use models::artifact::{
    ArtifactKind, ArtifactPair, LinearModel, Model, ModelArtifact, StandardScaler,
};
pub use models::error::ModelError;
pub use models::registry::{
    ModelRegistry, ModelTopology, StationModels, UNIFIED_STATION_ID,
};
pub use models::store::{ArtifactStore, JsonArtifactStore};

pub use stations::error::StationError;
pub use stations::metadata_loader::load_station_metadata;

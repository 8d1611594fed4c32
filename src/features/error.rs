use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("No fully populated rows remain after feature windowing")]
    NoCompleteRows,
}

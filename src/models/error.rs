use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to read model artifact '{0}'")]
    ArtifactRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse model artifact '{0}'")]
    ArtifactParse(PathBuf, #[source] serde_json::Error),

    #[error("Artifact '{path}' is inconsistent: {detail}")]
    ArtifactShape { path: PathBuf, detail: String },

    #[error("Model input has {found} values, expected {expected}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("Required feature '{0}' is missing from the feature row")]
    MissingFeature(String),

    #[error("No model artifacts could be loaded for any station")]
    NoArtifacts,
}

//! Artifact loading from an external, immutable store.

use crate::models::artifact::{ArtifactKind, LinearModel, ModelArtifact, StandardScaler};
use crate::models::error::ModelError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Source of pretrained artifacts, loaded once per registry lifetime.
pub trait ArtifactStore {
    fn load(&self, station: &str, kind: ArtifactKind) -> Result<ModelArtifact, ModelError>;
}

/// On-disk JSON payload of one artifact file.
#[derive(Debug, Deserialize)]
struct ArtifactFile {
    feature_names: Vec<String>,
    scaler: StandardScaler,
    model: LinearModel,
}

/// Loads `<station>_<kind>.json` artifact files from a directory.
///
/// Each file holds `{feature_names, scaler: {mean, scale}, model:
/// {coefficients, intercept}}` with all four vectors of equal length.
#[derive(Debug, Clone)]
pub struct JsonArtifactStore {
    dir: PathBuf,
}

impl JsonArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn artifact_path(&self, station: &str, kind: ArtifactKind) -> PathBuf {
        self.dir.join(format!("{station}_{kind}.json"))
    }
}

impl ArtifactStore for JsonArtifactStore {
    fn load(&self, station: &str, kind: ArtifactKind) -> Result<ModelArtifact, ModelError> {
        let path = self.artifact_path(station, kind);
        let raw = std::fs::read(&path).map_err(|e| ModelError::ArtifactRead(path.clone(), e))?;
        let file: ArtifactFile = serde_json::from_slice(&raw)
            .map_err(|e| ModelError::ArtifactParse(path.clone(), e))?;
        validate_shapes(&path, &file)?;
        Ok(ModelArtifact {
            feature_names: file.feature_names,
            scaler: file.scaler,
            model: Box::new(file.model),
        })
    }
}

fn validate_shapes(path: &Path, file: &ArtifactFile) -> Result<(), ModelError> {
    let expected = file.feature_names.len();
    for (part, len) in [
        ("scaler.mean", file.scaler.mean.len()),
        ("scaler.scale", file.scaler.scale.len()),
        ("model.coefficients", file.model.coefficients.len()),
    ] {
        if len != expected {
            return Err(ModelError::ArtifactShape {
                path: path.to_path_buf(),
                detail: format!("{part} has {len} entries, expected {expected} feature names"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_artifact(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn loads_valid_artifact_files() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(
            dir.path(),
            "21205880_temperature.json",
            r#"{
                "feature_names": ["tmin_lag_1", "tmin_ma_7"],
                "scaler": {"mean": [5.0, 5.0], "scale": [2.0, 2.0]},
                "model": {"coefficients": [0.6, 0.4], "intercept": 5.0}
            }"#,
        );
        let store = JsonArtifactStore::new(dir.path());
        let artifact = store.load("21205880", ArtifactKind::Temperature).unwrap();
        assert_eq!(artifact.feature_names.len(), 2);
        assert_eq!(artifact.scaler.mean, vec![5.0, 5.0]);
    }

    #[test]
    fn missing_file_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonArtifactStore::new(dir.path());
        let err = store.load("nope", ArtifactKind::Frost).unwrap_err();
        match err {
            ModelError::ArtifactRead(path, _) => {
                assert!(path.ends_with("nope_frost.json"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn inconsistent_lengths_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(
            dir.path(),
            "x_temperature.json",
            r#"{
                "feature_names": ["a", "b"],
                "scaler": {"mean": [0.0], "scale": [1.0, 1.0]},
                "model": {"coefficients": [1.0, 1.0], "intercept": 0.0}
            }"#,
        );
        let store = JsonArtifactStore::new(dir.path());
        let err = store.load("x", ArtifactKind::Temperature).unwrap_err();
        assert!(matches!(err, ModelError::ArtifactShape { .. }));
    }
}

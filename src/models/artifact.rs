//! Pretrained model artifacts: a scorer, its input scaler and the ordered
//! feature-name list the pair was trained against.

use crate::features::FeatureRow;
use crate::models::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which prediction target an artifact serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Next-day minimum temperature regression.
    Temperature,
    /// Frost decision score (logistic-convertible).
    Frost,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Temperature => "temperature",
            ArtifactKind::Frost => "frost",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An opaque pretrained scorer. Regression artifacts return the predicted
/// value; classification artifacts return a decision score.
pub trait Model: Send + Sync + fmt::Debug {
    fn score(&self, input: &[f64]) -> Result<f64, ModelError>;
}

/// The linear (ridge-trained) scorer the production artifacts ship with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinearModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl Model for LinearModel {
    fn score(&self, input: &[f64]) -> Result<f64, ModelError> {
        if input.len() != self.coefficients.len() {
            return Err(ModelError::ShapeMismatch {
                expected: self.coefficients.len(),
                found: input.len(),
            });
        }
        Ok(self
            .coefficients
            .iter()
            .zip(input)
            .map(|(c, x)| c * x)
            .sum::<f64>()
            + self.intercept)
    }
}

/// Per-feature standardization fitted at training time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Applies `(x - mean) / scale` element-wise.
    ///
    /// A zero or non-finite scale entry (a zero-variance training feature)
    /// centers without dividing, matching how such columns were fitted.
    pub fn transform(&self, input: &[f64]) -> Result<Vec<f64>, ModelError> {
        if input.len() != self.mean.len() || input.len() != self.scale.len() {
            return Err(ModelError::ShapeMismatch {
                expected: self.mean.len(),
                found: input.len(),
            });
        }
        Ok(input
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| {
                let centered = x - m;
                if *s != 0.0 && s.is_finite() {
                    centered / s
                } else {
                    centered
                }
            })
            .collect())
    }
}

/// One immutable `{model, scaler, feature_names}` triple.
///
/// The feature-name list is authoritative: inference selects values from a
/// [`FeatureRow`] in exactly this order, and a missing name is a hard error,
/// never silently zero-filled.
#[derive(Debug)]
pub struct ModelArtifact {
    pub feature_names: Vec<String>,
    pub scaler: StandardScaler,
    pub model: Box<dyn Model>,
}

impl ModelArtifact {
    /// Reindexes a feature row to this artifact's feature order.
    pub fn select(&self, row: &FeatureRow) -> Result<Vec<f64>, ModelError> {
        self.feature_names
            .iter()
            .map(|name| {
                row.get(name)
                    .ok_or_else(|| ModelError::MissingFeature(name.clone()))
            })
            .collect()
    }

    /// Selects, scales and scores a feature row.
    pub fn score(&self, row: &FeatureRow) -> Result<f64, ModelError> {
        let input = self.select(row)?;
        let scaled = self.scaler.transform(&input)?;
        self.model.score(&scaled)
    }
}

/// The dedicated temperature + frost artifacts for one model identity.
#[derive(Debug)]
pub struct ArtifactPair {
    pub temperature: ModelArtifact,
    pub frost: ModelArtifact,
}

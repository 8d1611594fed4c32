pub mod artifact;
pub mod error;
pub mod registry;
pub mod store;

pub use artifact::{ArtifactKind, ArtifactPair, LinearModel, Model, ModelArtifact, StandardScaler};
pub use error::ModelError;
pub use registry::{ModelRegistry, ModelTopology, StationModels, UNIFIED_STATION_ID};
pub use store::{ArtifactStore, JsonArtifactStore};

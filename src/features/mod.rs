pub mod build;
pub mod error;
pub mod table;

pub use build::{frost_features, temperature_features, FeatureSet};
pub use error::FeatureError;
pub use table::{FeatureRow, FeatureTable};

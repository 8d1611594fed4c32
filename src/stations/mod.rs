pub mod error;
pub mod metadata_loader;

pub use error::StationError;
pub use metadata_loader::load_station_metadata;

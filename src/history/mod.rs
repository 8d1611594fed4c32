pub mod error;
pub mod gap_filler;
pub mod series;
pub mod store;

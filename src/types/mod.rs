pub mod prediction;
pub mod risk;
pub mod station;

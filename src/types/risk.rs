//! Frost risk tiers derived from predicted minimum temperature.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discretized frost-risk severity for a predicted minimum temperature.
///
/// The tiers form a total, non-overlapping partition of the temperature axis:
/// every finite temperature maps to exactly one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    /// `t <= -2 °C`
    MuyAlto,
    /// `-2 < t <= 0 °C`
    Alto,
    /// `0 < t <= 2 °C`
    Medio,
    /// `2 < t <= 4 °C`
    Bajo,
    /// `t > 4 °C`
    MuyBajo,
}

impl RiskTier {
    /// Classifies a predicted minimum temperature (°C) into its risk tier.
    ///
    /// Thresholds are checked in order, first match wins.
    pub fn from_temperature(temp_c: f64) -> Self {
        if temp_c <= -2.0 {
            RiskTier::MuyAlto
        } else if temp_c <= 0.0 {
            RiskTier::Alto
        } else if temp_c <= 2.0 {
            RiskTier::Medio
        } else if temp_c <= 4.0 {
            RiskTier::Bajo
        } else {
            RiskTier::MuyBajo
        }
    }

    /// Human-readable label as used by the downstream presentation layers.
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::MuyAlto => "MUY ALTO",
            RiskTier::Alto => "ALTO",
            RiskTier::Medio => "MEDIO",
            RiskTier::Bajo => "BAJO",
            RiskTier::MuyBajo => "MUY BAJO",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_inclusive_on_the_upper_side() {
        assert_eq!(RiskTier::from_temperature(-2.0), RiskTier::MuyAlto);
        assert_eq!(RiskTier::from_temperature(-1.999), RiskTier::Alto);
        assert_eq!(RiskTier::from_temperature(0.0), RiskTier::Alto);
        assert_eq!(RiskTier::from_temperature(0.001), RiskTier::Medio);
        assert_eq!(RiskTier::from_temperature(2.0), RiskTier::Medio);
        assert_eq!(RiskTier::from_temperature(4.0), RiskTier::Bajo);
        assert_eq!(RiskTier::from_temperature(4.001), RiskTier::MuyBajo);
    }

    #[test]
    fn every_temperature_maps_to_exactly_one_tier() {
        // Sweep a wide range in small steps; each value must classify, and
        // re-classifying must agree (the partition is total and stable).
        let mut t = -40.0f64;
        while t <= 40.0 {
            let tier = RiskTier::from_temperature(t);
            assert_eq!(tier, RiskTier::from_temperature(t));
            t += 0.0625;
        }
        assert_eq!(
            RiskTier::from_temperature(f64::NEG_INFINITY),
            RiskTier::MuyAlto
        );
        assert_eq!(RiskTier::from_temperature(f64::INFINITY), RiskTier::MuyBajo);
    }

    #[test]
    fn labels_round_trip_through_serde() {
        let json = serde_json::to_string(&RiskTier::MuyAlto).unwrap();
        assert_eq!(json, "\"MUY_ALTO\"");
        let back: RiskTier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RiskTier::MuyAlto);
    }
}

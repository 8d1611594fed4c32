//! Spatial queries over a station result set: inverse-distance-weighted
//! interpolation at arbitrary coordinates, and polygon membership tests for
//! the served region.

use crate::config::PredictorConfig;
use crate::types::prediction::StationPrediction;

/// Kilometers per degree of latitude (and of longitude at the equator) under
/// the planar approximation used for station distances.
const KM_PER_DEGREE: f64 = 111.0;

/// Inverse-distance-weighted interpolator over a prediction batch.
///
/// Distances use a planar approximation: latitude degrees scale by 111 km,
/// longitude degrees additionally by the cosine of the query latitude. Any
/// station closer than the near-station cutoff answers the query directly,
/// which keeps weights finite near a station location.
///
/// # Examples
///
/// ```
/// use frostcast::SpatialInterpolator;
///
/// let idw = SpatialInterpolator::default();
/// // An empty result set has nothing to interpolate from.
/// assert_eq!(idw.interpolate_temperature(4.78, -74.27, &[]), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialInterpolator {
    power: f64,
    near_station_km: f64,
}

impl Default for SpatialInterpolator {
    fn default() -> Self {
        Self::from_config(&PredictorConfig::default())
    }
}

impl SpatialInterpolator {
    /// `power` is the IDW exponent (>= 1 in practice); `near_station_km` the
    /// snap distance under which a station's own value is returned.
    pub fn new(power: f64, near_station_km: f64) -> Self {
        Self {
            power,
            near_station_km,
        }
    }

    pub fn from_config(config: &PredictorConfig) -> Self {
        Self::new(config.idw_power, config.near_station_km)
    }

    /// IDW estimate of `value` at `(lat, lon)` over the station results.
    ///
    /// Stations without finite coordinates are ignored; `None` when no
    /// eligible station remains. Temperature and frost-probability queries
    /// both route through this one routine, so their weighting is always
    /// consistent.
    pub fn interpolate<F>(
        &self,
        lat: f64,
        lon: f64,
        results: &[StationPrediction],
        value: F,
    ) -> Option<f64>
    where
        F: Fn(&StationPrediction) -> f64,
    {
        let lon_scale = lat.to_radians().cos();
        let mut weight_sum = 0.0;
        let mut weighted = 0.0;
        let mut eligible = false;

        for station in results {
            if !station.lat.is_finite() || !station.lon.is_finite() {
                continue;
            }
            let dlat_km = (station.lat - lat) * KM_PER_DEGREE;
            let dlon_km = (station.lon - lon) * KM_PER_DEGREE * lon_scale;
            let dist_km = (dlat_km * dlat_km + dlon_km * dlon_km).sqrt();

            if dist_km < self.near_station_km {
                return Some(value(station));
            }
            let weight = dist_km.powf(-self.power);
            weight_sum += weight;
            weighted += weight * value(station);
            eligible = true;
        }

        (eligible && weight_sum > 0.0).then(|| weighted / weight_sum)
    }

    /// Interpolated next-day minimum temperature (°C) at a point.
    pub fn interpolate_temperature(
        &self,
        lat: f64,
        lon: f64,
        results: &[StationPrediction],
    ) -> Option<f64> {
        self.interpolate(lat, lon, results, |p| p.temperature_c)
    }

    /// Interpolated frost probability (percent) at a point.
    pub fn interpolate_frost_probability(
        &self,
        lat: f64,
        lon: f64,
        results: &[StationPrediction],
    ) -> Option<f64> {
        self.interpolate(lat, lon, results, |p| p.frost_probability_pct)
    }
}

/// Even-odd ray-casting membership test for an implicitly closed polygon
/// ring of `(lat, lon)` vertices.
///
/// Every edge crossing test is fully determined by the inputs, so a fixed
/// point and ring always produce the same answer, including for points on an
/// edge. Rings with fewer than three vertices contain nothing.
pub fn point_in_region(lat: f64, lon: f64, ring: &[(f64, f64)]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (lat_i, lon_i) = ring[i];
        let (lat_j, lon_j) = ring[j];
        if (lon_i > lon) != (lon_j > lon) {
            let crossing_lat = (lon - lon_i) * (lat_j - lat_i) / (lon_j - lon_i) + lat_i;
            if lat < crossing_lat {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

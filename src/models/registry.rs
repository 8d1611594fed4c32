//! Resolves which artifact pair serves each station, once, at load time.

use crate::features::FeatureSet;
use crate::models::artifact::{ArtifactKind, ArtifactPair};
use crate::models::error::ModelError;
use crate::models::store::ArtifactStore;
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;

/// Station id under which the pooled "unified" artifacts are stored.
pub const UNIFIED_STATION_ID: &str = "unified";

/// How artifacts map onto stations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelTopology {
    /// Every station has its own dedicated artifact pair.
    PerStation,
    /// One primary station keeps dedicated artifacts; every other station
    /// shares the unified pair trained on pooled data.
    Hybrid { primary: String },
}

/// The artifacts resolved for one station, tagged by how they were trained.
///
/// Shared (unified) models were trained with the reduced feature layout.
#[derive(Debug, Clone)]
pub enum StationModels {
    Dedicated(Arc<ArtifactPair>),
    Shared(Arc<ArtifactPair>),
}

impl StationModels {
    pub fn pair(&self) -> &ArtifactPair {
        match self {
            StationModels::Dedicated(pair) | StationModels::Shared(pair) => pair,
        }
    }

    /// The feature layout this station's models expect.
    pub fn feature_set(&self) -> FeatureSet {
        match self {
            StationModels::Dedicated(_) => FeatureSet::Full,
            StationModels::Shared(_) => FeatureSet::Reduced,
        }
    }
}

/// Immutable station-to-artifacts map, built once and held for the
/// predictor's lifetime.
#[derive(Debug)]
pub struct ModelRegistry {
    by_station: HashMap<String, StationModels>,
}

impl ModelRegistry {
    /// Loads artifacts for `stations` according to `topology`.
    ///
    /// A station whose dedicated artifacts cannot be loaded is logged and
    /// omitted (it will be skipped at prediction time); a missing unified
    /// pair in hybrid mode, or zero resolvable stations, is fatal.
    pub fn load(
        store: &dyn ArtifactStore,
        topology: &ModelTopology,
        stations: &[String],
    ) -> Result<Self, ModelError> {
        let mut by_station = HashMap::new();

        match topology {
            ModelTopology::PerStation => {
                for code in stations {
                    match load_pair(store, code) {
                        Ok(pair) => {
                            by_station.insert(code.clone(), StationModels::Dedicated(Arc::new(pair)));
                        }
                        Err(e) => warn!("No dedicated artifacts for station {code}: {e}"),
                    }
                }
            }
            ModelTopology::Hybrid { primary } => {
                let unified = Arc::new(load_pair(store, UNIFIED_STATION_ID)?);
                for code in stations {
                    if code == primary {
                        match load_pair(store, code) {
                            Ok(pair) => {
                                by_station
                                    .insert(code.clone(), StationModels::Dedicated(Arc::new(pair)));
                            }
                            Err(e) => warn!("No dedicated artifacts for primary station {code}: {e}"),
                        }
                    } else {
                        by_station.insert(code.clone(), StationModels::Shared(Arc::clone(&unified)));
                    }
                }
            }
        }

        if by_station.is_empty() {
            return Err(ModelError::NoArtifacts);
        }
        info!("Model registry resolved {} stations", by_station.len());
        Ok(Self { by_station })
    }

    /// The models resolved for a station code, if any.
    pub fn models_for(&self, code: &str) -> Option<&StationModels> {
        self.by_station.get(code)
    }

    /// Station codes with resolved models.
    pub fn station_codes(&self) -> impl Iterator<Item = &str> {
        self.by_station.keys().map(String::as_str)
    }
}

fn load_pair(store: &dyn ArtifactStore, station: &str) -> Result<ArtifactPair, ModelError> {
    Ok(ArtifactPair {
        temperature: store.load(station, ArtifactKind::Temperature)?,
        frost: store.load(station, ArtifactKind::Frost)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::artifact::{LinearModel, ModelArtifact, StandardScaler};

    /// Builds trivial artifacts for any station except the ones listed as
    /// missing.
    struct FakeStore {
        missing: Vec<&'static str>,
    }

    impl ArtifactStore for FakeStore {
        fn load(&self, station: &str, _kind: ArtifactKind) -> Result<ModelArtifact, ModelError> {
            if self.missing.contains(&station) {
                return Err(ModelError::NoArtifacts);
            }
            Ok(ModelArtifact {
                feature_names: vec!["tmin_lag_1".into()],
                scaler: StandardScaler {
                    mean: vec![0.0],
                    scale: vec![1.0],
                },
                model: Box::new(LinearModel {
                    coefficients: vec![1.0],
                    intercept: 0.0,
                }),
            })
        }
    }

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn hybrid_shares_one_unified_pair() {
        let store = FakeStore { missing: vec![] };
        let topology = ModelTopology::Hybrid {
            primary: "A".into(),
        };
        let registry = ModelRegistry::load(&store, &topology, &codes(&["A", "B", "C"])).unwrap();

        assert!(matches!(
            registry.models_for("A"),
            Some(StationModels::Dedicated(_))
        ));
        let (b, c) = match (registry.models_for("B"), registry.models_for("C")) {
            (Some(StationModels::Shared(b)), Some(StationModels::Shared(c))) => (b, c),
            other => panic!("expected shared models, got {other:?}"),
        };
        assert!(Arc::ptr_eq(b, c));
        assert_eq!(
            registry.models_for("B").unwrap().feature_set(),
            FeatureSet::Reduced
        );
        assert_eq!(
            registry.models_for("A").unwrap().feature_set(),
            FeatureSet::Full
        );
        let mut resolved: Vec<&str> = registry.station_codes().collect();
        resolved.sort_unstable();
        assert_eq!(resolved, ["A", "B", "C"]);
    }

    #[test]
    fn per_station_omits_unloadable_stations() {
        let store = FakeStore { missing: vec!["B"] };
        let registry =
            ModelRegistry::load(&store, &ModelTopology::PerStation, &codes(&["A", "B"])).unwrap();
        assert!(registry.models_for("A").is_some());
        assert!(registry.models_for("B").is_none());
        assert_eq!(registry.station_codes().collect::<Vec<_>>(), vec!["A"]);
    }

    #[test]
    fn missing_unified_pair_is_fatal() {
        let store = FakeStore {
            missing: vec![UNIFIED_STATION_ID],
        };
        let topology = ModelTopology::Hybrid {
            primary: "A".into(),
        };
        assert!(ModelRegistry::load(&store, &topology, &codes(&["A", "B"])).is_err());
    }

    #[test]
    fn zero_resolved_stations_is_fatal() {
        let store = FakeStore {
            missing: vec!["A", "B"],
        };
        let err = ModelRegistry::load(&store, &ModelTopology::PerStation, &codes(&["A", "B"]))
            .unwrap_err();
        assert!(matches!(err, ModelError::NoArtifacts));
    }
}

//! Parameter Map Store
//!
//! CRUD wrapper around the per-plugin parameter maps: upsert keyed by
//! plugin (at most one map per plugin), lookup by plugin, listing by
//! category. Maps live in memory behind a read/write lock and can be
//! loaded from / saved to a JSON file; the enrichment process that
//! produces map contents is a separate concern.

use crate::errors::{SwapError, SwapResult};
use crate::parameter_map::{
    detect_hints, estimate_confidence, infer_category, infer_q_representation, merge_descriptor,
    CategoryHints, ParameterDescriptor, PluginParameterMap,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

const STORE_FILE: &str = "parameter_maps.json";
const DEFAULT_SOURCE: &str = "enrichment";

/// Full descriptor set for one plugin, as produced by an enrichment pass.
/// Omitted fields fall back: empty category is inferred, missing hints are
/// detected, missing confidence is estimated (on create) or kept (on
/// update).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertMapRequest {
    pub plugin_id: String,
    pub plugin_name: String,
    #[serde(default)]
    pub category: String,
    pub parameters: Vec<ParameterDescriptor>,
    #[serde(default)]
    pub hints: Option<CategoryHints>,
    #[serde(default)]
    pub confidence: Option<u8>,
    #[serde(default)]
    pub source: Option<String>,
}

/// On-disk snapshot of the store.
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: String,
    maps: Vec<PluginParameterMap>,
}

/// In-process parameter map store. Upserts for the same plugin serialize
/// through the write lock, so read-check-then-write cannot lose updates;
/// readers get independent cloned snapshots.
#[derive(Debug, Default)]
pub struct ParameterMapStore {
    maps: RwLock<HashMap<String, PluginParameterMap>>,
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl ParameterMapStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default on-disk location for the store file.
    pub fn default_path() -> PathBuf {
        let data_dir = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        data_dir.join("ChainSwap").join(STORE_FILE)
    }

    /// Load a store snapshot from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SwapResult<Self> {
        let content = fs::read_to_string(path)?;
        let file: StoreFile = serde_json::from_str(&content)?;
        debug!("loaded {} parameter maps (version {})", file.maps.len(), file.version);

        let mut maps = HashMap::new();
        for map in file.maps {
            if maps.insert(map.plugin_id.clone(), map).is_some() {
                warn!("store file contained duplicate plugin entries; keeping the last");
            }
        }
        Ok(Self {
            maps: RwLock::new(maps),
        })
    }

    /// Save the current snapshot to a JSON file, creating parent
    /// directories as needed.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> SwapResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut maps: Vec<PluginParameterMap> =
            self.maps.read().unwrap().values().cloned().collect();
        maps.sort_by(|a, b| a.plugin_id.cmp(&b.plugin_id));

        let file = StoreFile {
            version: "1.0".to_string(),
            maps,
        };
        let content = serde_json::to_string_pretty(&file)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Fetch one plugin's map.
    pub fn get_map(&self, plugin_id: &str) -> Option<PluginParameterMap> {
        self.maps.read().unwrap().get(plugin_id).cloned()
    }

    /// All maps in a category, ordered by plugin id so downstream ranking
    /// and picking are deterministic.
    pub fn maps_in_category(&self, category: &str) -> Vec<PluginParameterMap> {
        let mut maps: Vec<PluginParameterMap> = self
            .maps
            .read()
            .unwrap()
            .values()
            .filter(|m| m.category == category)
            .cloned()
            .collect();
        maps.sort_by(|a, b| a.plugin_id.cmp(&b.plugin_id));
        maps
    }

    pub fn count(&self) -> usize {
        self.maps.read().unwrap().len()
    }

    /// Remove one plugin's map. Returns whether a map existed.
    pub fn remove_map(&self, plugin_id: &str) -> bool {
        self.maps.write().unwrap().remove(plugin_id).is_some()
    }

    /// Create or update the map for `request.plugin_id`; returns the map id.
    ///
    /// On update, the incoming descriptor set decides which parameters
    /// exist; descriptors sharing a `param_id` with the stored map merge
    /// field-by-field (incoming wins unless empty/absent). Last writer
    /// wins for the map as a whole.
    pub fn upsert_map(&self, request: UpsertMapRequest) -> SwapResult<String> {
        let mut parameters = request.parameters;
        validate_semantics(&request.plugin_id, &parameters)?;

        for descriptor in parameters.iter_mut() {
            if descriptor.q_representation.is_none() {
                descriptor.q_representation =
                    infer_q_representation(descriptor).map(str::to_string);
            }
        }

        let now = unix_seconds();
        let mut maps = self.maps.write().unwrap();

        let map = match maps.remove(&request.plugin_id) {
            Some(existing) => {
                let merged: Vec<ParameterDescriptor> = parameters
                    .into_iter()
                    .map(|incoming| match existing.find_by_param_id(&incoming.param_id) {
                        Some(prior) => merge_descriptor(prior, incoming),
                        None => incoming,
                    })
                    .collect();

                let category = if request.category.is_empty() {
                    existing.category
                } else {
                    request.category
                };
                let hints = request
                    .hints
                    .unwrap_or_else(|| detect_hints(&category, &merged));

                PluginParameterMap {
                    id: existing.id,
                    plugin_id: request.plugin_id,
                    plugin_name: if request.plugin_name.is_empty() {
                        existing.plugin_name
                    } else {
                        request.plugin_name
                    },
                    category,
                    confidence: request.confidence.unwrap_or(existing.confidence).min(100),
                    source: request.source.unwrap_or(existing.source),
                    created_at: existing.created_at,
                    updated_at: now,
                    parameters: merged,
                    hints,
                }
            }
            None => {
                let category = if request.category.is_empty() {
                    infer_category(&parameters)
                } else {
                    request.category
                };
                let hints = request
                    .hints
                    .unwrap_or_else(|| detect_hints(&category, &parameters));
                let confidence = request
                    .confidence
                    .unwrap_or_else(|| estimate_confidence(&parameters, &category, &hints))
                    .min(100);

                PluginParameterMap {
                    id: uuid::Uuid::new_v4().to_string(),
                    plugin_id: request.plugin_id,
                    plugin_name: request.plugin_name,
                    category,
                    parameters,
                    hints,
                    confidence,
                    source: request.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
                    created_at: now,
                    updated_at: now,
                }
            }
        };

        let id = map.id.clone();
        debug!(
            "upserted parameter map for {} ({} parameters, confidence {})",
            map.plugin_id,
            map.parameters.len(),
            map.confidence
        );
        maps.insert(map.plugin_id.clone(), map);
        Ok(id)
    }
}

fn validate_semantics(plugin_id: &str, parameters: &[ParameterDescriptor]) -> SwapResult<()> {
    let mut seen = HashSet::new();
    for descriptor in parameters {
        if !descriptor.is_matched() {
            continue;
        }
        if !seen.insert(descriptor.semantic.as_str()) {
            return Err(SwapError::DuplicateSemantic {
                plugin_id: plugin_id.to_string(),
                semantic: descriptor.semantic.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve_transform::MappingCurve;

    fn descriptor(param_id: &str, semantic: &str) -> ParameterDescriptor {
        ParameterDescriptor {
            param_id: param_id.to_string(),
            param_index: None,
            semantic: semantic.to_string(),
            label: None,
            physical_unit: "db".to_string(),
            mapping_curve: MappingCurve::Linear,
            min_value: -12.0,
            max_value: 12.0,
            default_value: None,
            steps: None,
            range_start: None,
            range_end: None,
            skew_factor: None,
            symmetric_skew: false,
            interval: None,
            has_normalisable_range: false,
            curve_samples: None,
            q_representation: None,
        }
    }

    fn request(plugin_id: &str, parameters: Vec<ParameterDescriptor>) -> UpsertMapRequest {
        UpsertMapRequest {
            plugin_id: plugin_id.to_string(),
            plugin_name: format!("Plugin {}", plugin_id),
            category: "eq".to_string(),
            parameters,
            hints: None,
            confidence: Some(90),
            source: None,
        }
    }

    #[test]
    fn upsert_creates_then_updates_in_place() {
        let store = ParameterMapStore::new();

        let id1 = store
            .upsert_map(request("plg_1", vec![descriptor("Gain", "eq_band_1_gain")]))
            .unwrap();
        assert_eq!(store.count(), 1);

        let id2 = store
            .upsert_map(request(
                "plg_1",
                vec![
                    descriptor("Gain", "eq_band_1_gain"),
                    descriptor("Freq", "eq_band_1_freq"),
                ],
            ))
            .unwrap();

        // Same plugin, same map identity, updated contents.
        assert_eq!(id1, id2);
        assert_eq!(store.count(), 1);
        assert_eq!(store.get_map("plg_1").unwrap().parameters.len(), 2);
    }

    #[test]
    fn update_merges_descriptor_fields() {
        let store = ParameterMapStore::new();

        let mut scanned = descriptor("Freq", "eq_band_1_freq");
        scanned.has_normalisable_range = true;
        scanned.range_start = Some(20.0);
        scanned.range_end = Some(20_000.0);
        scanned.skew_factor = Some(0.25);
        store.upsert_map(request("plg_1", vec![scanned])).unwrap();

        // Re-enrichment without scan data keeps the stored range.
        store
            .upsert_map(request("plg_1", vec![descriptor("Freq", "eq_band_1_freq")]))
            .unwrap();

        let map = store.get_map("plg_1").unwrap();
        assert_eq!(map.parameters[0].skew_factor, Some(0.25));
        assert_eq!(map.parameters[0].range_end, Some(20_000.0));
    }

    #[test]
    fn update_drops_parameters_missing_from_incoming_set() {
        let store = ParameterMapStore::new();
        store
            .upsert_map(request(
                "plg_1",
                vec![
                    descriptor("Gain", "eq_band_1_gain"),
                    descriptor("Freq", "eq_band_1_freq"),
                ],
            ))
            .unwrap();
        store
            .upsert_map(request("plg_1", vec![descriptor("Gain", "eq_band_1_gain")]))
            .unwrap();
        assert_eq!(store.get_map("plg_1").unwrap().parameters.len(), 1);
    }

    #[test]
    fn rejects_duplicate_semantics() {
        let store = ParameterMapStore::new();
        let result = store.upsert_map(request(
            "plg_1",
            vec![
                descriptor("Gain A", "eq_band_1_gain"),
                descriptor("Gain B", "eq_band_1_gain"),
            ],
        ));
        assert!(matches!(
            result,
            Err(SwapError::DuplicateSemantic { .. })
        ));
    }

    #[test]
    fn allows_repeated_unknown_semantics() {
        let store = ParameterMapStore::new();
        let result = store.upsert_map(request(
            "plg_1",
            vec![descriptor("Mystery A", "unknown"), descriptor("Mystery B", "unknown")],
        ));
        assert!(result.is_ok());
    }

    #[test]
    fn infers_category_and_confidence_when_absent() {
        let store = ParameterMapStore::new();
        let mut req = request(
            "plg_1",
            vec![
                descriptor("Thresh", "comp_threshold"),
                descriptor("Ratio", "comp_ratio"),
            ],
        );
        req.category = String::new();
        req.confidence = None;
        store.upsert_map(req).unwrap();

        let map = store.get_map("plg_1").unwrap();
        assert_eq!(map.category, "compressor");
        assert!(map.confidence > 0);
        assert_eq!(map.source, DEFAULT_SOURCE);
    }

    #[test]
    fn fills_q_representation_on_upsert() {
        let store = ParameterMapStore::new();
        let mut q = descriptor("Q", "eq_band_1_q");
        q.has_normalisable_range = true;
        q.range_start = Some(0.1);
        q.range_end = Some(18.0);
        store.upsert_map(request("plg_1", vec![q])).unwrap();

        let map = store.get_map("plg_1").unwrap();
        assert_eq!(
            map.parameters[0].q_representation.as_deref(),
            Some("q_factor")
        );
    }

    #[test]
    fn save_and_load_round_trip() {
        let store = ParameterMapStore::new();
        store
            .upsert_map(request("plg_1", vec![descriptor("Gain", "eq_band_1_gain")]))
            .unwrap();
        store
            .upsert_map(request("plg_2", vec![descriptor("Gain", "eq_band_1_gain")]))
            .unwrap();

        let path = std::env::temp_dir()
            .join(format!("chainswap-store-{}.json", uuid::Uuid::new_v4()));
        store.save_to_file(&path).unwrap();

        let reloaded = ParameterMapStore::load_from_file(&path).unwrap();
        assert_eq!(reloaded.count(), 2);
        assert_eq!(
            reloaded.get_map("plg_1").unwrap(),
            store.get_map("plg_1").unwrap()
        );

        fs::remove_file(path).ok();
    }

    #[test]
    fn maps_in_category_sorted_by_plugin_id() {
        let store = ParameterMapStore::new();
        for plugin_id in ["plg_c", "plg_a", "plg_b"] {
            store
                .upsert_map(request(
                    plugin_id,
                    vec![descriptor("Gain", "eq_band_1_gain")],
                ))
                .unwrap();
        }
        let ids: Vec<String> = store
            .maps_in_category("eq")
            .into_iter()
            .map(|m| m.plugin_id)
            .collect();
        assert_eq!(ids, vec!["plg_a", "plg_b", "plg_c"]);
    }

    #[test]
    fn default_path_names_the_store_file() {
        assert!(ParameterMapStore::default_path().ends_with(Path::new("ChainSwap/parameter_maps.json")));
    }
}

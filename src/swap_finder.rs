//! Compatible-Swap Finder
//!
//! Given a plugin and the set of plugins a user owns, ranks same-category
//! alternatives by estimated parameter overlap, and offers a deterministic
//! "random pick" seeded by caller-supplied entropy so repeated queries with
//! the same seed reproduce the same candidate.

use crate::map_store::ParameterMapStore;
use crate::parameter_map::PluginParameterMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Ownership lookup consumed from the plugin catalog; only used to filter
/// candidate swap targets.
pub trait OwnershipRegistry: Send + Sync {
    fn owned_plugin_ids(&self, user_id: &str) -> HashSet<String>;
}

/// In-memory ownership registry for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryOwnershipRegistry {
    owned: HashMap<String, HashSet<String>>,
}

impl MemoryOwnershipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&mut self, user_id: &str, plugin_id: &str) {
        self.owned
            .entry(user_id.to_string())
            .or_default()
            .insert(plugin_id.to_string());
    }
}

impl OwnershipRegistry for MemoryOwnershipRegistry {
    fn owned_plugin_ids(&self, user_id: &str) -> HashSet<String> {
        self.owned.get(user_id).cloned().unwrap_or_default()
    }
}

/// One ranked swap candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapCandidate {
    pub plugin_id: String,
    pub plugin_name: String,
    pub category: String,
    /// 0-100 estimated translation confidence against the source plugin.
    pub confidence: u8,
    pub parameter_count: usize,
    #[serde(default)]
    pub eq_band_count: Option<u32>,
}

pub struct SwapFinder<'a> {
    store: &'a ParameterMapStore,
    ownership: &'a dyn OwnershipRegistry,
}

impl<'a> SwapFinder<'a> {
    pub fn new(store: &'a ParameterMapStore, ownership: &'a dyn OwnershipRegistry) -> Self {
        Self { store, ownership }
    }

    /// Rank the user's owned, same-category plugins by estimated parameter
    /// overlap with `plugin_id`. Highest confidence first, ties broken by
    /// plugin name. Empty when the source plugin has no map.
    pub fn find_compatible_swaps(&self, plugin_id: &str, user_id: &str) -> Vec<SwapCandidate> {
        let mut candidates = self.candidates(plugin_id, user_id);
        candidates.sort_by(|a, b| {
            b.confidence
                .cmp(&a.confidence)
                .then_with(|| a.plugin_name.cmp(&b.plugin_name))
        });
        debug!(
            "found {} swap candidates for {} (user {})",
            candidates.len(),
            plugin_id,
            user_id
        );
        candidates
    }

    /// Deterministically pick one candidate: index `|seed| mod count` over
    /// the plugin-id-ordered candidate list. Same seed, same pick; a
    /// different seed (with at least two candidates) can change it.
    pub fn get_random_swap(
        &self,
        plugin_id: &str,
        user_id: &str,
        random_seed: i64,
    ) -> Option<SwapCandidate> {
        let candidates = self.candidates(plugin_id, user_id);
        if candidates.is_empty() {
            return None;
        }
        let index = (random_seed.unsigned_abs() as usize) % candidates.len();
        candidates.into_iter().nth(index)
    }

    /// Owned, same-category, non-source candidates in plugin-id order.
    fn candidates(&self, plugin_id: &str, user_id: &str) -> Vec<SwapCandidate> {
        let Some(source_map) = self.store.get_map(plugin_id) else {
            return Vec::new();
        };
        let owned = self.ownership.owned_plugin_ids(user_id);
        let source_semantics: HashSet<&str> =
            source_map.semantic_set().into_iter().collect();

        self.store
            .maps_in_category(&source_map.category)
            .into_iter()
            .filter(|map| map.plugin_id != source_map.plugin_id && owned.contains(&map.plugin_id))
            .map(|map| score_candidate(&source_map, &source_semantics, map))
            .collect()
    }
}

/// Source-denominated semantic overlap, discounted by the weaker of the
/// two maps' enrichment quality. A candidate that is a strict superset of
/// the source's semantics scores full overlap; the reverse does not.
fn score_candidate(
    source_map: &PluginParameterMap,
    source_semantics: &HashSet<&str>,
    candidate: PluginParameterMap,
) -> SwapCandidate {
    let overlap = candidate
        .parameters
        .iter()
        .filter(|p| p.is_matched() && source_semantics.contains(p.semantic.as_str()))
        .count();
    let ratio = if source_semantics.is_empty() {
        0.0
    } else {
        overlap as f64 / source_semantics.len() as f64
    };
    let confidence =
        (ratio * source_map.confidence.min(candidate.confidence) as f64).round() as u8;

    SwapCandidate {
        confidence,
        parameter_count: candidate.parameters.len(),
        eq_band_count: candidate.hints.eq_band_count(),
        plugin_id: candidate.plugin_id,
        plugin_name: candidate.plugin_name,
        category: candidate.category,
    }
}

//! Plugin Parameter Map Model
//!
//! Data structures describing one plugin's parameter space: per-parameter
//! descriptors with their semantic tag, unit, curve and optional exact
//! normalisable range, plus map-level category hints and enrichment
//! provenance. Also the field-level merge rules applied on upsert and the
//! inference helpers (category, confidence, Q representation) used when an
//! enrichment pass leaves gaps.

use crate::curve_transform::MappingCurve;
use crate::semantics;
use serde::{Deserialize, Serialize};

/// Sentinel semantic for parameters the enrichment could not classify.
/// Unlike real semantics it may repeat within a map and never matches a
/// translation lookup.
pub const UNKNOWN_SEMANTIC: &str = "unknown";

/// One named position of a stepped parameter. `physical_value` is a
/// semantic label ("bell", "hpf"), not a display string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterStep {
    pub normalized_value: f64,
    pub physical_value: String,
}

/// One empirical calibration point sampled from the host's own text output.
/// Carried for provenance; the translation algorithm does not consume it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSample {
    pub normalized: f64,
    pub physical: f64,
}

/// One control on one plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Opaque identifier in the host's addressing scheme.
    pub param_id: String,
    #[serde(default)]
    pub param_index: Option<i32>,
    /// Canonical cross-plugin meaning, e.g. `eq_band_3_freq`.
    pub semantic: String,
    /// Host-reported unit label, kept as scan provenance.
    #[serde(default)]
    pub label: Option<String>,
    pub physical_unit: String,
    #[serde(default)]
    pub mapping_curve: MappingCurve,
    pub min_value: f64,
    pub max_value: f64,
    #[serde(default)]
    pub default_value: Option<f64>,
    /// Present only for stepped parameters.
    #[serde(default)]
    pub steps: Option<Vec<ParameterStep>>,
    #[serde(default)]
    pub range_start: Option<f64>,
    #[serde(default)]
    pub range_end: Option<f64>,
    /// Exact-range skew exponent; 1.0 = linear. Must be > 0.
    #[serde(default)]
    pub skew_factor: Option<f64>,
    #[serde(default)]
    pub symmetric_skew: bool,
    /// Quantization step of the exact range, informational.
    #[serde(default)]
    pub interval: Option<f64>,
    /// Gate for using the exact-range formula instead of the generic curve.
    #[serde(default)]
    pub has_normalisable_range: bool,
    #[serde(default)]
    pub curve_samples: Option<Vec<CurveSample>>,
    /// Disambiguates Q-like semantics: "q_factor" or "bandwidth_octaves".
    #[serde(default)]
    pub q_representation: Option<String>,
}

impl ParameterDescriptor {
    /// The exact skewed range, when the descriptor declares one. Takes
    /// priority over the generic curve for continuous translation.
    pub fn exact_range(&self) -> Option<(f64, f64, f64, bool)> {
        if !self.has_normalisable_range {
            return None;
        }
        match (self.range_start, self.range_end, self.skew_factor) {
            (Some(start), Some(end), Some(skew)) => Some((start, end, skew, self.symmetric_skew)),
            _ => None,
        }
    }

    /// Physical bounds used for clamping: the exact range when present,
    /// otherwise the generic min/max.
    pub fn physical_bounds(&self) -> (f64, f64) {
        match self.exact_range() {
            Some((start, end, _, _)) => (start, end),
            None => (self.min_value, self.max_value),
        }
    }

    pub fn is_stepped(&self) -> bool {
        self.mapping_curve == MappingCurve::Stepped
    }

    /// Whether enrichment recognized this parameter's meaning.
    pub fn is_matched(&self) -> bool {
        !self.semantic.is_empty() && self.semantic != UNKNOWN_SEMANTIC
    }
}

/// Category-specific hints. Keyed by the map's category so each category's
/// fields are only reachable when that category is matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategoryHints {
    Eq {
        #[serde(default)]
        band_count: u32,
        #[serde(default)]
        band_parameter_pattern: Option<String>,
    },
    Compressor {
        #[serde(default)]
        has_auto_makeup: bool,
        #[serde(default)]
        has_parallel_mix: bool,
        #[serde(default)]
        has_lookahead: bool,
    },
    #[default]
    General,
}

impl CategoryHints {
    /// The declared EQ band count, when this is an EQ map that knows one.
    pub fn eq_band_count(&self) -> Option<u32> {
        match self {
            CategoryHints::Eq { band_count, .. } if *band_count > 0 => Some(*band_count),
            _ => None,
        }
    }
}

/// One plugin's full parameter map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginParameterMap {
    /// Store identifier, minted at first upsert.
    pub id: String,
    pub plugin_id: String,
    pub plugin_name: String,
    pub category: String,
    pub parameters: Vec<ParameterDescriptor>,
    #[serde(default)]
    pub hints: CategoryHints,
    /// 0-100, quality of the enrichment that produced this map.
    pub confidence: u8,
    /// Provenance tag, e.g. "juce-scanned".
    pub source: String,
    pub created_at: u64,
    pub updated_at: u64,
}

impl PluginParameterMap {
    pub fn find_by_param_id(&self, param_id: &str) -> Option<&ParameterDescriptor> {
        self.parameters.iter().find(|p| p.param_id == param_id)
    }

    /// Look up a descriptor by semantic tag. The unknown sentinel never
    /// matches: two unclassified parameters do not mean the same thing.
    pub fn find_by_semantic(&self, semantic: &str) -> Option<&ParameterDescriptor> {
        if semantic.is_empty() || semantic == UNKNOWN_SEMANTIC {
            return None;
        }
        self.parameters.iter().find(|p| p.semantic == semantic)
    }

    /// The set of recognized semantics on this map.
    pub fn semantic_set(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|p| p.is_matched())
            .map(|p| p.semantic.as_str())
            .collect()
    }
}

/// Parse `eq_band_<N>_<kind>` into its band number and kind.
pub fn parse_band_semantic(semantic: &str) -> Option<(u32, &str)> {
    let rest = semantic.strip_prefix("eq_band_")?;
    let (digits, kind) = rest.split_once('_')?;
    if kind.is_empty() {
        return None;
    }
    digits.parse().ok().map(|band| (band, kind))
}

fn pick_string(incoming: String, existing: &str) -> String {
    if incoming.is_empty() {
        existing.to_string()
    } else {
        incoming
    }
}

/// Field-by-field descriptor merge: incoming wins unless empty/absent.
///
/// Always-present fields (curve, bounds) take the incoming value; optional
/// fields fall back to the existing descriptor when the incoming one omits
/// them. `has_normalisable_range` stays set once a scan recorded a range,
/// so re-enrichment without scan data cannot orphan the stored skew path.
pub fn merge_descriptor(
    existing: &ParameterDescriptor,
    incoming: ParameterDescriptor,
) -> ParameterDescriptor {
    ParameterDescriptor {
        param_id: incoming.param_id,
        param_index: incoming.param_index.or(existing.param_index),
        semantic: pick_string(incoming.semantic, &existing.semantic),
        label: incoming.label.or_else(|| existing.label.clone()),
        physical_unit: pick_string(incoming.physical_unit, &existing.physical_unit),
        mapping_curve: incoming.mapping_curve,
        min_value: incoming.min_value,
        max_value: incoming.max_value,
        default_value: incoming.default_value.or(existing.default_value),
        steps: incoming.steps.or_else(|| existing.steps.clone()),
        range_start: incoming.range_start.or(existing.range_start),
        range_end: incoming.range_end.or(existing.range_end),
        skew_factor: incoming.skew_factor.or(existing.skew_factor),
        symmetric_skew: incoming.symmetric_skew,
        interval: incoming.interval.or(existing.interval),
        has_normalisable_range: incoming.has_normalisable_range || existing.has_normalisable_range,
        curve_samples: incoming
            .curve_samples
            .or_else(|| existing.curve_samples.clone()),
        q_representation: incoming
            .q_representation
            .or_else(|| existing.q_representation.clone()),
    }
}

/// Infer the plugin category from its recognized semantics.
pub fn infer_category(parameters: &[ParameterDescriptor]) -> String {
    let eq_count = parameters
        .iter()
        .filter(|p| p.semantic.starts_with("eq_band_"))
        .count();
    let comp_count = parameters
        .iter()
        .filter(|p| p.semantic.starts_with("comp_"))
        .count();

    if eq_count > comp_count && eq_count >= 3 {
        return "eq".to_string();
    }
    if comp_count > eq_count && comp_count >= 2 {
        return "compressor".to_string();
    }
    if eq_count > 0 {
        return "eq".to_string();
    }
    if comp_count > 0 {
        return "compressor".to_string();
    }
    "general".to_string()
}

/// Derive category hints from the descriptor list when the caller supplies
/// none: the EQ band count is the highest band number seen, a compressor
/// with a mix semantic gets `has_parallel_mix`.
pub fn detect_hints(category: &str, parameters: &[ParameterDescriptor]) -> CategoryHints {
    match category {
        "eq" => {
            let band_count = parameters
                .iter()
                .filter_map(|p| parse_band_semantic(&p.semantic))
                .map(|(band, _)| band)
                .max()
                .unwrap_or(0);
            CategoryHints::Eq {
                band_count,
                band_parameter_pattern: None,
            }
        }
        "compressor" => {
            let has_parallel_mix = parameters
                .iter()
                .any(|p| p.semantic == "comp_mix" || p.semantic == "dry_wet_mix");
            CategoryHints::Compressor {
                has_auto_makeup: false,
                has_parallel_mix,
                has_lookahead: false,
            }
        }
        _ => CategoryHints::General,
    }
}

/// Infer the Q representation of a Q-ish parameter from its range ceiling:
/// ranges reaching past 5.0 read as raw Q factor, tight ranges as
/// bandwidth in octaves.
pub fn infer_q_representation(descriptor: &ParameterDescriptor) -> Option<&'static str> {
    if !descriptor.has_normalisable_range || !descriptor.semantic.contains("_q") {
        return None;
    }
    let range_end = descriptor.range_end?;
    Some(if range_end > 5.0 {
        "q_factor"
    } else {
        "bandwidth_octaves"
    })
}

/// Estimate a map confidence score when enrichment did not supply one.
///
/// Match ratio is worth up to 70 points, unit confirmation (matched
/// parameters with a host label and a known unit) up to 20, plus small
/// completeness bonuses: +5 for an EQ map with a detected band count, +10
/// for a compressor map carrying every essential semantic.
pub fn estimate_confidence(
    parameters: &[ParameterDescriptor],
    category: &str,
    hints: &CategoryHints,
) -> u8 {
    if parameters.is_empty() {
        return 0;
    }

    let matched: Vec<&ParameterDescriptor> =
        parameters.iter().filter(|p| p.is_matched()).collect();
    let mut score = matched.len() as f64 / parameters.len() as f64 * 70.0;

    if !matched.is_empty() {
        let confirmed = matched
            .iter()
            .filter(|p| {
                p.label.as_deref().is_some_and(|l| !l.is_empty())
                    && !p.physical_unit.is_empty()
                    && p.physical_unit != "unknown"
            })
            .count();
        score += confirmed as f64 / matched.len() as f64 * 20.0;
    }

    if category == "eq" && hints.eq_band_count().is_some() {
        score += 5.0;
    }
    if category == "compressor" {
        let complete = semantics::category_vocabulary("compressor")
            .iter()
            .filter(|s| s.priority >= 10)
            .all(|s| parameters.iter().any(|p| p.semantic == s.semantic_id));
        if complete {
            score += 10.0;
        }
    }

    (score.round() as i64).clamp(0, 100) as u8
}

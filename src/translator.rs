//! Translation Orchestrator
//!
//! End-to-end translation of normalized parameter values from one plugin to
//! another of the same category: resolve each source parameter's semantic,
//! find its counterpart on the target, dispatch to the curve transform /
//! unit converter / step matcher, clamp, and aggregate an overall
//! confidence score. Partial translatability is the normal case; anything
//! that cannot be carried over lands in `unmapped_params` instead of
//! failing the call.

use crate::curve_transform;
use crate::errors::{SwapError, SwapResult};
use crate::map_store::ParameterMapStore;
use crate::parameter_map::{parse_band_semantic, ParameterDescriptor, PluginParameterMap};
use crate::step_matcher;
use crate::unit_converter::convert_units;
use log::debug;
use serde::{Deserialize, Serialize};

/// One source control setting to translate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceParamValue {
    pub param_id: String,
    #[serde(default)]
    pub param_index: Option<i32>,
    /// Position in `[0,1]`; finite values outside the range are clamped.
    pub normalized_value: f64,
}

/// One translated control setting, addressed in the target plugin's scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatedParam {
    pub param_id: String,
    pub param_index: Option<i32>,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResult {
    pub target_params: Vec<TranslatedParam>,
    /// 0-100: translation coverage discounted by the weaker of the two
    /// maps' own enrichment quality.
    pub confidence: u8,
    /// Source param ids that could not be carried over.
    pub unmapped_params: Vec<String>,
    pub warnings: Vec<String>,
    /// Set when the whole translation degraded (missing source/target map).
    #[serde(default)]
    pub error: Option<String>,
}

/// Stateless translation engine over a parameter map store.
pub struct TranslationEngine<'a> {
    store: &'a ParameterMapStore,
}

impl<'a> TranslationEngine<'a> {
    pub fn new(store: &'a ParameterMapStore) -> Self {
        Self { store }
    }

    /// Translate `source_params` from the source plugin's parameter space
    /// into the target plugin's.
    ///
    /// A missing map on either side degrades to an empty result carrying a
    /// distinguishable error code; a non-finite input value is a caller
    /// bug and fails instead.
    pub fn translate_parameters(
        &self,
        source_plugin_id: &str,
        target_plugin_id: &str,
        source_params: &[SourceParamValue],
    ) -> SwapResult<TranslationResult> {
        for param in source_params {
            if !param.normalized_value.is_finite() {
                return Err(SwapError::InvalidParameter {
                    param: param.param_id.clone(),
                    reason: "normalized value must be finite".to_string(),
                });
            }
        }

        let Some(source_map) = self.store.get_map(source_plugin_id) else {
            return Ok(degraded(
                source_params,
                SwapError::SourceMapMissing {
                    plugin_id: source_plugin_id.to_string(),
                },
            ));
        };
        let Some(target_map) = self.store.get_map(target_plugin_id) else {
            return Ok(degraded(
                source_params,
                SwapError::TargetMapMissing {
                    plugin_id: target_plugin_id.to_string(),
                },
            ));
        };

        let mut result = TranslationResult {
            target_params: Vec::new(),
            confidence: 0,
            unmapped_params: Vec::new(),
            warnings: Vec::new(),
            error: None,
        };

        for input in source_params {
            match translate_one(input, &source_map, &target_map) {
                Ok(translated) => result.target_params.push(translated),
                Err(reason) => {
                    result.unmapped_params.push(input.param_id.clone());
                    result.warnings.push(reason);
                }
            }
        }

        result.confidence = combined_confidence(
            result.target_params.len(),
            source_params.len(),
            &source_map,
            &target_map,
        );

        debug!(
            "translated {}/{} parameters from {} to {} (confidence {})",
            result.target_params.len(),
            source_params.len(),
            source_plugin_id,
            target_plugin_id,
            result.confidence
        );

        Ok(result)
    }
}

fn degraded(source_params: &[SourceParamValue], error: SwapError) -> TranslationResult {
    TranslationResult {
        target_params: Vec::new(),
        confidence: 0,
        unmapped_params: source_params.iter().map(|p| p.param_id.clone()).collect(),
        warnings: vec![error.to_string()],
        error: Some(error.code().to_string()),
    }
}

/// Coverage ratio discounted by the weaker map's enrichment quality.
/// Deliberately a worst-case combination, not an average.
fn combined_confidence(
    translated: usize,
    total: usize,
    source_map: &PluginParameterMap,
    target_map: &PluginParameterMap,
) -> u8 {
    if total == 0 {
        return 0;
    }
    let floor = source_map.confidence.min(target_map.confidence) as f64;
    ((translated as f64 / total as f64) * floor).round() as u8
}

fn translate_one(
    input: &SourceParamValue,
    source_map: &PluginParameterMap,
    target_map: &PluginParameterMap,
) -> Result<TranslatedParam, String> {
    let Some(source) = source_map.find_by_param_id(&input.param_id) else {
        return Err(format!(
            "source parameter '{}' has no descriptor",
            input.param_id
        ));
    };
    if !source.is_matched() {
        return Err(format!(
            "source parameter '{}' has no recognized semantic",
            input.param_id
        ));
    }

    // EQ band gate before any semantic lookup: a sparse target EQ only
    // receives bands within its own count, never an aliased band.
    if let Some((band, _)) = parse_band_semantic(&source.semantic) {
        if let Some(band_count) = target_map.hints.eq_band_count() {
            if band > band_count {
                return Err(format!(
                    "band {} exceeds target band count {}",
                    band, band_count
                ));
            }
        }
    }

    let Some(target) = target_map.find_by_semantic(&source.semantic) else {
        return Err(format!(
            "no target parameter for semantic '{}'",
            source.semantic
        ));
    };

    let value = match (source.is_stepped(), target.is_stepped()) {
        (true, true) => {
            let source_steps = source.steps.as_deref().unwrap_or(&[]);
            let target_steps = target.steps.as_deref().unwrap_or(&[]);
            step_matcher::translate_step(input.normalized_value, source_steps, target_steps)
                .ok_or_else(|| format!("no step match for '{}'", source.semantic))?
        }
        (false, false) => translate_continuous(input.normalized_value, source, target),
        _ => {
            return Err(format!(
                "curve mismatch for '{}': stepped vs continuous",
                source.semantic
            ))
        }
    };

    Ok(TranslatedParam {
        param_id: target.param_id.clone(),
        param_index: target.param_index,
        value,
    })
}

fn translate_continuous(
    normalized: f64,
    source: &ParameterDescriptor,
    target: &ParameterDescriptor,
) -> f64 {
    let physical = match source.exact_range() {
        Some((start, end, skew, symmetric)) => {
            curve_transform::denormalize_with_skew(normalized, start, end, skew, symmetric)
        }
        None => curve_transform::denormalize(
            normalized,
            source.min_value,
            source.max_value,
            source.mapping_curve,
        ),
    };

    let (source_unit, target_unit) = unit_pair(source, target);
    let converted = convert_units(physical, source_unit, target_unit);

    let (target_min, target_max) = target.physical_bounds();
    let clamped = converted.clamp(target_min.min(target_max), target_min.max(target_max));

    match target.exact_range() {
        Some((start, end, skew, symmetric)) => {
            curve_transform::normalize_with_skew(clamped, start, end, skew, symmetric)
        }
        None => curve_transform::normalize(
            clamped,
            target.min_value,
            target.max_value,
            target.mapping_curve,
        ),
    }
}

/// The unit pair to convert between. The explicit Q representation wins
/// over the generic physical unit, but only when both sides declare one
/// and the two differ.
fn unit_pair<'p>(
    source: &'p ParameterDescriptor,
    target: &'p ParameterDescriptor,
) -> (&'p str, &'p str) {
    if let (Some(source_q), Some(target_q)) = (
        source.q_representation.as_deref(),
        target.q_representation.as_deref(),
    ) {
        if source_q != target_q {
            return (source_q, target_q);
        }
    }
    (&source.physical_unit, &target.physical_unit)
}

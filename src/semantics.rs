//! Canonical Parameter Vocabulary
//!
//! Per-category seed data describing what parameters a plugin of that
//! category typically exposes: canonical semantic tag, unit, typical range
//! and curve, and a priority (10 = essential for the category). Enrichment
//! uses this as its reference vocabulary; the translation algorithm itself
//! never consults it — only the confidence estimator does, to check a map
//! for category completeness.

use crate::curve_transform::MappingCurve;

/// One canonical vocabulary entry for a category.
#[derive(Debug, Clone, Copy)]
pub struct ParameterSemantic {
    pub semantic_id: &'static str,
    pub display_name: &'static str,
    pub physical_unit: &'static str,
    pub typical_min: f64,
    pub typical_max: f64,
    pub typical_default: f64,
    pub mapping_curve: MappingCurve,
    pub priority: u8,
}

const fn semantic(
    semantic_id: &'static str,
    display_name: &'static str,
    physical_unit: &'static str,
    typical_min: f64,
    typical_max: f64,
    typical_default: f64,
    mapping_curve: MappingCurve,
    priority: u8,
) -> ParameterSemantic {
    ParameterSemantic {
        semantic_id,
        display_name,
        physical_unit,
        typical_min,
        typical_max,
        typical_default,
        mapping_curve,
        priority,
    }
}

/// EQ band semantics follow the pattern `eq_band_<N>_<kind>`; the vocabulary
/// lists band 1, further bands substitute the number.
static EQ_SEMANTICS: &[ParameterSemantic] = &[
    semantic("eq_band_1_freq", "Band Frequency", "hz", 20.0, 20_000.0, 1_000.0, MappingCurve::Logarithmic, 10),
    semantic("eq_band_1_gain", "Band Gain", "db", -18.0, 18.0, 0.0, MappingCurve::Linear, 10),
    semantic("eq_band_1_q", "Band Q", "q_factor", 0.1, 18.0, 0.707, MappingCurve::Logarithmic, 8),
    semantic("eq_band_1_type", "Band Filter Type", "stepped", 0.0, 1.0, 0.0, MappingCurve::Stepped, 6),
    semantic("input_gain", "Input Gain", "db", -24.0, 24.0, 0.0, MappingCurve::Linear, 4),
    semantic("output_gain", "Output Gain", "db", -24.0, 24.0, 0.0, MappingCurve::Linear, 5),
    semantic("dry_wet_mix", "Dry/Wet Mix", "percent", 0.0, 100.0, 100.0, MappingCurve::Linear, 3),
];

static COMPRESSOR_SEMANTICS: &[ParameterSemantic] = &[
    semantic("comp_threshold", "Threshold", "db", -60.0, 0.0, -18.0, MappingCurve::Linear, 10),
    semantic("comp_ratio", "Ratio", "ratio", 1.0, 20.0, 4.0, MappingCurve::Logarithmic, 10),
    semantic("comp_attack", "Attack", "ms", 0.1, 300.0, 10.0, MappingCurve::Logarithmic, 10),
    semantic("comp_release", "Release", "ms", 5.0, 4_000.0, 100.0, MappingCurve::Logarithmic, 10),
    semantic("comp_knee", "Knee", "db", 0.0, 24.0, 6.0, MappingCurve::Linear, 6),
    semantic("comp_makeup", "Makeup Gain", "db", 0.0, 24.0, 0.0, MappingCurve::Linear, 7),
    semantic("comp_mix", "Parallel Mix", "percent", 0.0, 100.0, 100.0, MappingCurve::Linear, 5),
    semantic("input_gain", "Input Gain", "db", -24.0, 24.0, 0.0, MappingCurve::Linear, 4),
    semantic("output_gain", "Output Gain", "db", -24.0, 24.0, 0.0, MappingCurve::Linear, 5),
    semantic("dry_wet_mix", "Dry/Wet Mix", "percent", 0.0, 100.0, 100.0, MappingCurve::Linear, 3),
];

static GENERAL_SEMANTICS: &[ParameterSemantic] = &[
    semantic("input_gain", "Input Gain", "db", -24.0, 24.0, 0.0, MappingCurve::Linear, 5),
    semantic("output_gain", "Output Gain", "db", -24.0, 24.0, 0.0, MappingCurve::Linear, 5),
    semantic("dry_wet_mix", "Dry/Wet Mix", "percent", 0.0, 100.0, 100.0, MappingCurve::Linear, 4),
];

/// Canonical vocabulary for a category. Unrecognized categories get the
/// general entries shared by every effect.
pub fn category_vocabulary(category: &str) -> &'static [ParameterSemantic] {
    match category {
        "eq" => EQ_SEMANTICS,
        "compressor" => COMPRESSOR_SEMANTICS,
        _ => GENERAL_SEMANTICS,
    }
}

/// Build the semantic tag for an EQ band parameter, e.g. `eq_band_3_freq`.
pub fn eq_band_semantic(band: u32, kind: &str) -> String {
    format!("eq_band_{}_{}", band, kind)
}

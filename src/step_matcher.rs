//! Stepped-Value Matcher
//!
//! Translates discrete (enum-like) parameter positions between two plugins
//! whose step lists use different vocabulary. Matching is by semantic label:
//! exact first, then a fixed table of alias groups covering the common
//! filter-type vocabulary. No match means the parameter is untranslatable
//! and the caller must not substitute a default.

use crate::parameter_map::ParameterStep;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Labels inside one group are interchangeable across plugins.
static ALIAS_GROUPS: &[&[&str]] = &[
    &["bell", "peak", "peaking", "parametric"],
    &["hpf", "high_pass", "highpass", "hp", "low_cut", "lowcut"],
    &["lpf", "low_pass", "lowpass", "lp", "high_cut", "highcut"],
    &["low_shelf", "lowshelf", "lshelf", "shelf_low", "low_shelving"],
    &["high_shelf", "highshelf", "hshelf", "shelf_high", "high_shelving"],
    &["notch", "band_stop", "bandstop", "band_reject"],
    &["bpf", "band_pass", "bandpass", "bp"],
    &["tilt", "tilt_shelf", "tiltshelf"],
    &["allpass", "all_pass", "apf"],
];

static ALIAS_INDEX: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for (group, aliases) in ALIAS_GROUPS.iter().enumerate() {
        for alias in *aliases {
            index.insert(*alias, group);
        }
    }
    index
});

fn alias_group(label: &str) -> Option<usize> {
    ALIAS_INDEX.get(label).copied()
}

/// Translate a normalized stepped value from one step list to another.
///
/// Picks the source step closest to `source_normalized` (first-seen wins
/// ties), then looks for its label on the target: exact case-insensitive
/// match first, alias group second. Returns `None` when the meaning has no
/// counterpart on the target.
pub fn translate_step(
    source_normalized: f64,
    source_steps: &[ParameterStep],
    target_steps: &[ParameterStep],
) -> Option<f64> {
    let source_step = closest_step(source_normalized, source_steps)?;

    for step in target_steps {
        if step
            .physical_value
            .eq_ignore_ascii_case(&source_step.physical_value)
        {
            return Some(step.normalized_value);
        }
    }

    let group = alias_group(source_step.physical_value.to_lowercase().as_str())?;
    target_steps
        .iter()
        .find(|step| alias_group(step.physical_value.to_lowercase().as_str()) == Some(group))
        .map(|step| step.normalized_value)
}

fn closest_step(normalized: f64, steps: &[ParameterStep]) -> Option<&ParameterStep> {
    let mut best: Option<(&ParameterStep, f64)> = None;
    for step in steps {
        let distance = (step.normalized_value - normalized).abs();
        match best {
            None => best = Some((step, distance)),
            Some((_, best_distance)) if distance < best_distance => best = Some((step, distance)),
            _ => {}
        }
    }
    best.map(|(step, _)| step)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(labels: &[(&str, f64)]) -> Vec<ParameterStep> {
        labels
            .iter()
            .map(|(label, normalized)| ParameterStep {
                normalized_value: *normalized,
                physical_value: label.to_string(),
            })
            .collect()
    }

    #[test]
    fn exact_label_match_is_case_insensitive() {
        let source = steps(&[("Bell", 0.0), ("HPF", 1.0)]);
        let target = steps(&[("hpf", 0.2), ("bell", 0.8)]);
        assert_eq!(translate_step(0.0, &source, &target), Some(0.8));
        assert_eq!(translate_step(1.0, &source, &target), Some(0.2));
    }

    #[test]
    fn alias_group_match() {
        let source = steps(&[("low_cut", 0.0), ("peak", 0.5), ("high_cut", 1.0)]);
        let target = steps(&[("bell", 0.0), ("hpf", 0.33), ("lpf", 0.66)]);
        assert_eq!(translate_step(0.0, &source, &target), Some(0.33));
        assert_eq!(translate_step(0.5, &source, &target), Some(0.0));
        assert_eq!(translate_step(1.0, &source, &target), Some(0.66));
    }

    #[test]
    fn unmatched_label_returns_none() {
        let source = steps(&[("vintage", 0.0)]);
        let target = steps(&[("bell", 0.0), ("notch", 1.0)]);
        assert_eq!(translate_step(0.0, &source, &target), None);
    }

    #[test]
    fn closest_step_first_seen_wins_ties() {
        let source = steps(&[("bell", 0.4), ("notch", 0.6)]);
        let target = steps(&[("peak", 0.1), ("band_stop", 0.9)]);
        // 0.5 is equidistant; the first-listed step (bell) wins.
        assert_eq!(translate_step(0.5, &source, &target), Some(0.1));
    }

    #[test]
    fn empty_step_lists() {
        let filled = steps(&[("bell", 0.0)]);
        assert_eq!(translate_step(0.5, &[], &filled), None);
        assert_eq!(translate_step(0.5, &filled, &[]), None);
    }
}

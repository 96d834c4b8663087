//! Unit Converter
//!
//! Best-effort conversion between the physically-equivalent unit pairs that
//! show up across plugin parameter maps. An unrecognized pair passes the
//! value through unchanged: a unit mismatch must never abort a translation,
//! it only degrades its accuracy (which the confidence score reflects).

use std::f64::consts::LN_2;

/// Convert `value` from `source_unit` to `target_unit`.
///
/// Unit names are compared case-insensitively. Identity when they match.
pub fn convert_units(value: f64, source_unit: &str, target_unit: &str) -> f64 {
    let source = source_unit.to_ascii_lowercase();
    let target = target_unit.to_ascii_lowercase();
    if source == target {
        return value;
    }
    match (source.as_str(), target.as_str()) {
        ("q_factor", "bandwidth_octaves") => q_factor_to_bandwidth(value),
        ("bandwidth_octaves", "q_factor") => bandwidth_to_q_factor(value),
        ("ms", "s") => value / 1000.0,
        ("s", "ms") => value * 1000.0,
        _ => value,
    }
}

/// Filter Q factor to bandwidth in octaves.
///
/// Non-positive Q is degenerate; return the neutral 1.0 octave instead of
/// NaN/Infinity.
fn q_factor_to_bandwidth(q: f64) -> f64 {
    if q <= 0.0 {
        return 1.0;
    }
    2.0 * (1.0 / (2.0 * q)).asinh() / LN_2
}

/// Bandwidth in octaves back to filter Q factor.
fn bandwidth_to_q_factor(octaves: f64) -> f64 {
    if octaves <= 0.0 {
        return 1.0;
    }
    1.0 / (2.0 * (octaves * LN_2 / 2.0).sinh())
}

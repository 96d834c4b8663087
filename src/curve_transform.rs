//! Curve Transforms
//!
//! Pure conversions between normalized `[0,1]` values and physical values
//! (Hz, dB, ms, ...) across the curve families plugin hosts actually use,
//! plus the exact skewed-range mapping for plugins that expose their
//! normalisable range. Nothing here fails: out-of-range inputs are clamped,
//! degenerate ranges collapse to a midpoint.

use serde::{Deserialize, Serialize};

/// Floor applied to logarithmic range endpoints so log(0) never happens.
const LOG_FLOOR: f64 = 1e-6;

/// How a parameter maps its normalized position onto its physical range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MappingCurve {
    #[default]
    Linear,
    Logarithmic,
    Exponential,
    Stepped,
}

fn clamp01(n: f64) -> f64 {
    n.clamp(0.0, 1.0)
}

/// Convert a normalized value to its physical value on the generic curve.
///
/// Stepped parameters pass through unchanged; discrete translation is
/// handled by the step matcher, not a numeric curve.
pub fn denormalize(normalized: f64, min: f64, max: f64, curve: MappingCurve) -> f64 {
    let n = clamp01(normalized);
    match curve {
        MappingCurve::Linear => min + n * (max - min),
        MappingCurve::Logarithmic => {
            let safe_min = min.max(LOG_FLOOR);
            let safe_max = max.max(safe_min);
            if (safe_max - safe_min).abs() < f64::EPSILON {
                return safe_min;
            }
            let log_min = safe_min.ln();
            let log_max = safe_max.ln();
            (log_min + n * (log_max - log_min))
                .exp()
                .clamp(safe_min, safe_max)
        }
        MappingCurve::Exponential => min + (max - min) * n * n,
        MappingCurve::Stepped => n,
    }
}

/// Convert a physical value back to normalized `[0,1]` on the generic curve.
///
/// A degenerate range (max == min) normalizes to 0.5.
pub fn normalize(physical: f64, min: f64, max: f64, curve: MappingCurve) -> f64 {
    match curve {
        MappingCurve::Linear => {
            if (max - min).abs() < f64::EPSILON {
                return 0.5;
            }
            clamp01((physical - min) / (max - min))
        }
        MappingCurve::Logarithmic => {
            let safe_min = min.max(LOG_FLOOR);
            let safe_max = max.max(safe_min);
            if (safe_max - safe_min).abs() < f64::EPSILON {
                return 0.5;
            }
            let log_min = safe_min.ln();
            let log_max = safe_max.ln();
            clamp01((physical.max(LOG_FLOOR).ln() - log_min) / (log_max - log_min))
        }
        MappingCurve::Exponential => {
            if (max - min).abs() < f64::EPSILON {
                return 0.5;
            }
            clamp01(((physical - min) / (max - min)).max(0.0).sqrt())
        }
        MappingCurve::Stepped => clamp01(physical),
    }
}

/// Exact skewed-range denormalization.
///
/// `skew == 1.0` is plain linear interpolation over `[start, end]`. A
/// non-symmetric skew applies `n^(1/skew)` across the whole range. A
/// symmetric skew splits the range at its midpoint and applies the skew to
/// each half, mirrored. Non-positive skew factors are treated as 1.0.
pub fn denormalize_with_skew(normalized: f64, start: f64, end: f64, skew: f64, symmetric: bool) -> f64 {
    let n = clamp01(normalized);
    let skew = if skew > 0.0 { skew } else { 1.0 };
    if (end - start).abs() < f64::EPSILON {
        return start;
    }
    if (skew - 1.0).abs() < f64::EPSILON {
        return start + (end - start) * n;
    }
    if !symmetric {
        return start + (end - start) * n.powf(1.0 / skew);
    }
    let mid = start + (end - start) * 0.5;
    if n < 0.5 {
        start + (mid - start) * (n * 2.0).powf(1.0 / skew)
    } else {
        end - (end - mid) * ((1.0 - n) * 2.0).powf(1.0 / skew)
    }
}

/// Exact skewed-range normalization; the inverse of [`denormalize_with_skew`].
///
/// The physical value is clamped into `[start, end]` first. The symmetric
/// branch tests against the physical midpoint.
pub fn normalize_with_skew(physical: f64, start: f64, end: f64, skew: f64, symmetric: bool) -> f64 {
    let skew = if skew > 0.0 { skew } else { 1.0 };
    if (end - start).abs() < f64::EPSILON {
        return 0.5;
    }
    let p = physical.clamp(start.min(end), start.max(end));
    if (skew - 1.0).abs() < f64::EPSILON {
        return clamp01((p - start) / (end - start));
    }
    if !symmetric {
        return clamp01(((p - start) / (end - start)).powf(skew));
    }
    let mid = start + (end - start) * 0.5;
    if p < mid {
        clamp01(((p - start) / (mid - start)).powf(skew) * 0.5)
    } else {
        clamp01(1.0 - ((end - p) / (end - mid)).powf(skew) * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [MappingCurve; 3] = [
        MappingCurve::Linear,
        MappingCurve::Logarithmic,
        MappingCurve::Exponential,
    ];

    #[test]
    fn round_trips_all_curves() {
        for curve in CURVES {
            for i in 0..=20 {
                let n = i as f64 / 20.0;
                let physical = denormalize(n, 20.0, 20_000.0, curve);
                let back = normalize(physical, 20.0, 20_000.0, curve);
                assert!(
                    (back - n).abs() < 1e-6,
                    "{:?}: n={} physical={} back={}",
                    curve,
                    n,
                    physical,
                    back
                );
            }
        }
    }

    #[test]
    fn round_trips_skew() {
        for symmetric in [false, true] {
            for i in 0..=20 {
                let n = i as f64 / 20.0;
                let physical = denormalize_with_skew(n, 20.0, 20_000.0, 0.3, symmetric);
                let back = normalize_with_skew(physical, 20.0, 20_000.0, 0.3, symmetric);
                assert!(
                    (back - n).abs() < 1e-9,
                    "symmetric={}: n={} back={}",
                    symmetric,
                    n,
                    back
                );
            }
        }
    }

    #[test]
    fn skew_of_one_is_linear() {
        for i in 0..=10 {
            let n = i as f64 / 10.0;
            assert!((denormalize_with_skew(n, 0.0, 10.0, 1.0, false) - 10.0 * n).abs() < 1e-12);
        }
    }

    #[test]
    fn symmetric_skew_hits_midpoint() {
        let mid = denormalize_with_skew(0.5, -24.0, 24.0, 0.4, true);
        assert!(mid.abs() < 1e-9, "midpoint was {}", mid);
        assert!((normalize_with_skew(0.0, -24.0, 24.0, 0.4, true) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn logarithmic_midpoint_is_geometric_mean() {
        let mid = denormalize(0.5, 20.0, 20_000.0, MappingCurve::Logarithmic);
        assert!((mid - 632.455).abs() < 0.01, "midpoint was {}", mid);
    }

    #[test]
    fn clamps_out_of_range_inputs() {
        for curve in CURVES {
            assert_eq!(
                denormalize(1.5, 0.0, 100.0, curve),
                denormalize(1.0, 0.0, 100.0, curve)
            );
            assert_eq!(
                denormalize(-0.2, 0.0, 100.0, curve),
                denormalize(0.0, 0.0, 100.0, curve)
            );
            let n = normalize(250.0, 0.0, 100.0, curve);
            assert!((0.0..=1.0).contains(&n));
            let n = normalize(-50.0, 0.0, 100.0, curve);
            assert!((0.0..=1.0).contains(&n));
        }
        assert_eq!(denormalize_with_skew(2.0, 0.0, 10.0, 0.5, false), 10.0);
        assert_eq!(normalize_with_skew(99.0, 0.0, 10.0, 0.5, false), 1.0);
    }

    #[test]
    fn logarithmic_floors_non_positive_min() {
        let physical = denormalize(0.0, 0.0, 100.0, MappingCurve::Logarithmic);
        assert!(physical > 0.0);
        let n = normalize(0.0, 0.0, 100.0, MappingCurve::Logarithmic);
        assert!(n.is_finite());
    }

    #[test]
    fn degenerate_range_normalizes_to_half() {
        assert_eq!(normalize(5.0, 5.0, 5.0, MappingCurve::Linear), 0.5);
        assert_eq!(normalize_with_skew(5.0, 5.0, 5.0, 0.5, false), 0.5);
    }

    #[test]
    fn stepped_curve_passes_through() {
        assert_eq!(denormalize(0.4, 0.0, 3.0, MappingCurve::Stepped), 0.4);
        assert_eq!(normalize(0.4, 0.0, 3.0, MappingCurve::Stepped), 0.4);
    }
}

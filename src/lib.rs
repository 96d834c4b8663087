//! ChainSwap Core - Cross-Plugin Parameter Translation Engine
//!
//! Given a normalized control setting on one audio effect, compute the
//! equivalent setting on a different effect of the same category while
//! preserving the underlying physical meaning:
//! - curve transforms between normalized and physical values (linear,
//!   logarithmic, exponential, stepped, exact skewed ranges),
//! - physical unit conversion (Q factor vs. bandwidth in octaves, ms vs. s),
//! - alias-based matching of discrete step vocabularies,
//! - an orchestrator that resolves semantics across two plugins' maps and
//!   aggregates a confidence score,
//! - a finder that ranks a user's owned plugins as swap candidates.
//!
//! Perfect translation across unrelated plugin designs is often impossible;
//! everything here degrades to partial results with a confidence score
//! rather than failing.

pub mod curve_transform;
pub mod errors;
pub mod map_store;
pub mod parameter_map;
pub mod semantics;
pub mod step_matcher;
pub mod swap_finder;
pub mod translator;
pub mod unit_converter;

pub use curve_transform::{
    denormalize, denormalize_with_skew, normalize, normalize_with_skew, MappingCurve,
};
pub use errors::{ErrorResponse, SwapError, SwapResult};
pub use map_store::{ParameterMapStore, UpsertMapRequest};
pub use parameter_map::{
    merge_descriptor, CategoryHints, CurveSample, ParameterDescriptor, ParameterStep,
    PluginParameterMap,
};
pub use semantics::{category_vocabulary, eq_band_semantic, ParameterSemantic};
pub use step_matcher::translate_step;
pub use swap_finder::{MemoryOwnershipRegistry, OwnershipRegistry, SwapCandidate, SwapFinder};
pub use translator::{SourceParamValue, TranslatedParam, TranslationEngine, TranslationResult};
pub use unit_converter::convert_units;

//! Custom Error Types for ChainSwap
//!
//! Provides structured error handling with user-friendly messages.
//! Translation itself degrades instead of failing: unresolvable semantics,
//! curve mismatches and unmatched steps are reported inside the result, not
//! here. These errors cover the remaining, caller-recoverable conditions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for ChainSwap operations
#[derive(Error, Debug)]
pub enum SwapError {
    #[error("No parameter map stored for source plugin {plugin_id}")]
    SourceMapMissing { plugin_id: String },

    #[error("No parameter map stored for target plugin {plugin_id}")]
    TargetMapMissing { plugin_id: String },

    #[error("Invalid parameter: {param} - {reason}")]
    InvalidParameter { param: String, reason: String },

    #[error("Duplicate semantic '{semantic}' in parameter map for plugin {plugin_id}")]
    DuplicateSemantic { plugin_id: String, semantic: String },

    #[error("Map store error: {message}")]
    MapStore { message: String },
}

impl SwapError {
    /// Get error code for callers
    pub fn code(&self) -> &'static str {
        match self {
            SwapError::SourceMapMissing { .. } => "SOURCE_MAP_MISSING",
            SwapError::TargetMapMissing { .. } => "TARGET_MAP_MISSING",
            SwapError::InvalidParameter { .. } => "INVALID_PARAMETER",
            SwapError::DuplicateSemantic { .. } => "DUPLICATE_SEMANTIC",
            SwapError::MapStore { .. } => "MAP_STORE",
        }
    }

    /// Get user-friendly suggestion for recovery
    pub fn suggestion(&self) -> &'static str {
        match self {
            SwapError::SourceMapMissing { .. } | SwapError::TargetMapMissing { .. } => {
                "Run enrichment for this plugin to produce a parameter map first."
            }
            SwapError::InvalidParameter { .. } => "Check the parameter name and value range.",
            SwapError::DuplicateSemantic { .. } => {
                "Each semantic tag may appear only once per plugin map."
            }
            SwapError::MapStore { .. } => "Check the map store file path and permissions.",
        }
    }

    /// Check if this error is recoverable by the caller
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SwapError::SourceMapMissing { .. } | SwapError::TargetMapMissing { .. }
        )
    }
}

/// Serializable error response for API consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub suggestion: String,
    pub recoverable: bool,
}

impl From<SwapError> for ErrorResponse {
    fn from(err: SwapError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            suggestion: err.suggestion().to_string(),
            recoverable: err.is_recoverable(),
        }
    }
}

/// Result type alias for ChainSwap operations
pub type SwapResult<T> = Result<T, SwapError>;

impl From<std::io::Error> for SwapError {
    fn from(err: std::io::Error) -> Self {
        SwapError::MapStore {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for SwapError {
    fn from(err: serde_json::Error) -> Self {
        SwapError::MapStore {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = SwapError::SourceMapMissing {
            plugin_id: "plg_1".to_string(),
        };
        assert_eq!(err.code(), "SOURCE_MAP_MISSING");

        let err = SwapError::TargetMapMissing {
            plugin_id: "plg_2".to_string(),
        };
        assert_eq!(err.code(), "TARGET_MAP_MISSING");
    }

    #[test]
    fn test_error_response_serialization() {
        let err = SwapError::DuplicateSemantic {
            plugin_id: "plg_1".to_string(),
            semantic: "comp_attack".to_string(),
        };
        let response: ErrorResponse = err.into();
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("DUPLICATE_SEMANTIC"));
        assert!(json.contains("comp_attack"));
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(SwapError::SourceMapMissing {
            plugin_id: "plg_1".to_string()
        }
        .is_recoverable());
        assert!(!SwapError::InvalidParameter {
            param: "gain".to_string(),
            reason: "not finite".to_string()
        }
        .is_recoverable());
    }
}

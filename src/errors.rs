// src/errors.rs
// DOCUMENTATION: Custom error types and diagnostic codes
// PURPOSE: Centralized error handling for the search session

use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Every failure a collaborator can report to the controller
/// Each variant maps to a stable code used in logged diagnostics
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NearbyError {
    #[error("Location authorization denied")]
    AuthorizationDenied,

    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("Reverse geocoding failed: {0}")]
    GeocodeFailed(String),

    #[error("Search service error: {0}")]
    SearchServiceError(String),

    #[error("Search query is empty")]
    EmptyQuery,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl NearbyError {
    /// Stable machine-readable code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            NearbyError::AuthorizationDenied => "AUTHORIZATION_DENIED",
            NearbyError::LocationUnavailable(_) => "LOCATION_UNAVAILABLE",
            NearbyError::GeocodeFailed(_) => "GEOCODE_FAILED",
            NearbyError::SearchServiceError(_) => "SEARCH_SERVICE_ERROR",
            NearbyError::EmptyQuery => "EMPTY_QUERY",
            NearbyError::InvalidInput(_) => "INVALID_INPUT",
            NearbyError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            NearbyError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Build a structured diagnostic for the log
    /// DOCUMENTATION: Mirrors the error envelope used for API responses,
    /// but it is written to the log instead of being shown to the user
    pub fn diagnostic(&self) -> String {
        json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        })
        .to_string()
    }
}

impl From<validator::ValidationErrors> for NearbyError {
    fn from(errors: validator::ValidationErrors) -> Self {
        NearbyError::InvalidInput(errors.to_string())
    }
}

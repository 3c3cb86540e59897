//! Error types for the library layer.

use std::fmt;

use crate::similarity::ScoringError;
use crate::taxonomy::TaxonomyError;

/// Errors produced by the library layer, wrapping provider API errors and
/// adding cache, serialization, validation, and configuration failures.
#[derive(Debug)]
pub enum BizScoutError {
    /// An error from the underlying provider client.
    Api(bizscout_api::Error),
    /// A cache operation failed (e.g. deserialization of cached data).
    Cache(String),
    /// JSON serialization or deserialization failed.
    Serialization(serde_json::Error),
    /// User-provided input failed validation.
    InvalidInput(String),
    /// The embedded industry taxonomy is invalid.
    Taxonomy(TaxonomyError),
    /// Scoring weights are invalid.
    Scoring(ScoringError),
}

impl fmt::Display for BizScoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::Cache(msg) => write!(f, "Cache error: {}", msg),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::Taxonomy(e) => write!(f, "Taxonomy error: {}", e),
            Self::Scoring(e) => write!(f, "Scoring error: {}", e),
        }
    }
}

impl std::error::Error for BizScoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Serialization(e) => Some(e),
            Self::Taxonomy(e) => Some(e),
            Self::Scoring(e) => Some(e),
            _ => None,
        }
    }
}

impl From<bizscout_api::Error> for BizScoutError {
    fn from(e: bizscout_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<serde_json::Error> for BizScoutError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}

impl From<TaxonomyError> for BizScoutError {
    fn from(e: TaxonomyError) -> Self {
        Self::Taxonomy(e)
    }
}

impl From<ScoringError> for BizScoutError {
    fn from(e: ScoringError) -> Self {
        Self::Scoring(e)
    }
}

impl BizScoutError {
    /// True for transport failures, rate limiting, and server errors.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api(bizscout_api::Error::RequestFailed) => true,
            Self::Api(bizscout_api::Error::HttpStatus { status, .. }) => {
                *status == 429 || *status >= 500
            }
            _ => false,
        }
    }
}

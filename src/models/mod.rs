//! Data models module
//!
//! Defines request, rate and response data structures

use serde::{Deserialize, Serialize};

pub mod conversion;
pub mod rates;

pub use conversion::{ConversionRequest, ConversionResult};
pub use rates::{RateLookup, RateSnapshot};

/// Error body sent to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human readable failure reason
    pub reason: String,
    /// Comma separated currency codes, only for unsupported currencies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_currencies: Option<String>,
}

impl ErrorBody {
    /// Create an error body with only a reason
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            supported_currencies: None,
        }
    }

    /// Create an error body listing the currencies the provider supports
    pub fn with_supported(reason: impl Into<String>, supported: &[String]) -> Self {
        Self {
            reason: reason.into(),
            supported_currencies: Some(supported.join(", ")),
        }
    }
}

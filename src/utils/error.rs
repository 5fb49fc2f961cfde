//! Error handling module
//!
//! Defines error types and handling logic used in the project

use crate::models::ErrorBody;
use axum::http::StatusCode;
use thiserror::Error;

/// Reason sent to clients for any failure on our side or upstream
pub const INTERNAL_REASON: &str = "Internal Server Error";

/// Reason sent to clients when the request itself cannot be read
pub const BAD_REQUEST_REASON: &str = "Bad request type";

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Client address or query string could not be parsed
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Required query parameters are absent
    #[error("missing arguments {}", .0.join(" and "))]
    MissingArguments(Vec<&'static str>),

    /// Amount is not a positive integer
    #[error("bad type for amount: {0}, give a positive integer")]
    InvalidAmount(String),

    /// Currency is not a three letter code
    #[error("bad type for currency: {0} ; should be a three letter string")]
    InvalidCurrencyFormat(String),

    /// Rate provider refused the requested base currency
    #[error("Requested currency type: {code} is not supported")]
    UnsupportedCurrency {
        code: String,
        supported: Vec<String>,
    },

    /// Rate provider could not be reached or answered with a failure
    #[error("Rate provider unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Rate provider answered with a body we cannot decode
    #[error("Failed to decode rate provider response: {0}")]
    UpstreamDecode(String),

    /// Response body could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_)
            | AppError::MissingArguments(_)
            | AppError::InvalidAmount(_)
            | AppError::InvalidCurrencyFormat(_)
            | AppError::UnsupportedCurrency { .. } => StatusCode::BAD_REQUEST,
            AppError::UpstreamUnavailable(_)
            | AppError::UpstreamDecode(_)
            | AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the failure was caused by the client
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Whether detailed error information should be logged
    pub fn should_log_details(&self) -> bool {
        !matches!(self, AppError::MissingArguments(_))
    }

    /// Convert to the body sent back to the client
    ///
    /// Server-side failures never leak their details; those only go to the log.
    pub fn to_error_body(&self) -> ErrorBody {
        match self {
            AppError::BadRequest(_) => ErrorBody::new(BAD_REQUEST_REASON),
            AppError::UnsupportedCurrency { supported, .. } => {
                ErrorBody::with_supported(self.to_string(), supported)
            }
            err if err.is_client_error() => ErrorBody::new(err.to_string()),
            _ => ErrorBody::new(INTERNAL_REASON),
        }
    }

    /// Log the error the way the handler boundary reports it
    pub fn log(&self) {
        let status = self.status_code();
        if !self.is_client_error() {
            tracing::error!("Application error: {} - Status code: {}", self, status);
        } else if self.should_log_details() {
            tracing::warn!("Client error: {} - Status code: {}", self, status);
        } else {
            tracing::debug!("Client error: {} - Status code: {}", self, status);
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::UpstreamDecode(err.to_string())
        } else {
            AppError::UpstreamUnavailable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<quick_xml::Error> for AppError {
    fn from(err: quick_xml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Error context extension trait
pub trait ErrorContext<T> {
    /// Add upstream availability error context
    fn upstream_context(self, message: &str) -> AppResult<T>;

    /// Add upstream decode error context
    fn decode_context(self, message: &str) -> AppResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn upstream_context(self, message: &str) -> AppResult<T> {
        self.map_err(|e| AppError::UpstreamUnavailable(format!("{}: {}", message, e)))
    }

    fn decode_context(self, message: &str) -> AppResult<T> {
        self.map_err(|e| AppError::UpstreamDecode(format!("{}: {}", message, e)))
    }
}

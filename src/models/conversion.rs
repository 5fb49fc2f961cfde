//! Conversion data models
//!
//! Defines the validated request and the converted result sent to clients

use crate::services::validator::{validate_amount, validate_currency};
use crate::utils::error::AppResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A validated conversion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    /// Amount to convert, always positive
    pub amount: i64,
    /// Uppercase three letter base currency code
    pub currency: String,
}

impl ConversionRequest {
    /// Build a request from raw query values, amount checked first
    pub fn from_query(amount: &str, currency: &str) -> AppResult<Self> {
        let amount = validate_amount(amount)?;
        let currency = validate_currency(currency)?;
        Ok(Self { amount, currency })
    }
}

/// Successful conversion body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Amount that was converted
    pub amount: i64,
    /// Base currency code
    pub currency: String,
    /// Target currency code to converted amount
    pub converted: BTreeMap<String, String>,
}

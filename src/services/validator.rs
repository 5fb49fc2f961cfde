//! Query parameter validation
//!
//! Syntactic checks only; currency support is discovered at conversion time

use crate::utils::error::{AppError, AppResult};

/// Length of an ISO 4217 style currency code
pub const CURRENCY_CODE_LEN: usize = 3;

/// Parse the amount, which must be a positive integer
pub fn validate_amount(raw: &str) -> AppResult<i64> {
    match raw.parse::<i64>() {
        Ok(amount) if amount > 0 => Ok(amount),
        _ => Err(AppError::InvalidAmount(raw.to_string())),
    }
}

/// Check the currency is three letters and return it uppercased
pub fn validate_currency(raw: &str) -> AppResult<String> {
    let well_formed = raw.chars().count() == CURRENCY_CODE_LEN
        && raw.chars().all(|c| c.is_ascii_alphabetic());

    if !well_formed {
        return Err(AppError::InvalidCurrencyFormat(raw.to_string()));
    }

    Ok(raw.to_ascii_uppercase())
}

//! Currency converter service
//!
//! Turns a validated request into converted amounts for every currency the
//! rate provider quotes against the requested base.

use crate::models::{ConversionRequest, ConversionResult, RateLookup};
use crate::services::client::RateProvider;
use crate::utils::error::{AppError, AppResult};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Currency converter
#[derive(Clone)]
pub struct CurrencyConverter {
    provider: Arc<dyn RateProvider>,
}

impl std::fmt::Debug for CurrencyConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrencyConverter")
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl CurrencyConverter {
    /// Create a new converter instance
    pub fn new(provider: Arc<dyn RateProvider>) -> Self {
        Self { provider }
    }

    /// Convert the request amount into every currency the provider quotes
    pub async fn convert(&self, request: &ConversionRequest) -> AppResult<ConversionResult> {
        debug!("Converting {} {}", request.amount, request.currency);

        let snapshot = match self.provider.latest(Some(&request.currency)).await? {
            RateLookup::Found(snapshot) => snapshot,
            RateLookup::Rejected { status } => {
                info!(
                    "Rate provider rejected base {} with status {}, fetching supported currencies",
                    request.currency, status
                );
                return Err(self.unsupported_currency(&request.currency).await);
            }
        };

        Ok(ConversionResult {
            amount: request.amount,
            currency: request.currency.clone(),
            converted: convert_amounts(request.amount, &snapshot.rates),
        })
    }

    /// Look up the default rate set to tell the client what is supported
    async fn unsupported_currency(&self, code: &str) -> AppError {
        match self.provider.latest(None).await {
            Ok(RateLookup::Found(snapshot)) => AppError::UnsupportedCurrency {
                code: code.to_string(),
                supported: snapshot.currency_codes(),
            },
            Ok(RateLookup::Rejected { status }) => AppError::UpstreamUnavailable(format!(
                "rate provider rejected default lookup with status {}",
                status
            )),
            Err(e) => e,
        }
    }
}

/// Multiply `amount` by every rate and format the rounded results
pub fn convert_amounts(amount: i64, rates: &BTreeMap<String, f64>) -> BTreeMap<String, String> {
    rates
        .iter()
        .map(|(code, rate)| {
            let value = round_half_away(amount as f64 * rate, 2);
            (code.clone(), format_amount(value))
        })
        .collect()
}

/// Round to `precision` decimals, halves away from zero
pub fn round_half_away(value: f64, precision: i32) -> f64 {
    let scale = 10f64.powi(precision);
    (value * scale + 0.5f64.copysign(value)).trunc() / scale
}

/// Shortest decimal form that round-trips, without exponent or trailing zeros
pub fn format_amount(value: f64) -> String {
    format!("{}", value)
}

//! Rate provider data models
//!
//! Defines the shape of the upstream latest-rates response

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Latest rates for one base currency, as published by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    /// Base currency the rates are quoted against
    pub base: String,
    /// Publication date of the rates, `None` when absent or not `YYYY-MM-DD`
    #[serde(rename = "date", default, deserialize_with = "lenient_date")]
    pub as_of: Option<NaiveDate>,
    /// Target currency code to rate
    pub rates: BTreeMap<String, f64>,
}

impl RateSnapshot {
    /// Every currency code this snapshot knows about, base included
    pub fn currency_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.rates.keys().cloned().collect();
        if !self.base.is_empty() && !self.rates.contains_key(&self.base) {
            codes.push(self.base.clone());
        }
        codes.sort();
        codes
    }
}

/// The date is informational only, so an odd value must not sink the rates
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|date| NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()))
}

/// Outcome of a latest-rates lookup that reached the provider
#[derive(Debug, Clone, PartialEq)]
pub enum RateLookup {
    /// Provider answered with rates
    Found(RateSnapshot),
    /// Provider refused the requested base currency
    Rejected {
        /// HTTP status the provider answered with
        status: u16,
    },
}

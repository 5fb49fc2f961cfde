//! Currency converter unit tests

use async_trait::async_trait;
use chrono::NaiveDate;
use currency_converter::models::{ConversionRequest, RateLookup, RateSnapshot};
use currency_converter::services::converter::{convert_amounts, format_amount, round_half_away};
use currency_converter::services::{CurrencyConverter, RateProvider};
use currency_converter::{AppError, AppResult};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Provider answering from canned responses and recording requested bases
struct StubProvider {
    for_base: Box<dyn Fn(&str) -> AppResult<RateLookup> + Send + Sync>,
    default: Box<dyn Fn() -> AppResult<RateLookup> + Send + Sync>,
    calls: Mutex<Vec<Option<String>>>,
}

impl StubProvider {
    fn new(
        for_base: impl Fn(&str) -> AppResult<RateLookup> + Send + Sync + 'static,
        default: impl Fn() -> AppResult<RateLookup> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            for_base: Box::new(for_base),
            default: Box::new(default),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<Option<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RateProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn latest(&self, base: Option<&str>) -> AppResult<RateLookup> {
        self.calls.lock().unwrap().push(base.map(str::to_string));
        match base {
            Some(base) => (self.for_base)(base),
            None => (self.default)(),
        }
    }
}

fn snapshot(base: &str, rates: &[(&str, f64)]) -> RateSnapshot {
    RateSnapshot {
        base: base.to_string(),
        as_of: NaiveDate::from_ymd_opt(2017, 11, 24),
        rates: rates.iter().map(|(code, rate)| (code.to_string(), *rate)).collect(),
    }
}

fn request(amount: i64, currency: &str) -> ConversionRequest {
    ConversionRequest {
        amount,
        currency: currency.to_string(),
    }
}

#[tokio::test]
async fn test_convert_every_rate() {
    let provider = StubProvider::new(
        |base| Ok(RateLookup::Found(snapshot(base, &[("EUR", 0.8), ("CHF", 0.5), ("KRW", 1085.25)]))),
        || panic!("default rates should not be requested"),
    );
    let converter = CurrencyConverter::new(provider.clone());

    let result = converter.convert(&request(305, "USD")).await.unwrap();

    assert_eq!(result.amount, 305);
    assert_eq!(result.currency, "USD");
    assert_eq!(result.converted.len(), 3);
    assert_eq!(result.converted["EUR"], "244");
    assert_eq!(result.converted["CHF"], "152.5");
    assert_eq!(result.converted["KRW"], "331001.25");
    assert_eq!(provider.calls(), vec![Some("USD".to_string())]);
}

#[tokio::test]
async fn test_converted_keys_match_rates() {
    let rates = [("AUD", 1.3), ("BGN", 1.65), ("BRL", 3.2), ("CAD", 1.27)];
    let provider = StubProvider::new(
        move |base| Ok(RateLookup::Found(snapshot(base, &rates))),
        || panic!("default rates should not be requested"),
    );
    let converter = CurrencyConverter::new(provider);

    let result = converter.convert(&request(1, "USD")).await.unwrap();
    let keys: Vec<&str> = result.converted.keys().map(String::as_str).collect();

    assert_eq!(keys, vec!["AUD", "BGN", "BRL", "CAD"]);
}

#[tokio::test]
async fn test_empty_rates_convert_to_empty_map() {
    let provider = StubProvider::new(
        |base| Ok(RateLookup::Found(snapshot(base, &[]))),
        || panic!("default rates should not be requested"),
    );
    let converter = CurrencyConverter::new(provider);

    let result = converter.convert(&request(10, "EUR")).await.unwrap();
    assert!(result.converted.is_empty());
}

#[tokio::test]
async fn test_rejected_base_lists_supported_currencies() {
    let provider = StubProvider::new(
        |_| Ok(RateLookup::Rejected { status: 422 }),
        || Ok(RateLookup::Found(snapshot("EUR", &[("USD", 1.25), ("GBP", 0.89)]))),
    );
    let converter = CurrencyConverter::new(provider.clone());

    let err = converter.convert(&request(305, "USW")).await.unwrap_err();

    match &err {
        AppError::UnsupportedCurrency { code, supported } => {
            assert_eq!(code, "USW");
            assert_eq!(supported, &vec!["EUR".to_string(), "GBP".to_string(), "USD".to_string()]);
        }
        other => panic!("Expected unsupported currency, got {:?}", other),
    }
    assert_eq!(
        err.to_error_body().supported_currencies.as_deref(),
        Some("EUR, GBP, USD")
    );
    assert_eq!(provider.calls(), vec![Some("USW".to_string()), None]);
}

#[tokio::test]
async fn test_rejected_default_lookup_is_upstream_failure() {
    let provider = StubProvider::new(
        |_| Ok(RateLookup::Rejected { status: 404 }),
        || Ok(RateLookup::Rejected { status: 404 }),
    );
    let converter = CurrencyConverter::new(provider);

    let err = converter.convert(&request(305, "USW")).await.unwrap_err();
    assert!(matches!(err, AppError::UpstreamUnavailable(_)));
}

#[tokio::test]
async fn test_failed_default_lookup_keeps_its_error() {
    let provider = StubProvider::new(
        |_| Ok(RateLookup::Rejected { status: 422 }),
        || Err(AppError::UpstreamDecode("unexpected end of input".to_string())),
    );
    let converter = CurrencyConverter::new(provider);

    let err = converter.convert(&request(305, "USW")).await.unwrap_err();
    assert!(matches!(err, AppError::UpstreamDecode(_)));
}

#[tokio::test]
async fn test_upstream_errors_propagate() {
    let provider = StubProvider::new(
        |_| Err(AppError::UpstreamUnavailable("timed out".to_string())),
        || panic!("default rates should not be requested"),
    );
    let converter = CurrencyConverter::new(provider.clone());

    let err = converter.convert(&request(305, "USD")).await.unwrap_err();
    assert!(matches!(err, AppError::UpstreamUnavailable(_)));
    assert_eq!(provider.calls().len(), 1);
}

#[test]
fn test_rounding_is_half_away_from_zero() {
    // half-to-even would give 0.12 and 2.5
    assert_eq!(round_half_away(0.125, 2), 0.13);
    assert_eq!(round_half_away(2.5, 0), 3.0);
    assert_eq!(round_half_away(-0.125, 2), -0.13);
    assert_eq!(round_half_away(10.004, 2), 10.0);
}

#[test]
fn test_format_amount_matches_wire_format() {
    assert_eq!(format_amount(100.0), "100");
    assert_eq!(format_amount(100.5), "100.5");
    assert_eq!(format_amount(0.01), "0.01");
    assert_eq!(format_amount(33626.25), "33626.25");
    assert_eq!(format_amount(1e21), "1000000000000000000000");
}

#[test]
fn test_convert_amounts_rounds_each_rate() {
    let mut rates = BTreeMap::new();
    rates.insert("EUR".to_string(), 0.84915);
    rates.insert("JPY".to_string(), 111.5);

    let converted = convert_amounts(2, &rates);

    assert_eq!(converted["EUR"], "1.7");
    assert_eq!(converted["JPY"], "223");
}

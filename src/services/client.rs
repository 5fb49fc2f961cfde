//! HTTP client service
//!
//! Encapsulates HTTP communication with the exchange-rate provider

use crate::config::RatesConfig;
use crate::models::{RateLookup, RateSnapshot};
use crate::utils::error::{AppError, AppResult, ErrorContext};
use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, Response};
use std::time::Duration;
use tracing::{debug, warn};

/// Source of latest exchange rates
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Fetch the latest rates, for `base` or for the provider's default base
    async fn latest(&self, base: Option<&str>) -> AppResult<RateLookup>;
}

/// Rate provider speaking the fixer.io `/latest` protocol
#[derive(Debug, Clone)]
pub struct HttpRateProvider {
    client: Client,
    base_url: String,
}

impl HttpRateProvider {
    /// Create a new client instance
    pub fn new(config: &RatesConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(concat!("currency-converter/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL of the latest-rates endpoint
    pub fn latest_url(&self) -> String {
        format!("{}/latest", self.base_url)
    }

    /// Handle HTTP response
    async fn handle_response(&self, response: Response) -> AppResult<RateLookup> {
        let status = response.status();

        if status.is_success() {
            let body = response
                .bytes()
                .await
                .upstream_context("Failed to read rate provider response")?;
            let snapshot: RateSnapshot =
                serde_json::from_slice(&body).decode_context("Malformed rates body")?;

            debug!(
                "Rate provider returned {} rates for {} as of {}",
                snapshot.rates.len(),
                snapshot.base,
                snapshot
                    .as_of
                    .map_or_else(|| "unknown date".to_string(), |date| date.to_string())
            );
            Ok(RateLookup::Found(snapshot))
        } else if status.is_client_error() {
            let error_text = response.text().await.unwrap_or_default();
            debug!("Rate provider rejected request: {} - {}", status, error_text);
            Ok(RateLookup::Rejected {
                status: status.as_u16(),
            })
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Rate provider request failed: {} - {}", status, error_text);
            Err(AppError::UpstreamUnavailable(format!(
                "rate provider answered {}",
                status
            )))
        }
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    fn name(&self) -> &str {
        "http"
    }

    async fn latest(&self, base: Option<&str>) -> AppResult<RateLookup> {
        let url = self.latest_url();
        debug!("Requesting latest rates from {} (base: {:?})", url, base);

        let mut request = self.client.get(&url).header(ACCEPT, "application/json");
        if let Some(base) = base {
            request = request.query(&[("base", base)]);
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }
}

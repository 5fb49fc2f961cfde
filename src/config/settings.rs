//! Application configuration settings
//!
//! Defines all configuration structures and loading logic

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server configuration
    pub server: ServerConfig,
    /// Rate provider configuration
    pub rates: RatesConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
}

/// Rate provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesConfig {
    /// Provider base URL, `/latest` is appended
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log filter, a level or `RUST_LOG` style directives
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            rates: RatesConfig {
                base_url: "http://api.fixer.io".to_string(),
                timeout: 5,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "text".to_string(),
            },
        }
    }
}

impl Settings {
    /// Create a new configuration instance from the process environment
    pub fn new() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let settings = Self {
            server: ServerConfig {
                host: get_or_default("SERVER_HOST", "0.0.0.0"),
                port: get_or_default("SERVER_PORT", "8080")
                    .parse()
                    .context("Invalid SERVER_PORT")?,
            },
            rates: RatesConfig {
                base_url: get_or_default("RATES_BASE_URL", "http://api.fixer.io")
                    .trim_end_matches('/')
                    .to_string(),
                timeout: get_or_default("RATES_TIMEOUT", "5")
                    .parse()
                    .context("Invalid RATES_TIMEOUT")?,
            },
            logging: LoggingConfig {
                level: get_or_default("RUST_LOG", "info"),
                format: get_or_default("LOG_FORMAT", "text"),
            },
        };

        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration validity
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("SERVER_PORT cannot be 0");
        }

        if !self.rates.base_url.starts_with("http") {
            anyhow::bail!("Invalid RATES_BASE_URL format, should start with 'http'");
        }

        if self.rates.timeout == 0 {
            anyhow::bail!("RATES_TIMEOUT cannot be 0");
        }

        EnvFilter::try_new(&self.logging.level)
            .with_context(|| format!("Invalid log filter in RUST_LOG: {}", self.logging.level))?;

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            anyhow::bail!("Invalid LOG_FORMAT: {}", self.logging.format);
        }

        Ok(())
    }

    /// Address the server listens on
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

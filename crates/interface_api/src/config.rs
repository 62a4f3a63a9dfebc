//! API configuration

use core_kernel::{Currency, EPSILON};
use domain_settlement::{SettlementConfig, SettlementStrategy};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level or `EnvFilter` directive
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Currency used when a request does not name one
    pub default_currency: Currency,
    /// Matching strategy used when a request does not name one
    pub strategy: SettlementStrategy,
    /// Settled-balance tolerance
    pub epsilon: Decimal,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            default_currency: Currency::USD,
            strategy: SettlementStrategy::Greedy,
            epsilon: EPSILON,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `SPLIT_`-prefixed environment variables
    ///
    /// Unset variables keep their default.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("SPLIT"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Engine configuration, with an optional per-request strategy override
    pub fn settlement_config(&self, strategy: Option<SettlementStrategy>) -> SettlementConfig {
        SettlementConfig {
            epsilon: self.epsilon,
            strategy: strategy.unwrap_or(self.strategy),
        }
    }
}

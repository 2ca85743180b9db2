//! Configuration Management Module
//!
//! This module handles loading and managing configuration for the gateway.
//! Configuration includes the API bind address, the downstream node API
//! endpoint, and the rate limiter parameters.

use serde::{Deserialize, Serialize};

/// Main configuration structure containing all gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration (bind host and port)
    pub api: ApiConfig,
    /// Downstream node API configuration
    pub node: NodeConfig,
    /// Rate limiter parameters (enforced by the deployment front end)
    pub limiter: LimiterConfig,
}

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host address to bind the API server to
    pub host: String,
    /// Port number to bind the API server to
    pub port: u16,
}

/// Downstream node API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Base URL of the node HTTP API
    pub api_url: String,
    /// Request timeout for node calls in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// Rate limiter parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimiterConfig {
    /// Refill interval in milliseconds
    pub interval_ms: u64,
    /// Bucket capacity
    pub capacity: i64,
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Configuration is valid
    /// - `Err(anyhow::Error)` - A required field is empty or out of range
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api.host.is_empty() {
            return Err(anyhow::anyhow!("Configuration error: api.host is empty"));
        }
        if self.node.api_url.is_empty() {
            return Err(anyhow::anyhow!("Configuration error: node.api_url is empty"));
        }
        if self.limiter.capacity <= 0 {
            return Err(anyhow::anyhow!(
                "Configuration error: limiter.capacity must be positive, got {}",
                self.limiter.capacity
            ));
        }
        Ok(())
    }

    /// Loads configuration from the TOML file.
    ///
    /// The path defaults to `config/olo-gateway.toml` and can be overridden
    /// through the `OLO_GATEWAY_CONFIG_PATH` environment variable.
    ///
    /// # Returns
    ///
    /// - `Ok(Config)` - Successfully loaded and validated configuration
    /// - `Err(anyhow::Error)` - File missing, unparsable, or invalid
    pub fn load() -> anyhow::Result<Self> {
        let config_path = std::env::var("OLO_GATEWAY_CONFIG_PATH")
            .unwrap_or_else(|_| "config/olo-gateway.toml".to_string());

        if std::path::Path::new(&config_path).exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Err(anyhow::anyhow!(
                "Configuration file '{}' not found. Please copy the template:\n\
                cp config/olo-gateway.template.toml config/olo-gateway.toml\n\
                Then edit config/olo-gateway.toml with your actual values.",
                config_path
            ))
        }
    }

    /// Creates a default configuration suitable for local development.
    pub fn default() -> Self {
        Self {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 10001,
            },
            node: NodeConfig {
                api_url: "http://127.0.0.1:8889".to_string(),
                request_timeout_ms: default_request_timeout_ms(),
            },
            limiter: LimiterConfig {
                interval_ms: 1000,
                capacity: 100,
            },
        }
    }
}

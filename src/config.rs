//! Configuration management for OiWatch
//!
//! Loads from optional config files + environment variables via .env

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub refresh: RefreshConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the market-data provider
    pub base_url: String,
    /// Hard per-request latency ceiling in seconds
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    /// Cooldown between cycles, counted from cycle completion
    pub poll_interval_secs: u64,
    /// Strikes kept either side of the center strike
    pub window_half_width: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Port for the read API
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        let config = Config::builder()
            // Provider defaults
            .set_default("provider.base_url", "https://www.nseindia.com")?
            .set_default("provider.request_timeout_secs", 5)?
            // Refresh defaults
            .set_default("refresh.poll_interval_secs", 30)?
            .set_default("refresh.window_half_width", 10)?
            // Server defaults
            .set_default("server.port", 5000)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (OIWATCH_*)
            .add_source(Environment::with_prefix("OIWATCH").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(app_config)
    }
}

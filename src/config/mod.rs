//! Configuration module for the media gateway
//!
//! This module handles server configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//!
//! # Example
//! ```rust,no_run
//! use media_gateway::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;

use crate::core::camb::CambConfig;
use crate::core::dubbing::PollPolicy;

mod env;
mod merge;
mod validation;
mod yaml;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_DUB_POLL_INTERVAL_MS: u64 = 2_000;
pub const DEFAULT_DUB_DEADLINE_SECONDS: u64 = 120;
pub const DEFAULT_PROVIDER_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;
pub const DEFAULT_RATE_LIMIT_REQUESTS_PER_SECOND: u32 = 60;
pub const DEFAULT_RATE_LIMIT_BURST_SIZE: u32 = 10;

/// Rate limits at or above this value disable the limiter entirely.
pub const RATE_LIMIT_DISABLED_THRESHOLD: u32 = 100_000;

/// TLS configuration for HTTPS
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to the TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// Server configuration
///
/// Contains the listener settings, the Camb.ai connection, the dubbing poll
/// policy and request limits.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // TLS configuration (optional)
    pub tls: Option<TlsConfig>,

    // Camb.ai provider
    /// Optional at load time; requests fail with a configuration error while unset
    pub camb_api_key: Option<String>,
    pub camb_api_url: String,
    pub camb_transcribe_url: String,
    pub transcription_model: String,
    pub provider_timeout_seconds: u64,

    // Dubbing job polling
    pub dub_poll_interval_ms: u64,
    pub dub_deadline_seconds: u64,

    // Security settings
    pub max_upload_bytes: usize,
    pub rate_limit_requests_per_second: u32,
    pub rate_limit_burst_size: u32,
}

/// Zeroize the provider credential when the configuration is dropped.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut key) = self.camb_api_key {
            key.zeroize();
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables only
    ///
    /// `.env` is loaded into the environment by `main` before this runs.
    ///
    /// # Errors
    /// Returns an error if a variable has an invalid format or validation fails.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        merge::merge_config(None)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        merge::merge_config(Some(yaml_config))
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    pub fn has_camb_api_key(&self) -> bool {
        self.camb_api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    /// Whether the rate limiter should be installed.
    pub fn is_rate_limited(&self) -> bool {
        self.rate_limit_requests_per_second < RATE_LIMIT_DISABLED_THRESHOLD
    }

    /// Connection settings for the Camb.ai client.
    pub fn camb_config(&self) -> CambConfig {
        CambConfig {
            api_key: self.camb_api_key.clone(),
            api_url: self.camb_api_url.clone(),
            transcribe_url: self.camb_transcribe_url.clone(),
            transcription_model: self.transcription_model.clone(),
            request_timeout: Duration::from_secs(self.provider_timeout_seconds),
        }
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(
            Duration::from_millis(self.dub_poll_interval_ms),
            Duration::from_secs(self.dub_deadline_seconds),
        )
    }
}

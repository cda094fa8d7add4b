use serde::Deserialize;
use std::path::PathBuf;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present
/// here override environment variables.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 3001
///   tls:
///     enabled: true
///     cert_path: "/etc/media-gateway/cert.pem"
///     key_path: "/etc/media-gateway/key.pem"
///
/// providers:
///   camb:
///     api_key: "your-camb-key"
///     api_url: "https://client.camb.ai/apis"
///     transcribe_url: "https://api.camb.ai/v1/transcribe"
///     transcription_model: "mars6-turbo"
///     timeout_seconds: 30
///
/// dubbing:
///   poll_interval_ms: 2000
///   deadline_seconds: 120
///
/// security:
///   max_upload_bytes: 104857600
///   rate_limit_requests_per_second: 60
///   rate_limit_burst_size: 10
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub providers: Option<ProvidersYaml>,
    pub dubbing: Option<DubbingYaml>,
    pub security: Option<SecurityYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub tls: Option<TlsYaml>,
}

/// TLS configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TlsYaml {
    pub enabled: Option<bool>,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

/// Provider sections from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ProvidersYaml {
    pub camb: Option<CambYaml>,
}

/// Camb.ai settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CambYaml {
    pub api_key: Option<String>,
    /// Dubbing API base URL
    pub api_url: Option<String>,
    pub transcribe_url: Option<String>,
    pub transcription_model: Option<String>,
    /// Per-request timeout for provider calls
    pub timeout_seconds: Option<u64>,
}

/// Dubbing job polling from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct DubbingYaml {
    pub poll_interval_ms: Option<u64>,
    pub deadline_seconds: Option<u64>,
}

/// Request limits from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SecurityYaml {
    pub max_upload_bytes: Option<usize>,
    pub rate_limit_requests_per_second: Option<u32>,
    pub rate_limit_burst_size: Option<u32>,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file cannot be read
    /// - The YAML is malformed
    /// - Fields have invalid types
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }

    pub fn camb(&self) -> Option<&CambYaml> {
        self.providers.as_ref()?.camb.as_ref()
    }

    pub fn tls(&self) -> Option<&TlsYaml> {
        self.server.as_ref()?.tls.as_ref()
    }
}

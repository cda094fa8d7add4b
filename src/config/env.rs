//! Environment variable loading.
//!
//! Every variable is optional here; defaults are applied during merging.
//! Empty values count as unset.

use std::env;
use std::str::FromStr;

/// Raw settings read from the process environment
#[derive(Debug, Default)]
pub(super) struct EnvSettings {
    pub host: Option<String>,
    pub port: Option<u16>,

    pub tls_enabled: Option<bool>,
    pub tls_cert_path: Option<String>,
    pub tls_key_path: Option<String>,

    pub camb_api_key: Option<String>,
    pub camb_api_url: Option<String>,
    pub camb_transcribe_url: Option<String>,
    pub camb_transcription_model: Option<String>,
    pub provider_timeout_seconds: Option<u64>,

    pub dub_poll_interval_ms: Option<u64>,
    pub dub_deadline_seconds: Option<u64>,

    pub max_upload_bytes: Option<usize>,
    pub rate_limit_requests_per_second: Option<u32>,
    pub rate_limit_burst_size: Option<u32>,
}

impl EnvSettings {
    pub fn load() -> Result<Self, String> {
        Ok(Self {
            host: env_string("HOST"),
            port: env_parse("PORT")?,
            tls_enabled: env_bool("TLS_ENABLED")?,
            tls_cert_path: env_string("TLS_CERT_PATH"),
            tls_key_path: env_string("TLS_KEY_PATH"),
            camb_api_key: env_string("CAMB_API_KEY"),
            camb_api_url: env_string("CAMB_API_URL"),
            camb_transcribe_url: env_string("CAMB_TRANSCRIBE_URL"),
            camb_transcription_model: env_string("CAMB_TRANSCRIPTION_MODEL"),
            provider_timeout_seconds: env_parse("PROVIDER_TIMEOUT_SECONDS")?,
            dub_poll_interval_ms: env_parse("DUB_POLL_INTERVAL_MS")?,
            dub_deadline_seconds: env_parse("DUB_DEADLINE_SECONDS")?,
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES")?,
            rate_limit_requests_per_second: env_parse("RATE_LIMIT_REQUESTS_PER_SECOND")?,
            rate_limit_burst_size: env_parse("RATE_LIMIT_BURST_SIZE")?,
        })
    }
}

fn env_string(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>, String> {
    match env_string(name) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| format!("Invalid value for {name}: {raw}")),
        None => Ok(None),
    }
}

fn env_bool(name: &str) -> Result<Option<bool>, String> {
    match env_string(name).map(|v| v.to_lowercase()) {
        Some(v) if matches!(v.as_str(), "true" | "1" | "yes" | "on") => Ok(Some(true)),
        Some(v) if matches!(v.as_str(), "false" | "0" | "no" | "off") => Ok(Some(false)),
        Some(v) => Err(format!("Invalid value for {name}: {v}")),
        None => Ok(None),
    }
}

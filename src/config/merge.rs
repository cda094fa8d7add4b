use super::env::EnvSettings;
use super::validation;
use super::yaml::YamlConfig;
use super::{
    DEFAULT_DUB_DEADLINE_SECONDS, DEFAULT_DUB_POLL_INTERVAL_MS, DEFAULT_HOST,
    DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT, DEFAULT_PROVIDER_TIMEOUT_SECONDS,
    DEFAULT_RATE_LIMIT_BURST_SIZE, DEFAULT_RATE_LIMIT_REQUESTS_PER_SECOND, ServerConfig,
};
use crate::core::camb::{CAMB_API_URL, CAMB_TRANSCRIBE_URL, DEFAULT_TRANSCRIPTION_MODEL};

/// Merge environment settings (base) with optional YAML overrides.
///
/// Priority: YAML > environment > defaults. The result is validated before
/// it is returned.
pub(super) fn merge_config(
    yaml: Option<YamlConfig>,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let env = EnvSettings::load()?;
    let yaml = yaml.unwrap_or_default();

    let server = yaml.server.clone().unwrap_or_default();
    let tls = yaml.tls().cloned().unwrap_or_default();
    let camb = yaml.camb().cloned().unwrap_or_default();
    let dubbing = yaml.dubbing.clone().unwrap_or_default();
    let security = yaml.security.clone().unwrap_or_default();

    let tls = validation::validate_tls(
        tls.enabled.or(env.tls_enabled).unwrap_or(false),
        tls.cert_path.or(env.tls_cert_path),
        tls.key_path.or(env.tls_key_path),
    )?;

    let config = ServerConfig {
        host: server
            .host
            .or(env.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: server.port.or(env.port).unwrap_or(DEFAULT_PORT),
        tls,
        camb_api_key: camb
            .api_key
            .filter(|key| !key.trim().is_empty())
            .or(env.camb_api_key),
        camb_api_url: camb
            .api_url
            .or(env.camb_api_url)
            .unwrap_or_else(|| CAMB_API_URL.to_string()),
        camb_transcribe_url: camb
            .transcribe_url
            .or(env.camb_transcribe_url)
            .unwrap_or_else(|| CAMB_TRANSCRIBE_URL.to_string()),
        transcription_model: camb
            .transcription_model
            .or(env.camb_transcription_model)
            .unwrap_or_else(|| DEFAULT_TRANSCRIPTION_MODEL.to_string()),
        provider_timeout_seconds: camb
            .timeout_seconds
            .or(env.provider_timeout_seconds)
            .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECONDS),
        dub_poll_interval_ms: dubbing
            .poll_interval_ms
            .or(env.dub_poll_interval_ms)
            .unwrap_or(DEFAULT_DUB_POLL_INTERVAL_MS),
        dub_deadline_seconds: dubbing
            .deadline_seconds
            .or(env.dub_deadline_seconds)
            .unwrap_or(DEFAULT_DUB_DEADLINE_SECONDS),
        max_upload_bytes: security
            .max_upload_bytes
            .or(env.max_upload_bytes)
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        rate_limit_requests_per_second: security
            .rate_limit_requests_per_second
            .or(env.rate_limit_requests_per_second)
            .unwrap_or(DEFAULT_RATE_LIMIT_REQUESTS_PER_SECOND),
        rate_limit_burst_size: security
            .rate_limit_burst_size
            .or(env.rate_limit_burst_size)
            .unwrap_or(DEFAULT_RATE_LIMIT_BURST_SIZE),
    };

    validation::validate_poll_policy(config.dub_poll_interval_ms, config.dub_deadline_seconds)?;
    validation::validate_provider_url("CAMB_API_URL", &config.camb_api_url)?;
    validation::validate_provider_url("CAMB_TRANSCRIBE_URL", &config.camb_transcribe_url)?;
    validation::validate_positive("PROVIDER_TIMEOUT_SECONDS", config.provider_timeout_seconds)?;
    validation::validate_positive("MAX_UPLOAD_BYTES", config.max_upload_bytes as u64)?;

    Ok(config)
}

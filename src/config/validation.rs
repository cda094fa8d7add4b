use std::path::PathBuf;

use super::TlsConfig;
use crate::utils::validate_media_url;

/// Build the TLS section, requiring both paths when TLS is enabled.
pub(super) fn validate_tls(
    enabled: bool,
    cert_path: Option<String>,
    key_path: Option<String>,
) -> Result<Option<TlsConfig>, String> {
    if !enabled {
        return Ok(None);
    }

    match (cert_path, key_path) {
        (Some(cert), Some(key)) => Ok(Some(TlsConfig {
            cert_path: PathBuf::from(cert),
            key_path: PathBuf::from(key),
        })),
        _ => Err(
            "TLS is enabled but TLS_CERT_PATH and TLS_KEY_PATH are not both set".to_string(),
        ),
    }
}

/// The poll interval must be positive and fit inside the deadline.
pub(super) fn validate_poll_policy(interval_ms: u64, deadline_seconds: u64) -> Result<(), String> {
    if interval_ms == 0 {
        return Err("DUB_POLL_INTERVAL_MS must be greater than 0".to_string());
    }
    if deadline_seconds.saturating_mul(1000) < interval_ms {
        return Err(format!(
            "DUB_DEADLINE_SECONDS ({deadline_seconds}s) must not be shorter than DUB_POLL_INTERVAL_MS ({interval_ms}ms)"
        ));
    }
    Ok(())
}

pub(super) fn validate_provider_url(name: &str, value: &str) -> Result<(), String> {
    validate_media_url(value)
        .map(|_| ())
        .map_err(|e| format!("{name} is not a valid http/https URL: {e}"))
}

pub(super) fn validate_positive(name: &str, value: u64) -> Result<(), String> {
    if value == 0 {
        Err(format!("{name} must be greater than 0"))
    } else {
        Ok(())
    }
}

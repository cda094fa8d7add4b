//! Connection settings for the Camb.ai APIs.

use std::fmt;
use std::time::Duration;

use zeroize::Zeroize;

// =============================================================================
// Constants
// =============================================================================

/// Base URL of the dubbing API.
pub const CAMB_API_URL: &str = "https://client.camb.ai/apis";

/// Transcription endpoint.
pub const CAMB_TRANSCRIBE_URL: &str = "https://api.camb.ai/v1/transcribe";

/// Transcription model sent with every request.
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "mars6-turbo";

/// Per-request timeout for provider calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Message returned for every request while the API key is missing.
pub const MISSING_API_KEY_MESSAGE: &str = "API key not configured";

// =============================================================================
// Configuration
// =============================================================================

/// Camb.ai client configuration.
///
/// The key is optional so the gateway can start without one; each request then
/// fails with a configuration error instead.
#[derive(Clone)]
pub struct CambConfig {
    pub api_key: Option<String>,
    /// Dubbing API base, without trailing slash
    pub api_url: String,
    pub transcribe_url: String,
    pub transcription_model: String,
    pub request_timeout: Duration,
}

impl Default for CambConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: CAMB_API_URL.to_string(),
            transcribe_url: CAMB_TRANSCRIBE_URL.to_string(),
            transcription_model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl CambConfig {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Point both APIs at `base`; used against local mock servers.
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.api_url = base.to_string();
        self.transcribe_url = format!("{base}/transcribe");
        self
    }

    /// Non-empty API key, if one is configured.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl fmt::Debug for CambConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CambConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_url", &self.api_url)
            .field("transcribe_url", &self.transcribe_url)
            .field("transcription_model", &self.transcription_model)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Drop for CambConfig {
    fn drop(&mut self) {
        if let Some(ref mut key) = self.api_key {
            key.zeroize();
        }
    }
}

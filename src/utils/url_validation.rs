//! URL validation for caller-supplied media references
//!
//! The dubbing provider downloads the media itself, so the gateway only has to
//! make sure the reference is an absolute URL the provider can fetch:
//! - Parses as an absolute URL
//! - Uses the `http` or `https` scheme
//! - Names a host

use thiserror::Error;
use url::Url;

/// Errors that can occur during URL validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(#[from] url::ParseError),

    #[error("URL scheme must be http or https, got: {0}")]
    UnsupportedScheme(String),

    #[error("URL must have a host")]
    MissingHost,
}

/// Validates that `value` is an absolute http/https URL with a host.
///
/// Surrounding whitespace is not tolerated; callers pass the raw field value.
///
/// # Example
/// ```rust
/// use media_gateway::utils::url_validation::validate_media_url;
///
/// assert!(validate_media_url("https://cdn.example.com/talk.mp4").is_ok());
/// assert!(validate_media_url("ftp://cdn.example.com/talk.mp4").is_err());
/// assert!(validate_media_url("not-a-url").is_err());
/// ```
pub fn validate_media_url(value: &str) -> Result<Url, UrlValidationError> {
    let parsed = Url::parse(value)?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(UrlValidationError::UnsupportedScheme(other.to_string())),
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(parsed),
        _ => Err(UrlValidationError::MissingHost),
    }
}

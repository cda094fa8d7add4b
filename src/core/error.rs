//! Error types shared by the dubbing and transcription pipelines.
//!
//! Every failure a provider call or a validation step can produce is expressed
//! as a [`MediaError`]. The HTTP layer never inspects transport details; it only
//! asks for the [`ErrorCategory`] and, for transport errors, the upstream status.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type for media operations
pub type MediaResult<T> = Result<T, MediaError>;

/// Fixed message returned when a dubbing job does not finish before its deadline.
pub const TIMEOUT_MESSAGE: &str =
    "Dubbing is taking longer than expected. Please try again in a moment.";

/// Which catalog a language lookup was performed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageKind {
    Source,
    Target,
}

impl fmt::Display for LanguageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageKind::Source => write!(f, "source"),
            LanguageKind::Target => write!(f, "target"),
        }
    }
}

/// Coarse classification of a failure, stable across providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed or missing caller input, including unsupported languages
    ClientInput,
    /// Server-side configuration is incomplete (e.g. missing credential)
    Configuration,
    /// Provider answered with a non-2xx status, an unparsable body, or was unreachable
    ProviderTransport,
    /// Provider answered 2xx but a required field was missing
    ProviderContract,
    /// Provider reported the job as failed or cancelled
    JobFailed,
    /// Job did not reach a terminal state before the deadline
    Timeout,
    /// The caller went away before the operation finished
    Cancelled,
}

/// Errors produced by the media pipelines
#[derive(Error, Debug)]
pub enum MediaError {
    /// Caller input failed validation
    #[error("{0}")]
    InvalidInput(String),

    /// Requested language has no match in the provider catalog
    #[error("Unsupported {kind} language: {requested}. Try a locale like \"hi-in\" or \"en-us\".")]
    UnsupportedLanguage {
        kind: LanguageKind,
        requested: String,
    },

    /// Gateway configuration is incomplete
    #[error("{0}")]
    Configuration(String),

    /// Non-2xx status, unparsable body or network failure talking to the provider
    #[error("{message}")]
    ProviderTransport {
        /// Upstream HTTP status, when the provider answered at all
        status: Option<u16>,
        message: String,
    },

    /// A 2xx provider response was missing a field we depend on
    #[error("{0}")]
    ProviderContract(String),

    /// Provider reported a terminal failure for the job
    #[error("{0}")]
    JobFailed(String),

    /// Polling deadline elapsed without a terminal state
    #[error("{}", TIMEOUT_MESSAGE)]
    TimedOut,

    /// Invoking context was cancelled while the operation was in flight
    #[error("Dubbing request was cancelled")]
    Cancelled,
}

impl MediaError {
    /// Build a transport error for a provider response with a known status.
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        MediaError::ProviderTransport {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Build a transport error for a failure that produced no usable response.
    pub fn unreachable(message: impl Into<String>) -> Self {
        MediaError::ProviderTransport {
            status: None,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            MediaError::InvalidInput(_) | MediaError::UnsupportedLanguage { .. } => {
                ErrorCategory::ClientInput
            }
            MediaError::Configuration(_) => ErrorCategory::Configuration,
            MediaError::ProviderTransport { .. } => ErrorCategory::ProviderTransport,
            MediaError::ProviderContract(_) => ErrorCategory::ProviderContract,
            MediaError::JobFailed(_) => ErrorCategory::JobFailed,
            MediaError::TimedOut => ErrorCategory::Timeout,
            MediaError::Cancelled => ErrorCategory::Cancelled,
        }
    }

    /// Whether the caller may reasonably retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MediaError::TimedOut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_language_message() {
        let err = MediaError::UnsupportedLanguage {
            kind: LanguageKind::Target,
            requested: "klingon".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported target language: klingon. Try a locale like \"hi-in\" or \"en-us\"."
        );
        assert_eq!(err.category(), ErrorCategory::ClientInput);
    }

    #[test]
    fn test_timeout_is_distinct_from_job_failure() {
        assert_eq!(MediaError::TimedOut.category(), ErrorCategory::Timeout);
        assert_eq!(
            MediaError::JobFailed("boom".into()).category(),
            ErrorCategory::JobFailed
        );
        assert_eq!(MediaError::TimedOut.to_string(), TIMEOUT_MESSAGE);
        assert!(MediaError::TimedOut.is_retryable());
        assert!(!MediaError::JobFailed("boom".into()).is_retryable());
    }

    #[test]
    fn test_transport_constructors() {
        match MediaError::upstream(404, "not found") {
            MediaError::ProviderTransport { status, message } => {
                assert_eq!(status, Some(404));
                assert_eq!(message, "not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            MediaError::unreachable("down"),
            MediaError::ProviderTransport { status: None, .. }
        ));
    }
}

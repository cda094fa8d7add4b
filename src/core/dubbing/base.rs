//! Core types and the provider abstraction for dubbing.

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::Instant;

use super::language::LanguageEntry;
use crate::core::error::MediaResult;
use crate::core::media::MediaUpload;

// =============================================================================
// Requests
// =============================================================================

/// Where the media to dub comes from.
///
/// `Url` is the canonical JSON submission; `Upload` is the multipart variant
/// used by clients that send the file itself. Both share the same poller.
#[derive(Debug, Clone)]
pub enum MediaSource {
    Url(String),
    Upload(MediaUpload),
}

impl MediaSource {
    /// Short description for logs; never includes file contents.
    pub fn describe(&self) -> String {
        match self {
            MediaSource::Url(url) => format!("url={url}"),
            MediaSource::Upload(upload) => {
                format!("upload={} ({} bytes)", upload.file_name, upload.len())
            }
        }
    }
}

/// A caller's dubbing request before any provider lookup.
#[derive(Debug, Clone)]
pub struct DubRequest {
    pub media: MediaSource,
    /// Requested target language as typed by the caller
    pub target_language: String,
    /// Optional source language; the catalog fallback chain applies when absent
    pub source_language: Option<String>,
}

impl DubRequest {
    pub fn from_url(video_url: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            media: MediaSource::Url(video_url.into()),
            target_language: target_language.into(),
            source_language: None,
        }
    }

    pub fn from_upload(upload: MediaUpload, target_language: impl Into<String>) -> Self {
        Self {
            media: MediaSource::Upload(upload),
            target_language: target_language.into(),
            source_language: None,
        }
    }

    pub fn with_source_language(mut self, source_language: impl Into<String>) -> Self {
        self.source_language = Some(source_language.into());
        self
    }
}

/// A job ready for submission: media plus resolved numeric language ids.
#[derive(Debug, Clone)]
pub struct DubJob {
    pub media: MediaSource,
    pub source_language_id: i64,
    pub target_language_id: i64,
}

// =============================================================================
// Job tracking
// =============================================================================

/// Handle for an accepted provider job.
#[derive(Debug, Clone)]
pub struct JobHandle {
    pub task_id: String,
    /// When the provider acknowledged the job; the polling deadline counts from here
    pub submitted_at: Instant,
}

impl JobHandle {
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            submitted_at: Instant::now(),
        }
    }
}

/// A finished dub.
#[derive(Debug, Clone, PartialEq)]
pub struct DubbedVideo {
    pub dubbed_video_url: String,
    /// Provider document that carried the URL, with `dubbed_video_url` set at the top level
    pub payload: Value,
}

// =============================================================================
// Provider
// =============================================================================

/// Asynchronous dubbing job API of a provider.
///
/// Responses are returned as loosely-typed documents; the poller reads them
/// through [`super::normalize`]. Implementations map any non-2xx answer to
/// [`crate::core::error::MediaError::ProviderTransport`] carrying the upstream status and message.
#[async_trait]
pub trait DubbingProvider: Send + Sync {
    /// Fail fast, without network access, when the provider cannot be called.
    fn ensure_configured(&self) -> MediaResult<()>;

    /// Catalog of languages media can be dubbed from.
    async fn source_languages(&self) -> MediaResult<Vec<LanguageEntry>>;

    /// Catalog of languages media can be dubbed into.
    async fn target_languages(&self) -> MediaResult<Vec<LanguageEntry>>;

    /// Create a dubbing job.
    async fn submit(&self, job: &DubJob) -> MediaResult<JobHandle>;

    /// Fetch the current status document of a job.
    async fn job_status(&self, handle: &JobHandle) -> MediaResult<Value>;

    /// Fetch the result document of a finished run.
    async fn job_result(&self, run_id: &str) -> MediaResult<Value>;

    /// Get provider information.
    fn provider_name(&self) -> &'static str;
}

/// Shared trait object for dubbing providers.
pub type SharedDubbingProvider = std::sync::Arc<dyn DubbingProvider>;

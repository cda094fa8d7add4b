//! HTTP client for the Camb.ai dubbing and transcription APIs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{Value, json};
use tracing::{debug, error};

use super::config::{CambConfig, MISSING_API_KEY_MESSAGE};
use crate::core::dubbing::base::{DubJob, DubbingProvider, JobHandle, MediaSource};
use crate::core::dubbing::language::{LanguageEntry, parse_catalog};
use crate::core::dubbing::normalize::{extract_message, extract_task_id};
use crate::core::error::{LanguageKind, MediaError, MediaResult};
use crate::core::media::MediaUpload;
use crate::core::transcription::TranscriptionProvider;

// =============================================================================
// Constants
// =============================================================================

/// Header carrying the credential on dubbing API calls.
const API_KEY_HEADER: &str = "x-api-key";

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// User-Agent header value for API requests.
const USER_AGENT: &str = concat!("media-gateway/", env!("CARGO_PKG_VERSION"));

const UNEXPECTED_SUBMIT_RESPONSE: &str = "Unexpected response from dubbing provider";

const PROVIDER_NAME: &str = "camb";

// =============================================================================
// Client
// =============================================================================

/// Camb.ai API client.
///
/// One instance serves both the dubbing job API and the transcription
/// endpoint; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct CambClient {
    http: Client,
    config: CambConfig,
}

impl CambClient {
    pub fn new(config: CambConfig) -> MediaResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                MediaError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &CambConfig {
        &self.config
    }

    fn api_key(&self) -> MediaResult<&str> {
        self.config
            .api_key()
            .ok_or_else(|| MediaError::Configuration(MISSING_API_KEY_MESSAGE.to_string()))
    }

    fn get(&self, path: &str) -> MediaResult<RequestBuilder> {
        let key = self.api_key()?;
        Ok(self
            .http
            .get(self.config.endpoint(path))
            .header(API_KEY_HEADER, key))
    }

    async fn fetch_catalog(&self, kind: LanguageKind) -> MediaResult<Vec<LanguageEntry>> {
        let path = match kind {
            LanguageKind::Source => "source-languages",
            LanguageKind::Target => "target-languages",
        };
        let failure = || MediaError::unreachable(format!("Failed to fetch {kind} languages"));

        let response = self.get(path)?.send().await.map_err(|e| {
            error!("Camb.ai {} languages request failed: {}", kind, e);
            failure()
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Camb.ai {}-languages error: {}", kind, body);
            return Err(failure());
        }

        let document: Value = response.json().await.map_err(|e| {
            error!("Camb.ai {}-languages returned invalid JSON: {}", kind, e);
            failure()
        })?;

        let catalog = parse_catalog(document).ok_or_else(|| {
            error!("Camb.ai {}-languages did not return a list", kind);
            failure()
        })?;

        debug!(entries = catalog.len(), "Fetched {} language catalog", kind);
        Ok(catalog)
    }

    fn dub_request(&self, job: &DubJob) -> MediaResult<RequestBuilder> {
        let key = self.api_key()?;
        let builder = self
            .http
            .post(self.config.endpoint("dub"))
            .header(API_KEY_HEADER, key);

        let builder = match &job.media {
            MediaSource::Url(video_url) => builder.json(&json!({
                "video_url": video_url,
                "source_language": job.source_language_id,
                "target_languages": [job.target_language_id],
            })),
            MediaSource::Upload(upload) => {
                let form = Form::new()
                    .part("video_file", file_part(upload)?)
                    .text("source_language", job.source_language_id.to_string())
                    .text(
                        "target_languages",
                        json!([job.target_language_id]).to_string(),
                    );
                builder.multipart(form)
            }
        };

        Ok(builder)
    }
}

fn file_part(upload: &MediaUpload) -> MediaResult<Part> {
    Part::stream_with_length(upload.bytes.clone(), upload.len() as u64)
        .file_name(upload.file_name.clone())
        .mime_str(upload.mime_type())
        .map_err(|e| MediaError::InvalidInput(format!("Invalid file content type: {e}")))
}

/// Map a send failure for the named service (`dubbing`, `transcription`).
fn send_failed(service: &'static str) -> impl Fn(reqwest::Error) -> MediaError {
    move |e| {
        error!("Camb.ai {} request failed: {}", service, e);
        MediaError::unreachable(format!("Request to {service} provider failed: {e}"))
    }
}

/// Read a provider response as JSON.
///
/// Non-2xx statuses keep the upstream status and prefer the provider's own
/// `message`/`error` text; `context` names the call in the fallback message.
async fn read_document(response: Response, context: &str) -> MediaResult<Value> {
    let status = response.status();
    let body = response.text().await.map_err(|e| {
        MediaError::unreachable(format!("Failed to read provider response: {e}"))
    })?;
    let parsed = serde_json::from_str::<Value>(&body).ok();

    if !status.is_success() {
        error!(status = status.as_u16(), "Camb.ai API error: {}", body);
        let message = parsed
            .as_ref()
            .and_then(extract_message)
            .unwrap_or_else(|| format!("{context} failed with status {}", status.as_u16()));
        return Err(MediaError::upstream(status.as_u16(), message));
    }

    parsed.ok_or_else(|| {
        error!("Camb.ai returned a non-JSON body: {}", body);
        MediaError::unreachable(format!("{context} returned an unreadable response"))
    })
}

// =============================================================================
// Dubbing
// =============================================================================

#[async_trait]
impl DubbingProvider for CambClient {
    fn ensure_configured(&self) -> MediaResult<()> {
        self.api_key().map(|_| ())
    }

    async fn source_languages(&self) -> MediaResult<Vec<LanguageEntry>> {
        self.fetch_catalog(LanguageKind::Source).await
    }

    async fn target_languages(&self) -> MediaResult<Vec<LanguageEntry>> {
        self.fetch_catalog(LanguageKind::Target).await
    }

    async fn submit(&self, job: &DubJob) -> MediaResult<JobHandle> {
        let response = self
            .dub_request(job)?
            .send()
            .await
            .map_err(send_failed("dubbing"))?;
        let document = read_document(response, "Request").await?;

        match extract_task_id(&document) {
            Some(task_id) => Ok(JobHandle::new(task_id)),
            None => {
                error!("Unexpected response from Camb.ai dub API: {}", document);
                Err(MediaError::ProviderContract(
                    UNEXPECTED_SUBMIT_RESPONSE.to_string(),
                ))
            }
        }
    }

    async fn job_status(&self, handle: &JobHandle) -> MediaResult<Value> {
        let response = self
            .get(&format!("dub/{}", handle.task_id))?
            .send()
            .await
            .map_err(send_failed("dubbing"))?;
        read_document(response, "Status request").await
    }

    async fn job_result(&self, run_id: &str) -> MediaResult<Value> {
        let response = self
            .get(&format!("dub-result/{run_id}"))?
            .send()
            .await
            .map_err(send_failed("dubbing"))?;
        read_document(response, "Result request").await
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

// =============================================================================
// Transcription
// =============================================================================

#[async_trait]
impl TranscriptionProvider for CambClient {
    fn ensure_configured(&self) -> MediaResult<()> {
        self.api_key().map(|_| ())
    }

    async fn transcribe(&self, upload: MediaUpload) -> MediaResult<Value> {
        let key = self.api_key()?;
        let form = Form::new()
            .part("audio_file", file_part(&upload)?)
            .text("model", self.config.transcription_model.clone());

        debug!(
            model = %self.config.transcription_model,
            bytes = upload.len(),
            "Sending transcription request"
        );

        let response = self
            .http
            .post(&self.config.transcribe_url)
            .bearer_auth(key)
            .multipart(form)
            .send()
            .await
            .map_err(send_failed("transcription"))?;

        read_document(response, "Request").await
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

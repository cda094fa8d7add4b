//! Synchronous speech-to-text pass-through.
//!
//! The provider transcribes in a single request, so there is no job tracking:
//! validate the upload, check the credential, forward, return the document.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info};

use crate::core::error::{MediaError, MediaResult};
use crate::core::media::MediaUpload;

pub const MISSING_AUDIO_MESSAGE: &str = "Audio file is required";
pub const UNSUPPORTED_AUDIO_MESSAGE: &str = "Uploaded file must be an audio or video file";

/// Speech-to-text API of a provider.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Fail fast, without network access, when the provider cannot be called.
    fn ensure_configured(&self) -> MediaResult<()>;

    /// Transcribe one file and return the provider's response document verbatim.
    async fn transcribe(&self, upload: MediaUpload) -> MediaResult<Value>;

    fn provider_name(&self) -> &'static str;
}

pub type SharedTranscriptionProvider = Arc<dyn TranscriptionProvider>;

/// Validates uploads and forwards them to a [`TranscriptionProvider`].
#[derive(Clone)]
pub struct TranscriptionService {
    provider: SharedTranscriptionProvider,
}

impl TranscriptionService {
    pub fn new(provider: SharedTranscriptionProvider) -> Self {
        Self { provider }
    }

    pub async fn transcribe(&self, upload: Option<MediaUpload>) -> MediaResult<Value> {
        let upload = validate_upload(upload)?;

        if let Err(e) = self.provider.ensure_configured() {
            error!(provider = self.provider.provider_name(), "{}", e);
            return Err(e);
        }

        info!(
            file_name = %upload.file_name,
            bytes = upload.len(),
            "Processing speech-to-text"
        );

        let document = self.provider.transcribe(upload).await?;
        info!("Speech-to-text successful");
        Ok(document)
    }
}

fn validate_upload(upload: Option<MediaUpload>) -> MediaResult<MediaUpload> {
    let upload = upload
        .filter(|u| !u.is_empty())
        .ok_or_else(|| MediaError::InvalidInput(MISSING_AUDIO_MESSAGE.to_string()))?;

    if upload.kind().is_none() {
        return Err(MediaError::InvalidInput(
            UNSUPPORTED_AUDIO_MESSAGE.to_string(),
        ));
    }

    Ok(upload)
}

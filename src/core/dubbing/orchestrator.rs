//! End-to-end dubbing flow: validate, resolve languages, submit, poll.

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::base::{DubJob, DubRequest, DubbedVideo, MediaSource, SharedDubbingProvider};
use super::language::{LanguageEntry, default_source, resolve};
use super::outcome::DubOutcome;
use super::poller::{PollPolicy, StatusPoller};
use crate::core::error::{LanguageKind, MediaError, MediaResult};
use crate::utils::validate_media_url;

pub const INVALID_URL_MESSAGE: &str = "A valid video_url (http/https) is required";
pub const MISSING_LANGUAGE_MESSAGE: &str = "target_language is required (e.g. hi, en-us)";
pub const MISSING_VIDEO_MESSAGE: &str = "A video file is required";
pub const UNSUPPORTED_MEDIA_MESSAGE: &str = "Uploaded file must be an audio or video file";
const NO_SOURCE_LANGUAGE_MESSAGE: &str = "Could not resolve a source language ID";

/// Runs dubbing requests against one provider.
///
/// Holds no per-request state; a single instance is shared by every handler.
#[derive(Clone)]
pub struct DubbingOrchestrator {
    provider: SharedDubbingProvider,
    policy: PollPolicy,
}

impl DubbingOrchestrator {
    pub fn new(provider: SharedDubbingProvider, policy: PollPolicy) -> Self {
        Self { provider, policy }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    pub fn provider(&self) -> &SharedDubbingProvider {
        &self.provider
    }

    /// Dub `request` and wait for the finished video.
    ///
    /// Validation and configuration checks happen before any network call.
    pub async fn dub(
        &self,
        request: DubRequest,
        cancel: &CancellationToken,
    ) -> MediaResult<DubbedVideo> {
        validate_request(&request)?;

        if let Err(e) = self.provider.ensure_configured() {
            error!(provider = self.provider.provider_name(), "{}", e);
            return Err(e);
        }

        let (sources, targets) = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(MediaError::Cancelled),
            catalogs = async {
                tokio::try_join!(
                    self.provider.source_languages(),
                    self.provider.target_languages()
                )
            } => catalogs?,
        };

        debug!(
            source_entries = sources.len(),
            target_entries = targets.len(),
            "Fetched language catalogs"
        );

        let target = resolve(&targets, &request.target_language).ok_or_else(|| {
            MediaError::UnsupportedLanguage {
                kind: LanguageKind::Target,
                requested: request.target_language.trim().to_string(),
            }
        })?;
        let source = pick_source(&sources, request.source_language.as_deref())?;

        info!(
            media = %request.media.describe(),
            source_language_id = source.id,
            source_language = ?source.short_code,
            target_language_id = target.id,
            target_language = ?target.short_code,
            "Submitting dubbing job"
        );

        let job = DubJob {
            source_language_id: source.id,
            target_language_id: target.id,
            media: request.media,
        };

        let handle = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(MediaError::Cancelled),
            handle = self.provider.submit(&job) => handle?,
        };

        info!(task_id = %handle.task_id, "Dubbing job accepted");

        StatusPoller::new(self.provider.as_ref(), self.policy)
            .run(&handle, cancel)
            .await
    }

    /// Same as [`Self::dub`], reduced to the caller-facing outcome.
    pub async fn run(&self, request: DubRequest, cancel: &CancellationToken) -> DubOutcome {
        DubOutcome::from(self.dub(request, cancel).await)
    }
}

fn validate_request(request: &DubRequest) -> MediaResult<()> {
    match &request.media {
        MediaSource::Url(url) => {
            validate_media_url(url)
                .map_err(|_| MediaError::InvalidInput(INVALID_URL_MESSAGE.to_string()))?;
        }
        MediaSource::Upload(upload) => {
            if upload.is_empty() {
                return Err(MediaError::InvalidInput(MISSING_VIDEO_MESSAGE.to_string()));
            }
            if upload.kind().is_none() {
                return Err(MediaError::InvalidInput(
                    UNSUPPORTED_MEDIA_MESSAGE.to_string(),
                ));
            }
        }
    }

    if request.target_language.trim().is_empty() {
        return Err(MediaError::InvalidInput(
            MISSING_LANGUAGE_MESSAGE.to_string(),
        ));
    }

    Ok(())
}

fn pick_source<'a>(
    catalog: &'a [LanguageEntry],
    requested: Option<&str>,
) -> MediaResult<&'a LanguageEntry> {
    match requested.map(str::trim).filter(|s| !s.is_empty()) {
        Some(code) => resolve(catalog, code).ok_or_else(|| MediaError::UnsupportedLanguage {
            kind: LanguageKind::Source,
            requested: code.to_string(),
        }),
        None => default_source(catalog)
            .ok_or_else(|| MediaError::ProviderContract(NO_SOURCE_LANGUAGE_MESSAGE.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::media::MediaUpload;

    #[test]
    fn test_validate_rejects_bad_url() {
        let err = validate_request(&DubRequest::from_url("not-a-url", "hi")).unwrap_err();
        assert_eq!(err.to_string(), INVALID_URL_MESSAGE);
    }

    #[test]
    fn test_validate_rejects_blank_language() {
        let err = validate_request(&DubRequest::from_url("https://x/y.mp4", "  ")).unwrap_err();
        assert_eq!(err.to_string(), MISSING_LANGUAGE_MESSAGE);
    }

    #[test]
    fn test_validate_upload() {
        let empty = MediaUpload::new(Vec::<u8>::new(), "clip.mp4", None);
        assert!(validate_request(&DubRequest::from_upload(empty, "hi")).is_err());

        let text = MediaUpload::new(vec![1u8], "notes.txt", Some("text/plain".into()));
        let err = validate_request(&DubRequest::from_upload(text, "hi")).unwrap_err();
        assert_eq!(err.to_string(), UNSUPPORTED_MEDIA_MESSAGE);

        let video = MediaUpload::new(vec![1u8], "clip.mp4", Some("video/mp4".into()));
        assert!(validate_request(&DubRequest::from_upload(video, "hi")).is_ok());
    }

    #[test]
    fn test_pick_source() {
        let catalog = vec![
            LanguageEntry::new(1, Some("English"), Some("en-us")),
            LanguageEntry::new(2, Some("Auto Detect"), Some("auto")),
        ];
        assert_eq!(pick_source(&catalog, None).map(|e| e.id).ok(), Some(2));
        assert_eq!(pick_source(&catalog, Some(" ")).map(|e| e.id).ok(), Some(2));
        assert_eq!(pick_source(&catalog, Some("en")).map(|e| e.id).ok(), Some(1));

        let err = pick_source(&catalog, Some("xx")).unwrap_err();
        assert!(err.to_string().starts_with("Unsupported source language: xx."));

        assert!(matches!(
            pick_source(&[], None),
            Err(MediaError::ProviderContract(_))
        ));
    }
}

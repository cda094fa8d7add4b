use serde::Serialize;

use super::base::DubbedVideo;
use crate::core::error::{ErrorCategory, MediaResult};

/// Caller-facing result of one dubbing invocation.
///
/// Exactly one of `dubbed_video_url` and `error_message` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DubOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dubbed_video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_category: Option<ErrorCategory>,
}

impl From<MediaResult<DubbedVideo>> for DubOutcome {
    fn from(result: MediaResult<DubbedVideo>) -> Self {
        match result {
            Ok(video) => Self {
                success: true,
                dubbed_video_url: Some(video.dubbed_video_url),
                error_message: None,
                error_category: None,
            },
            Err(e) => Self {
                success: false,
                dubbed_video_url: None,
                error_message: Some(e.to_string()),
                error_category: Some(e.category()),
            },
        }
    }
}

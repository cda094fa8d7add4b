//! Uploaded media payloads and media-kind detection.

use bytes::Bytes;

/// Broad kind of an uploaded media file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

const AUDIO_EXTENSIONS: &[&str] = &[
    "wav", "mp3", "m4a", "ogg", "oga", "opus", "flac", "aac", "mpga", "weba",
];

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv", "avi", "m4v", "mpeg", "mpg", "webm"];

impl MediaKind {
    /// Detect the media kind from a content type, falling back to the file extension.
    ///
    /// `application/octet-stream` and missing content types defer to the extension.
    pub fn detect(content_type: Option<&str>, file_name: Option<&str>) -> Option<Self> {
        let essence = content_type
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase());

        match essence.as_deref() {
            Some(ct) if ct.starts_with("audio/") => return Some(MediaKind::Audio),
            Some(ct) if ct.starts_with("video/") => return Some(MediaKind::Video),
            _ => {}
        }

        let extension = file_name?.rsplit_once('.')?.1.to_ascii_lowercase();
        if AUDIO_EXTENSIONS.contains(&extension.as_str()) {
            Some(MediaKind::Audio)
        } else if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

/// A binary media file received from the caller
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub bytes: Bytes,
    pub file_name: String,
    pub content_type: Option<String>,
}

impl MediaUpload {
    pub fn new(
        bytes: impl Into<Bytes>,
        file_name: impl Into<String>,
        content_type: Option<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            file_name: file_name.into(),
            content_type,
        }
    }

    pub fn kind(&self) -> Option<MediaKind> {
        MediaKind::detect(self.content_type.as_deref(), Some(&self.file_name))
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// MIME type to declare when forwarding the file upstream.
    pub fn mime_type(&self) -> &str {
        self.content_type
            .as_deref()
            .unwrap_or("application/octet-stream")
    }
}

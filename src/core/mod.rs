pub mod camb;
pub mod dubbing;
pub mod error;
pub mod media;
pub mod transcription;

// Re-export commonly used types for convenience
pub use camb::{CambClient, CambConfig};

pub use dubbing::{
    DubOutcome, DubRequest, DubbedVideo, DubbingOrchestrator, DubbingProvider, JobHandle,
    LanguageEntry, MediaSource, PollPolicy, SharedDubbingProvider,
};

pub use error::{ErrorCategory, LanguageKind, MediaError, MediaResult};

pub use media::{MediaKind, MediaUpload};

pub use transcription::{
    SharedTranscriptionProvider, TranscriptionProvider, TranscriptionService,
};

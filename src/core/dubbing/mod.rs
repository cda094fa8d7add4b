//! Asynchronous video dubbing.
//!
//! [`DubbingOrchestrator`] resolves caller language codes against the provider
//! catalogs, submits the job through a [`DubbingProvider`] and hands the
//! returned [`JobHandle`] to the [`StatusPoller`].

pub mod base;
pub mod language;
pub mod normalize;
pub mod orchestrator;
pub mod outcome;
pub mod poller;

#[cfg(test)]
mod tests;

pub use base::{
    DubJob, DubRequest, DubbedVideo, DubbingProvider, JobHandle, MediaSource,
    SharedDubbingProvider,
};
pub use language::{LanguageEntry, default_source, parse_catalog, resolve};
pub use orchestrator::DubbingOrchestrator;
pub use outcome::DubOutcome;
pub use poller::{
    DEFAULT_POLL_DEADLINE, DEFAULT_POLL_INTERVAL, JobState, JobStatusSnapshot, PollPolicy,
    StatusPoller, Transition, transition,
};

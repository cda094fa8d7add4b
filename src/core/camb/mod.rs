//! Camb.ai provider.
//!
//! Dubbing runs against `https://client.camb.ai/apis` with an `x-api-key`
//! header; transcription posts multipart audio to
//! `https://api.camb.ai/v1/transcribe` with a bearer token. A single
//! [`CambClient`] implements both [`crate::core::dubbing::DubbingProvider`] and
//! [`crate::core::transcription::TranscriptionProvider`].

mod client;
mod config;


pub use client::CambClient;
pub use config::{
    CAMB_API_URL, CAMB_TRANSCRIBE_URL, CambConfig, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_TRANSCRIPTION_MODEL, MISSING_API_KEY_MESSAGE,
};

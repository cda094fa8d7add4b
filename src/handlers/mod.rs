//! HTTP request handlers
//!
//! - `api` - Health check endpoint
//! - `dubbing` - Video dubbing (JSON URL reference or multipart upload)
//! - `transcription` - Speech-to-text pass-through
//! - `envelope` - `{ success, data, error }` response body
//! - `form` - Multipart field helpers

pub mod api;
pub mod dubbing;
pub mod envelope;
pub mod form;
pub mod transcription;

// Re-export commonly used handlers for convenient access
pub use dubbing::video_dubbing;
pub use transcription::speech_to_text;

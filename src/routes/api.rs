use axum::{Router, routing::post};
use tower_http::trace::TraceLayer;

use crate::handlers::{dubbing, transcription};
use crate::state::AppState;
use std::sync::Arc;

/// Create the media API router
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/video-dubbing", post(dubbing::video_dubbing))
        .route("/speech-to-text", post(transcription::speech_to_text))
        .layer(TraceLayer::new_for_http())
}

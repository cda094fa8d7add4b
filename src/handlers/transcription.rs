//! `POST /speech-to-text`
//!
//! Multipart body with one `audio` file. The provider's response is returned
//! verbatim under `data`.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State, multipart::MultipartRejection},
    response::{IntoResponse, Response},
};

use super::envelope::ApiResponse;
use super::form::{read_parts, take_file};
use crate::errors::AppError;
use crate::state::AppState;

pub async fn speech_to_text(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    // A body that is not multipart at all carries no audio file.
    let audio = match multipart {
        Ok(multipart) => match read_parts(multipart).await {
            Ok(mut parts) => take_file(&mut parts, "audio"),
            Err(e) => return e.into_response(),
        },
        Err(_) => None,
    };

    match state.transcription.transcribe(audio).await {
        Ok(document) => ApiResponse::ok(document).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}

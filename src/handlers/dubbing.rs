//! `POST /video-dubbing`
//!
//! Accepts either a JSON body `{ "video_url", "target_language", "source_language"? }`
//! or a multipart form with a `video` file and a `language`/`target_language`
//! field. The request is held open until the job finishes.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, error, info_span};
use uuid::Uuid;

use super::envelope::ApiResponse;
use super::form::{body_error, read_parts, take_file, text_value};
use crate::core::dubbing::DubRequest;
use crate::core::dubbing::orchestrator::MISSING_VIDEO_MESSAGE;
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

pub async fn video_dubbing(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let parsed = if is_multipart(&request) {
        match Multipart::from_request(request, &state).await {
            Ok(multipart) => dub_request_from_form(multipart).await,
            Err(rejection) => {
                return body_error(rejection.status(), "multipart", &rejection.body_text())
                    .into_response();
            }
        }
    } else {
        match Bytes::from_request(request, &state).await {
            Ok(body) => Ok(dub_request_from_json(&body)),
            Err(rejection) => {
                return body_error(rejection.status(), "request", &rejection.body_text())
                    .into_response();
            }
        }
    };

    let dub_request = match parsed {
        Ok(dub_request) => dub_request,
        Err(e) => return e.into_response(),
    };

    match run_dub(&state, dub_request).await {
        Ok(payload) => ApiResponse::ok(payload).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Runs on its own task; dropping the handler future cancels it through the
/// drop guard.
async fn run_dub(state: &AppState, request: DubRequest) -> AppResult<Value> {
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let span = info_span!("dub", dub_id = %Uuid::new_v4());
    let orchestrator = state.dubbing.clone();
    let task = tokio::spawn(
        async move { orchestrator.dub(request, &cancel).await }.instrument(span),
    );

    match task.await {
        Ok(result) => result.map(|video| video.payload).map_err(AppError::from),
        Err(e) => {
            error!("Dubbing task failed: {}", e);
            Err(AppError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to dub video",
            ))
        }
    }
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.to_ascii_lowercase().starts_with("multipart/form-data"))
}

fn string_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str)
}

/// Unreadable JSON is treated as an empty body so validation reports the
/// missing field.
fn dub_request_from_json(body: &[u8]) -> DubRequest {
    let body: Value = serde_json::from_slice(body).unwrap_or(Value::Null);

    let request = DubRequest::from_url(
        string_field(&body, "video_url").unwrap_or_default(),
        string_field(&body, "target_language").unwrap_or_default(),
    );

    match string_field(&body, "source_language") {
        Some(source) => request.with_source_language(source),
        None => request,
    }
}

async fn dub_request_from_form(multipart: Multipart) -> AppResult<DubRequest> {
    let mut parts = read_parts(multipart).await?;

    let target = text_value(&parts, "target_language")
        .or_else(|| text_value(&parts, "language"))
        .unwrap_or_default()
        .to_string();
    let source = text_value(&parts, "source_language").map(str::to_string);
    let video_url = text_value(&parts, "video_url").map(str::to_string);

    let request = match (take_file(&mut parts, "video"), video_url) {
        (Some(upload), _) => DubRequest::from_upload(upload, target),
        (None, Some(url)) => DubRequest::from_url(url, target),
        (None, None) => {
            return Err(AppError::bad_request(MISSING_VIDEO_MESSAGE));
        }
    };

    Ok(match source {
        Some(source) => request.with_source_language(source),
        None => request,
    })
}

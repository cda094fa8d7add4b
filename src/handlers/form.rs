//! Helpers for reading multipart form fields.

use axum::extract::multipart::{Field, Multipart, MultipartError};
use axum::http::StatusCode;

use crate::core::media::MediaUpload;
use crate::errors::AppError;

/// One multipart part, either a file or a text value.
pub enum FormPart {
    File { name: String, upload: MediaUpload },
    Text { name: String, value: String },
}

/// Envelope error for a body that could not be read or parsed.
pub fn body_error(status: StatusCode, kind: &str, detail: &str) -> AppError {
    let message = if status == StatusCode::PAYLOAD_TOO_LARGE && kind == "multipart" {
        "Uploaded file is too large".to_string()
    } else if status == StatusCode::PAYLOAD_TOO_LARGE {
        "Request body is too large".to_string()
    } else {
        format!("Invalid {kind} body: {detail}")
    };
    AppError::new(status, message)
}

fn multipart_error(e: MultipartError) -> AppError {
    body_error(e.status(), "multipart", &e.body_text())
}

async fn read_field(field: Field<'_>) -> Result<Option<FormPart>, AppError> {
    let Some(name) = field.name().map(str::to_string) else {
        return Ok(None);
    };

    match field.file_name().map(str::to_string) {
        Some(file_name) => {
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await.map_err(multipart_error)?;
            Ok(Some(FormPart::File {
                name,
                upload: MediaUpload::new(bytes, file_name, content_type),
            }))
        }
        None => {
            let value = field.text().await.map_err(multipart_error)?;
            Ok(Some(FormPart::Text { name, value }))
        }
    }
}

/// Drain every named part of a multipart body.
pub async fn read_parts(mut multipart: Multipart) -> Result<Vec<FormPart>, AppError> {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if let Some(part) = read_field(field).await? {
            parts.push(part);
        }
    }
    Ok(parts)
}

/// First file part named `name`.
pub fn take_file(parts: &mut Vec<FormPart>, name: &str) -> Option<MediaUpload> {
    let index = parts
        .iter()
        .position(|part| matches!(part, FormPart::File { name: n, .. } if n == name))?;
    match parts.swap_remove(index) {
        FormPart::File { upload, .. } => Some(upload),
        FormPart::Text { .. } => None,
    }
}

/// First non-blank text part named `name`.
pub fn text_value<'a>(parts: &'a [FormPart], name: &str) -> Option<&'a str> {
    parts.iter().find_map(|part| match part {
        FormPart::Text { name: n, value } if n == name && !value.trim().is_empty() => {
            Some(value.as_str())
        }
        _ => None,
    })
}

//! HTTP surface of the ingestion pipeline: one multipart endpoint that
//! dispatches on the uploaded file's declared MIME type.

use axum::extract::Multipart;
use axum::Json;
use bytes::Bytes;

use crate::errors::AppError;
use crate::extract::classifier::classify;
use crate::extract::docx::read_docx_text;
use crate::extract::models::ExtractionResult;
use crate::extract::pdf::{items_to_text, read_pdf};

/// MIME types the endpoint accepts, surfaced verbatim in rejection bodies.
pub const SUPPORTED_TYPES: [&str; 4] = [
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/msword",
    "text/plain",
];

/// Minimum number of characters (Unicode scalars, after trimming) a document
/// must yield to be worth classifying. Below this it is almost certainly a
/// scanned image or an empty template.
const MIN_TEXT_CHARS: usize = 50;

/// `POST /api/v1/extract` — accepts a multipart upload under the `file` field
/// and returns extracted text plus classified metadata.
pub async fn handle_extract(
    mut multipart: Multipart,
) -> Result<Json<ExtractionResult>, AppError> {
    let mut upload: Option<(String, String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let mime = field
            .content_type()
            .ok_or_else(|| {
                AppError::BadRequest("File field is missing a content type".to_string())
            })?
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
        upload = Some((filename, mime, bytes));
        break;
    }

    let (filename, mime, bytes) =
        upload.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    tracing::info!(
        filename = %filename,
        mime = %mime,
        size = bytes.len(),
        "extracting document"
    );

    let result = extract_document(&mime, &bytes)?;

    tracing::info!(
        filename = %filename,
        text_chars = result.text.chars().count(),
        sections = result.metadata.sections.len(),
        "extraction complete"
    );

    Ok(Json(result))
}

/// Format dispatch. Every path funnels into the same classifier so all
/// formats share one metadata shape; only the PDF path carries items.
fn extract_document(mime: &str, bytes: &[u8]) -> Result<ExtractionResult, AppError> {
    let (text, text_items) = match mime {
        "application/pdf" => {
            let items = read_pdf(bytes)?;
            (items_to_text(&items), Some(items))
        }
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        | "application/msword" => (read_docx_text(bytes)?, None),
        "text/plain" => (read_plain_text(bytes)?, None),
        other => return Err(AppError::UnsupportedMediaType(other.to_string())),
    };

    if text.trim().chars().count() < MIN_TEXT_CHARS {
        return Err(AppError::InsufficientContent);
    }

    let metadata = classify(&text);
    Ok(ExtractionResult {
        text,
        metadata,
        text_items,
    })
}

fn read_plain_text(bytes: &[u8]) -> Result<String, AppError> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| AppError::MalformedDocument("file is not valid UTF-8 text".to_string()))
}

//! DOCX text reader — flattens the document body into plain text, one line
//! per paragraph. Positions are not meaningful in DOCX, so unlike the PDF
//! path there are no per-run items to surface.

use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};

use crate::errors::AppError;

/// Placeholder returned for an archive that parses but holds no text.
/// Short enough that the content-length gate downstream still rejects it.
pub const EMPTY_DOCUMENT_FALLBACK: &str = "No text content found in document";

/// Reads a DOCX byte buffer into newline-joined paragraph text.
pub fn read_docx_text(bytes: &[u8]) -> Result<String, AppError> {
    let docx = read_docx(bytes)
        .map_err(|e| AppError::MalformedDocument(format!("invalid DOCX archive: {e}")))?;

    let mut paragraphs: Vec<String> = Vec::new();
    for child in docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            paragraphs.push(paragraph_text(&paragraph));
        }
    }

    let text = paragraphs.join("\n");
    if text.trim().is_empty() {
        return Ok(EMPTY_DOCUMENT_FALLBACK.to_string());
    }
    Ok(text)
}

/// Concatenates the text runs of one paragraph. Tabs flatten to a single
/// space; runs carry no separator of their own.
fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut line = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(text) => line.push_str(&text.text),
                    RunChild::Tab(_) => line.push(' '),
                    _ => {}
                }
            }
        }
    }
    line
}

use serde::{Deserialize, Serialize};

/// One run of text as laid out in a PDF content stream.
///
/// `x`/`y` are page-space coordinates of the run's placement (origin bottom
/// left, y increasing upward). Items appear in content-stream order, which is
/// not necessarily visual reading order — callers get the document as the
/// producer emitted it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextItem {
    pub text: String,
    pub x: f32,
    pub y: f32,
    /// Estimated rendered width in points.
    pub width: f32,
    pub font_size: f32,
    /// Declared font name with any subset prefix stripped (e.g. "Arial-BoldMT").
    pub font_name: String,
    /// True when the source stream advanced to a new line after this run.
    pub has_eol: bool,
}

impl TextItem {
    /// Whitespace-only runs are rendering noise unless they mark a line break.
    pub fn is_empty_space(&self) -> bool {
        !self.has_eol && self.text.trim().is_empty()
    }
}

/// Semantic category of a resume section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Contact,
    Education,
    Experience,
    Skills,
    Summary,
    Other,
}

/// A classified contiguous block of resume content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSection {
    #[serde(rename = "type")]
    pub section_type: SectionType,
    /// Accumulated raw text, newline-joined.
    pub content: String,
    /// 0.8 when a header keyword introduced the section, 0.0 otherwise.
    pub confidence: f32,
}

/// Full output of the section classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeMetadata {
    pub sections: Vec<ResumeSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_phone: Option<String>,
    /// All URL matches across all lines, in line order, duplicates kept.
    pub detected_links: Vec<String>,
}

/// Top-level response of the ingestion endpoint, identical for every format.
/// The PDF path additionally surfaces its positioned items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub text: String,
    pub metadata: ResumeMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_items: Option<Vec<TextItem>>,
}

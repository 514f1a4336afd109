//! Document ingestion pipeline: per-format text readers feeding one shared
//! section classifier.
//!
//! ```text
//! raw bytes -> {pdf | docx | plain text} -> text (+ positions for PDF)
//!           -> classifier -> ExtractionResult { text, metadata }
//! ```

pub mod classifier;
pub mod docx;
pub mod handlers;
pub mod models;
pub mod patterns;
pub mod pdf;

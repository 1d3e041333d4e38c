pub mod formats;
pub mod links;

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

pub use links::{LinkFetcher, enrich_with_links, find_urls};

/// Per-file size ceiling. Anything larger is rejected before extraction.
const MAX_FILE_BYTES: usize = 10 * 1_048_576;

/// Per-file extraction failure. Non-fatal: the combiner collects these and
/// excludes the file from the combined text instead of aborting the batch.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type: {0}")]
    Unsupported(String),
    #[error("File is not valid UTF-8: {0}")]
    Decode(String),
    #[error("Failed to parse file: {0}")]
    Parse(String),
    #[error("Failed to read archive: {0}")]
    Archive(String),
    #[error("File too large: {0} bytes (limit {MAX_FILE_BYTES})")]
    TooLarge(usize),
    #[error("Failed to read file: {0}")]
    Io(String),
}

/// A file-like upload: a name (the extension drives format dispatch) and an
/// in-memory payload.
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FilePayload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }

    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let bytes = std::fs::read(path).map_err(|e| ExtractError::Io(e.to_string()))?;
        Ok(Self { name, bytes })
    }

    fn extension(&self) -> String {
        self.name.rsplit('.').next().unwrap_or("").to_lowercase()
    }
}

/// Extract plain text from one uploaded file, dispatching on its extension.
///
/// `xlsx` and image formats are reported as unsupported: spreadsheet
/// rendering and OCR are external concerns, and callers degrade gracefully
/// by skipping the file.
pub fn extract_text(file: &FilePayload) -> Result<String, ExtractError> {
    if file.bytes.len() > MAX_FILE_BYTES {
        return Err(ExtractError::TooLarge(file.bytes.len()));
    }

    match file.extension().as_str() {
        "txt" | "md" => formats::decode_utf8(&file.bytes),
        "csv" => formats::csv_to_text(&file.bytes),
        "json" => formats::json_to_text(&file.bytes),
        "pdf" => formats::pdf_to_text(&file.bytes),
        "docx" => formats::docx_to_text(&file.bytes),
        "pptx" => formats::pptx_to_text(&file.bytes),
        other => Err(ExtractError::Unsupported(other.to_string())),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFailure {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionReport {
    /// Successful extractions joined with per-file banners. Empty when
    /// nothing usable was extracted.
    pub combined: String,
    pub failures: Vec<FileFailure>,
}

/// Extract every file and combine the successes with `--- name ---`
/// banners. Failed or blank files are excluded from the combined text and
/// reported separately; the combined text never carries inline error
/// markers.
pub fn combine_files(files: &[FilePayload]) -> ExtractionReport {
    let mut sections = Vec::new();
    let mut failures = Vec::new();

    for file in files {
        match extract_text(file) {
            Ok(text) if text.trim().is_empty() => {
                eprintln!("[extract] {}: no text content, skipping", file.name);
            }
            Ok(text) => {
                sections.push(format!("\n--- {} ---\n{}\n", file.name, text));
            }
            Err(e) => {
                eprintln!("[extract] {}: {e}", file.name);
                failures.push(FileFailure { name: file.name.clone(), reason: e.to_string() });
            }
        }
    }

    ExtractionReport { combined: sections.join("\n"), failures }
}

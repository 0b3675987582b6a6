//! Text acquisition from invoice files.
//!
//! Strategies are tried in order until one yields non-empty text. A file
//! that yields nothing still becomes a document with empty text, so the
//! pipeline can flag it for manual review instead of aborting a batch.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use kontera_core::RawDocument;

/// Read one invoice file into a document.
pub fn extract_document(path: &Path) -> RawDocument {
    let source = Some(path.display().to_string());
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let text = match extension.as_str() {
        "pdf" => extract_pdf(path).unwrap_or_else(|| read_plain(path)),
        _ => read_plain(path),
    };

    debug!(path = %path.display(), bytes = text.len(), "document text acquired");
    RawDocument::new(text, source)
}

fn extract_pdf(path: &Path) -> Option<String> {
    match pdf_extract::extract_text(path) {
        Ok(text) if !text.trim().is_empty() => Some(text),
        Ok(_) => {
            warn!(path = %path.display(), "PDF has no embedded text");
            None
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "PDF text extraction failed");
            None
        }
    }
}

fn read_plain(path: &Path) -> String {
    match fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read file");
            String::new()
        }
    }
}

/// True for file extensions the pipeline knows how to read.
pub fn is_supported(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    matches!(ext.to_lowercase().as_str(), "pdf" | "txt" | "text")
}

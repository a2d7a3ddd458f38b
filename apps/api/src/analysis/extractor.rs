//! PDF text extraction.

use crate::analysis::AnalysisError;

/// Extracts the text layer from raw PDF bytes.
///
/// Whitespace and layout fidelity are not guaranteed. Output may be empty for
/// scanned or image-only PDFs — the orchestrator decides what to do with that.
pub fn extract_text(pdf_bytes: &[u8]) -> Result<String, AnalysisError> {
    pdf_extract::extract_text_from_mem(pdf_bytes)
        .map_err(|e| AnalysisError::Extraction(e.to_string()))
}

// Resume analysis pipeline.
// Flow: extract PDF text → build prompts → concurrent model calls → normalize.
// All completion calls go through llm_client — no direct API calls here.

pub mod analyzer;
pub mod extractor;
pub mod handlers;
pub mod normalizer;
pub mod prompts;

use thiserror::Error;

use crate::llm_client::ModelError;

/// Terminal pipeline failures. Each variant maps to one failure mode of the
/// mandatory path; the optional highlight call never surfaces these.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The bytes could not be parsed as a PDF, or the PDF has no text layer.
    /// Carries the underlying parser's message for diagnosis.
    #[error("failed to extract text from PDF: {0}")]
    Extraction(String),

    /// Extraction succeeded but produced nothing but whitespace.
    #[error("no readable text found in the PDF file")]
    NoReadableText,

    /// The completion service could not be reached or rejected the call.
    #[error("completion service unavailable: {0}")]
    ModelUnavailable(String),

    /// The completion service answered with no content.
    #[error("completion service returned no content")]
    ModelResponseEmpty,
}

impl From<ModelError> for AnalysisError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Unavailable(msg) => AnalysisError::ModelUnavailable(msg),
            ModelError::EmptyResponse => AnalysisError::ModelResponseEmpty,
        }
    }
}

/// Umbrella error returned by `ResumeAnalyzer::analyze_resume`. Always wraps
/// the root cause so callers get a single diagnosable message.
#[derive(Debug, Error)]
#[error("failed to analyze resume: {source}")]
pub struct AnalysisFailed {
    #[from]
    pub source: AnalysisError,
}

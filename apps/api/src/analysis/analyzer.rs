//! Analysis orchestrator: the one place the full pipeline is wired together.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use crate::analysis::extractor::extract_text;
use crate::analysis::normalizer::{normalize_highlights, normalize_main};
use crate::analysis::prompts::{build_highlight_prompt, build_main_prompt};
use crate::analysis::{AnalysisError, AnalysisFailed};
use crate::llm_client::CompletionClient;
use crate::models::analysis::{AnalysisResult, JobCategory};

/// Runs the resume analysis pipeline against an injected completion client.
///
/// The main analysis call is mandatory; the highlight call is best-effort and
/// can be disabled wholesale via `include_highlights`.
pub struct ResumeAnalyzer {
    model: Arc<dyn CompletionClient>,
    include_highlights: bool,
}

impl ResumeAnalyzer {
    pub fn new(model: Arc<dyn CompletionClient>, include_highlights: bool) -> Self {
        Self {
            model,
            include_highlights,
        }
    }

    /// Full pipeline from raw PDF bytes to a persisted-ready result.
    pub async fn analyze_resume(
        &self,
        pdf_bytes: Bytes,
        job_category: JobCategory,
    ) -> Result<AnalysisResult, AnalysisFailed> {
        // pdf parsing is CPU-bound; keep it off the async workers.
        let text = tokio::task::spawn_blocking(move || extract_text(&pdf_bytes))
            .await
            .map_err(|e| AnalysisError::Extraction(format!("extraction task failed: {e}")))??;

        self.analyze_text(text, job_category).await
    }

    /// Pipeline from already-extracted text. Fails before any model call when
    /// the text is blank, so scanned/image-only PDFs cost nothing.
    pub async fn analyze_text(
        &self,
        resume_text: String,
        job_category: JobCategory,
    ) -> Result<AnalysisResult, AnalysisFailed> {
        if resume_text.trim().is_empty() {
            return Err(AnalysisError::NoReadableText.into());
        }

        info!(
            "starting resume analysis: category={}, text_chars={}",
            job_category.slug(),
            resume_text.len()
        );

        let main_prompt = build_main_prompt(&resume_text, job_category);

        let (main_raw, highlight_raw) = if self.include_highlights {
            let highlight_prompt = build_highlight_prompt(&resume_text, job_category);
            let (main, highlights) = tokio::join!(
                self.model.complete(&main_prompt),
                self.model.complete(&highlight_prompt),
            );
            (main, Some(highlights))
        } else {
            (self.model.complete(&main_prompt).await, None)
        };

        let main_raw = main_raw.map_err(AnalysisError::from)?;
        let mut result = normalize_main(&main_raw, job_category);

        result.highlighted_text = match highlight_raw {
            Some(Ok(raw)) => Some(normalize_highlights(&raw)),
            Some(Err(e)) => {
                // Degraded, not failed: the main analysis already succeeded.
                warn!("highlight call failed, continuing without segments: {e}");
                Some(Vec::new())
            }
            None => None,
        };
        result.original_text = Some(resume_text);

        info!(
            "resume analysis complete: category={}, overall_score={}",
            job_category.slug(),
            result.overall_score
        );

        Ok(result)
    }
}

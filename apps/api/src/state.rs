use std::sync::Arc;

use crate::analysis::analyzer::ResumeAnalyzer;
use crate::store::AnalysisStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: AnalysisStore,
    /// Pipeline orchestrator holding the injected completion client.
    pub analyzer: Arc<ResumeAnalyzer>,
}

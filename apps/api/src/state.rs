use std::sync::Arc;

use crate::generation::pipeline::GenerationPipeline;
use crate::resumes::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Résumé persistence. Default: `PgResumeStore`.
    pub store: Arc<dyn ResumeStore>,
    /// Tracked generation attempts: orchestrator + renderer + status tracker.
    pub pipeline: Arc<GenerationPipeline>,
}

//! Generation Pipeline: one tracked generation attempt for a stored résumé.
//!
//! Flow: status=processing → orchestrate (never fails) → render →
//!       status=completed + history record, or status=failed if rendering fails.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::generation::orchestrator::{GenerationOrchestrator, GenerationOutcome};
use crate::generation::prompt_builder::effective_instruction;
use crate::generation::status::GenerationStatusTracker;
use crate::llm_client::ProviderId;
use crate::models::resume::{GenerationRecord, ResumeRow};
use crate::render::{document_file_name, document_url, DocumentRenderer};

/// What the caller learns about a finished attempt.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptSummary {
    pub pdf_url: String,
    pub suggestions: Vec<String>,
    pub provider: ProviderId,
    /// True when the content came from the local fallback rather than the provider.
    pub degraded: bool,
}

pub struct GenerationPipeline {
    orchestrator: GenerationOrchestrator,
    renderer: Arc<dyn DocumentRenderer>,
    tracker: GenerationStatusTracker,
    public_base_url: String,
}

impl GenerationPipeline {
    pub fn new(
        orchestrator: GenerationOrchestrator,
        renderer: Arc<dyn DocumentRenderer>,
        tracker: GenerationStatusTracker,
        public_base_url: String,
    ) -> Self {
        Self {
            orchestrator,
            renderer,
            tracker,
            public_base_url,
        }
    }

    pub fn orchestrator(&self) -> &GenerationOrchestrator {
        &self.orchestrator
    }

    /// Runs one attempt for `resume`.
    ///
    /// Provider trouble is absorbed by the orchestrator. A rendering failure is
    /// recorded as `failed` and returned as `AppError::GenerationFailed`; a store
    /// failure while completing is recorded as `failed` and returned as is.
    pub async fn run_attempt(
        &self,
        resume: &ResumeRow,
        instruction: &str,
        provider: ProviderId,
    ) -> Result<AttemptSummary, AppError> {
        self.tracker.begin(resume.id, provider).await?;

        let outcome = self
            .orchestrator
            .run(&resume.profile.0, instruction, provider)
            .await;
        if let GenerationOutcome::Degraded { reason, .. } = &outcome {
            warn!("Resume {} optimized with local fallback: {reason}", resume.id);
        }
        let degraded = outcome.is_degraded();
        let result = outcome.into_result();

        let file_name = document_file_name(resume.user_id);
        let relative_path = match self.renderer.render(&result.payload, &file_name).await {
            Ok(path) => path,
            Err(e) => {
                let message = e.to_string();
                error!("Rendering failed for resume {}: {message}", resume.id);
                self.tracker.fail(resume.id, provider, &message).await?;
                return Err(AppError::GenerationFailed {
                    resume_id: resume.id,
                    message,
                });
            }
        };

        let pdf_url = document_url(&self.public_base_url, &relative_path);
        let record = GenerationRecord::new(
            resume.id,
            pdf_url.clone(),
            effective_instruction(instruction).to_string(),
            result.provider,
            result.suggestions.clone(),
        );
        if let Err(e) = self.tracker.complete(&record).await {
            error!("Recording generation for resume {} failed: {e}", resume.id);
            if let Err(fail_err) = self.tracker.fail(resume.id, provider, &e.to_string()).await {
                error!("Could not mark resume {} as failed: {fail_err}", resume.id);
            }
            return Err(e);
        }

        info!(
            "Generated resume document {} via {} (degraded: {degraded})",
            pdf_url, result.provider
        );

        Ok(AttemptSummary {
            pdf_url,
            suggestions: result.suggestions,
            provider: result.provider,
            degraded,
        })
    }
}

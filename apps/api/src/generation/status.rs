//! Generation Status Tracker: persists the lifecycle of the latest attempt.
//!
//! `pending → processing → {completed | failed}`. Each new attempt overwrites the
//! previous terminal state with `processing`. There is no per-résumé lock:
//! concurrent attempts interleave and the last write wins.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::ProviderId;
use crate::models::resume::{GenerationRecord, GenerationStatus};
use crate::resumes::store::{ResumeStore, StatusWrite};

#[derive(Clone)]
pub struct GenerationStatusTracker {
    store: Arc<dyn ResumeStore>,
}

impl GenerationStatusTracker {
    pub fn new(store: Arc<dyn ResumeStore>) -> Self {
        Self { store }
    }

    /// Marks an attempt as started. Clears any error left by a previous attempt.
    pub async fn begin(&self, resume_id: Uuid, provider: ProviderId) -> Result<(), AppError> {
        self.write(resume_id, GenerationStatus::Processing, provider, None)
            .await
    }

    /// Records the attempt's output, then marks it `completed`.
    pub async fn complete(&self, record: &GenerationRecord) -> Result<(), AppError> {
        let provider = ProviderId::from_name(&record.provider);
        self.store.append_generation(record).await?;
        self.write(record.resume_id, GenerationStatus::Completed, provider, None)
            .await
    }

    /// Marks the attempt `failed` and keeps the message for the caller.
    pub async fn fail(
        &self,
        resume_id: Uuid,
        provider: ProviderId,
        message: &str,
    ) -> Result<(), AppError> {
        self.write(
            resume_id,
            GenerationStatus::Failed,
            provider,
            Some(message.to_string()),
        )
        .await
    }

    async fn write(
        &self,
        resume_id: Uuid,
        status: GenerationStatus,
        provider: ProviderId,
        error: Option<String>,
    ) -> Result<(), AppError> {
        info!(
            "Resume {resume_id} generation status -> {} ({provider})",
            status.as_str()
        );
        self.store
            .write_status(
                resume_id,
                &StatusWrite {
                    status,
                    provider,
                    error,
                },
            )
            .await
    }
}

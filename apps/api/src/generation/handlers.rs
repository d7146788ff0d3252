//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::ProviderId;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateResumeRequest {
    pub user_id: Uuid,
    pub resume_id: Uuid,
    /// Overrides the résumé's saved instruction when present.
    pub prompt: Option<String>,
    /// Overrides the résumé's saved provider when present. Unknown names mean `openai`.
    pub provider: Option<ProviderId>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResumeResponse {
    pub message: String,
    pub pdf_url: String,
    pub suggestions: Vec<String>,
    pub provider: ProviderId,
    pub degraded: bool,
}

/// POST /api/v1/ai/generate-resume
///
/// Runs a new generation attempt for an existing résumé. Provider failures
/// degrade to local content; only a rendering failure is reported as an error.
pub async fn handle_generate_resume(
    State(state): State<AppState>,
    Json(request): Json<GenerateResumeRequest>,
) -> Result<Json<GenerateResumeResponse>, AppError> {
    let resume = state
        .store
        .get(request.resume_id, request.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {} not found", request.resume_id)))?;

    let settings = &resume.ai_settings.0;
    let instruction = request.prompt.as_deref().unwrap_or(&settings.prompt);
    let provider = request.provider.unwrap_or(settings.provider);
    info!(
        "Regenerating resume {} via {provider} (previous status: {})",
        resume.id,
        resume.status().as_str()
    );

    let summary = state
        .pipeline
        .run_attempt(&resume, instruction, provider)
        .await?;

    Ok(Json(GenerateResumeResponse {
        message: "AI resume generated successfully".to_string(),
        pdf_url: summary.pdf_url,
        suggestions: summary.suggestions,
        provider: summary.provider,
        degraded: summary.degraded,
    }))
}

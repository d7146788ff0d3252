//! Axum route handlers for the Resume API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::pipeline::AttemptSummary;
use crate::models::resume::{AiSettings, GenerationRecord, ResumeProfile, ResumeRow};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ResumeWriteRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub profile: ResumeProfile,
    #[serde(default)]
    pub ai_settings: AiSettings,
}

#[derive(Debug, Serialize)]
pub struct CreateResumeResponse {
    pub resume: ResumeRow,
    pub generation: AttemptSummary,
}

#[derive(Debug, Serialize)]
pub struct ResumeDetailResponse {
    pub resume: ResumeRow,
    pub generations: Vec<GenerationRecord>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes
///
/// Saves the résumé, then runs a generation attempt with its AI settings.
/// If no document could be produced the résumé stays saved with status `failed`
/// and the caller gets `GENERATION_FAILED`.
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Json(request): Json<ResumeWriteRequest>,
) -> Result<(StatusCode, Json<CreateResumeResponse>), AppError> {
    let resume = state
        .store
        .insert(request.user_id, &request.profile, &request.ai_settings)
        .await?;

    let generation = state
        .pipeline
        .run_attempt(
            &resume,
            &request.ai_settings.prompt,
            request.ai_settings.provider,
        )
        .await?;

    let resume = state
        .store
        .get(resume.id, request.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {} not found", resume.id)))?;

    Ok((
        StatusCode::CREATED,
        Json(CreateResumeResponse { resume, generation }),
    ))
}

/// GET /api/v1/resumes?user_id=
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    Ok(Json(state.store.list(params.user_id).await?))
}

/// GET /api/v1/resumes/:id?user_id=
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResumeDetailResponse>, AppError> {
    let resume = state
        .store
        .get(resume_id, params.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

    let generations = state.store.generations(resume_id).await?;

    Ok(Json(ResumeDetailResponse {
        resume,
        generations,
    }))
}

/// PUT /api/v1/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(request): Json<ResumeWriteRequest>,
) -> Result<Json<ResumeRow>, AppError> {
    let resume = state
        .store
        .update(
            resume_id,
            request.user_id,
            &request.profile,
            &request.ai_settings,
        )
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

    Ok(Json(resume))
}

/// DELETE /api/v1/resumes/:id?user_id=
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.store.delete(resume_id, params.user_id).await? {
        return Err(AppError::NotFound(format!("Resume {resume_id} not found")));
    }

    info!("Deleted resume {resume_id} for user {}", params.user_id);

    Ok(Json(MessageResponse {
        message: "Resume deleted successfully".to_string(),
    }))
}

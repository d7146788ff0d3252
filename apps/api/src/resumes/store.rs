//! Résumé persistence.
//!
//! Schema (Postgres):
//!
//! ```sql
//! CREATE TABLE resumes (
//!     id                       UUID PRIMARY KEY,
//!     user_id                  UUID NOT NULL,
//!     profile                  JSONB NOT NULL,
//!     ai_settings              JSONB NOT NULL,
//!     generation_status        TEXT NOT NULL DEFAULT 'pending',
//!     last_generation_provider TEXT,
//!     last_generation_error    TEXT,
//!     latest_pdf_url           TEXT,
//!     latest_suggestions       TEXT[] NOT NULL DEFAULT '{}',
//!     created_at               TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at               TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//!
//! CREATE TABLE resume_generations (
//!     id          UUID PRIMARY KEY,
//!     resume_id   UUID NOT NULL REFERENCES resumes(id) ON DELETE CASCADE,
//!     pdf_url     TEXT NOT NULL,
//!     prompt      TEXT NOT NULL,
//!     provider    TEXT NOT NULL,
//!     suggestions TEXT[] NOT NULL,
//!     created_at  TIMESTAMPTZ NOT NULL
//! );
//! ```
//!
//! `resume_generations` is append-only. Status writes are unconditional
//! (last write wins).

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::ProviderId;
use crate::models::resume::{
    AiSettings, GenerationRecord, GenerationStatus, ResumeProfile, ResumeRow,
};

/// A single write to the status slot of a résumé.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusWrite {
    pub status: GenerationStatus,
    pub provider: ProviderId,
    pub error: Option<String>,
}

/// Owner-scoped résumé storage. Every read and mutation by id also takes the
/// owner's `user_id`; rows owned by someone else behave as missing.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Inserts a new résumé in `pending` state.
    async fn insert(
        &self,
        user_id: Uuid,
        profile: &ResumeProfile,
        ai_settings: &AiSettings,
    ) -> Result<ResumeRow, AppError>;

    /// All résumés of a user, newest first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<ResumeRow>, AppError>;

    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<ResumeRow>, AppError>;

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        profile: &ResumeProfile,
        ai_settings: &AiSettings,
    ) -> Result<Option<ResumeRow>, AppError>;

    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError>;

    /// Generation history of a résumé, oldest first.
    async fn generations(&self, resume_id: Uuid) -> Result<Vec<GenerationRecord>, AppError>;

    async fn write_status(&self, resume_id: Uuid, write: &StatusWrite) -> Result<(), AppError>;

    /// Appends a history record and makes it the résumé's latest output.
    async fn append_generation(&self, record: &GenerationRecord) -> Result<(), AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres implementation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn insert(
        &self,
        user_id: Uuid,
        profile: &ResumeProfile,
        ai_settings: &AiSettings,
    ) -> Result<ResumeRow, AppError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes (id, user_id, profile, ai_settings, generation_status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(Json(profile))
        .bind(Json(ai_settings))
        .bind(GenerationStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await?;

        info!("Created resume {} for user {}", row.id, user_id);
        Ok(row)
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<ResumeRow>, AppError> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<ResumeRow>, AppError> {
        Ok(
            sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        profile: &ResumeProfile,
        ai_settings: &AiSettings,
    ) -> Result<Option<ResumeRow>, AppError> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            r#"
            UPDATE resumes
            SET profile = $3, ai_settings = $4, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(Json(profile))
        .bind(Json(ai_settings))
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn generations(&self, resume_id: Uuid) -> Result<Vec<GenerationRecord>, AppError> {
        Ok(sqlx::query_as::<_, GenerationRecord>(
            "SELECT * FROM resume_generations WHERE resume_id = $1 ORDER BY created_at ASC",
        )
        .bind(resume_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn write_status(&self, resume_id: Uuid, write: &StatusWrite) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE resumes
            SET generation_status = $2,
                last_generation_provider = $3,
                last_generation_error = $4,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(resume_id)
        .bind(write.status.as_str())
        .bind(write.provider.as_str())
        .bind(write.error.as_deref())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn append_generation(&self, record: &GenerationRecord) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        // Append-only: history rows are never updated.
        sqlx::query(
            r#"
            INSERT INTO resume_generations
                (id, resume_id, pdf_url, prompt, provider, suggestions, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id)
        .bind(record.resume_id)
        .bind(&record.pdf_url)
        .bind(&record.prompt)
        .bind(&record.provider)
        .bind(&record.suggestions)
        .bind(record.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE resumes
            SET latest_pdf_url = $2, latest_suggestions = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(record.resume_id)
        .bind(&record.pdf_url)
        .bind(&record.suggestions)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}

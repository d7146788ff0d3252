//! Document rendering: turns a finalized payload into a stored document.
//!
//! The pipeline only sees `DocumentRenderer`: render, get back a relative path.
//! Default backend: `S3DocumentRenderer` (Markdown uploaded to S3 / MinIO).

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::models::resume::OptimizedResumePayload;

pub mod markdown;
pub mod s3;

pub use s3::S3DocumentRenderer;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Document upload failed: {0}")]
    Upload(String),
}

/// Renders a payload and stores the result, returning its path relative to the
/// public base URL (e.g. `/uploads/resume_1700000000000_<user>.md`).
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(
        &self,
        payload: &OptimizedResumePayload,
        file_name: &str,
    ) -> Result<String, RenderError>;
}

/// `resume_{unix_millis}_{user_id}.md`
pub fn document_file_name(user_id: Uuid) -> String {
    format!("resume_{}_{}.md", Utc::now().timestamp_millis(), user_id)
}

/// Joins the public base URL and a relative document path with exactly one slash.
pub fn document_url(public_base_url: &str, relative_path: &str) -> String {
    format!(
        "{}/{}",
        public_base_url.trim_end_matches('/'),
        relative_path.trim_start_matches('/')
    )
}

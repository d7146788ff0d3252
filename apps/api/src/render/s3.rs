use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use tracing::info;

use super::markdown::render_markdown;
use super::{DocumentRenderer, RenderError};
use crate::models::resume::OptimizedResumePayload;

/// Key prefix for rendered documents; also the public path prefix.
const UPLOADS_PREFIX: &str = "uploads";

/// Renders Markdown and uploads it to `s3://{bucket}/uploads/{file_name}`.
#[derive(Clone)]
pub struct S3DocumentRenderer {
    s3: aws_sdk_s3::Client,
    bucket: String,
}

impl S3DocumentRenderer {
    pub fn new(s3: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { s3, bucket }
    }
}

#[async_trait]
impl DocumentRenderer for S3DocumentRenderer {
    async fn render(
        &self,
        payload: &OptimizedResumePayload,
        file_name: &str,
    ) -> Result<String, RenderError> {
        let body = render_markdown(payload);
        let key = format!("{UPLOADS_PREFIX}/{file_name}");

        self.s3
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(body.into_bytes()))
            .content_type("text/markdown")
            .send()
            .await
            .map_err(|e| RenderError::Upload(e.to_string()))?;

        info!("Uploaded rendered resume to s3://{}/{}", self.bucket, key);

        Ok(format!("/{key}"))
    }
}

pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::generation::handlers as generation;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

/// Profile images travel inline as data URLs.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route(
            "/api/v1/resumes",
            post(resumes::handle_create_resume).get(resumes::handle_list_resumes),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get_resume)
                .put(resumes::handle_update_resume)
                .delete(resumes::handle_delete_resume),
        )
        // Generation API
        .route(
            "/api/v1/ai/generate-resume",
            post(generation::handle_generate_resume),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::llm_client::ProviderId;
    use crate::resumes::store::ResumeStore;
    use crate::testing::{pipeline_with, sample_profile, InMemoryResumeStore, ScriptedProvider};

    fn app(openai: ScriptedProvider, render_succeeds: bool) -> (Router, Arc<InMemoryResumeStore>) {
        let store = Arc::new(InMemoryResumeStore::default());
        let state = AppState {
            store: store.clone(),
            pipeline: Arc::new(pipeline_with(store.clone(), openai, render_succeeds)),
        };
        (build_router(state), store)
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_providers() {
        let (router, _) = app(ScriptedProvider::replying(ProviderId::OpenAi, "{}"), true);
        let (status, body) = send(
            router,
            Request::get("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["providers"]["openai"], true);
        assert_eq!(body["providers"]["gemini"], false);
    }

    #[tokio::test]
    async fn test_create_resume_completes_generation() {
        let (router, _) = app(
            ScriptedProvider::replying(
                ProviderId::OpenAi,
                r#"{"summary": "Rust systems engineer.", "suggestions": ["Link crabcache"]}"#,
            ),
            true,
        );
        let user_id = Uuid::new_v4();

        let (status, body) = send(
            router,
            post_json(
                "/api/v1/resumes",
                json!({
                    "user_id": user_id,
                    "profile": sample_profile(),
                    "ai_settings": {"provider": "openai", "prompt": ""}
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["resume"]["generation_status"], "completed");
        assert_eq!(body["generation"]["degraded"], false);
        assert_eq!(body["generation"]["provider"], "openai");
        assert_eq!(body["generation"]["suggestions"][0], "Link crabcache");
        assert_eq!(
            body["resume"]["latest_pdf_url"],
            body["generation"]["pdf_url"]
        );
    }

    #[tokio::test]
    async fn test_create_resume_rendering_failure_keeps_resume_as_failed() {
        let (router, store) = app(ScriptedProvider::replying(ProviderId::OpenAi, "{}"), false);
        let user_id = Uuid::new_v4();

        let (status, body) = send(
            router,
            post_json(
                "/api/v1/resumes",
                json!({"user_id": user_id, "profile": sample_profile()}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "GENERATION_FAILED");
        let saved = store.list(user_id).await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].generation_status, "failed");
        assert!(saved[0].last_generation_error.is_some());
    }

    #[tokio::test]
    async fn test_regenerate_with_unknown_provider_uses_openai() {
        let (router, store) = app(
            ScriptedProvider::failing(ProviderId::OpenAi, "timeout"),
            true,
        );
        let user_id = Uuid::new_v4();
        let resume = store
            .insert(user_id, &sample_profile(), &Default::default())
            .await
            .unwrap();

        let (status, body) = send(
            router,
            post_json(
                "/api/v1/ai/generate-resume",
                json!({
                    "user_id": user_id,
                    "resume_id": resume.id,
                    "provider": "mistral"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["provider"], "openai");
        assert_eq!(body["degraded"], true);
        assert_eq!(body["suggestions"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_get_resume_of_another_user_is_not_found() {
        let (router, store) = app(ScriptedProvider::replying(ProviderId::OpenAi, "{}"), true);
        let resume = store
            .insert(Uuid::new_v4(), &sample_profile(), &Default::default())
            .await
            .unwrap();

        let uri = format!("/api/v1/resumes/{}?user_id={}", resume.id, Uuid::new_v4());
        let (status, body) = send(router, Request::get(uri).body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_update_then_delete_resume() {
        let (router, store) = app(ScriptedProvider::replying(ProviderId::OpenAi, "{}"), true);
        let user_id = Uuid::new_v4();
        let resume = store
            .insert(user_id, &sample_profile(), &Default::default())
            .await
            .unwrap();

        let mut profile = sample_profile();
        profile.projects.clear();
        let request = Request::put(format!("/api/v1/resumes/{}", resume.id))
            .header("content-type", "application/json")
            .body(Body::from(
                json!({
                    "user_id": user_id,
                    "profile": profile,
                    "ai_settings": {"provider": "gemini", "prompt": "Be concise"}
                })
                .to_string(),
            ))
            .unwrap();
        let (status, body) = send(router.clone(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ai_settings"]["provider"], "gemini");
        assert_eq!(body["profile"]["projects"], json!([]));

        let uri = format!("/api/v1/resumes/{}?user_id={}", resume.id, user_id);
        let (status, _) = send(router.clone(), Request::delete(&uri).body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(router, Request::get(&uri).body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

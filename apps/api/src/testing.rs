//! Test doubles shared by unit tests: scripted providers, an in-memory store
//! and a renderer that can be told to fail.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::orchestrator::GenerationOrchestrator;
use crate::generation::pipeline::GenerationPipeline;
use crate::generation::status::GenerationStatusTracker;
use crate::llm_client::{LlmProvider, ProviderError, ProviderId, ProviderSet};
use crate::models::resume::{
    AiSettings, GenerationRecord, GenerationStatus, OptimizedResumePayload, PersonalInfo,
    Project, ResumeProfile, ResumeRow, WorkExperience,
};
use crate::render::{DocumentRenderer, RenderError};
use crate::resumes::store::{ResumeStore, StatusWrite};

pub fn sample_profile() -> ResumeProfile {
    ResumeProfile {
        personal_info: PersonalInfo {
            full_name: Some("Ferris Crab".to_string()),
            email: Some("ferris@example.com".to_string()),
            city: Some("Portland".to_string()),
            summary: Some("Systems engineer who likes memory safety.".to_string()),
            ..Default::default()
        },
        work_experience: vec![WorkExperience {
            job_title: Some("Systems Engineer".to_string()),
            company: Some("Oxidized Inc".to_string()),
            start_date: Some("2019-03".to_string()),
            end_date: Some("2024-01".to_string()),
            responsibilities: Some("Rewrote the billing service in Rust".to_string()),
            tech_stack: vec!["Rust".to_string(), "Postgres".to_string()],
            ..Default::default()
        }],
        projects: vec![Project {
            project_name: Some("crabcache".to_string()),
            description: Some("An LRU cache".to_string()),
            ..Default::default()
        }],
        ..Default::default()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Providers
// ────────────────────────────────────────────────────────────────────────────

enum Script {
    Reply(String),
    Unavailable,
    Fail(String),
}

pub struct ScriptedProvider {
    id: ProviderId,
    script: Script,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl ScriptedProvider {
    fn new(id: ProviderId, script: Script) -> Self {
        Self {
            id,
            script,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn replying(id: ProviderId, text: &str) -> Self {
        Self::new(id, Script::Reply(text.to_string()))
    }

    pub fn unavailable(id: ProviderId) -> Self {
        Self::new(id, Script::Unavailable)
    }

    pub fn failing(id: ProviderId, reason: &str) -> Self {
        Self::new(id, Script::Fail(reason.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn is_configured(&self) -> bool {
        !matches!(self.script, Script::Unavailable)
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        match &self.script {
            Script::Reply(text) => Ok(text.clone()),
            Script::Unavailable => Err(ProviderError::Unavailable { provider: self.id }),
            Script::Fail(reason) => Err(ProviderError::request_failed(self.id, reason.clone())),
        }
    }
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn serve(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// The reason of a `RequestFailed` from `provider`; panics on anything else.
pub fn request_failed_reason(err: ProviderError, provider: ProviderId) -> String {
    match err {
        ProviderError::RequestFailed {
            provider: actual,
            reason,
        } if actual == provider => reason,
        other => panic!("expected RequestFailed from {provider}, got {other:?}"),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Renderer
// ────────────────────────────────────────────────────────────────────────────

pub struct StubRenderer {
    pub succeed: bool,
}

#[async_trait]
impl DocumentRenderer for StubRenderer {
    async fn render(
        &self,
        _payload: &OptimizedResumePayload,
        file_name: &str,
    ) -> Result<String, RenderError> {
        if self.succeed {
            Ok(format!("/uploads/{file_name}"))
        } else {
            Err(RenderError::Upload("bucket does not exist".to_string()))
        }
    }
}

/// Pipeline with `openai` in the OpenAI slot and an unconfigured Gemini.
pub fn pipeline_with(
    store: Arc<InMemoryResumeStore>,
    openai: ScriptedProvider,
    render_succeeds: bool,
) -> GenerationPipeline {
    let providers = ProviderSet::new(
        Arc::new(openai),
        Arc::new(ScriptedProvider::unavailable(ProviderId::Gemini)),
    );
    GenerationPipeline::new(
        GenerationOrchestrator::new(providers),
        Arc::new(StubRenderer {
            succeed: render_succeeds,
        }),
        GenerationStatusTracker::new(store),
        "http://localhost:8080".to_string(),
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Store
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct StoreState {
    resumes: HashMap<Uuid, ResumeRow>,
    generations: Vec<GenerationRecord>,
    statuses: HashMap<Uuid, Vec<GenerationStatus>>,
}

#[derive(Default)]
pub struct InMemoryResumeStore {
    state: Mutex<StoreState>,
    fail_appends: AtomicBool,
}

impl InMemoryResumeStore {
    /// Makes every later `append_generation` fail like a timed-out pool.
    pub fn fail_appends(&self) {
        self.fail_appends.store(true, Ordering::SeqCst);
    }

    /// Every status written for a résumé, in order (excluding the initial `pending`).
    pub fn status_history(&self, resume_id: Uuid) -> Vec<GenerationStatus> {
        self.state
            .lock()
            .unwrap()
            .statuses
            .get(&resume_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl ResumeStore for InMemoryResumeStore {
    async fn insert(
        &self,
        user_id: Uuid,
        profile: &ResumeProfile,
        ai_settings: &AiSettings,
    ) -> Result<ResumeRow, AppError> {
        let now = Utc::now();
        let row = ResumeRow {
            id: Uuid::new_v4(),
            user_id,
            profile: Json(profile.clone()),
            ai_settings: Json(ai_settings.clone()),
            generation_status: GenerationStatus::Pending.as_str().to_string(),
            last_generation_provider: None,
            last_generation_error: None,
            latest_pdf_url: None,
            latest_suggestions: vec![],
            created_at: now,
            updated_at: now,
        };
        self.state
            .lock()
            .unwrap()
            .resumes
            .insert(row.id, row.clone());
        Ok(row)
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<ResumeRow>, AppError> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<ResumeRow> = state
            .resumes
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<ResumeRow>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .resumes
            .get(&id)
            .filter(|r| r.user_id == user_id)
            .cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        profile: &ResumeProfile,
        ai_settings: &AiSettings,
    ) -> Result<Option<ResumeRow>, AppError> {
        let mut state = self.state.lock().unwrap();
        let Some(row) = state
            .resumes
            .get_mut(&id)
            .filter(|r| r.user_id == user_id)
        else {
            return Ok(None);
        };
        row.profile = Json(profile.clone());
        row.ai_settings = Json(ai_settings.clone());
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.lock().unwrap();
        let owned = state
            .resumes
            .get(&id)
            .is_some_and(|r| r.user_id == user_id);
        if owned {
            state.resumes.remove(&id);
            state.generations.retain(|g| g.resume_id != id);
        }
        Ok(owned)
    }

    async fn generations(&self, resume_id: Uuid) -> Result<Vec<GenerationRecord>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .generations
            .iter()
            .filter(|g| g.resume_id == resume_id)
            .cloned()
            .collect())
    }

    async fn write_status(&self, resume_id: Uuid, write: &StatusWrite) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        if let Some(row) = state.resumes.get_mut(&resume_id) {
            row.generation_status = write.status.as_str().to_string();
            row.last_generation_provider = Some(write.provider.as_str().to_string());
            row.last_generation_error = write.error.clone();
            row.updated_at = Utc::now();
        }
        state
            .statuses
            .entry(resume_id)
            .or_default()
            .push(write.status);
        Ok(())
    }

    async fn append_generation(&self, record: &GenerationRecord) -> Result<(), AppError> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut state = self.state.lock().unwrap();
        if let Some(row) = state.resumes.get_mut(&record.resume_id) {
            row.latest_pdf_url = Some(record.pdf_url.clone());
            row.latest_suggestions = record.suggestions.clone();
        }
        state.generations.push(record.clone());
        Ok(())
    }
}

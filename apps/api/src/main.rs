mod config;
mod db;
mod errors;
mod generation;
mod llm_client;
mod models;
mod render;
mod resumes;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use axum::http::{HeaderValue, Method};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::generation::orchestrator::GenerationOrchestrator;
use crate::generation::pipeline::GenerationPipeline;
use crate::generation::status::GenerationStatusTracker;
use crate::llm_client::gemini::GeminiProvider;
use crate::llm_client::openai::OpenAiProvider;
use crate::llm_client::ProviderSet;
use crate::render::S3DocumentRenderer;
use crate::resumes::store::{PgResumeStore, ResumeStore};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting QuickCV API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    let store: Arc<dyn ResumeStore> = Arc::new(PgResumeStore::new(db));

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");
    let renderer = Arc::new(S3DocumentRenderer::new(s3, config.s3_bucket.clone()));

    // Initialize LLM providers (one shared HTTP client, bounded per call)
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.provider_timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;
    let providers = ProviderSet::new(
        Arc::new(OpenAiProvider::new(http.clone(), config.openai.clone())),
        Arc::new(GeminiProvider::new(http, config.gemini.clone())),
    );
    for (id, configured) in providers.configured() {
        info!(
            "LLM provider {id}: {}",
            if configured { "configured" } else { "no API key, will degrade" }
        );
    }

    let pipeline = GenerationPipeline::new(
        GenerationOrchestrator::new(providers),
        renderer,
        GenerationStatusTracker::new(store.clone()),
        config.public_base_url.clone(),
    );

    // Build app state
    let state = AppState {
        store,
        pipeline: Arc::new(pipeline),
    };

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .frontend_url
                .parse::<HeaderValue>()
                .context("FRONTEND_URL must be a valid origin")?,
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "quickcv-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}

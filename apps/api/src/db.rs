use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::info;

const MAX_CONNECTIONS: u32 = 10;

/// Opens the Postgres pool backing the résumé store.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to résumé database (max {MAX_CONNECTIONS} connections)");

    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .context("Failed to connect to DATABASE_URL")?;

    info!("Résumé database ready");
    Ok(pool)
}

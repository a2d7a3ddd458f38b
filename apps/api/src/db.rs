use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Idempotent schema setup, run once at startup.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS resume_analyses (
            id UUID PRIMARY KEY,
            user_id UUID NOT NULL,
            file_name TEXT NOT NULL,
            job_category TEXT NOT NULL,
            full_name TEXT NOT NULL,
            overall_score INTEGER NOT NULL,
            sections JSONB NOT NULL,
            summary TEXT NOT NULL,
            suggested_fixes JSONB NOT NULL,
            ats_score JSONB NOT NULL,
            original_text TEXT,
            highlighted_text JSONB,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_resume_analyses_user_id ON resume_analyses (user_id)",
    )
    .execute(pool)
    .await?;

    info!("Database schema up to date");
    Ok(())
}

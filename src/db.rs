use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::errors::AppError;

pub async fn init_db(database_url: &str) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| AppError::Persistence(anyhow::Error::new(e).context("Migration failed")))?;

    tracing::info!("Database pool initialized and migrations applied");
    Ok(pool)
}

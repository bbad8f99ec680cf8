pub mod patch;
pub mod repository;

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::config::Config;
use crate::error::AppError;

pub use repository::CourseRepository;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Opens the pool and brings the schema up to date.
///
/// Connections are checked before each acquire, so a broken connection is
/// replaced rather than handed out. In-memory databases get a single
/// connection that is never recycled, otherwise every connection would see
/// its own empty database.
pub async fn connect(config: &Config) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool_options = SqlitePoolOptions::new()
        .acquire_timeout(config.connect_timeout)
        .test_before_acquire(true);
    let pool_options = if config.is_in_memory() {
        pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options.max_connections(config.max_connections)
    };

    let pool = pool_options.connect_with(options).await?;
    MIGRATOR.run(&pool).await?;
    info!("connected to {}", config.database_url);

    Ok(pool)
}

pub async fn health_check(db: &SqlitePool) -> Result<(), AppError> {
    sqlx::query("select 1").execute(db).await?;
    Ok(())
}

pub async fn close(db: SqlitePool) {
    db.close().await;
    info!("database pool closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_runs_migrations() {
        let pool = connect(&Config::in_memory()).await.expect("Failed to connect");

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('courses', 'pars', 'handicaps') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .expect("Failed to list tables");
        let names: Vec<&str> = tables.iter().map(|(name,)| name.as_str()).collect();
        assert_eq!(names, vec!["courses", "handicaps", "pars"]);

        health_check(&pool).await.expect("health check failed");
        close(pool).await;
    }

    #[tokio::test]
    async fn test_health_check_fails_after_close() {
        let pool = connect(&Config::in_memory()).await.expect("Failed to connect");
        close(pool.clone()).await;

        assert!(matches!(health_check(&pool).await, Err(AppError::Database(_))));
    }
}

//! Read access to the `machine_status` table: the store seam used by handlers and its PostgreSQL implementation.

use crate::config::DbConfig;
use crate::error::{AppError, ConfigError};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::future::Future;
use std::time::Duration;

/// Every column of every row, rendered to JSON by Postgres so column types pass through verbatim.
/// `m.*` is always the whole row, even when the table has a column named `m`.
pub const SELECT_ALL_SQL: &str =
    "SELECT row_to_json(m.*) AS row FROM machine_status AS m ORDER BY m.id ASC";
pub const COUNT_SQL: &str = "SELECT count(*) AS count FROM machine_status";

#[derive(thiserror::Error, Debug)]
pub enum ConnectError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    Db(#[from] sqlx::Error),
}

#[async_trait]
pub trait MachineStatusStore: Send + Sync {
    /// All rows as JSON objects, ascending `id`.
    async fn list_all(&self) -> Result<Vec<Value>, AppError>;

    /// Number of rows in the table.
    async fn count(&self) -> Result<i64, AppError>;

    /// Round-trip to the backend for readiness checks.
    async fn ping(&self) -> Result<(), AppError>;
}

/// Open the pool and verify it with one connection. Fails instead of handing back an unusable pool.
pub async fn connect(config: &DbConfig) -> Result<PgPool, ConnectError> {
    let options = config.connect_options()?;
    tracing::info!(
        db = %config.describe(),
        max_connections = config.max_connections,
        "connecting to database"
    );
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await?;
    tracing::info!("connected to the database");
    Ok(pool)
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    query_timeout: Option<Duration>,
}

impl PgStore {
    pub fn new(pool: PgPool, query_timeout: Option<Duration>) -> Self {
        Self { pool, query_timeout }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        match self.query_timeout {
            Some(limit) => Ok(tokio::time::timeout(limit, fut).await??),
            None => Ok(fut.await?),
        }
    }
}

#[async_trait]
impl MachineStatusStore for PgStore {
    async fn list_all(&self) -> Result<Vec<Value>, AppError> {
        tracing::debug!(sql = SELECT_ALL_SQL, "query");
        let rows: Vec<(Value,)> = self
            .bounded(sqlx::query_as(SELECT_ALL_SQL).fetch_all(&self.pool))
            .await?;
        Ok(rows.into_iter().map(|(row,)| row).collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        tracing::debug!(sql = COUNT_SQL, "query");
        let (count,): (i64,) = self
            .bounded(sqlx::query_as(COUNT_SQL).fetch_one(&self.pool))
            .await?;
        Ok(count)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.bounded(sqlx::query("SELECT 1").fetch_optional(&self.pool))
            .await
            .map(|_| ())
    }
}

use std::time::{Duration, Instant};

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgRow};
use sqlx::PgPool;
use tracing::{debug, info};

use crate::infrastructure::config::DatabaseConfig;

const MAX_CONNECTIONS: u32 = 20;
const IDLE_TIMEOUT: Duration = Duration::from_secs(30);
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(2);

/// How much of a statement makes it into the query log.
const LOGGED_SQL_LEN: usize = 50;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Builds the connection pool without touching the network. Connections
    /// are opened on first use; `check_connection` forces one at startup.
    pub fn connect(config: &DatabaseConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.name)
            .username(&config.user)
            .password(&config.password);

        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .idle_timeout(IDLE_TIMEOUT)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_lazy_with(options);

        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Startup gate: ask the server for its version. The process must not
    /// start listening until this succeeds.
    pub async fn check_connection(&self) -> Result<(), sqlx::Error> {
        let version: String = sqlx::query_scalar("SELECT version()")
            .fetch_one(&self.pool)
            .await?;
        info!(version = %version, "PostgreSQL connected");
        Ok(())
    }

    /// Lightweight probe for readiness checks.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Generic passthrough with timing. Params bind positionally to `$1`,
    /// `$2`, ... in the statement. Errors come back from sqlx unmodified.
    pub async fn query(&self, sql: &str, params: &[&str]) -> Result<Vec<PgRow>, sqlx::Error> {
        let start = Instant::now();
        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(param.to_string());
        }
        let rows = query.fetch_all(&self.pool).await?;
        debug!(
            sql = %truncate_sql(sql),
            duration_ms = %start.elapsed().as_millis(),
            rows = rows.len(),
            "Executed query"
        );
        Ok(rows)
    }
}

fn truncate_sql(sql: &str) -> &str {
    match sql.char_indices().nth(LOGGED_SQL_LEN) {
        Some((index, _)) => &sql[..index],
        None => sql,
    }
}

use crate::datalayer::db_ops::connection_pool::ConnectionPool;
use crate::datalayer::db_ops::constants::DbConfig;
use crate::datalayer::db_ops::db_health::{DatabaseHealth, check_database_health};
use crate::datalayer::db_ops::executor::QueryExecutor;
use crate::datalayer::db_ops::schema::ensure_schema;
use tracing::info;

/// Pool statistics snapshot
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct PoolStats {
    pub size: u32,
    pub idle: usize,
}

/// Owns the pool and the executor built on top of it
#[derive(Clone)]
pub struct DbOps {
    pool: ConnectionPool,
    executor: QueryExecutor,
}

impl DbOps {
    pub fn new(pool: ConnectionPool) -> Self {
        let executor = QueryExecutor::new(pool.clone());
        Self { pool, executor }
    }

    pub fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: self.pool.idle_count(),
        }
    }

    pub async fn health(&self) -> Result<DatabaseHealth, sqlx::Error> {
        check_database_health(self.pool.pool()).await
    }

    /// Graceful shutdown - closes all connections in the pool
    pub async fn shutdown(&self) {
        self.pool.close().await;
    }
}

/// Initialize database connection at application startup
///
/// Builds the pool, pings it, and when `bootstrap_schema` is set creates any missing tables.
pub async fn initialize_database(
    config: &DbConfig,
    bootstrap_schema: bool,
) -> Result<DbOps, sqlx::Error> {
    info!("=== Database Initialization Started ===");

    let pool = ConnectionPool::new(config).await?;
    let health = check_database_health(pool.pool()).await?;
    info!(
        latency_ms = health.latency_ms,
        pool_size = health.pool_size,
        idle = health.idle_connections,
        "Database connection test successful"
    );

    if bootstrap_schema {
        ensure_schema(pool.pool()).await?;
    }

    info!("=== Database Initialization Completed ===");

    Ok(DbOps::new(pool))
}

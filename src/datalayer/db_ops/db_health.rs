use crate::datalayer::db_ops::constants::REQUIRED_TABLES;
use sqlx::PgPool;
use tracing::{error, info};

/// Database health status
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DatabaseHealth {
    pub is_healthy: bool,
    pub latency_ms: u64,
    pub pool_size: u32,
    pub idle_connections: usize,
}

/// Table verification result
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TableVerification {
    pub table_name: String,
    pub exists: bool,
}

/// Verifies database connectivity and returns pool metrics
pub async fn check_database_health(pool: &PgPool) -> Result<DatabaseHealth, sqlx::Error> {
    let start = std::time::Instant::now();

    sqlx::query("SELECT 1").execute(pool).await.map_err(|e| {
        error!("Database health check failed: {}", e);
        e
    })?;

    let latency = start.elapsed();

    Ok(DatabaseHealth {
        is_healthy: true,
        latency_ms: latency.as_millis() as u64,
        pool_size: pool.size(),
        idle_connections: pool.num_idle(),
    })
}

/// Check if a specific table exists in the public schema
pub async fn check_table_exists(pool: &PgPool, table_name: &str) -> Result<bool, sqlx::Error> {
    let result: (bool,) = sqlx::query_as(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = 'public'
            AND table_name = $1
        )",
    )
    .bind(table_name)
    .fetch_one(pool)
    .await?;

    Ok(result.0)
}

/// Verify every table the registry needs
pub async fn verify_all_tables(pool: &PgPool) -> Result<Vec<TableVerification>, sqlx::Error> {
    let mut results = Vec::with_capacity(REQUIRED_TABLES.len());

    for table_name in REQUIRED_TABLES {
        let exists = check_table_exists(pool, table_name).await?;
        if exists {
            info!(table = %table_name, "Table present");
        } else {
            error!(table = %table_name, "Table does not exist");
        }
        results.push(TableVerification {
            table_name: table_name.to_string(),
            exists,
        });
    }

    Ok(results)
}

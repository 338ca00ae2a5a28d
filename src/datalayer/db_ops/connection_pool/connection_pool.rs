use crate::datalayer::db_ops::constants::DbConfig;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{error, info};

/*
The ConnectionPool wraps sqlx's PgPool. Connections are checked out per statement by sqlx
and returned on drop, so the pool is the only shared state between requests.
*/

/// Connection pool wrapper for PostgreSQL database
#[derive(Clone)]
pub struct ConnectionPool {
    pool: PgPool,
}

impl ConnectionPool {
    /// Creates a new connection pool from the given configuration
    pub async fn new(config: &DbConfig) -> Result<Self, sqlx::Error> {
        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Creating connection pool"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connection_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect(&config.database_url)
            .await
            .map_err(|e| {
                error!("Failed to create connection pool: {}", e);
                e
            })?;

        info!("Connection pool created successfully");

        Ok(Self { pool })
    }

    /// Closes the connection pool and all its connections
    pub async fn close(&self) {
        info!("Closing connection pool...");
        self.pool.close().await;
        info!("Connection pool closed successfully");
    }

    /// Gets a reference to the underlying PgPool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Returns the current size of the pool (total connections)
    pub fn size(&self) -> u32 {
        self.pool.size()
    }

    /// Returns the number of idle connections in the pool
    pub fn idle_count(&self) -> usize {
        self.pool.num_idle()
    }
}

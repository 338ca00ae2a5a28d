use crate::datalayer::db_ops::connection_pool::ConnectionPool;
use crate::errors::dberrors::DbError;
use sqlx::postgres::PgRow;
use tracing::{debug, instrument};

/// A positional statement argument. Values are always bound, never spliced into SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlArg {
    Int(i64),
    Text(String),
}

impl From<i64> for SqlArg {
    fn from(value: i64) -> Self {
        SqlArg::Int(value)
    }
}

impl From<&str> for SqlArg {
    fn from(value: &str) -> Self {
        SqlArg::Text(value.to_string())
    }
}

impl From<String> for SqlArg {
    fn from(value: String) -> Self {
        SqlArg::Text(value)
    }
}

/// Result of a mutating statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationOutcome {
    pub generated_id: Option<i64>,
    pub rows_affected: u64,
}

/// Issues parameterized statements against the pool.
///
/// Each call runs exactly one statement on whichever pooled connection sqlx hands out;
/// nothing here opens a transaction or retries.
#[derive(Clone)]
pub struct QueryExecutor {
    pool: ConnectionPool,
}

impl QueryExecutor {
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    /// Runs a SELECT and maps every row
    #[instrument(skip(self, args), fields(args = args.len()))]
    pub async fn fetch_all<T>(&self, sql: &str, args: &[SqlArg]) -> Result<Vec<T>, DbError>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        debug!(sql = %sql, args = ?args, "query");
        let mut query = sqlx::query_as::<_, T>(sql);
        for arg in args {
            query = match arg {
                SqlArg::Int(n) => query.bind(*n),
                SqlArg::Text(s) => query.bind(s.as_str()),
            };
        }
        Ok(query.fetch_all(self.pool.pool()).await?)
    }

    /// Runs a SELECT expected to match at most one row
    #[instrument(skip(self, args), fields(args = args.len()))]
    pub async fn fetch_optional<T>(&self, sql: &str, args: &[SqlArg]) -> Result<Option<T>, DbError>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        debug!(sql = %sql, args = ?args, "query");
        let mut query = sqlx::query_as::<_, T>(sql);
        for arg in args {
            query = match arg {
                SqlArg::Int(n) => query.bind(*n),
                SqlArg::Text(s) => query.bind(s.as_str()),
            };
        }
        Ok(query.fetch_optional(self.pool.pool()).await?)
    }

    /// Runs an UPDATE or DELETE and reports how many rows it touched
    #[instrument(skip(self, args), fields(args = args.len()))]
    pub async fn execute(&self, sql: &str, args: &[SqlArg]) -> Result<MutationOutcome, DbError> {
        debug!(sql = %sql, args = ?args, "execute");
        let mut query = sqlx::query(sql);
        for arg in args {
            query = match arg {
                SqlArg::Int(n) => query.bind(*n),
                SqlArg::Text(s) => query.bind(s.as_str()),
            };
        }
        let result = query.execute(self.pool.pool()).await?;
        Ok(MutationOutcome {
            generated_id: None,
            rows_affected: result.rows_affected(),
        })
    }

    /// Runs an INSERT ending in `RETURNING id` and reports the generated key
    #[instrument(skip(self, args), fields(args = args.len()))]
    pub async fn insert_returning_id(
        &self,
        sql: &str,
        args: &[SqlArg],
    ) -> Result<MutationOutcome, DbError> {
        debug!(sql = %sql, args = ?args, "insert");
        let mut query = sqlx::query_scalar::<_, i64>(sql);
        for arg in args {
            query = match arg {
                SqlArg::Int(n) => query.bind(*n),
                SqlArg::Text(s) => query.bind(s.as_str()),
            };
        }
        let id = query.fetch_one(self.pool.pool()).await?;
        Ok(MutationOutcome {
            generated_id: Some(id),
            rows_affected: 1,
        })
    }
}

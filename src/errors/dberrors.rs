use std::fmt;

/// Errors raised at the storage seam
#[derive(Debug)]
pub enum DbError {
    /// Pool exhausted, closed, or the server could not be reached
    ConnectionError(String),
    /// A statement violated a foreign key; carries the constraint name when the driver reports it
    ForeignKeyViolation(Option<String>),
    /// Any other failure reported by the database while running a statement
    QueryError(String),
    /// A mutation touched a different number of rows than the caller required
    UnexpectedRowCount { expected: u64, actual: u64 },
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbError::ConnectionError(msg) => write!(f, "Database connection error: {}", msg),
            DbError::ForeignKeyViolation(Some(constraint)) => {
                write!(f, "Foreign key violation on {}", constraint)
            }
            DbError::ForeignKeyViolation(None) => write!(f, "Foreign key violation"),
            DbError::QueryError(msg) => write!(f, "Database query error: {}", msg),
            DbError::UnexpectedRowCount { expected, actual } => write!(
                f,
                "Expected {} affected row(s) but the database reported {}",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for DbError {}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DbError::ConnectionError(err.to_string())
            }
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                DbError::ForeignKeyViolation(db_err.constraint().map(str::to_string))
            }
            _ => DbError::QueryError(err.to_string()),
        }
    }
}

pub mod connection_pool;
pub mod constants;
pub mod db_health;
pub mod db_ops;
pub mod executor;
pub mod schema;

pub use crate::datalayer::db_ops::constants::DbConfig;
pub use db_health::{DatabaseHealth, TableVerification, check_database_health, verify_all_tables};
pub use db_ops::{DbOps, PoolStats, initialize_database};
pub use executor::{MutationOutcome, QueryExecutor, SqlArg};

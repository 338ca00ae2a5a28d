#[allow(non_snake_case)]
pub mod constants;
pub mod types;
pub use constants::{DBTables, REQUIRED_TABLES, URL};
pub use types::DbConfig;

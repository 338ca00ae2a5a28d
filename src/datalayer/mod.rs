#[allow(non_snake_case)]
pub mod CRUD;
pub mod db_ops;

pub use db_ops::{DatabaseHealth, DbConfig, DbOps, initialize_database};

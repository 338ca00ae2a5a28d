pub mod health;

pub use health::{DatabaseStatus, HealthResponse, health_report};

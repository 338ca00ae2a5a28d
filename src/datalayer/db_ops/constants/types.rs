use serde::Deserialize;
use std::time::Duration;

/// Database configuration structure
///
/// Durations are read from settings files as whole seconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    #[serde(alias = "url")]
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    #[serde(with = "seconds")]
    pub connection_timeout: Duration,
    #[serde(with = "seconds")]
    pub idle_timeout: Duration,
    #[serde(with = "seconds")]
    pub max_lifetime: Duration,
}

mod seconds {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::datalayer::DbConfig;

pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Service settings, resolved once at startup
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub port: u16,
    pub public_dir: PathBuf,
    /// Create missing tables on startup
    pub bootstrap_schema: bool,
    pub database: DbConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 3000,
            public_dir: PathBuf::from("public"),
            bootstrap_schema: true,
            database: DbConfig::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadFile { path: PathBuf, reason: String },
    ParseFile { path: PathBuf, reason: String },
    InvalidEnv { name: &'static str, value: String },
    Inconsistent(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ReadFile { path, reason } => {
                write!(f, "Cannot read settings file {}: {}", path.display(), reason)
            }
            ConfigError::ParseFile { path, reason } => {
                write!(f, "Invalid settings file {}: {}", path.display(), reason)
            }
            ConfigError::InvalidEnv { name, value } => {
                write!(f, "Invalid value for {}: '{}'", name, value)
            }
            ConfigError::Inconsistent(msg) => write!(f, "Inconsistent settings: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

fn parse_env<T: std::str::FromStr>(name: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { name, value: raw })
}

fn parse_bool(name: &'static str, raw: String) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv { name, value: raw }),
    }
}

impl Settings {
    /// Defaults, then the settings file, then the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var("SETTINGS_PATH").ok().map(PathBuf::from);
        let path = explicit.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));

        // A named file must exist; the default one is optional
        let file = if explicit.is_some() || path.exists() {
            Some(path.as_path())
        } else {
            None
        };

        Self::load_from(file, |name| std::env::var(name).ok())
    }

    pub fn load_from(
        file: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let settings = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        let settings = settings.apply_env(env)?;
        if !settings.database.is_consistent() {
            return Err(ConfigError::Inconsistent(format!(
                "min_connections ({}) must not exceed max_connections ({}), which must be positive",
                settings.database.min_connections, settings.database.max_connections
            )));
        }

        Ok(settings)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn apply_env(mut self, env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(raw) = env("PORT") {
            self.port = parse_env("PORT", raw)?;
        }
        if let Some(raw) = env("PUBLIC_DIR") {
            self.public_dir = PathBuf::from(raw);
        }
        if let Some(raw) = env("BOOTSTRAP_SCHEMA") {
            self.bootstrap_schema = parse_bool("BOOTSTRAP_SCHEMA", raw)?;
        }
        if let Some(raw) = env("DATABASE_URL") {
            self.database = self.database.set_database_url(raw);
        }
        if let Some(raw) = env("DB_MAX_CONNECTIONS") {
            self.database = self
                .database
                .set_max_connections(parse_env("DB_MAX_CONNECTIONS", raw)?);
        }
        if let Some(raw) = env("DB_MIN_CONNECTIONS") {
            self.database = self
                .database
                .set_min_connections(parse_env("DB_MIN_CONNECTIONS", raw)?);
        }
        Ok(self)
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn temp_settings(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "people-pets-{}-{}.json",
            name,
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let settings = Settings::load_from(None, env_of(&[])).unwrap();
        assert_eq!(settings.port, 3000);
        assert_eq!(settings.public_dir, PathBuf::from("public"));
        assert!(settings.bootstrap_schema);
    }

    #[test]
    fn test_env_overrides_file() {
        let path = temp_settings(
            "override",
            r#"{ "port": 8080, "database": { "url": "postgres://file/db", "idle_timeout": 60 } }"#,
        );
        let settings = Settings::load_from(
            Some(&path),
            env_of(&[("PORT", "9090"), ("BOOTSTRAP_SCHEMA", "off")]),
        )
        .unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.port, 9090);
        assert!(!settings.bootstrap_schema);
        assert_eq!(settings.database.database_url, "postgres://file/db");
        assert_eq!(settings.database.idle_timeout, Duration::from_secs(60));
        assert_eq!(settings.database.max_connections, 10);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = Settings::load_from(None, env_of(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { name: "PORT", .. }));
    }

    #[test]
    fn test_malformed_file_is_rejected() {
        let path = temp_settings("malformed", "{ port: ");
        let err = Settings::load_from(Some(&path), env_of(&[])).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, ConfigError::ParseFile { .. }));
    }

    #[test]
    fn test_pool_bounds_must_be_consistent() {
        let err = Settings::load_from(
            None,
            env_of(&[("DB_MAX_CONNECTIONS", "2"), ("DB_MIN_CONNECTIONS", "5")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Inconsistent(_)));
    }
}

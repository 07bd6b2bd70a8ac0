//! # smh-config
//!
//! Environment-driven settings for the server binary. Values come from, in
//! increasing priority: built-in defaults, a `.env` file in the working
//! directory, and the process environment (`DATABASE_URL`, `HOST`, `PORT`,
//! `APP_ENV`, `STATIC_DIR`, `CORS_ORIGIN`).

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use config::{Config, Environment};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read .env file: {0}")]
    DotEnv(#[from] dotenvy::Error),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] config::ConfigError),
}

/// Selects static-file serving, CORS policy, log verbosity and how much
/// error detail reaches clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Development,
    Production,
}

impl RunMode {
    pub fn is_development(self) -> bool {
        self == Self::Development
    }

    /// `env_logger` filter used when `RUST_LOG` is unset.
    pub fn default_log_filter(self) -> &'static str {
        match self {
            Self::Development => "debug",
            Self::Production => "info",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Development => "development",
            Self::Production => "production",
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Storage connection string. May embed credentials.
    pub database_url: SecretString,
    pub host: String,
    pub port: u16,
    #[serde(rename = "app_env")]
    pub mode: RunMode,
    /// Built SPA bundle, served in production only.
    pub static_dir: PathBuf,
    cors_origin: Option<String>,
}

impl Settings {
    /// Loads `.env` (if present) and then reads the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(e.into());
            }
        }
        Self::from_env(Environment::default())
    }

    /// Same as [`Settings::load`] but reading `vars` instead of the process
    /// environment, and ignoring `.env`.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_env(Environment::default().source(Some(vars)))
    }

    fn from_env(env: Environment) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("database_url", "sqlite:study_hub.db")?
            .set_default("host", "127.0.0.1")?
            .set_default("port", 3001)?
            .set_default("app_env", "development")?
            .set_default("static_dir", "dist")?
            .add_source(env)
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Browser origin allowed to call the API in production.
    pub fn cors_origin(&self) -> Option<&str> {
        self.cors_origin.as_deref().filter(|o| !o.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_vars(HashMap::new()).unwrap();
        assert_eq!(settings.port, 3001);
        assert_eq!(settings.mode, RunMode::Development);
        assert_eq!(settings.database_url.expose_secret(), "sqlite:study_hub.db");
        assert_eq!(settings.static_dir, PathBuf::from("dist"));
        assert_eq!(settings.cors_origin(), None);
    }

    #[test]
    fn test_environment_overrides() {
        let settings = Settings::from_vars(vars(&[
            ("PORT", "8080"),
            ("APP_ENV", "production"),
            ("DATABASE_URL", "sqlite:/var/lib/hub.db"),
            ("CORS_ORIGIN", "https://hub.example.edu"),
        ]))
        .unwrap();

        assert_eq!(settings.port, 8080);
        assert_eq!(settings.mode, RunMode::Production);
        assert_eq!(settings.mode.default_log_filter(), "info");
        assert_eq!(settings.cors_origin(), Some("https://hub.example.edu"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Settings::from_vars(vars(&[("PORT", "eighty")])).is_err());
        assert!(Settings::from_vars(vars(&[("APP_ENV", "staging")])).is_err());
    }

    #[test]
    fn test_secret_is_redacted_in_debug() {
        let settings = Settings::from_vars(vars(&[("DATABASE_URL", "sqlite:secret-path.db")])).unwrap();
        assert!(!format!("{settings:?}").contains("secret-path"));
    }
}

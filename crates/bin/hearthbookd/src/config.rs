//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `hearthbook.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use hearthbook_domain::warranty::{self, DEFAULT_EXPIRING_SOON_DAYS};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Warranty reporting settings.
    pub warranty: WarrantyConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Warranty configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WarrantyConfig {
    /// Days before expiry at which a unit counts as "expiring soon".
    pub expiring_soon_days: u32,
}

impl Config {
    /// Load configuration from `hearthbook.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("hearthbook.toml")?;
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    /// Apply overrides looked up by variable name. `RUST_LOG` wins over
    /// `HEARTHBOOK_LOG`.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("HEARTHBOOK_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("HEARTHBOOK_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("HEARTHBOOK_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("HEARTHBOOK_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("HEARTHBOOK_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        warranty::validate_window(self.warranty.expiring_soon_days)
            .map_err(|err| ConfigError::Validation(err.to_string()))?;
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:hearthbook.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "hearthbookd=info,hearthbook=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for WarrantyConfig {
    fn default() -> Self {
        Self {
            expiring_soon_days: DEFAULT_EXPIRING_SOON_DAYS,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.url, "sqlite:hearthbook.db?mode=rwc");
        assert_eq!(config.warranty.expiring_soon_days, 30);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [database]
            url = 'sqlite:test.db'

            [logging]
            filter = 'debug'

            [warranty]
            expiring_soon_days = 45
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url, "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.warranty.expiring_soon_days, 45);
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [server]
            port = 8080
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.warranty.expiring_soon_days, 30);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_apply_environment_overrides() {
        let mut config = Config::default();
        config.apply_overrides(env(&[
            ("HEARTHBOOK_HOST", "10.0.0.1"),
            ("HEARTHBOOK_PORT", "8081"),
            ("HEARTHBOOK_DATABASE_URL", "sqlite::memory:"),
            ("HEARTHBOOK_LOG", "warn"),
        ]));
        assert_eq!(config.bind_addr(), "10.0.0.1:8081");
        assert_eq!(config.database_url(), "sqlite::memory:");
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn should_let_bind_override_host_and_port() {
        let mut config = Config::default();
        config.apply_overrides(env(&[
            ("HEARTHBOOK_HOST", "10.0.0.1"),
            ("HEARTHBOOK_BIND", "127.0.0.1:4000"),
        ]));
        assert_eq!(config.bind_addr(), "127.0.0.1:4000");
    }

    #[test]
    fn should_prefer_rust_log_over_hearthbook_log() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("HEARTHBOOK_LOG", "warn"), ("RUST_LOG", "trace")]));
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_ignore_unparsable_port() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("HEARTHBOOK_PORT", "eighty")]));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_warranty_window_out_of_range() {
        let mut config = Config::default();
        config.warranty.expiring_soon_days = 0;
        assert!(config.validate().is_err());
        config.warranty.expiring_soon_days = 366;
        assert!(config.validate().is_err());
        config.warranty.expiring_soon_days = 365;
        assert!(config.validate().is_ok());
    }
}

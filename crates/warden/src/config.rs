//! Configuration loading and management

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use warden_auth::HashParams;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub password: HashParams,
    #[serde(default)]
    pub cookie: CookieConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Authentication configuration
///
/// There is deliberately no default secret: one must come from the file,
/// `--jwt-secret` or `WARDEN_JWT_SECRET`.
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .finish()
    }
}

/// Session cookie configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CookieConfig {
    /// Mark the cookie `Secure`; enable when served over HTTPS
    #[serde(default)]
    pub secure: bool,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CorsConfig {
    /// Frontend origin allowed to make credentialed requests
    #[serde(default)]
    pub allowed_origin: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_db_path() -> String {
    "./data/warden.db".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &str) -> Result<Self> {
        let config_path = Path::new(path);

        if !config_path.exists() {
            info!("Config file not found at {}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        info!("Loaded configuration from {}", path);
        Ok(config)
    }

    /// Reject configurations the server cannot safely start with
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            bail!("auth.jwt_secret is not set (use the config file or WARDEN_JWT_SECRET)");
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            bail!(
                "logging.format must be \"pretty\" or \"json\", got \"{}\"",
                self.logging.format
            );
        }
        if let Some(origin) = &self.cors.allowed_origin
            && origin.trim() == "*"
        {
            bail!("cors.allowed_origin cannot be \"*\" because session cookies are credentialed");
        }
        Ok(())
    }

    /// SQLx connection URL for the configured database file
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.database.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load("/nonexistent/warden.toml").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.password, HashParams::default());
        assert!(config.auth.jwt_secret.is_empty());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_file() {
        let file = write_config(
            r#"
            [server]
            port = 9000

            [auth]
            jwt_secret = "file-secret"

            [password]
            memory_kib = 65536
            iterations = 3
            parallelism = 2

            [cors]
            allowed_origin = "http://localhost:3000"
            "#,
        );

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.auth.jwt_secret, "file-secret");
        assert_eq!(config.password.memory_kib, 65536);
        assert_eq!(config.password.iterations, 3);
        assert_eq!(
            config.cors.allowed_origin.as_deref(),
            Some("http://localhost:3000")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let file = write_config("[server\nport = ");
        assert!(Config::load(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_validate_rejects_wildcard_origin() {
        let mut config = Config::default();
        config.auth.jwt_secret = "secret".to_string();
        config.cors.allowed_origin = Some("*".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_secret_is_redacted() {
        let mut config = Config::default();
        config.auth.jwt_secret = "super-secret".to_string();
        assert!(!format!("{:?}", config).contains("super-secret"));
    }
}

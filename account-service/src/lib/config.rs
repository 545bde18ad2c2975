use std::env;
use std::fmt;

use chrono::Duration;
use config::builder::DefaultState;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL. Accounts are kept in memory when absent.
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
}

impl JwtConfig {
    /// Token lifetime as a duration.
    ///
    /// # Errors
    /// * `Message` - `expiration_hours` does not fit a duration
    pub fn token_lifetime(&self) -> Result<Duration, ConfigError> {
        Duration::try_hours(self.expiration_hours).ok_or_else(|| {
            ConfigError::Message(format!(
                "jwt.expiration_hours out of range: {}",
                self.expiration_hours
            ))
        })
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

/// Argon2id cost parameters for new password hashes.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults
    ///
    /// `jwt.secret` has no default and must be provided.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = Self::with_defaults(ConfigBuilder::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        configuration.try_deserialize()
    }

    fn with_defaults(
        builder: config::ConfigBuilder<DefaultState>,
    ) -> Result<config::ConfigBuilder<DefaultState>, ConfigError> {
        builder
            .set_default("server.http_port", 8080)?
            .set_default("database.max_connections", 5)?
            .set_default("jwt.expiration_hours", 24)?
            .set_default("password.memory_kib", 19 * 1024)?
            .set_default("password.iterations", 2)?
            .set_default("password.parallelism", 1)
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(toml: &str) -> Result<Config, ConfigError> {
        Config::with_defaults(ConfigBuilder::builder())?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_defaults_are_applied() {
        let config = from_toml(
            r#"
            [jwt]
            secret = "0123456789abcdef0123456789abcdef"
            "#,
        )
        .expect("config should load");

        assert_eq!(config.server.http_port, 8080);
        assert_eq!(config.database.url, None);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.jwt.expiration_hours, 24);
        assert_eq!(config.password.memory_kib, 19 * 1024);
    }

    #[test]
    fn test_secret_is_required() {
        assert!(from_toml("").is_err());
    }

    #[test]
    fn test_secret_is_redacted_in_debug_output() {
        let config = from_toml(
            r#"
            [jwt]
            secret = "super-secret-signing-key-0123456789"
            "#,
        )
        .unwrap();

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret-signing-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_token_lifetime() {
        let config = from_toml(
            r#"
            [jwt]
            secret = "0123456789abcdef0123456789abcdef"
            expiration_hours = 12
            "#,
        )
        .unwrap();
        assert_eq!(config.jwt.token_lifetime().unwrap(), Duration::hours(12));

        let config = from_toml(&format!(
            r#"
            [jwt]
            secret = "0123456789abcdef0123456789abcdef"
            expiration_hours = {}
            "#,
            i64::MAX
        ))
        .unwrap();
        assert!(matches!(
            config.jwt.token_lifetime(),
            Err(ConfigError::Message(_))
        ));
    }
}

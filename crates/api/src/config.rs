use std::env;

use axum::http::HeaderValue;

/// Database connection settings, shared by the server and `atlas-admin`.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Connection string (`DATABASE_URL`). Required.
    pub url: String,
    /// Database name (`DATABASE_NAME`). Required; overrides any name in the URL.
    pub name: String,
    /// Pool size (`DB_MAX_CONNECTIONS`, default `20`).
    pub max_connections: u32,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl DatabaseConfig {
    /// Load database settings from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: required_var("DATABASE_URL")?,
            name: required_var("DATABASE_NAME")?,
            max_connections: parse_env_or_default("DB_MAX_CONNECTIONS", 20)?,
        })
    }
}

/// Server configuration loaded from environment variables.
///
/// Optional settings have defaults suitable for local development. The three
/// required settings have none: the process refuses to start without them.
#[derive(Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub database: DatabaseConfig,
    /// HMAC key for session token digests (`SESSION_PEPPER`). Never persisted.
    pub session_pepper: String,
    /// Whether the session cookie carries `Secure`.
    pub secure_cookies: bool,
    /// Take the client IP from `X-Forwarded-For` instead of the socket.
    pub trust_proxy: bool,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cors_origins", &self.cors_origins)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("database", &self.database)
            .field("session_pepper", &"[REDACTED]")
            .field("secure_cookies", &self.secure_cookies)
            .field("trust_proxy", &self.trust_proxy)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to parse {0}: {1}")]
    ParseError(String, String),
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `DATABASE_URL`         | **required**               |
    /// | `DATABASE_NAME`        | **required**               |
    /// | `SESSION_PEPPER`       | **required**               |
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `APP_ENV`              | `development`              |
    /// | `COOKIE_SECURE`        | `true` iff `APP_ENV=production` |
    /// | `TRUST_PROXY`          | `false`                    |
    /// | `DB_MAX_CONNECTIONS`   | `20`                       |
    pub fn from_env() -> Result<Self, ConfigError> {
        let database = DatabaseConfig::from_env()?;
        let session_pepper = required_var("SESSION_PEPPER")?;

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = parse_env_or_default("PORT", 3000u16)?;

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in &cors_origins {
            HeaderValue::from_str(origin).map_err(|e| {
                ConfigError::InvalidValue("CORS_ORIGINS".into(), format!("{origin}: {e}"))
            })?;
        }

        let request_timeout_secs = parse_env_or_default("REQUEST_TIMEOUT_SECS", 30u64)?;

        let production = env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);
        let secure_cookies = parse_env_or_default("COOKIE_SECURE", production)?;
        let trust_proxy = parse_env_or_default("TRUST_PROXY", false)?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database,
            session_pepper,
            secure_cookies,
            trust_proxy,
        })
    }
}

/// Read a variable that must be present and non-blank.
fn required_var(key: &str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => Err(ConfigError::MissingVar(key.to_string())),
    }
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(key.to_string(), format!("{e}: {val}"))),
        Err(_) => Ok(default),
    }
}

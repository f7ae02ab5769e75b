/// Configuration management for the API server
///
/// Configuration comes from environment variables. A `.env` file in the
/// working directory is loaded first if present.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 5000)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: *)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: Secret key for token signing, at least 32 characters (required)
/// - `JWT_TTL_HOURS`: Token lifetime in hours, at most one year (default: 24)
/// - `LOG_FORMAT`: `pretty` or `json` (default: pretty)
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use dailytask_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use std::{env, fmt, str::FromStr};

use anyhow::Context;
use axum::http::HeaderValue;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub log_format: LogFormat,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<HeaderValue>,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Token signing configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for HS256 signing, at least 32 characters
    ///
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Token lifetime in hours, between 1 and [`MAX_TTL_HOURS`]
    pub ttl_hours: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("ttl_hours", &self.ttl_hours)
            .finish()
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("LOG_FORMAT must be 'pretty' or 'json', got '{}'", other),
        }
    }
}

/// Minimum accepted length of `JWT_SECRET`
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted `JWT_TTL_HOURS`
pub const MAX_TTL_HOURS: i64 = 24 * 365;

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value does
    /// not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = or_default("API_PORT", "5000")
            .parse::<u16>()
            .context("API_PORT must be a valid port number")?;

        let cors_origins = or_default("CORS_ORIGINS", "*")
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("CORS_ORIGINS entry '{}' is not a valid origin", origin))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let url = lookup("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let max_connections = or_default("DATABASE_MAX_CONNECTIONS", "10")
            .parse::<u32>()
            .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?;

        let secret = lookup("JWT_SECRET").context("JWT_SECRET environment variable is required")?;
        if secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("JWT_SECRET must be at least {} characters long", MIN_SECRET_LEN);
        }

        let ttl_hours = or_default("JWT_TTL_HOURS", "24")
            .parse::<i64>()
            .context("JWT_TTL_HOURS must be an integer")?;
        if !(1..=MAX_TTL_HOURS).contains(&ttl_hours) {
            anyhow::bail!("JWT_TTL_HOURS must be between 1 and {}", MAX_TTL_HOURS);
        }

        let log_format = or_default("LOG_FORMAT", "pretty").parse()?;

        Ok(Self {
            api: ApiConfig {
                host: or_default("API_HOST", "0.0.0.0"),
                port,
                cors_origins,
            },
            database: DatabaseConfig {
                url,
                max_connections,
            },
            jwt: JwtConfig { secret, ttl_hours },
            log_format,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "postgresql://localhost/test"), ("JWT_SECRET", SECRET)])
            .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.api.cors_origins, vec!["*"]);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.jwt.ttl_hours, 24);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("JWT_SECRET", SECRET),
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "8080"),
            ("CORS_ORIGINS", "http://a.test, http://b.test"),
            ("JWT_TTL_HOURS", "1"),
            ("LOG_FORMAT", "JSON"),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.api.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.jwt.ttl_hours, 1);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_required_variables() {
        assert!(load(&[("JWT_SECRET", SECRET)]).is_err());
        assert!(load(&[("DATABASE_URL", "postgresql://localhost/test")]).is_err());
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = load(&[("DATABASE_URL", "postgresql://localhost/test"), ("JWT_SECRET", "short")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let base = [("DATABASE_URL", "postgresql://localhost/test"), ("JWT_SECRET", SECRET)];

        assert!(load(&[base[0], base[1], ("API_PORT", "eighty")]).is_err());
        assert!(load(&[base[0], base[1], ("JWT_TTL_HOURS", "0")]).is_err());
        assert!(load(&[base[0], base[1], ("CORS_ORIGINS", "http://a.test,bad\u{7f}origin")]).is_err());
        assert!(load(&[base[0], base[1], ("LOG_FORMAT", "xml")]).is_err());
    }

    #[test]
    fn test_ttl_upper_bound() {
        let base = [("DATABASE_URL", "postgresql://localhost/test"), ("JWT_SECRET", SECRET)];

        let year = MAX_TTL_HOURS.to_string();
        assert_eq!(
            load(&[base[0], base[1], ("JWT_TTL_HOURS", year.as_str())]).unwrap().jwt.ttl_hours,
            MAX_TTL_HOURS
        );

        for huge in ["8761", "10000000000", "9000000000000000"] {
            assert!(
                load(&[base[0], base[1], ("JWT_TTL_HOURS", huge)]).is_err(),
                "JWT_TTL_HOURS={} should be rejected",
                huge
            );
        }
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = load(&[("DATABASE_URL", "postgresql://localhost/test"), ("JWT_SECRET", SECRET)])
            .unwrap();
        assert!(!format!("{:?}", config).contains(SECRET));
    }
}

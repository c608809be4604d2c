use innkeep_core::otp::{
    DEFAULT_MAX_VERIFY_ATTEMPTS, DEFAULT_OTP_TTL_MINS, DEFAULT_RATE_LIMIT, DEFAULT_RATE_WINDOW_MINS, DEFAULT_SESSION_TTL_MINS,
};

use crate::auth::jwt::JwtConfig;

/// Default age past expiry after which OTP and session rows are purged.
const DEFAULT_RETENTION_HOURS: i64 = 24;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long to wait for background tasks after the listener stops (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration for admin access tokens.
    pub jwt: JwtConfig,
    /// One-time code and guest session settings.
    pub guest_access: GuestAccessConfig,
    /// Hours past expiry before OTP and session rows are deleted (default: `24`).
    pub housekeeping_retention_hours: i64,
}

/// Lifetimes and rate limits for passwordless guest access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestAccessConfig {
    pub otp_ttl_mins: i64,
    pub session_ttl_mins: i64,
    /// Codes an email may request per window.
    pub rate_limit: i64,
    pub rate_window_mins: i64,
    /// Wrong guesses a single code survives.
    pub max_verify_attempts: i64,
}

impl Default for GuestAccessConfig {
    fn default() -> Self {
        Self {
            otp_ttl_mins: DEFAULT_OTP_TTL_MINS,
            session_ttl_mins: DEFAULT_SESSION_TTL_MINS,
            rate_limit: DEFAULT_RATE_LIMIT,
            rate_window_mins: DEFAULT_RATE_WINDOW_MINS,
            max_verify_attempts: DEFAULT_MAX_VERIFY_ATTEMPTS,
        }
    }
}

impl GuestAccessConfig {
    /// Load from environment variables, falling back to the defaults.
    ///
    /// | Env Var                | Default |
    /// |------------------------|---------|
    /// | `OTP_TTL_MINS`         | `10`    |
    /// | `SESSION_TTL_MINS`     | `10`    |
    /// | `OTP_RATE_LIMIT`       | `5`     |
    /// | `OTP_RATE_WINDOW_MINS` | `30`    |
    /// | `OTP_MAX_ATTEMPTS`     | `5`     |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            otp_ttl_mins: positive_env("OTP_TTL_MINS", defaults.otp_ttl_mins),
            session_ttl_mins: positive_env("SESSION_TTL_MINS", defaults.session_ttl_mins),
            rate_limit: positive_env("OTP_RATE_LIMIT", defaults.rate_limit),
            rate_window_mins: positive_env("OTP_RATE_WINDOW_MINS", defaults.rate_window_mins),
            max_verify_attempts: positive_env("OTP_MAX_ATTEMPTS", defaults.max_verify_attempts),
        }
    }
}

/// Read a positive integer env var, panicking on garbage so misconfiguration
/// fails at startup.
fn positive_env(name: &str, default: i64) -> i64 {
    match std::env::var(name) {
        Ok(raw) => {
            let value: i64 = raw
                .parse()
                .unwrap_or_else(|_| panic!("{name} must be a valid integer"));
            assert!(value > 0, "{name} must be positive");
            value
        }
        Err(_) => default,
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                    |
    /// |--------------------------------|----------------------------|
    /// | `HOST`                         | `0.0.0.0`                  |
    /// | `PORT`                         | `3000`                     |
    /// | `CORS_ORIGINS`                 | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`         | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`        | `30`                       |
    /// | `HOUSEKEEPING_RETENTION_HOURS` | `24`                       |
    ///
    /// See [`JwtConfig::from_env`] and [`GuestAccessConfig::from_env`] for
    /// the remaining variables.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            guest_access: GuestAccessConfig::from_env(),
            housekeeping_retention_hours: positive_env(
                "HOUSEKEEPING_RETENTION_HOURS",
                DEFAULT_RETENTION_HOURS,
            ),
        }
    }
}

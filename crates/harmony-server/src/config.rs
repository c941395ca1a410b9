use std::net::SocketAddr;

pub const DEFAULT_JWT_SECRET: &str = "dev-secret-change-me-in-production";
/// One year.
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;
const KNOWN_WEAK_SECRETS: &[&str] = &[DEFAULT_JWT_SECRET, "change-me-to-a-secure-random-string"];

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("HARMONY_BIND is not a socket address: {0}")]
    InvalidBind(String),

    #[error("refusing to start: JWT_SECRET must be set to a secure value in production")]
    InsecureJwtSecret,

    #[error("TOKEN_TTL_HOURS must be between 1 and {MAX_TOKEN_TTL_HOURS} hours: {0}")]
    InvalidTokenTtl(String),
}

/// Credentials for the superuser created at startup when absent.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub jwt_secret: String,
    pub production: bool,
    pub token_ttl_hours: i64,
    /// Allowed CORS origins. Empty means same-origin only.
    pub cors_origins: Vec<String>,
    pub rate_limit_enabled: bool,
    pub admin: Option<AdminBootstrap>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup("HARMONY_BIND").unwrap_or_else(|| "0.0.0.0:8080".to_string());
        let bind = bind_raw
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind_raw.clone()))?;

        let production = lookup("HARMONY_ENV").is_some_and(|v| v == "production");

        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string());
        if KNOWN_WEAK_SECRETS.contains(&jwt_secret.as_str()) {
            tracing::error!(
                "JWT_SECRET is set to a known default value! \
                 Set JWT_SECRET to a strong random string (at least 32 chars) in production."
            );
            if production {
                return Err(ConfigError::InsecureJwtSecret);
            }
        }

        let token_ttl_hours = match lookup("TOKEN_TTL_HOURS") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(hours) if (1..=MAX_TOKEN_TTL_HOURS).contains(&hours) => hours,
                _ => return Err(ConfigError::InvalidTokenTtl(raw)),
            },
            None => 10,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let rate_limit_enabled = lookup("RATE_LIMIT_ENABLED")
            .map(|v| !v.eq_ignore_ascii_case("false") && v != "0")
            .unwrap_or(true);

        let admin = match (lookup("ADMIN_EMAIL"), lookup("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Some(AdminBootstrap { email, password })
            }
            _ => None,
        };

        Ok(Self {
            bind,
            jwt_secret,
            production,
            token_ttl_hours,
            cors_origins,
            rate_limit_enabled,
            admin,
        })
    }
}

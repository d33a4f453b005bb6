use std::env;
use thiserror::Error;

/// Value of `DATABASE_URL` that selects the in-process store instead of Postgres.
pub const MEMORY_DATABASE: &str = "memory";

/// AppConfig
///
/// The application's entire configuration, loaded once at startup and shared
/// read-only with every handler through `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Postgres connection string, or `memory`.
    pub db_url: String,
    // S3-compatible storage endpoint (MinIO locally).
    pub s3_endpoint: String,
    pub s3_region: String,
    pub s3_key: String,
    pub s3_secret: String,
    // Bucket holding gallery and testimonial images.
    pub s3_bucket: String,
    // Base URL under which uploaded objects are publicly readable.
    pub s3_public_url: String,
    pub env: Env,
    // HS256 secret for signing session tokens.
    pub jwt_secret: String,
    pub jwt_expire_days: i64,
    pub port: u16,
    // Opt-in (`AUTH_HEADER_BYPASS=true`) `x-user-id` sign-in; honored in Local only.
    pub header_bypass: bool,
    // Seeded on startup when both are present and the account does not exist.
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

/// Env
///
/// Runtime context. Local enables development conveniences (the opt-in header
/// bypass, echoed reset tokens, in-memory database); Production requires every secret.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// ConfigError
///
/// A required variable is missing or unparsable for the selected environment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set in production")]
    Missing(&'static str),
    #[error("{name} has an invalid value `{value}`")]
    Invalid { name: &'static str, value: String },
}

const LOCAL_JWT_SECRET: &str = "trimurti-local-development-secret";

/// Accepted range for `JWT_EXPIRE_DAYS`.
pub const JWT_EXPIRE_DAYS_RANGE: std::ops::RangeInclusive<i64> = 1..=365;

impl Default for AppConfig {
    /// Safe values for tests and local scaffolding; no environment access.
    fn default() -> Self {
        Self {
            db_url: MEMORY_DATABASE.to_string(),
            s3_endpoint: "http://localhost:9000".to_string(),
            s3_region: "us-east-1".to_string(),
            s3_key: "admin".to_string(),
            s3_secret: "password".to_string(),
            s3_bucket: "trimurti-test".to_string(),
            s3_public_url: "http://localhost:9000/trimurti-test".to_string(),
            env: Env::Local,
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            jwt_expire_days: 30,
            port: 5000,
            header_bypass: false,
            admin_email: None,
            admin_password: None,
        }
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parsed<T: std::str::FromStr>(name: &'static str, fallback: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(fallback),
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads every setting from the environment (call `dotenv` first).
    ///
    /// Local mode falls back to development defaults for anything unset.
    /// Production fails fast: a missing secret is an error, never a default.
    pub fn load() -> Result<Self, ConfigError> {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let jwt_expire_days: i64 = parsed("JWT_EXPIRE_DAYS", 30)?;
        if !JWT_EXPIRE_DAYS_RANGE.contains(&jwt_expire_days) {
            return Err(ConfigError::Invalid {
                name: "JWT_EXPIRE_DAYS",
                value: jwt_expire_days.to_string(),
            });
        }
        let port = parsed("PORT", 5000)?;
        let header_bypass = parsed("AUTH_HEADER_BYPASS", false)?;
        let admin_email = env::var("ADMIN_EMAIL").ok().map(|e| e.trim().to_lowercase());
        let admin_password = env::var("ADMIN_PASSWORD").ok();
        let s3_bucket =
            env::var("S3_BUCKET_NAME").unwrap_or_else(|_| "trimurti-uploads".to_string());

        match env {
            Env::Local => {
                let s3_endpoint =
                    env::var("S3_ENDPOINT").unwrap_or_else(|_| "http://localhost:9000".to_string());
                let s3_public_url = env::var("S3_PUBLIC_URL")
                    .unwrap_or_else(|_| format!("{}/{}", s3_endpoint, s3_bucket));
                Ok(Self {
                    env: Env::Local,
                    db_url: env::var("DATABASE_URL")
                        .unwrap_or_else(|_| MEMORY_DATABASE.to_string()),
                    s3_region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                    s3_key: env::var("S3_ACCESS_KEY").unwrap_or_else(|_| "admin".to_string()),
                    s3_secret: env::var("S3_SECRET_KEY")
                        .unwrap_or_else(|_| "password".to_string()),
                    s3_endpoint,
                    s3_public_url,
                    s3_bucket,
                    jwt_secret: env::var("JWT_SECRET")
                        .unwrap_or_else(|_| LOCAL_JWT_SECRET.to_string()),
                    jwt_expire_days,
                    port,
                    header_bypass,
                    admin_email,
                    admin_password,
                })
            }
            Env::Production => {
                let s3_endpoint = required("S3_ENDPOINT")?;
                let s3_public_url = env::var("S3_PUBLIC_URL")
                    .unwrap_or_else(|_| format!("{}/{}", s3_endpoint, s3_bucket));
                Ok(Self {
                    env: Env::Production,
                    db_url: required("DATABASE_URL")?,
                    s3_region: env::var("S3_REGION").unwrap_or_else(|_| "auto".to_string()),
                    s3_key: required("S3_ACCESS_KEY")?,
                    s3_secret: required("S3_SECRET_KEY")?,
                    s3_endpoint,
                    s3_public_url,
                    s3_bucket,
                    jwt_secret: required("JWT_SECRET")?,
                    jwt_expire_days,
                    port,
                    header_bypass: false,
                    admin_email,
                    admin_password,
                })
            }
        }
    }

    /// The `x-user-id` bypass needs both Local mode and the explicit opt-in.
    pub fn allows_header_bypass(&self) -> bool {
        self.env == Env::Local && self.header_bypass
    }

    pub fn uses_memory_database(&self) -> bool {
        self.db_url == MEMORY_DATABASE
    }
}

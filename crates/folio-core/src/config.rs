//! Configuration module
//!
//! This module provides the configuration for the Folio API: server, session secret,
//! object storage, and the request rate limiting policy.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::time::Duration;

const SERVER_PORT: u16 = 4000;
const UPLOAD_URL_TTL_SECS: u64 = 3600;
const API_RATE_LIMIT: u32 = 100;
const API_RATE_WINDOW_SECS: u64 = 10 * 60;
const LOGIN_RATE_LIMIT: u32 = 5;
const LOGIN_RATE_WINDOW_SECS: u64 = 15 * 60;
const LOGIN_PATH: &str = "/admin/login";
const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Counter store backing the request rate limiters.
///
/// `Disabled` skips rate limiting entirely; session checks still apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitBackend {
    Redis,
    Memory,
    Disabled,
}

impl FromStr for RateLimitBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "redis" => Ok(RateLimitBackend::Redis),
            "memory" => Ok(RateLimitBackend::Memory),
            "disabled" | "off" | "none" => Ok(RateLimitBackend::Disabled),
            _ => Err(anyhow::anyhow!("Invalid rate limit backend: {}", s)),
        }
    }
}

impl Display for RateLimitBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RateLimitBackend::Redis => write!(f, "redis"),
            RateLimitBackend::Memory => write!(f, "memory"),
            RateLimitBackend::Disabled => write!(f, "disabled"),
        }
    }
}

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub environment: String,
}

/// Object storage settings for presigned uploads
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub s3_bucket: Option<String>,
    pub s3_region: String,
    /// Custom endpoint for S3-compatible providers (R2, MinIO, ...)
    pub s3_endpoint: Option<String>,
    pub upload_url_ttl_secs: u64,
}

/// Sliding-window rate limiting settings
#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    pub backend: RateLimitBackend,
    pub redis_url: Option<String>,
    pub api_limit: u32,
    pub api_window_secs: u64,
    pub login_limit: u32,
    pub login_window_secs: u64,
}

#[derive(Clone, Debug)]
pub struct PortfolioConfig {
    pub base: BaseConfig,
    pub storage: StorageConfig,
    pub rate_limit: RateLimitConfig,
    pub login_path: String,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<PortfolioConfig>);

impl Config {
    fn inner(&self) -> &PortfolioConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = PortfolioConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.inner().base.environment)
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().base.jwt_secret
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().storage.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> &str {
        &self.inner().storage.s3_region
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().storage.s3_endpoint.as_deref()
    }

    pub fn upload_url_ttl(&self) -> Duration {
        Duration::from_secs(self.inner().storage.upload_url_ttl_secs)
    }

    pub fn rate_limit_backend(&self) -> RateLimitBackend {
        self.inner().rate_limit.backend
    }

    pub fn rate_limit_enabled(&self) -> bool {
        self.inner().rate_limit.backend != RateLimitBackend::Disabled
    }

    pub fn redis_url(&self) -> Option<&str> {
        self.inner().rate_limit.redis_url.as_deref()
    }

    pub fn api_rate_limit(&self) -> u32 {
        self.inner().rate_limit.api_limit
    }

    pub fn api_rate_window(&self) -> Duration {
        Duration::from_secs(self.inner().rate_limit.api_window_secs)
    }

    pub fn login_rate_limit(&self) -> u32 {
        self.inner().rate_limit.login_limit
    }

    pub fn login_rate_window(&self) -> Duration {
        Duration::from_secs(self.inner().rate_limit.login_window_secs)
    }

    pub fn login_path(&self) -> &str {
        &self.inner().login_path
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

/// Parse `value` when the variable is set; a malformed value is an error, not the default.
fn parse_or<T: FromStr>(
    key: &str,
    value: Option<String>,
    default: T,
) -> Result<T, anyhow::Error> {
    match value {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number", key)),
        None => Ok(default),
    }
}

impl PortfolioConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| var(key).filter(|s| !s.trim().is_empty());

        let environment = non_empty("ENVIRONMENT")
            .or_else(|| non_empty("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = non_empty("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = parse_or("PORT", non_empty("PORT"), SERVER_PORT)?;

        let base = BaseConfig {
            server_port,
            cors_origins,
            jwt_secret: var("JWT_SECRET")
                .ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            environment,
        };

        let storage = StorageConfig {
            s3_bucket: non_empty("S3_BUCKET"),
            s3_region: non_empty("S3_REGION").unwrap_or_else(|| "auto".to_string()),
            s3_endpoint: non_empty("S3_ENDPOINT"),
            upload_url_ttl_secs: parse_or(
                "UPLOAD_URL_TTL_SECS",
                non_empty("UPLOAD_URL_TTL_SECS"),
                UPLOAD_URL_TTL_SECS,
            )?,
        };

        let redis_url = non_empty("REDIS_URL");
        // Without an explicit backend, a configured Redis turns throttling on.
        let backend = match non_empty("RATE_LIMIT_BACKEND") {
            Some(name) => name.parse()?,
            None if redis_url.is_some() => RateLimitBackend::Redis,
            None => RateLimitBackend::Disabled,
        };

        let rate_limit = RateLimitConfig {
            backend,
            redis_url,
            api_limit: parse_or("API_RATE_LIMIT", non_empty("API_RATE_LIMIT"), API_RATE_LIMIT)?,
            api_window_secs: parse_or(
                "API_RATE_WINDOW_SECS",
                non_empty("API_RATE_WINDOW_SECS"),
                API_RATE_WINDOW_SECS,
            )?,
            login_limit: parse_or(
                "LOGIN_RATE_LIMIT",
                non_empty("LOGIN_RATE_LIMIT"),
                LOGIN_RATE_LIMIT,
            )?,
            login_window_secs: parse_or(
                "LOGIN_RATE_WINDOW_SECS",
                non_empty("LOGIN_RATE_WINDOW_SECS"),
                LOGIN_RATE_WINDOW_SECS,
            )?,
        };

        let config = PortfolioConfig {
            base,
            storage,
            rate_limit,
            login_path: non_empty("LOGIN_PATH").unwrap_or_else(|| LOGIN_PATH.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if self.storage.s3_bucket.is_none() {
            return Err(anyhow::anyhow!("S3_BUCKET must be set for uploads"));
        }

        if self.storage.upload_url_ttl_secs == 0 {
            return Err(anyhow::anyhow!("UPLOAD_URL_TTL_SECS must be greater than 0"));
        }

        if self.rate_limit.backend == RateLimitBackend::Redis && self.rate_limit.redis_url.is_none()
        {
            return Err(anyhow::anyhow!(
                "REDIS_URL must be set when RATE_LIMIT_BACKEND=redis"
            ));
        }

        if self.rate_limit.api_limit == 0 || self.rate_limit.login_limit == 0 {
            return Err(anyhow::anyhow!("Rate limits must allow at least one request"));
        }

        if self.rate_limit.api_window_secs == 0 || self.rate_limit.login_window_secs == 0 {
            return Err(anyhow::anyhow!("Rate limit windows must be at least one second"));
        }

        if !self.login_path.starts_with('/') {
            return Err(anyhow::anyhow!("LOGIN_PATH must start with '/'"));
        }

        Ok(())
    }
}

//! Server Configuration
//!
//! Everything is read from the process environment (after `.env`) once at
//! start-up and split into the per-crate configs.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::AuthConfig;
use base64::Engine;
use base64::engine::general_purpose;
use platform::object_store::S3Settings;
use posts::PostsConfig;

const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

#[derive(Debug)]
pub struct ApiConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
    pub posts: PostsConfig,
    pub s3: S3Settings,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// `lookup` returns the raw value of a variable, if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let env = Env(&lookup);

        let auth = AuthConfig {
            access_token_ttl: Duration::from_secs(env.parse_or("ACCESS_TOKEN_TTL_SECS", 7200)?),
            refresh_token_ttl: Duration::from_secs(
                env.parse_or("REFRESH_TOKEN_TTL_SECS", 604_800)?,
            ),
            password_pepper: env.optional("PASSWORD_PEPPER").map(String::into_bytes),
            ..jwt_config(&env)?
        };

        let posts = PostsConfig {
            bucket: env.optional("S3_BUCKET").unwrap_or_else(|| "data".to_string()),
            object_store_timeout: Duration::from_secs(
                env.parse_or("OBJECT_STORE_TIMEOUT_SECS", 30)?,
            ),
            image_url_ttl: Duration::from_secs(env.parse_or("IMAGE_URL_TTL_SECS", 604_800)?),
            max_upload_bytes: env.parse_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
        };

        let s3 = S3Settings {
            endpoint: env.required("S3_ENDPOINT")?,
            region: env
                .optional("S3_REGION")
                .unwrap_or_else(|| "us-east-1".to_string()),
            access_key: env.required("S3_ACCESS_KEY")?,
            secret_key: env.required("S3_SECRET_KEY")?,
        };

        let frontend_origins = env
            .optional("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            database_url: env.required("DATABASE_URL")?,
            database_max_connections: env.parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
            port: env.parse_or("PORT", 8080)?,
            frontend_origins,
            auth,
            posts,
            s3,
        })
    }
}

/// `JWT_SECRET` is base64. Debug builds without one sign with a random key.
fn jwt_config(env: &Env<'_>) -> anyhow::Result<AuthConfig> {
    match env.optional("JWT_SECRET") {
        Some(encoded) => {
            let secret = general_purpose::STANDARD
                .decode(encoded.trim())
                .context("JWT_SECRET must be base64")?;
            if secret.len() < 32 {
                bail!("JWT_SECRET must decode to at least 32 bytes");
            }
            Ok(AuthConfig::new(secret))
        }
        None if cfg!(debug_assertions) => {
            tracing::warn!("JWT_SECRET not set, using a random secret; tokens die with the process");
            Ok(AuthConfig::development())
        }
        None => bail!("JWT_SECRET must be set"),
    }
}

struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    fn optional(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, name: &str) -> anyhow::Result<String> {
        self.optional(name)
            .with_context(|| format!("{name} must be set"))
    }

    fn parse_or<T>(&self, name: &str, default: T) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match self.optional(name) {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("{name} has an invalid value: {raw}")),
            None => Ok(default),
        }
    }
}

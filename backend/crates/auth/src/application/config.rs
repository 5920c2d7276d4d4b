//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::token::{TokenCodec, generate_secret};

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC key for access and refresh tokens
    pub jwt_secret: Vec<u8>,
    /// Access token lifetime (2 hours)
    pub access_token_ttl: Duration,
    /// Refresh token lifetime, also used for the stored expiry (7 days)
    pub refresh_token_ttl: Duration,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: Vec::new(),
            access_token_ttl: Duration::from_secs(2 * 3600),
            refresh_token_ttl: Duration::from_secs(7 * 24 * 3600),
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            ..Default::default()
        }
    }

    /// Create config with a random signing secret (for development)
    pub fn with_random_secret() -> Self {
        Self::new(generate_secret())
    }

    /// Random secret and no pepper; tokens die with the process
    pub fn development() -> Self {
        Self::with_random_secret()
    }

    pub fn codec(&self) -> TokenCodec {
        TokenCodec::new(&self.jwt_secret)
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    pub fn refresh_token_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.refresh_token_ttl).unwrap_or(chrono::Duration::days(7))
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lifetimes() {
        let config = AuthConfig::default();
        assert_eq!(config.access_token_ttl, Duration::from_secs(7200));
        assert_eq!(config.refresh_token_ttl, Duration::from_secs(604_800));
        assert_eq!(config.refresh_token_ttl_chrono(), chrono::Duration::days(7));
        assert!(config.pepper().is_none());
    }

    #[test]
    fn test_random_secrets_are_distinct() {
        let a = AuthConfig::with_random_secret();
        let b = AuthConfig::development();
        assert!(!a.jwt_secret.is_empty());
        assert_ne!(a.jwt_secret, b.jwt_secret);
    }

    #[test]
    fn test_debug_hides_secrets() {
        let mut config = AuthConfig::new(b"super-secret".to_vec());
        config.password_pepper = Some(b"pepper".to_vec());
        let output = format!("{config:?}");
        assert!(!output.contains("super-secret"));
        assert!(!output.contains("pepper\""));
        assert!(output.contains("REDACTED"));
    }
}

//! Signed, time-limited tokens
//!
//! JWTs signed with HMAC-SHA-512 under a server-held secret. The codec only
//! knows about a subject and an expiry; which subject goes into which token
//! (user id for access tokens, email for refresh tokens) is decided by the
//! caller.
//!
//! Expiry is checked here rather than by `jsonwebtoken` so that the rules
//! are exact: `exp` must be a JSON number (integer or float), a missing or
//! non-numeric `exp` is [`TokenError::Invalid`], and a token is
//! [`TokenError::Expired`] from the expiry instant onwards.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Algorithm used for every token this codec issues
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS512;

#[derive(Debug, Error)]
pub enum TokenError {
    /// Structure, signature, algorithm or claim format is wrong
    #[error("Token is invalid: {0}")]
    Invalid(String),

    #[error("Token has expired")]
    Expired,

    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// Length of secrets produced by [`generate_secret`] (the HS512 block size)
pub const GENERATED_SECRET_LEN: usize = 64;

/// Random signing secret for development runs without a configured one.
/// Tokens signed with it do not survive a restart.
pub fn generate_secret() -> Vec<u8> {
    let mut secret = vec![0u8; GENERATED_SECRET_LEN];
    OsRng.fill_bytes(&mut secret);
    secret
}

/// A freshly signed token and the expiry embedded in it
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Claims of a validated token
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    /// `sub`, if present and a string
    pub subject: Option<String>,
    /// `exp` as Unix seconds (fractional part preserved)
    pub expires_at: f64,
    /// Every claim, including the two above
    pub all: Map<String, Value>,
}

#[derive(Serialize)]
struct OutgoingClaims<'a> {
    sub: &'a str,
    exp: i64,
    /// Random per token so two tokens issued in the same second differ
    jti: String,
}

/// HS512 token issuer/validator bound to one secret
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        // Accept the HMAC family only; anything else (RS*, ES*, none) is
        // rejected before the signature is even looked at.
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign a token for `subject` that expires `ttl` from now.
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<IssuedToken, TokenError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| TokenError::Signing(format!("ttl out of range: {e}")))?;
        let expires_at = Utc::now() + ttl;

        let claims = OutgoingClaims {
            sub: subject,
            exp: expires_at.timestamp(),
            jti: format!("{:016x}", OsRng.next_u64()),
        };
        let token = jsonwebtoken::encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify signature, algorithm and expiry against the current time.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, unix_now())
    }

    /// Same as [`validate`](Self::validate) with an explicit clock reading
    /// (Unix seconds).
    pub fn validate_at(&self, token: &str, now: f64) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Map<String, Value>>(token, &self.decoding, &self.validation)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;
        let all = data.claims;

        let expires_at = all
            .get("exp")
            .and_then(Value::as_f64)
            .ok_or_else(|| TokenError::Invalid("exp claim missing or not a number".to_string()))?;

        if now >= expires_at {
            return Err(TokenError::Expired);
        }

        let subject = all.get("sub").and_then(Value::as_str).map(str::to_owned);

        Ok(Claims {
            subject,
            expires_at,
            all,
        })
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &SIGNING_ALGORITHM)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

fn unix_now() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

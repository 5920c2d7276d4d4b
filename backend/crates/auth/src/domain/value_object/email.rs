//! Email Value Object
//!
//! Structural check only (local-part "@" dotted domain). The email is the
//! login key, so it is trimmed and lowercased before it is stored or looked
//! up.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// RFC 5321 path limit
const EMAIL_MAX_LENGTH: usize = 254;
const LOCAL_PART_MAX_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    pub fn new(email: impl AsRef<str>) -> AuthResult<Self> {
        let email = email.as_ref().trim().to_lowercase();

        if email.is_empty() {
            return Err(AuthError::InvalidEmail("email cannot be empty".into()));
        }

        if email.len() > EMAIL_MAX_LENGTH {
            return Err(AuthError::InvalidEmail(format!(
                "email must be at most {EMAIL_MAX_LENGTH} characters"
            )));
        }

        if !Self::is_valid_format(&email) {
            return Err(AuthError::InvalidEmail("invalid email format".into()));
        }

        Ok(Self(email))
    }

    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        if local.is_empty() || local.len() > LOCAL_PART_MAX_LENGTH {
            return false;
        }
        if local.chars().any(|c| c.is_whitespace() || c == '@') {
            return false;
        }

        if domain.is_empty() || !domain.contains('.') {
            return false;
        }
        if !domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return false;
        }

        // Every label non-empty and not hyphen-delimited
        domain
            .split('.')
            .all(|label| !label.is_empty() && !label.starts_with('-') && !label.ends_with('-'))
    }

    /// Rebuild from a stored value (already validated on the way in)
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Email {
    type Err = AuthError;

    fn from_str(s: &str) -> AuthResult<Self> {
        Email::new(s)
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

//! User Password Value Object
//!
//! Thin domain wrappers over `platform::password`, mapping its errors into
//! [`AuthError`]. Registration goes through [`RawPassword::new`] (policy
//! applied); login goes through [`RawPassword::for_login`] (no policy, so a
//! stored password always stays usable).

use std::fmt;

use platform::password::{
    ClearTextPassword, HashedPassword, PasswordHashError, PasswordPolicyError,
};

use crate::error::{AuthError, AuthResult};

/// Password as typed by the user. Zeroized on drop.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// A newly chosen password; rejected with `PasswordPolicy` if weak.
    pub fn new(raw: String) -> AuthResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| {
            let message = match e {
                PasswordPolicyError::EmptyOrWhitespace => "Password cannot be empty".to_string(),
                other => other.to_string(),
            };
            AuthError::PasswordPolicy(message)
        })?;

        Ok(Self(clear_text))
    }

    pub fn for_login(raw: String) -> Self {
        Self(ClearTextPassword::for_verification(raw))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

/// Argon2id hash as persisted in `users.password_hash`
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AuthResult<Self> {
        let hashed = raw.inner().hash(pepper).map_err(|e| match e {
            PasswordHashError::HashingFailed(msg) => AuthError::PasswordHashing(msg),
            PasswordHashError::InvalidHashFormat => {
                AuthError::PasswordHashing("produced an unparsable hash".to_string())
            }
        })?;

        Ok(Self(hashed))
    }

    pub fn from_phc_string(phc_string: impl Into<String>) -> AuthResult<Self> {
        HashedPassword::from_phc_string(phc_string)
            .map(Self)
            .map_err(|_| AuthError::Internal("invalid password hash in database".to_string()))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Constant-time; `pepper` must match the one used at registration.
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

//! Password Hashing and Verification
//!
//! - Argon2id hashing with a random salt, stored as a PHC string
//! - Optional application-wide pepper
//! - Clear text zeroized on drop, never printed
//!
//! Verification never reports success on an internal failure: a malformed
//! stored hash simply does not verify.

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violations, checked when a password is chosen
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,

    #[error("Password is too common or follows a predictable pattern")]
    CommonPattern,
}

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password
// ============================================================================

/// Clear text password, NFKC-normalized and zeroized on drop
///
/// Not `Clone`, and `Debug` is redacted.
///
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let password = ClearTextPassword::new("correct horse battery".to_string()).unwrap();
/// let hashed = password.hash(None).unwrap();
/// assert!(hashed.verify(&password, None));
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Normalize and check a newly chosen password against the policy.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let candidate = Self::for_verification(raw);
        candidate.check_policy()?;
        Ok(candidate)
    }

    /// Normalize without applying the policy.
    ///
    /// Used when checking a login attempt, so that tightening the policy
    /// never locks out existing accounts.
    pub fn for_verification(raw: String) -> Self {
        let raw = Zeroizing::new(raw);
        Self(raw.nfkc().collect())
    }

    fn check_policy(&self) -> Result<(), PasswordPolicyError> {
        let value = self.0.as_str();

        if value.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        // Code points, not bytes
        let char_count = value.chars().count();
        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if value
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        if is_common_pattern(value) {
            return Err(PasswordPolicyError::CommonPattern);
        }

        Ok(())
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(self.0.as_bytes().to_vec());
        if let Some(p) = pepper {
            bytes.extend_from_slice(p);
        }
        bytes
    }

    /// Hash with Argon2id (OWASP defaults: m=19 MiB, t=2, p=1).
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(OsRng);
        let hash = Argon2::default()
            .hash_password(&self.peppered(pepper), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password
// ============================================================================

/// Argon2id hash in PHC string format, safe to persist
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Parse a stored PHC string
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Constant-time verification. Any parsing or hashing failure is `false`.
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(&self.hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(&password.peppered(pepper), &parsed_hash)
            .is_ok()
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn is_common_pattern(password: &str) -> bool {
    let lower = password.to_lowercase();

    // "aaaaaaaa"
    let mut chars = lower.chars();
    if let Some(first) = chars.next() {
        if chars.all(|c| c == first) {
            return true;
        }
    }

    if is_sequential_digits(&lower) {
        return true;
    }

    // Only a password that is nothing but a keyboard run; a longer
    // passphrase that merely contains one is fine.
    const KEYBOARD_ROWS: &[&str] = &["qwertyuiop", "asdfghjkl", "zxcvbnm", "1qaz2wsx3edc4rfv"];
    if KEYBOARD_ROWS.iter().any(|row| row.contains(lower.as_str())) {
        return true;
    }

    const COMMON_PASSWORDS: &[&str] = &[
        "password",
        "password1",
        "password123",
        "abcdefgh",
        "letmein1",
        "welcome1",
        "admin123",
        "iloveyou",
        "sunshine",
        "football",
        "baseball",
        "trustno1",
    ];
    COMMON_PASSWORDS.contains(&lower.as_str())
}

/// All-digit strings that only count up or down, e.g. "12345678", "98765432"
fn is_sequential_digits(s: &str) -> bool {
    let digits: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() < 4 || digits.len() != s.chars().count() {
        return false;
    }

    let ascending = digits
        .windows(2)
        .all(|w| w[1] == (w[0] + 1) % 10);
    let descending = digits
        .windows(2)
        .all(|w| w[0] == (w[1] + 1) % 10);

    ascending || descending
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_too_short() {
        let result = ClearTextPassword::new("short".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::TooShort { .. })));
    }

    #[test]
    fn test_policy_too_long() {
        let result = ClearTextPassword::new("ab".repeat(MAX_PASSWORD_LENGTH));
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_policy_whitespace() {
        assert_eq!(
            ClearTextPassword::new(String::new()).unwrap_err(),
            PasswordPolicyError::EmptyOrWhitespace
        );
        assert_eq!(
            ClearTextPassword::new("          ".to_string()).unwrap_err(),
            PasswordPolicyError::EmptyOrWhitespace
        );
    }

    #[test]
    fn test_policy_control_character() {
        let result = ClearTextPassword::new("abc\u{0007}defghij".to_string());
        assert_eq!(result.unwrap_err(), PasswordPolicyError::InvalidCharacter);
    }

    #[test]
    fn test_policy_common_patterns() {
        for weak in ["password123", "qwertyuiop", "12345678", "98765432", "zzzzzzzz"] {
            assert_eq!(
                ClearTextPassword::new(weak.to_string()).unwrap_err(),
                PasswordPolicyError::CommonPattern,
                "{weak} should be rejected"
            );
        }
    }

    #[test]
    fn test_policy_keyboard_run_only_as_whole_password() {
        for run in ["qwertyui", "asdfghjkl", "1qaz2wsx"] {
            assert_eq!(
                ClearTextPassword::new(run.to_string()).unwrap_err(),
                PasswordPolicyError::CommonPattern,
                "{run} should be rejected"
            );
        }

        for passphrase in ["my qwerty keyboard rocks", "zxcvbn-is-a-library-7"] {
            assert!(
                ClearTextPassword::new(passphrase.to_string()).is_ok(),
                "{passphrase} should be accepted"
            );
        }
    }

    #[test]
    fn test_policy_accepts_reasonable_passwords() {
        assert!(ClearTextPassword::new("Blue-Kettle-42".to_string()).is_ok());
        assert!(ClearTextPassword::new("パスワード安全です!".to_string()).is_ok());
    }

    #[test]
    fn test_hash_and_verify() {
        let password = ClearTextPassword::new("Blue-Kettle-42".to_string()).unwrap();
        let hashed = password.hash(None).unwrap();

        assert!(hashed.verify(&password, None));

        let wrong = ClearTextPassword::for_verification("Blue-Kettle-43".to_string());
        assert!(!hashed.verify(&wrong, None));
    }

    #[test]
    fn test_same_password_different_salt() {
        let password = ClearTextPassword::new("Blue-Kettle-42".to_string()).unwrap();
        let a = password.hash(None).unwrap();
        let b = password.hash(None).unwrap();
        assert_ne!(a.as_phc_string(), b.as_phc_string());
    }

    #[test]
    fn test_pepper_must_match() {
        let password = ClearTextPassword::new("Blue-Kettle-42".to_string()).unwrap();
        let pepper = b"server-side-pepper";
        let hashed = password.hash(Some(pepper)).unwrap();

        assert!(hashed.verify(&password, Some(pepper)));
        assert!(!hashed.verify(&password, None));
        assert!(!hashed.verify(&password, Some(b"other-pepper")));
    }

    #[test]
    fn test_for_verification_skips_policy() {
        // A weak password stored before the policy existed must still verify.
        let weak = ClearTextPassword::for_verification("abc".to_string());
        let hashed = weak.hash(None).unwrap();
        assert!(hashed.verify(&ClearTextPassword::for_verification("abc".to_string()), None));
    }

    #[test]
    fn test_normalization_applies_to_verification() {
        // U+FF21 (fullwidth A) normalizes to "A" under NFKC
        let chosen = ClearTextPassword::new("\u{FF21}bcdefgh-9".to_string()).unwrap();
        let hashed = chosen.hash(None).unwrap();
        let typed = ClearTextPassword::for_verification("Abcdefgh-9".to_string());
        assert!(hashed.verify(&typed, None));
    }

    #[test]
    fn test_phc_roundtrip_and_invalid() {
        let password = ClearTextPassword::new("Blue-Kettle-42".to_string()).unwrap();
        let hashed = password.hash(None).unwrap();
        let restored = HashedPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.verify(&password, None));

        assert!(HashedPassword::from_phc_string("not_a_valid_hash").is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::for_verification("hunter2".to_string());
        let output = format!("{:?}", password);
        assert!(output.contains("REDACTED"));
        assert!(!output.contains("hunter2"));
    }
}

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// Fixed at registration; there is no role-change operation.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i16)]
pub enum UserRole {
    #[display("Reader")]
    Reader = 0,
    #[display("Author")]
    Author = 1,
}

impl UserRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            UserRole::Reader => "Reader",
            UserRole::Author => "Author",
        }
    }

    /// Authors create and manage posts; readers only see published ones.
    #[inline]
    pub const fn can_author(&self) -> bool {
        matches!(self, UserRole::Author)
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(UserRole::Reader),
            1 => Some(UserRole::Author),
            _ => None,
        }
    }

    /// Parse the wire value; anything but "Author" / "Reader" is `InvalidRole`.
    pub fn from_code(code: &str) -> AuthResult<Self> {
        match code {
            "Reader" => Ok(UserRole::Reader),
            "Author" => Ok(UserRole::Author),
            other => Err(AuthError::InvalidRole(other.to_string())),
        }
    }
}

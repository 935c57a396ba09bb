//! Login Value Object
//!
//! The unique, immutable name a user signs in with.
//!
//! ## Rules
//! - NFKC normalized, then trimmed
//! - 3 to 64 characters after normalization
//! - No whitespace or control characters
//! - Case is preserved and compared exactly

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// Constants
// ============================================================================

/// Minimum length for a login (in characters)
pub const LOGIN_MIN_LENGTH: usize = 3;

/// Maximum length for a login (in characters)
pub const LOGIN_MAX_LENGTH: usize = 64;

// ============================================================================
// Error Types
// ============================================================================

/// Error returned when login validation fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    /// Login is empty after normalization
    Empty,

    /// Login is too short (minimum: LOGIN_MIN_LENGTH)
    TooShort { length: usize, min: usize },

    /// Login is too long (maximum: LOGIN_MAX_LENGTH)
    TooLong { length: usize, max: usize },

    /// Login contains whitespace in the middle
    ContainsWhitespace,

    /// Login contains a control character
    InvalidCharacter { position: usize },
}

impl fmt::Display for LoginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Login cannot be empty"),
            Self::TooShort { length, min } => {
                write!(f, "Login is too short ({length} chars, minimum {min})")
            }
            Self::TooLong { length, max } => {
                write!(f, "Login is too long ({length} chars, maximum {max})")
            }
            Self::ContainsWhitespace => write!(f, "Login cannot contain whitespace"),
            Self::InvalidCharacter { position } => {
                write!(f, "Login contains a control character at position {position}")
            }
        }
    }
}

impl std::error::Error for LoginError {}

// ============================================================================
// Login
// ============================================================================

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Login(String);

impl Login {
    /// Create a login from raw input, normalizing and validating it
    pub fn new(input: impl AsRef<str>) -> Result<Self, LoginError> {
        let normalized = Self::normalize(input.as_ref());
        Self::validate(&normalized)?;
        Ok(Self(normalized))
    }

    /// Create from a stored value (assumes it was validated on insert)
    pub fn from_db(stored: impl Into<String>) -> Self {
        Self(stored.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn normalize(input: &str) -> String {
        input.nfkc().collect::<String>().trim().to_string()
    }

    fn validate(normalized: &str) -> Result<(), LoginError> {
        if normalized.is_empty() {
            return Err(LoginError::Empty);
        }

        let length = normalized.chars().count();
        if length < LOGIN_MIN_LENGTH {
            return Err(LoginError::TooShort {
                length,
                min: LOGIN_MIN_LENGTH,
            });
        }
        if length > LOGIN_MAX_LENGTH {
            return Err(LoginError::TooLong {
                length,
                max: LOGIN_MAX_LENGTH,
            });
        }

        for (position, c) in normalized.chars().enumerate() {
            if c.is_whitespace() {
                return Err(LoginError::ContainsWhitespace);
            }
            if c.is_control() {
                return Err(LoginError::InvalidCharacter { position });
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Login({})", self.0)
    }
}

impl fmt::Display for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Login {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Login {
    type Error = LoginError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Login> for String {
    fn from(login: Login) -> Self {
        login.0
    }
}

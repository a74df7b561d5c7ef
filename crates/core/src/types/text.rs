//! Free-text fields: full name and notes.

use core::fmt;

use serde::Serialize;

use super::impl_text_sqlx;

/// Errors that can occur when parsing a text field.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextError {
    /// Shorter than the minimum after trimming.
    #[error("must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// Longer than the maximum after trimming.
    #[error("must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A registrant's full name, trimmed, 2 to 255 characters.
///
/// Lengths are counted in characters, not bytes.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct FullName(String);

impl FullName {
    /// Minimum length after trimming.
    pub const MIN_LENGTH: usize = 2;
    /// Maximum length after trimming.
    pub const MAX_LENGTH: usize = 255;

    /// Parse a `FullName`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`TextError`] if the trimmed length is out of range.
    pub fn parse(s: &str) -> Result<Self, TextError> {
        let trimmed = s.trim();
        let len = trimmed.chars().count();
        if len < Self::MIN_LENGTH {
            return Err(TextError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }
        if len > Self::MAX_LENGTH {
            return Err(TextError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `FullName` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Optional free-text notes, trimmed, at most 1000 characters, never empty.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Notes(String);

impl Notes {
    /// Maximum length after trimming.
    pub const MAX_LENGTH: usize = 1000;

    /// Parse optional notes.
    ///
    /// Returns `Ok(None)` when the input is empty or whitespace only.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::TooLong`] if the trimmed input exceeds 1000 characters.
    pub fn parse(s: &str) -> Result<Option<Self>, TextError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(TextError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Some(Self(trimmed.to_owned())))
    }

    /// Returns the notes as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Notes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl_text_sqlx!(FullName);
impl_text_sqlx!(Notes);

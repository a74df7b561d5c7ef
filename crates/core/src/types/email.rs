//! Email address type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::impl_text_sqlx;

/// Local part and domain accepted by [`Email::parse`].
///
/// Leading dots and consecutive dots in the local part are checked separately
/// since the `regex` crate has no lookahead.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@(?:[A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailError {
    /// The input is not a syntactically valid address.
    #[error("email is not a valid address")]
    Invalid,
    /// The input string is too long.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A normalized (lower-cased) email address.
///
/// ## Constraints
///
/// - Local part of letters, digits and `_ ' + - .`, not starting with a dot,
///   without consecutive dots and not ending in `.` or `'`
/// - Domain of dot-separated labels ending in an alphabetic TLD (2+ letters)
/// - No whitespace anywhere: padded input is rejected, not repaired
/// - At most 255 characters
///
/// ## Examples
///
/// ```
/// use customer_registry_core::Email;
///
/// let email = Email::parse("JOHN@EXAMPLE.COM").unwrap();
/// assert_eq!(email.as_str(), "john@example.com");
///
/// assert!(Email::parse("not-an-email").is_err());
/// assert!(Email::parse("  john@example.com  ").is_err());
/// assert!(Email::parse("user@localhost").is_err()); // no TLD
/// ```
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of a stored email address.
    pub const MAX_LENGTH: usize = 255;

    /// Parse and normalize an `Email`.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError::Invalid`] if the input is not a valid address
    /// (including any surrounding or embedded whitespace), and
    /// [`EmailError::TooLong`] if it exceeds 255 characters.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.starts_with('.') || s.contains("..") || !EMAIL_PATTERN.is_match(s) {
            return Err(EmailError::Invalid);
        }

        // The pattern only admits ASCII, so bytes and characters agree.
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl_text_sqlx!(Email);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_emails() {
        assert!(Email::parse("user@example.com").is_ok());
        assert!(Email::parse("user.name@example.com").is_ok());
        assert!(Email::parse("user+tag@example.com").is_ok());
        assert!(Email::parse("o'brien@example.com").is_ok());
        assert!(Email::parse("user@subdomain.example.com").is_ok());
        assert!(Email::parse("user@example.co.uk").is_ok());
        assert!(Email::parse("a@b.co").is_ok());
    }

    #[test]
    fn test_lowercases() {
        let email = Email::parse("JOHN@EXAMPLE.COM").unwrap();
        assert_eq!(email.as_str(), "john@example.com");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = Email::parse("Jane.Doe@Example.org").unwrap();
        let twice = Email::parse(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rejects_whitespace() {
        assert_eq!(Email::parse("  john@example.com  "), Err(EmailError::Invalid));
        assert_eq!(Email::parse("john doe@example.com"), Err(EmailError::Invalid));
        assert_eq!(Email::parse("john@example.com\n"), Err(EmailError::Invalid));
    }

    #[test]
    fn test_rejects_malformed() {
        for raw in [
            "",
            "not-an-email",
            "@domain.com",
            "user@",
            "user@localhost",
            "user@example.c",
            ".user@example.com",
            "us..er@example.com",
            "user.@example.com",
            "user@-example.com",
            "user@@example.com",
        ] {
            assert_eq!(Email::parse(raw), Err(EmailError::Invalid), "{raw}");
        }
    }

    #[test]
    fn test_parse_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert_eq!(
            Email::parse(&long),
            Err(EmailError::TooLong { max: 255 })
        );

        let exact = format!("{}@example.com", "a".repeat(255 - "@example.com".len()));
        assert!(Email::parse(&exact).is_ok());
    }

    #[test]
    fn test_from_str() {
        let email: Email = "User@Example.com".parse().unwrap();
        assert_eq!(email.as_str(), "user@example.com");
    }

    #[test]
    fn test_serialize() {
        let email = Email::parse("user@example.com").unwrap();
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"user@example.com\"");
    }
}

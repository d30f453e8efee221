//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input does not look like `local@domain.tld`.
    #[error("email must look like name@example.com")]
    Malformed,
}

/// A customer email address.
///
/// Validation is structural only: a non-empty local part and a dotted domain
/// separated by a single `@`. Anything stricter belongs to the mail transport,
/// which will reject addresses it cannot deliver to.
///
/// ## Examples
///
/// ```
/// use draft_order_core::Email;
///
/// assert!(Email::parse("user@example.com").is_ok());
/// assert!(Email::parse("user.name+tag@shop.co.uk").is_ok());
///
/// assert!(Email::parse("").is_err());
/// assert!(Email::parse("no-at-symbol").is_err());
/// assert!(Email::parse("user@nodot").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from a string, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 254 characters,
    /// or does not have the `local@domain.tld` shape.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(EmailError::Empty);
        }

        if trimmed.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(EmailError::Malformed);
        };

        if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.contains('@') {
            return Err(EmailError::Malformed);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let email = Email::parse("user@example.com").expect("valid email");
        assert_eq!(email.as_str(), "user@example.com");
    }

    #[test]
    fn test_parse_trims() {
        let email = Email::parse(" user@example.com ").expect("valid email");
        assert_eq!(email.as_str(), "user@example.com");
    }

    #[test]
    fn test_parse_plus_tag() {
        assert!(Email::parse("user+drafts@shop.co.uk").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
    }

    #[test]
    fn test_parse_missing_at() {
        assert_eq!(Email::parse("example.com"), Err(EmailError::Malformed));
    }

    #[test]
    fn test_parse_empty_local() {
        assert_eq!(Email::parse("@example.com"), Err(EmailError::Malformed));
    }

    #[test]
    fn test_parse_undotted_domain() {
        assert_eq!(Email::parse("user@localhost"), Err(EmailError::Malformed));
    }

    #[test]
    fn test_parse_double_at() {
        assert_eq!(Email::parse("a@b@example.com"), Err(EmailError::Malformed));
    }

    #[test]
    fn test_parse_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { .. })
        ));
    }
}

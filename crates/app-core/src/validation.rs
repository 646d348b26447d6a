//! Form validation
//!
//! Forms are checked before any invocation is built, so a rejected form
//! never reaches the network.

use thiserror::Error;

/// Form validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is empty
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Result type for validation
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Reject the first field whose value is empty
///
/// Whitespace counts as content; only the empty string is rejected.
pub fn require(fields: &[(&'static str, &str)]) -> Result<()> {
    match fields.iter().find(|(_, value)| value.is_empty()) {
        Some((name, _)) => Err(ValidationError::Empty(name)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_present() {
        assert!(require(&[("Title", "Wallet"), ("Description", "Black")]).is_ok());
    }

    #[test]
    fn test_first_empty_field_reported() {
        let err = require(&[("Title", ""), ("Description", "")]).unwrap_err();
        assert_eq!(err, ValidationError::Empty("Title"));
        assert_eq!(err.to_string(), "Title must not be empty");
    }

    #[test]
    fn test_whitespace_is_content() {
        assert!(require(&[("Title", " ")]).is_ok());
    }
}

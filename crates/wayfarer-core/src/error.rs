//! # Validation Error Types
//!
//! Errors raised when a domain primitive is constructed from invalid input.
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations. Invalid values are rejected at the constructor, so a
//! constructed identifier is always well-formed.

use thiserror::Error;

/// Errors from domain-primitive construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Principal identifier was empty.
    #[error("principal identifier must not be empty")]
    EmptyPrincipal,

    /// Principal identifier exceeded the maximum length.
    #[error("principal identifier too long: {len} bytes (max {max})")]
    PrincipalTooLong {
        /// Byte length of the rejected value.
        len: usize,
        /// Maximum permitted byte length.
        max: usize,
    },

    /// Principal identifier contained a character outside the permitted set.
    #[error("principal identifier contains invalid character {ch:?}")]
    InvalidPrincipalCharacter {
        /// The offending character.
        ch: char,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_principal_display() {
        let err = ValidationError::EmptyPrincipal;
        assert!(format!("{err}").contains("empty"));
    }

    #[test]
    fn too_long_display_includes_lengths() {
        let err = ValidationError::PrincipalTooLong { len: 200, max: 128 };
        let msg = format!("{err}");
        assert!(msg.contains("200"));
        assert!(msg.contains("128"));
    }

    #[test]
    fn invalid_character_display() {
        let err = ValidationError::InvalidPrincipalCharacter { ch: '\n' };
        assert!(format!("{err}").contains("invalid character"));
    }
}

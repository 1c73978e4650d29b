//! # Identity Newtypes
//!
//! Domain-primitive newtypes for identifiers throughout the Wayfarer
//! platform. Each identifier is a distinct type — you cannot pass a
//! [`BookingId`] where a [`ContractId`] is expected.
//!
//! ## Validation
//!
//! The string-based [`PrincipalId`] validates its contents at construction
//! time. Integer-based identifiers ([`BookingId`], [`ContractId`]) are always
//! valid by construction.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum byte length of a principal identifier.
const PRINCIPAL_MAX_LEN: usize = 128;

/// Helper macro to implement `Deserialize` for string newtypes that must
/// validate their contents. Deserializes as a plain `String`, then routes
/// through the type's `new()` constructor so that invalid values are
/// rejected at deserialization time — not silently accepted.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// PrincipalId (validated at construction)
// ---------------------------------------------------------------------------

/// An account principal: a traveler, guide, administrator, registered
/// collaborator-contract address, or the escrow holding account.
///
/// Principals are opaque non-empty ASCII strings without whitespace, at most
/// 128 bytes (e.g. `"ST1TRAVELER"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PrincipalId(String);

impl PrincipalId {
    /// Create a principal identifier, validating the raw string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the value is empty, longer than 128
    /// bytes, or contains non-printable-ASCII or whitespace characters.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(ValidationError::EmptyPrincipal);
        }
        if raw.len() > PRINCIPAL_MAX_LEN {
            return Err(ValidationError::PrincipalTooLong {
                len: raw.len(),
                max: PRINCIPAL_MAX_LEN,
            });
        }
        if let Some(ch) = raw
            .chars()
            .find(|c| !c.is_ascii_graphic())
        {
            return Err(ValidationError::InvalidPrincipalCharacter { ch });
        }
        Ok(Self(raw))
    }

    /// The well-known escrow holding account that carries net amounts
    /// between deposit and settlement.
    pub fn holding() -> Self {
        Self("escrow-holding".to_string())
    }

    /// Access the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl_validating_deserialize!(PrincipalId);

impl std::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PrincipalId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ---------------------------------------------------------------------------
// Integer identifiers (always valid by construction)
// ---------------------------------------------------------------------------

/// A unique identifier for a booking between a traveler and a guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(u64);

impl BookingId {
    /// Create a booking identifier from its numeric value.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Access the underlying numeric value.
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for BookingId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "booking:{}", self.0)
    }
}

/// A registry slot for a collaborator contract (e.g. the booking contract
/// consulted when authorizing deposits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractId(u64);

impl ContractId {
    /// Create a contract identifier from its numeric value.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Access the underlying numeric value.
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ContractId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ContractId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "contract:{}", self.0)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any printable-ASCII string within the length bound is accepted,
        /// and the constructed principal preserves the raw value.
        #[test]
        fn principal_accepts_printable_ascii(raw in "[!-~]{1,128}") {
            let p = PrincipalId::new(raw.clone()).unwrap();
            prop_assert_eq!(p.as_str(), raw.as_str());
        }

        /// Construction never panics on arbitrary input.
        #[test]
        fn principal_construction_total(raw in ".*") {
            let _ = PrincipalId::new(raw);
        }
    }
}

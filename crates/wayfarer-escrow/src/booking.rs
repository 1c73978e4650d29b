//! # Booking Validation Seam
//!
//! The escrow ledger authorizes deposits through an external booking
//! collaborator, consumed behind the [`BookingValidator`] trait. The ledger
//! treats any rejection, and any confirmation whose status is not
//! [`Confirmed`](BookingStatus::Confirmed), as an invalid booking.
//!
//! Validation is a synchronous call: the collaborator either answers
//! immediately or the deposit fails. A real implementation would look up
//! live booking state; [`StaticBookingValidator`] is the fixed-answer
//! implementation used by harnesses and tests.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wayfarer_core::{BookingId, PrincipalId};

/// The state of a booking as reported by the booking collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    /// The booking is confirmed and may accept an escrow deposit.
    Confirmed,
    /// The booking exists but is awaiting confirmation.
    Pending,
    /// The booking was cancelled.
    Cancelled,
}

impl BookingStatus {
    /// The canonical string name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Pending => "pending",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A successful booking lookup: the booking's status and the guide who
/// will be paid on release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    /// Reported booking status.
    pub status: BookingStatus,
    /// The guide identity resolved from the booking.
    pub guide: PrincipalId,
}

/// A failed booking lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingRejected {
    /// The collaborator has no booking under this identifier.
    #[error("unknown booking {0}")]
    UnknownBooking(BookingId),

    /// The collaborator could not be reached or answered malformed data.
    #[error("booking lookup unavailable: {0}")]
    Unavailable(String),
}

/// External booking collaborator consumed by the escrow ledger.
///
/// Implementations must be synchronous and side-effect free from the
/// ledger's point of view.
pub trait BookingValidator {
    /// Look up a booking and report its status and guide.
    ///
    /// # Errors
    ///
    /// Returns [`BookingRejected`] when the booking cannot be validated;
    /// the ledger maps every rejection to its invalid-booking error.
    fn validate(&self, booking_id: BookingId) -> Result<BookingConfirmation, BookingRejected>;
}

/// Fixed-answer booking validator for harnesses and tests.
///
/// Always confirms the booking and resolves the same guide, regardless of
/// the booking identifier.
#[derive(Debug, Clone)]
pub struct StaticBookingValidator {
    guide: PrincipalId,
}

impl StaticBookingValidator {
    /// Create a validator that confirms every booking with the given guide.
    pub fn confirming(guide: PrincipalId) -> Self {
        Self { guide }
    }
}

impl BookingValidator for StaticBookingValidator {
    fn validate(&self, _booking_id: BookingId) -> Result<BookingConfirmation, BookingRejected> {
        Ok(BookingConfirmation {
            status: BookingStatus::Confirmed,
            guide: self.guide.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_status_display() {
        assert_eq!(format!("{}", BookingStatus::Confirmed), "confirmed");
        assert_eq!(format!("{}", BookingStatus::Pending), "pending");
        assert_eq!(format!("{}", BookingStatus::Cancelled), "cancelled");
    }

    #[test]
    fn static_validator_confirms_any_booking() {
        let guide = PrincipalId::new("ST1GUIDE").unwrap();
        let validator = StaticBookingValidator::confirming(guide.clone());

        for id in [1, 2, 99] {
            let confirmation = validator.validate(BookingId::new(id)).unwrap();
            assert_eq!(confirmation.status, BookingStatus::Confirmed);
            assert_eq!(confirmation.guide, guide);
        }
    }

    #[test]
    fn rejection_display() {
        let err = BookingRejected::UnknownBooking(BookingId::new(4));
        assert!(format!("{err}").contains("booking:4"));

        let err = BookingRejected::Unavailable("timeout".to_string());
        assert!(format!("{err}").contains("timeout"));
    }

    #[test]
    fn confirmation_serde_roundtrip() {
        let confirmation = BookingConfirmation {
            status: BookingStatus::Confirmed,
            guide: PrincipalId::new("ST1GUIDE").unwrap(),
        };
        let json = serde_json::to_string(&confirmation).unwrap();
        let back: BookingConfirmation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, confirmation);
    }
}

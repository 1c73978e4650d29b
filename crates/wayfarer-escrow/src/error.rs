//! # Escrow Error Types
//!
//! Structured errors for every rejected escrow operation. Uses `thiserror`
//! for ergonomic error definitions with diagnostic context.
//!
//! ## Numeric Code Contract
//!
//! Each variant maps to a stable numeric code via [`EscrowError::code`].
//! The codes are an external contract callers may match on; the messages
//! are not. Codes 107 and 108 are holes in the numbering and stay reserved.
//!
//! [`DisputeActive`](EscrowError::DisputeActive) and
//! [`NoActiveDispute`](EscrowError::NoActiveDispute) are distinct variants
//! that share code 104: the upstream contract overloads one code for both
//! "a dispute is already flagged" and "there is no dispute to resolve".
//! The type distinguishes them; the numeric contract does not.

use thiserror::Error;
use wayfarer_core::{BookingId, PrincipalId};

/// Errors from escrow ledger operations.
///
/// Every precondition failure is a normal, expected outcome returned to the
/// immediate caller. Nothing here is retried or escalated by the ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EscrowError {
    /// The caller lacks permission for the requested identity-bound action.
    #[error("{caller} is not authorized to act on {booking_id}")]
    NotAuthorized {
        /// The rejected caller.
        caller: PrincipalId,
        /// The booking the caller attempted to act on.
        booking_id: BookingId,
    },

    /// The referenced booking failed external validation, or the required
    /// booking-contract registration is absent.
    #[error("booking validation failed for {booking_id}: {reason}")]
    InvalidBooking {
        /// The booking that failed validation.
        booking_id: BookingId,
        /// Why validation failed.
        reason: String,
    },

    /// An escrow record already exists for this booking id.
    #[error("escrow already deposited for {booking_id}")]
    AlreadyDeposited {
        /// The booking with an existing record.
        booking_id: BookingId,
    },

    /// No escrow record exists for this booking id.
    #[error("no escrow deposit exists for {booking_id}")]
    NoDeposit {
        /// The booking without a record.
        booking_id: BookingId,
    },

    /// A dispute is already flagged, blocking release, refund, and
    /// re-flagging.
    #[error("a dispute is active on {booking_id}")]
    DisputeActive {
        /// The disputed booking.
        booking_id: BookingId,
    },

    /// Dispute resolution was requested but no dispute is flagged.
    #[error("no active dispute to resolve on {booking_id}")]
    NoActiveDispute {
        /// The booking without an active dispute.
        booking_id: BookingId,
    },

    /// Deposit amount was zero, or did not exceed the platform fee (the
    /// net held amount must stay positive).
    #[error("invalid deposit amount {gross} against platform fee {fee}")]
    InvalidAmount {
        /// The rejected gross amount.
        gross: u64,
        /// The platform fee in effect at the call.
        fee: u64,
    },

    /// The record is not in the status required for the requested
    /// transition.
    #[error("escrow for {booking_id} is {status}, transition not permitted")]
    InvalidStatus {
        /// The booking whose record blocked the transition.
        booking_id: BookingId,
        /// The record's current status name.
        status: &'static str,
    },

    /// The caller is not the configured administrator.
    #[error("{caller} is not the escrow administrator")]
    NotAdmin {
        /// The rejected caller.
        caller: PrincipalId,
    },

    /// The proposed platform fee was not a positive value.
    #[error("invalid platform fee {fee}: fee must be positive")]
    InvalidFee {
        /// The rejected fee value.
        fee: u64,
    },
}

impl EscrowError {
    /// The stable numeric code for this error.
    pub fn code(&self) -> u32 {
        match self {
            Self::NotAuthorized { .. } => 100,
            Self::InvalidBooking { .. } => 101,
            Self::AlreadyDeposited { .. } => 102,
            Self::NoDeposit { .. } => 103,
            // Overloaded upstream code, see module docs.
            Self::DisputeActive { .. } | Self::NoActiveDispute { .. } => 104,
            Self::InvalidAmount { .. } => 105,
            Self::InvalidStatus { .. } => 106,
            Self::NotAdmin { .. } => 109,
            Self::InvalidFee { .. } => 110,
        }
    }
}

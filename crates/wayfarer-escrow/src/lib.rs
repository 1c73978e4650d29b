//! # wayfarer-escrow — Booking Escrow Ledger
//!
//! Mediates payment flow between a traveler and a guide with a platform fee
//! cut and a dispute-resolution path:
//!
//! - **Error** ([`error`]): structured error taxonomy with the stable
//!   numeric code contract callers match on.
//!
//! - **Record** ([`record`]): the per-booking escrow record and its status
//!   state machine (`Deposited → Released | Refunded`).
//!
//! - **Booking** ([`booking`]): the booking-validator collaborator seam
//!   used to authorize deposits.
//!
//! - **Transfer** ([`transfer`]): the fund-transfer primitive and the
//!   ordered in-memory audit log.
//!
//! - **Ledger** ([`ledger`]): the escrow ledger itself — deposit, release,
//!   refund, dispute flagging, admin dispute resolution, fee and registry
//!   administration.

pub mod booking;
pub mod error;
pub mod ledger;
pub mod record;
pub mod transfer;

// Re-export primary types for ergonomic imports.

// Error types
pub use error::EscrowError;

// Records
pub use record::{EscrowRecord, EscrowStatus};

// Booking validation
pub use booking::{
    BookingConfirmation, BookingRejected, BookingStatus, BookingValidator, StaticBookingValidator,
};

// Fund transfers
pub use transfer::{FundTransfer, TransferId, TransferLog, TransferRecord};

// Ledger
pub use ledger::{EscrowConfig, EscrowLedger, BOOKING_CONTRACT};

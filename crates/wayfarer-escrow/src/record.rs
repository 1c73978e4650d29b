//! # Escrow Records
//!
//! The per-booking escrow record and its status state machine.
//!
//! ## Transition Graph
//!
//! ```text
//! Deposited ──release_payment()────────▶ Released   (terminal)
//!     │
//!     ├─refund_payment()──────────────▶ Refunded   (terminal)
//!     │
//!     ├─flag_dispute()────────────────▶ Deposited  (dispute_active = true)
//!     │
//!     └─(dispute) resolve_dispute(true)──▶ Released
//!       (dispute) resolve_dispute(false)─▶ Refunded
//! ```
//!
//! A record is created exactly once by a successful deposit, mutated in
//! place by the transition operations, and never deleted. Once a terminal
//! status is reached no operation re-enters `Deposited`.

use serde::{Deserialize, Serialize};
use wayfarer_core::{BookingId, PrincipalId};

/// The lifecycle status of an escrow record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EscrowStatus {
    /// Funds are held by the escrow pending release, refund, or dispute
    /// resolution.
    Deposited,
    /// Funds were paid out to the guide. Terminal.
    Released,
    /// Funds were returned to the traveler. Terminal.
    Refunded,
}

impl EscrowStatus {
    /// The canonical string name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposited => "deposited",
            Self::Released => "released",
            Self::Refunded => "refunded",
        }
    }

    /// Whether this status is terminal (no further transitions allowed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Released | Self::Refunded)
    }

    /// Valid target statuses from this status.
    pub fn valid_transitions(&self) -> &'static [EscrowStatus] {
        match self {
            Self::Deposited => &[Self::Released, Self::Refunded],
            Self::Released | Self::Refunded => &[],
        }
    }
}

impl std::fmt::Display for EscrowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An escrow record for a single booking.
///
/// ## Invariants
///
/// - `amount + fee_amount` equals the gross amount originally deposited.
/// - `dispute_active` may be true only while `status == Deposited`.
/// - `status` is monotone: once `Released` or `Refunded`, it never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowRecord {
    /// The booking this escrow secures.
    pub booking_id: BookingId,
    /// The paying traveler.
    pub traveler: PrincipalId,
    /// The guide receiving the payment on release.
    pub guide: PrincipalId,
    /// Net amount held by the escrow (gross minus the platform fee).
    pub amount: u64,
    /// Current lifecycle status.
    pub status: EscrowStatus,
    /// Whether the traveler has flagged a dispute.
    pub dispute_active: bool,
    /// Ledger logical time at deposit.
    pub deposit_time: u64,
    /// Platform fee collected at deposit time.
    pub fee_amount: u64,
}

impl EscrowRecord {
    /// The gross amount originally deposited.
    pub fn gross_amount(&self) -> u64 {
        self.amount + self.fee_amount
    }
}

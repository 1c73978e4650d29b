//! # Escrow Ledger
//!
//! In-memory escrow ledger backed by `DashMap`, keyed by booking id.
//! Manages deposit, release, refund, dispute flagging, and admin dispute
//! resolution, each gated by authorization and status preconditions.
//!
//! Every operation is a synchronous, total function over ledger state: it
//! reads current state and commits the new state as one indivisible step.
//! Per-booking mutations run under a single map-entry lock, so two
//! concurrent deposits for the same booking cannot both succeed and a
//! release cannot interleave with a refund.
//!
//! ## Fee Semantics
//!
//! The platform fee is read at deposit time, not frozen when the booking is
//! created. An admin fee change that lands between booking creation and
//! deposit changes what the deposit pays. This is intended, user-visible
//! behavior.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;

use wayfarer_core::{BookingId, ContractId, PrincipalId};

use crate::booking::{BookingStatus, BookingValidator};
use crate::error::EscrowError;
use crate::record::{EscrowRecord, EscrowStatus};
use crate::transfer::FundTransfer;

/// Registry slot of the booking contract consulted at deposit time.
///
/// A deposit is rejected unless a collaborator address is registered under
/// this slot.
pub const BOOKING_CONTRACT: ContractId = ContractId::new(1);

/// Process-wide escrow configuration, fixed at ledger construction apart
/// from the admin-mutable platform fee.
#[derive(Debug, Clone)]
pub struct EscrowConfig {
    /// The administrator: receives fee cuts, may refund on the traveler's
    /// behalf, resolves disputes, and maintains configuration.
    pub admin: PrincipalId,
    /// Initial platform fee, deducted from every deposit. Must be positive.
    pub platform_fee: u64,
}

/// The escrow ledger: a mapping from booking id to escrow record, plus the
/// booking-contract registry and process-wide configuration.
///
/// Generic over the two collaborator seams: `V` validates bookings at
/// deposit time and `T` receives emitted fund transfers.
pub struct EscrowLedger<V, T> {
    admin: PrincipalId,
    holding: PrincipalId,
    platform_fee: RwLock<u64>,
    escrows: DashMap<BookingId, EscrowRecord>,
    contracts: DashMap<ContractId, PrincipalId>,
    clock: AtomicU64,
    validator: V,
    transfers: T,
}

impl<V, T> EscrowLedger<V, T>
where
    V: BookingValidator,
    T: FundTransfer,
{
    /// Create a ledger with the given configuration and collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`EscrowError::InvalidFee`] if the configured platform fee
    /// is zero.
    pub fn new(config: EscrowConfig, validator: V, transfers: T) -> Result<Self, EscrowError> {
        if config.platform_fee == 0 {
            return Err(EscrowError::InvalidFee {
                fee: config.platform_fee,
            });
        }
        Ok(Self {
            admin: config.admin,
            holding: PrincipalId::holding(),
            platform_fee: RwLock::new(config.platform_fee),
            escrows: DashMap::new(),
            contracts: DashMap::new(),
            clock: AtomicU64::new(0),
            validator,
            transfers,
        })
    }

    // -----------------------------------------------------------------
    // Deposits
    // -----------------------------------------------------------------

    /// Deposit a gross amount into escrow for a booking.
    ///
    /// The platform fee in effect at this call is split off and paid to the
    /// admin; the remaining net amount moves to the holding account and is
    /// recorded on the new escrow record. The existence check and the
    /// record insert are one atomic step.
    ///
    /// Deposits whose gross does not exceed the fee are rejected: the net
    /// held amount must stay positive.
    ///
    /// # Errors
    ///
    /// - [`EscrowError::AlreadyDeposited`] if a record exists for the
    ///   booking — records are never replaced, even after release or
    ///   refund.
    /// - [`EscrowError::InvalidAmount`] if `gross_amount` does not exceed
    ///   the current platform fee.
    /// - [`EscrowError::InvalidBooking`] if the booking-contract
    ///   registration is absent, the validator rejects the booking, or the
    ///   booking is not confirmed.
    pub fn deposit_payment(
        &self,
        booking_id: BookingId,
        gross_amount: u64,
        caller: &PrincipalId,
    ) -> Result<EscrowRecord, EscrowError> {
        match self.escrows.entry(booking_id) {
            Entry::Occupied(_) => Err(EscrowError::AlreadyDeposited { booking_id }),
            Entry::Vacant(slot) => {
                let fee = *self.platform_fee.read();
                if gross_amount <= fee {
                    return Err(EscrowError::InvalidAmount {
                        gross: gross_amount,
                        fee,
                    });
                }

                if !self.contracts.contains_key(&BOOKING_CONTRACT) {
                    return Err(EscrowError::InvalidBooking {
                        booking_id,
                        reason: "no booking contract registered".to_string(),
                    });
                }
                let confirmation = self.validator.validate(booking_id).map_err(|err| {
                    EscrowError::InvalidBooking {
                        booking_id,
                        reason: err.to_string(),
                    }
                })?;
                if confirmation.status != BookingStatus::Confirmed {
                    return Err(EscrowError::InvalidBooking {
                        booking_id,
                        reason: format!("booking status is {}", confirmation.status),
                    });
                }

                let net = gross_amount - fee;
                // Fee cut first, then the held net amount. Ordering is part
                // of the audit contract.
                self.transfers.transfer(fee, caller, &self.admin);
                self.transfers.transfer(net, caller, &self.holding);

                let record = EscrowRecord {
                    booking_id,
                    traveler: caller.clone(),
                    guide: confirmation.guide,
                    amount: net,
                    status: EscrowStatus::Deposited,
                    dispute_active: false,
                    deposit_time: self.clock.load(Ordering::SeqCst),
                    fee_amount: fee,
                };
                slot.insert(record.clone());
                tracing::info!(
                    booking_id = %booking_id,
                    traveler = %record.traveler,
                    amount = net,
                    fee,
                    "escrow deposited"
                );
                Ok(record)
            }
        }
    }

    // -----------------------------------------------------------------
    // Settlement transitions
    // -----------------------------------------------------------------

    /// Release the held amount to the guide.
    ///
    /// Only the traveler may release, only from `Deposited`, and only while
    /// no dispute is flagged.
    ///
    /// # Errors
    ///
    /// In precedence order: [`EscrowError::NoDeposit`],
    /// [`EscrowError::NotAuthorized`], [`EscrowError::InvalidStatus`],
    /// [`EscrowError::DisputeActive`].
    pub fn release_payment(
        &self,
        booking_id: BookingId,
        caller: &PrincipalId,
    ) -> Result<EscrowRecord, EscrowError> {
        let mut entry = self
            .escrows
            .get_mut(&booking_id)
            .ok_or(EscrowError::NoDeposit { booking_id })?;
        let record = entry.value_mut();

        if record.traveler != *caller {
            return Err(EscrowError::NotAuthorized {
                caller: caller.clone(),
                booking_id,
            });
        }
        Self::require_deposited(record)?;
        if record.dispute_active {
            return Err(EscrowError::DisputeActive { booking_id });
        }

        record.status = EscrowStatus::Released;
        self.transfers
            .transfer(record.amount, &self.holding, &record.guide);
        tracing::info!(
            booking_id = %booking_id,
            guide = %record.guide,
            amount = record.amount,
            "escrow released"
        );
        Ok(record.clone())
    }

    /// Refund the held amount to the traveler.
    ///
    /// The traveler or the admin may refund, only from `Deposited`, and
    /// only while no dispute is flagged.
    ///
    /// # Errors
    ///
    /// Same taxonomy and precedence as
    /// [`release_payment`](EscrowLedger::release_payment), with the admin
    /// admitted as an alternate actor.
    pub fn refund_payment(
        &self,
        booking_id: BookingId,
        caller: &PrincipalId,
    ) -> Result<EscrowRecord, EscrowError> {
        let mut entry = self
            .escrows
            .get_mut(&booking_id)
            .ok_or(EscrowError::NoDeposit { booking_id })?;
        let record = entry.value_mut();

        if record.traveler != *caller && self.admin != *caller {
            return Err(EscrowError::NotAuthorized {
                caller: caller.clone(),
                booking_id,
            });
        }
        Self::require_deposited(record)?;
        if record.dispute_active {
            return Err(EscrowError::DisputeActive { booking_id });
        }

        record.status = EscrowStatus::Refunded;
        self.transfers
            .transfer(record.amount, &self.holding, &record.traveler);
        tracing::info!(
            booking_id = %booking_id,
            traveler = %record.traveler,
            amount = record.amount,
            "escrow refunded"
        );
        Ok(record.clone())
    }

    // -----------------------------------------------------------------
    // Disputes
    // -----------------------------------------------------------------

    /// Flag a dispute on a deposited escrow. No funds move.
    ///
    /// Only the traveler may flag, only from `Deposited`, and only once:
    /// an active dispute blocks re-flagging until resolved.
    ///
    /// # Errors
    ///
    /// In precedence order: [`EscrowError::NoDeposit`],
    /// [`EscrowError::NotAuthorized`], [`EscrowError::InvalidStatus`],
    /// [`EscrowError::DisputeActive`].
    pub fn flag_dispute(
        &self,
        booking_id: BookingId,
        caller: &PrincipalId,
    ) -> Result<EscrowRecord, EscrowError> {
        let mut entry = self
            .escrows
            .get_mut(&booking_id)
            .ok_or(EscrowError::NoDeposit { booking_id })?;
        let record = entry.value_mut();

        if record.traveler != *caller {
            return Err(EscrowError::NotAuthorized {
                caller: caller.clone(),
                booking_id,
            });
        }
        Self::require_deposited(record)?;
        if record.dispute_active {
            return Err(EscrowError::DisputeActive { booking_id });
        }

        record.dispute_active = true;
        tracing::info!(booking_id = %booking_id, "dispute flagged");
        Ok(record.clone())
    }

    /// Resolve an active dispute, settling the escrow to the guide or back
    /// to the traveler.
    ///
    /// Admin-only. Clears the dispute flag and commits the terminal status
    /// selected by `release_to_guide`.
    ///
    /// # Errors
    ///
    /// In precedence order: [`EscrowError::NoDeposit`],
    /// [`EscrowError::NotAuthorized`] (non-admin caller),
    /// [`EscrowError::NoActiveDispute`], [`EscrowError::InvalidStatus`].
    pub fn resolve_dispute(
        &self,
        booking_id: BookingId,
        caller: &PrincipalId,
        release_to_guide: bool,
    ) -> Result<EscrowRecord, EscrowError> {
        let mut entry = self
            .escrows
            .get_mut(&booking_id)
            .ok_or(EscrowError::NoDeposit { booking_id })?;
        let record = entry.value_mut();

        if self.admin != *caller {
            return Err(EscrowError::NotAuthorized {
                caller: caller.clone(),
                booking_id,
            });
        }
        if !record.dispute_active {
            return Err(EscrowError::NoActiveDispute { booking_id });
        }
        Self::require_deposited(record)?;

        let beneficiary = if release_to_guide {
            record.status = EscrowStatus::Released;
            record.guide.clone()
        } else {
            record.status = EscrowStatus::Refunded;
            record.traveler.clone()
        };
        record.dispute_active = false;
        self.transfers
            .transfer(record.amount, &self.holding, &beneficiary);
        tracing::info!(
            booking_id = %booking_id,
            beneficiary = %beneficiary,
            status = record.status.as_str(),
            "dispute resolved"
        );
        Ok(record.clone())
    }

    // -----------------------------------------------------------------
    // Administration
    // -----------------------------------------------------------------

    /// Update the platform fee. Admin-only; the fee must stay positive.
    ///
    /// Takes effect for subsequent deposits only — existing records keep
    /// the fee collected at their deposit.
    ///
    /// # Errors
    ///
    /// Returns [`EscrowError::NotAdmin`] for non-admin callers and
    /// [`EscrowError::InvalidFee`] for a zero fee.
    pub fn set_platform_fee(&self, caller: &PrincipalId, fee: u64) -> Result<(), EscrowError> {
        if self.admin != *caller {
            return Err(EscrowError::NotAdmin {
                caller: caller.clone(),
            });
        }
        if fee == 0 {
            return Err(EscrowError::InvalidFee { fee });
        }
        *self.platform_fee.write() = fee;
        tracing::info!(fee, "platform fee updated");
        Ok(())
    }

    /// Register or overwrite a collaborator-contract address. Admin-only.
    ///
    /// # Errors
    ///
    /// Returns [`EscrowError::NotAdmin`] for non-admin callers.
    pub fn set_booking_contract(
        &self,
        caller: &PrincipalId,
        contract_id: ContractId,
        address: PrincipalId,
    ) -> Result<(), EscrowError> {
        if self.admin != *caller {
            return Err(EscrowError::NotAdmin {
                caller: caller.clone(),
            });
        }
        self.contracts.insert(contract_id, address);
        Ok(())
    }

    // -----------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------

    /// The escrow record for a booking, if one exists.
    pub fn escrow_details(&self, booking_id: BookingId) -> Option<EscrowRecord> {
        self.escrows.get(&booking_id).map(|r| r.value().clone())
    }

    /// The platform fee currently in effect.
    pub fn platform_fee(&self) -> u64 {
        *self.platform_fee.read()
    }

    /// The registered collaborator address for a contract slot, if any.
    pub fn booking_contract(&self, contract_id: ContractId) -> Option<PrincipalId> {
        self.contracts.get(&contract_id).map(|r| r.value().clone())
    }

    /// The configured administrator.
    pub fn admin(&self) -> &PrincipalId {
        &self.admin
    }

    /// The holding account carrying net amounts between deposit and
    /// settlement.
    pub fn holding_account(&self) -> &PrincipalId {
        &self.holding
    }

    // -----------------------------------------------------------------
    // Logical clock
    // -----------------------------------------------------------------

    /// Current logical time. New deposits stamp this value as their
    /// `deposit_time`.
    pub fn logical_time(&self) -> u64 {
        self.clock.load(Ordering::SeqCst)
    }

    /// Advance the logical clock.
    pub fn advance_time(&self, ticks: u64) {
        self.clock.fetch_add(ticks, Ordering::SeqCst);
    }

    /// Status precondition shared by every transition out of `Deposited`.
    fn require_deposited(record: &EscrowRecord) -> Result<(), EscrowError> {
        if record.status != EscrowStatus::Deposited {
            return Err(EscrowError::InvalidStatus {
                booking_id: record.booking_id,
                status: record.status.as_str(),
            });
        }
        Ok(())
    }
}

impl<V, T> std::fmt::Debug for EscrowLedger<V, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EscrowLedger")
            .field("admin", &self.admin)
            .field("platform_fee", &*self.platform_fee.read())
            .field("escrow_count", &self.escrows.len())
            .field("contract_count", &self.contracts.len())
            .finish()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::booking::StaticBookingValidator;
    use crate::transfer::TransferLog;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn principal(s: &str) -> PrincipalId {
        PrincipalId::new(s).unwrap()
    }

    fn ledger_with_fee(
        fee: u64,
    ) -> EscrowLedger<StaticBookingValidator, Arc<TransferLog>> {
        let admin = principal("ST1ADMIN");
        let ledger = EscrowLedger::new(
            EscrowConfig {
                admin: admin.clone(),
                platform_fee: fee,
            },
            StaticBookingValidator::confirming(principal("ST1GUIDE")),
            Arc::new(TransferLog::new()),
        )
        .unwrap();
        ledger
            .set_booking_contract(&admin, BOOKING_CONTRACT, principal("ST1BOOKING"))
            .unwrap();
        ledger
    }

    proptest! {
        /// Every accepted deposit splits the gross exactly: net plus fee
        /// recombine to the deposited amount, and the net is positive.
        #[test]
        fn fee_split_is_exact(fee in 1u64..10_000, gross in 1u64..1_000_000) {
            let ledger = ledger_with_fee(fee);
            let traveler = principal("ST1TRAVELER");
            match ledger.deposit_payment(BookingId::new(1), gross, &traveler) {
                Ok(record) => {
                    prop_assert!(gross > fee);
                    prop_assert!(record.amount > 0);
                    prop_assert_eq!(record.amount + record.fee_amount, gross);
                    prop_assert_eq!(record.fee_amount, fee);
                }
                Err(err) => {
                    prop_assert!(gross <= fee);
                    prop_assert_eq!(err.code(), 105);
                }
            }
        }

        /// Repeated deposits for one booking leave exactly the first record
        /// in place, whatever the later amounts.
        #[test]
        fn at_most_one_record_per_booking(amounts in prop::collection::vec(101u64..100_000, 2..6)) {
            let ledger = ledger_with_fee(100);
            let traveler = principal("ST1TRAVELER");
            let booking = BookingId::new(7);

            let first = ledger
                .deposit_payment(booking, amounts[0], &traveler)
                .unwrap();
            for &amount in &amounts[1..] {
                let err = ledger.deposit_payment(booking, amount, &traveler).unwrap_err();
                prop_assert_eq!(err.code(), 102);
            }
            prop_assert_eq!(ledger.escrow_details(booking), Some(first));
        }
    }
}

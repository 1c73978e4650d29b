//! # wayfarer-core — Foundational Types
//!
//! Domain-primitive types shared across the Wayfarer escrow workspace:
//!
//! - **Identity** ([`identity`]): identifier newtypes for account principals,
//!   bookings, and collaborator-contract registry slots. Each identifier is a
//!   distinct type — you cannot pass a [`BookingId`] where a [`ContractId`]
//!   is expected.
//!
//! - **Error** ([`error`]): structured validation errors raised when a
//!   domain primitive is constructed from invalid input.

pub mod error;
pub mod identity;

pub use error::ValidationError;
pub use identity::{BookingId, ContractId, PrincipalId};

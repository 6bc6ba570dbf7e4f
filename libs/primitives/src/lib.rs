// This file is part of the Taiyi chain-core project.
// SPDX-License-Identifier: Apache-2.0

//! Shared identifiers, time helpers, and the error taxonomy used across every
//! `taiyi-*` crate. Nothing in this crate talks to the store, the VM, or the
//! network — it is the pure value layer every other component depends on.

mod error;
mod time;

pub use error::{ChainError, ChainResult};
pub use time::{BlockNumber, Time, BLOCK_INTERVAL_SECS, TIME_MAX};

/// The name of an account. Accounts are created once and never destroyed
/// (see `spec.md` §3), so this is simply an interned owned string rather
/// than a numeric id — names are how transactions reference accounts.
pub type AccountName = String;

/// The name of a registered contract.
pub type ContractName = String;

/// The symbol string of an `NFASymbol` (e.g. `"nfa.actor.default"`).
pub type SymbolName = String;

/// The name of a `Zone`.
pub type ZoneName = String;

/// Opaque, monotonically assigned id for an `NFA`.
pub type NfaId = u64;

/// Opaque, monotonically assigned id for a `Zone`.
pub type ZoneId = u64;

/// Opaque, monotonically assigned id for a `Contract`.
pub type ContractId = u64;

/// Opaque, monotonically assigned id for an `NFASymbol`.
pub type SymbolId = u64;

/// Transaction id, as carried by `TransactionObject`.
pub type TransactionId = [u8; 20];

/// A raw amount of an asset, in the asset's smallest unit ("satoshis").
pub type Satoshis = i64;

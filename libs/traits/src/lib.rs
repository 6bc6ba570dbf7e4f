// This file is part of the Taiyi chain-core project.
// SPDX-License-Identifier: Apache-2.0

//! Collaborator traits. `spec.md` §1 calls out the script VM, the on-disk
//! container, the plugin framework, and P2P/consensus as things this crate
//! family only needs to see through narrow interfaces. Those interfaces live
//! here so `taiyi-nfa`/`taiyi-zone`/`taiyi-evaluator` can be built and tested
//! without ever linking a real VM or a real disk backend.

use std::collections::BTreeMap;

use taiyi_primitives::{AccountName, ChainResult, Time};

/// A value produced or consumed by the script VM. The VM's own value model
/// (tables, closures, userdata, ...) is out of scope (`spec.md` §1); this is
/// just enough structure for the core to snapshot, persist, and hand values
/// back across the VM boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptValue {
    Nil,
    Bool(bool),
    Int(i64),
    Str(String),
    Table(ScriptTable),
}

/// An opaque, contract-populated data table. Used for `NFA::data`,
/// `Contract::contract_data`, and `AccountContractData::contract_data`.
pub type ScriptTable = BTreeMap<String, ScriptValue>;

fn script_value_size(value: &ScriptValue) -> usize {
    match value {
        ScriptValue::Nil => 0,
        ScriptValue::Bool(_) => 1,
        ScriptValue::Int(_) => 8,
        ScriptValue::Str(s) => s.len(),
        ScriptValue::Table(t) => pack_size(t),
    }
}

/// A rough serialized-byte-size estimate for a `ScriptTable`, used to
/// enforce the `spec.md` §4.4 size ceilings (3 KiB of account-contract
/// data, 10 MiB of contract data) and to feed the state-growth term of
/// mana charges (`spec.md` §4.3). Exact wire format is out of scope
/// (`spec.md` §1); this only needs to be a stable, monotonic proxy for it.
pub fn pack_size(table: &ScriptTable) -> usize {
    table
        .iter()
        .map(|(key, value)| key.len() + script_value_size(value))
        .sum()
}

/// A signing public key, as carried in a transaction's recovered signature
/// set (`sigkeys` in `spec.md` §4.4). Cryptographic primitive design is out
/// of scope (`spec.md` §1 Non-goals), so this is a thin opaque wrapper
/// rather than a real curve point.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct PublicKey(pub String);

/// Per-call VM context, initialized fresh for each NFA tick
/// (`initialize_VM_baseENV` in `spec.md` §4.4) and reused across the calls
/// made while creating an NFA.
pub struct VmContext {
    inner: Box<dyn std::any::Any + Send>,
}

impl VmContext {
    pub fn new<T: std::any::Any + Send>(inner: T) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    pub fn downcast_ref<T: std::any::Any>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }

    pub fn downcast_mut<T: std::any::Any>(&mut self) -> Option<&mut T> {
        self.inner.downcast_mut()
    }
}

/// The script VM, treated as a pluggable capability per `spec.md` §9: the
/// core only depends on mana-drop semantics, never on VM internals.
pub trait ContractVm {
    /// Runs `function` on behalf of `caller`, charging against `vm_drops`
    /// (decremented in place; the caller computes `used_drops` from the
    /// delta). Returns the table the contract produced.
    fn run_contract_function(
        &self,
        caller: &AccountName,
        function: &str,
        args: &[ScriptValue],
        account_data: &mut ScriptTable,
        sigkeys: &[PublicKey],
        vm_drops: &mut i64,
        reset_vm_memused: bool,
        context: &mut VmContext,
    ) -> ChainResult<ScriptTable>;

    /// True if `contract` exposes a function named `function` in its ABI.
    fn has_function(&self, contract: &ScriptTable, function: &str) -> bool;

    /// Builds a fresh context for a periodic tick, independent of any
    /// in-flight transaction (`initialize_VM_baseENV`).
    fn initialize_base_env(&self) -> VmContext;
}

/// Abstraction over "pay the owner of a contract whose code just ran".
/// Implemented by the store so `taiyi-mana`/`taiyi-nfa` can charge and
/// reward without depending on the store crate directly.
pub trait RewardContractOwner {
    fn reward_contract_owner(&mut self, owner: &AccountName, qi_amount: i64) -> ChainResult<()>;
}

/// The chain's notion of "now", abstracted so tests can fix it.
pub trait Clock {
    fn head_block_time(&self) -> Time;
}

/// The kind of side effect an operation had on an NFA (`spec.md` §4.6,
/// §9: "use a tagged variant per action kind rather than open-ended
/// dynamic records").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffectedAction {
    CreateFor,
    CreateBy,
    TransferFrom,
    TransferTo,
}

/// A single `nfa_affected` record (`spec.md` §4.6): which account was
/// affected, which NFA, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfaAffected {
    pub affected_account: AccountName,
    pub affected_item: taiyi_primitives::NfaId,
    pub action: AffectedAction,
}

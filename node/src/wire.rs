//! Wire-level block/transaction shapes (`spec.md` §4.7, §3). These are the
//! concrete payloads `WriteContext` carries; nothing upstream of the writer
//! (the evaluators, the store) knows about them.

use taiyi_evaluator::Operation;
use taiyi_primitives::{AccountName, BlockNumber, Time, TransactionId};
use taiyi_traits::PublicKey;

/// A transaction that has already passed signature recovery: `sigkeys` is
/// the set of public keys the caller asserts signed it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SignedTransaction {
    pub trx_id: TransactionId,
    pub expiration: Time,
    pub sigkeys: Vec<PublicKey>,
    pub operations: Vec<Operation>,
}

/// A block as presented to `push_block` — already assembled and signed
/// upstream of this crate; consensus/signature verification is out of
/// scope (`spec.md` §1 Non-goals).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SignedBlock {
    pub block_num: BlockNumber,
    pub block_id: String,
    pub timestamp: Time,
    pub transactions: Vec<SignedTransaction>,
}

/// Flags that relax validation for a single `push_block`/`generate_block`
/// call (`spec.md` §4.7 `skip_flags`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SkipFlags {
    pub skip_transaction_signatures: bool,
}

/// Pluggable block assembly, mirrored on `ContractVm`/`GrowZone`
/// (`spec.md` §4.7: "only one block-generator implementation may be
/// registered at a time").
pub trait BlockGenerator {
    fn generate_block(
        &self,
        when: Time,
        witness: &AccountName,
        signing_key: &PublicKey,
        skip: SkipFlags,
    ) -> taiyi_primitives::ChainResult<SignedBlock>;
}

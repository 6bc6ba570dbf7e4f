//! JSON-RPC surface (`spec.md` §6, component C7): `push_block` and
//! `push_transaction`, as a `#[rpc(server)]` trait plus a plain struct
//! implementing the generated `*Server` trait. Each method translates a
//! domain outcome into the `{ success, error? }` envelope `spec.md` §6
//! specifies.

use jsonrpsee::core::RpcResult;
use jsonrpsee::proc_macros::rpc;
use serde::{Deserialize, Serialize};

use crate::pipeline::{push_block as enqueue_push_block, push_transaction as enqueue_push_transaction};
use crate::pipeline::{WriteOutcome, WriteSender};
use crate::wire::{SignedBlock, SignedTransaction, SkipFlags};
use taiyi_primitives::ChainError;
use taiyi_traits::NfaAffected;

/// `push_block`/`push_transaction`'s `{ success, error? }` envelope
/// (`spec.md` §6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushResult {
    pub success: bool,
    pub error: Option<String>,
    pub affected: Vec<AffectedWire>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffectedWire {
    pub affected_account: String,
    pub affected_item: u64,
    pub action: String,
}

impl From<&NfaAffected> for AffectedWire {
    fn from(a: &NfaAffected) -> Self {
        let action = match a.action {
            taiyi_traits::AffectedAction::CreateFor => "create_for",
            taiyi_traits::AffectedAction::CreateBy => "create_by",
            taiyi_traits::AffectedAction::TransferFrom => "transfer_from",
            taiyi_traits::AffectedAction::TransferTo => "transfer_to",
        };
        Self {
            affected_account: a.affected_account.clone(),
            affected_item: a.affected_item,
            action: action.to_string(),
        }
    }
}

/// All six `ChainError` kinds — including `Ingress` (duplicate
/// transaction, block too far in the future, writer unavailable) — map to
/// `success=false` here rather than a transport-level RPC error, per
/// `spec.md` §7: "errors surface via the JSON-RPC response (`success=false`,
/// `error` filled)".
fn into_push_result(outcome: Result<WriteOutcome, ChainError>) -> PushResult {
    match outcome {
        Ok(WriteOutcome::BlockApplied { affected, .. })
        | Ok(WriteOutcome::TransactionApplied { affected, .. }) => PushResult {
            success: true,
            error: None,
            affected: affected.iter().map(AffectedWire::from).collect(),
        },
        Ok(WriteOutcome::BlockGenerated { .. }) => PushResult {
            success: true,
            error: None,
            affected: vec![],
        },
        Err(e) => PushResult {
            success: false,
            error: Some(e.to_string()),
            affected: vec![],
        },
    }
}

/// `spec.md` §6 "JSON-RPC surface of the chain API". Methods are
/// synchronous at the RPC layer, blocking on the write pipeline's oneshot
/// response via `futures::executor::block_on` rather than spreading
/// `async` through the server setup.
#[rpc(server)]
pub trait ChainApi {
    #[method(name = "push_block")]
    fn push_block(&self, block: SignedBlock, skip: SkipFlags) -> RpcResult<PushResult>;

    #[method(name = "push_transaction")]
    fn push_transaction(&self, transaction: SignedTransaction) -> RpcResult<PushResult>;
}

pub struct ChainApiImpl {
    sender: WriteSender,
}

impl ChainApiImpl {
    pub fn new(sender: WriteSender) -> Self {
        Self { sender }
    }
}

impl ChainApiServer for ChainApiImpl {
    fn push_block(&self, block: SignedBlock, skip: SkipFlags) -> RpcResult<PushResult> {
        let outcome = futures::executor::block_on(enqueue_push_block(&self.sender, block, skip));
        Ok(into_push_result(outcome))
    }

    fn push_transaction(&self, transaction: SignedTransaction) -> RpcResult<PushResult> {
        let outcome = futures::executor::block_on(enqueue_push_transaction(&self.sender, transaction));
        Ok(into_push_result(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_maps_to_unsuccessful_push_result() {
        let result = into_push_result(Err(ChainError::validation("bad block")));
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("validation failed: bad block"));
    }

    #[test]
    fn affected_wire_names_match_action_kind() {
        let affected = NfaAffected {
            affected_account: "alice".into(),
            affected_item: 7,
            action: taiyi_traits::AffectedAction::TransferTo,
        };
        let wire = AffectedWire::from(&affected);
        assert_eq!(wire.action, "transfer_to");
        assert_eq!(wire.affected_item, 7);
    }
}

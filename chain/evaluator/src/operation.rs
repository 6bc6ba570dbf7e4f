use taiyi_primitives::{AccountName, ContractId, NfaId, SymbolId, ZoneId, ZoneName};
use taiyi_traits::{NfaAffected, PublicKey};

/// A single operation carried by a transaction (`spec.md` §4.6). `NfaTick`
/// is deliberately absent: it is applied at block-application time by the
/// NFA engine (C4), never carried inside a transaction.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Operation {
    CreateNfaSymbol {
        creator: AccountName,
        symbol: String,
        describe: String,
        default_contract: ContractId,
    },
    CreateNfa {
        creator: AccountName,
        symbol_id: SymbolId,
        sigkeys: Vec<PublicKey>,
        reset_vm_memused: bool,
    },
    TransferNfa {
        from: AccountName,
        to: AccountName,
        id: NfaId,
    },
    CreateZone {
        creator: AccountName,
        name: ZoneName,
        zone_type: String,
        sigkeys: Vec<PublicKey>,
    },
    ConnectToZone {
        account: AccountName,
        from: ZoneId,
        to: ZoneId,
    },
}

/// The result of applying one operation (`spec.md` §4.6): the side effects
/// it had on NFAs, in emission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationResult {
    pub affected: Vec<NfaAffected>,
}

impl OperationResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_affected(affected: Vec<NfaAffected>) -> Self {
        Self { affected }
    }
}

use taiyi_asset::AssetSymbol;
use taiyi_mana::ManaBar;
use taiyi_primitives::{
    AccountName, ContractId, ContractName, NfaId, Satoshis, SymbolId, Time, TransactionId, ZoneId,
    ZoneName,
};
use taiyi_traits::{PublicKey, ScriptTable};

/// `spec.md` §3: "unique name; holds a mana bar ...; lifecycle: created
/// once, never destroyed".
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub name: AccountName,
    pub mana_bar: ManaBar,
    pub qi_balance: Satoshis,
}

/// `spec.md` §3: "unique name; owner account; an ABI; `contract_data`;
/// `check_contract_authority` flag; `contract_authority` public key."
#[derive(Debug, Clone, PartialEq)]
pub struct Contract {
    pub id: ContractId,
    pub name: ContractName,
    pub owner: AccountName,
    pub abi: Vec<String>,
    pub contract_data: ScriptTable,
    pub check_contract_authority: bool,
    pub contract_authority: PublicKey,
}

impl Contract {
    pub fn has_abi_function(&self, function: &str) -> bool {
        self.abi.iter().any(|f| f == function)
    }
}

/// `spec.md` §3: "tuple-keyed by (account, contract); per-caller private
/// data for a contract. Auto-created on first use."
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AccountContractData {
    pub contract_data: ScriptTable,
}

/// `spec.md` §3/§4.4: "unique symbol string; creator name; human-readable
/// description; reference to a default contract; monotonically increasing
/// instance `count`."
#[derive(Debug, Clone, PartialEq)]
pub struct NfaSymbol {
    pub id: SymbolId,
    pub symbol: String,
    pub creator: AccountName,
    pub describe: String,
    pub default_contract: ContractId,
    pub count: u64,
}

/// `spec.md` §3: "opaque id; creator and current owner; symbol-id;
/// main-contract id; creation time; mana bar; a `qi` balance; opaque `data`
/// table; `next_tick_time`."
#[derive(Debug, Clone, PartialEq)]
pub struct Nfa {
    pub id: NfaId,
    pub creator: AccountName,
    pub owner_account: AccountName,
    pub symbol_id: SymbolId,
    pub main_contract: ContractId,
    pub created_time: Time,
    pub mana_bar: ManaBar,
    pub qi: Satoshis,
    pub data: ScriptTable,
    pub next_tick_time: Time,
}

/// `spec.md` §3: "keyed by (nfa-id, symbol) for any non-`qi` asset."
#[derive(Debug, Clone, PartialEq)]
pub struct NfaRegularBalance {
    pub nfa_id: NfaId,
    pub symbol: AssetSymbol,
    pub liquid: Satoshis,
}

/// `spec.md` §3: "unique name; associated NFA id; typed."
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub id: ZoneId,
    pub name: ZoneName,
    pub nfa_id: NfaId,
    pub zone_type: crate::zone_type::ZoneType,
}

/// `spec.md` §3: "directed edge (from-zone-id, to-zone-id); unique per
/// ordered pair."
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ZoneConnect {
    pub from: ZoneId,
    pub to: ZoneId,
}

/// `spec.md` §3: "packed bytes + trx-id + expiration; kept only to detect
/// duplicates; purged on expiration."
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionObject {
    pub trx_id: TransactionId,
    pub packed: Vec<u8>,
    pub expiration: Time,
}

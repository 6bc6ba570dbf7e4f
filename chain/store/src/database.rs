use std::collections::{BTreeMap, BTreeSet};

use taiyi_asset::AssetSymbol;
use taiyi_primitives::{
    AccountName, ChainError, ChainResult, ContractId, ContractName, NfaId, SymbolId, Time,
    TransactionId, ZoneId, ZoneName,
};
use taiyi_traits::RewardContractOwner;

use crate::entities::{
    Account, AccountContractData, Contract, Nfa, NfaRegularBalance, NfaSymbol, TransactionObject,
    Zone, ZoneConnect,
};
use crate::table::{IdTable, NamedTable};

/// The `spec.md` §3 aggregate: owns every entity table and the secondary
/// indexes declared for it. Exactly one `Database` exists per running node
/// (`spec.md` §5, "single-writer, many-readers") — mutation always goes
/// through `&mut self`.
#[derive(Default)]
pub struct Database {
    accounts: NamedTable<AccountName, Account>,

    contracts: IdTable<Contract>,
    contracts_by_name: BTreeMap<ContractName, ContractId>,

    account_contract_data: BTreeMap<(AccountName, ContractName), AccountContractData>,

    nfa_symbols: IdTable<NfaSymbol>,
    nfa_symbols_by_name: BTreeMap<String, SymbolId>,

    nfas: IdTable<Nfa>,
    nfas_by_next_tick_time: BTreeSet<(Time, NfaId)>,

    nfa_regular_balances: BTreeMap<(NfaId, AssetSymbol), NfaRegularBalance>,

    zones: IdTable<Zone>,
    zones_by_name: BTreeMap<ZoneName, ZoneId>,

    zone_connects: BTreeSet<ZoneConnect>,

    transaction_objects: BTreeMap<TransactionId, TransactionObject>,
    transaction_objects_by_expiration: BTreeSet<(Time, TransactionId)>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Account --------------------------------------------------------

    pub fn create_account(&mut self, account: Account) -> ChainResult<&Account> {
        let name = account.name.clone();
        self.accounts.create(name, account)
    }

    pub fn find_account(&self, name: &AccountName) -> Option<&Account> {
        self.accounts.find(name)
    }

    pub fn get_account(&self, name: &AccountName) -> ChainResult<&Account> {
        self.accounts.get(name)
    }

    pub fn modify_account(
        &mut self,
        name: &AccountName,
        f: impl FnOnce(&mut Account),
    ) -> ChainResult<()> {
        self.accounts.modify(name, f)
    }

    pub fn try_modify_account(
        &mut self,
        name: &AccountName,
        f: impl FnOnce(&mut Account) -> ChainResult<()>,
    ) -> ChainResult<()> {
        self.accounts.try_modify(name, f)
    }

    pub fn account_count(&self) -> usize {
        self.accounts.iter().count()
    }

    // --- Contract ---------------------------------------------------------

    pub fn create_contract(
        &mut self,
        name: ContractName,
        build: impl FnOnce(ContractId) -> Contract,
    ) -> ChainResult<&Contract> {
        if self.contracts_by_name.contains_key(&name) {
            return Err(ChainError::validation(format!(
                "contract {name} already exists"
            )));
        }
        let (id, contract) = self.contracts.create(build);
        self.contracts_by_name.insert(contract.name.clone(), id);
        Ok(contract)
    }

    pub fn get_contract(&self, id: ContractId) -> ChainResult<&Contract> {
        self.contracts.get(id)
    }

    pub fn find_contract(&self, id: ContractId) -> Option<&Contract> {
        self.contracts.find(id)
    }

    pub fn find_contract_by_name(&self, name: &ContractName) -> Option<&Contract> {
        let id = *self.contracts_by_name.get(name)?;
        self.contracts.find(id)
    }

    pub fn contract_count(&self) -> usize {
        self.contracts.len()
    }

    pub fn modify_contract(&mut self, id: ContractId, f: impl FnOnce(&mut Contract)) -> ChainResult<()> {
        self.contracts.modify(id, f)
    }

    // --- AccountContractData ----------------------------------------------

    /// Returns the caller's private data for `contract`, auto-creating an
    /// empty record on first use (`spec.md` §3).
    pub fn account_contract_data_mut(
        &mut self,
        account: &AccountName,
        contract: &ContractName,
    ) -> &mut AccountContractData {
        self.account_contract_data
            .entry((account.clone(), contract.clone()))
            .or_default()
    }

    // --- NfaSymbol ----------------------------------------------------------

    pub fn create_nfa_symbol(
        &mut self,
        symbol: String,
        build: impl FnOnce(SymbolId) -> NfaSymbol,
    ) -> ChainResult<&NfaSymbol> {
        if self.nfa_symbols_by_name.contains_key(&symbol) {
            return Err(ChainError::validation(format!(
                "symbol {symbol} already exists"
            )));
        }
        let (id, row) = self.nfa_symbols.create(build);
        self.nfa_symbols_by_name.insert(row.symbol.clone(), id);
        Ok(row)
    }

    pub fn find_nfa_symbol_by_name(&self, symbol: &str) -> Option<&NfaSymbol> {
        let id = *self.nfa_symbols_by_name.get(symbol)?;
        self.nfa_symbols.find(id)
    }

    pub fn get_nfa_symbol(&self, id: SymbolId) -> ChainResult<&NfaSymbol> {
        self.nfa_symbols.get(id)
    }

    pub fn modify_nfa_symbol(&mut self, id: SymbolId, f: impl FnOnce(&mut NfaSymbol)) -> ChainResult<()> {
        self.nfa_symbols.modify(id, f)
    }

    // --- Nfa ------------------------------------------------------------

    pub fn create_nfa(&mut self, build: impl FnOnce(NfaId) -> Nfa) -> &Nfa {
        let (id, nfa) = self.nfas.create(build);
        self.nfas_by_next_tick_time.insert((nfa.next_tick_time, id));
        nfa
    }

    pub fn get_nfa(&self, id: NfaId) -> ChainResult<&Nfa> {
        self.nfas.get(id)
    }

    pub fn find_nfa(&self, id: NfaId) -> Option<&Nfa> {
        self.nfas.find(id)
    }

    /// Mutates the NFA, re-indexing `by_next_tick_time` if `f` changes it
    /// (`spec.md` §4.2: "modify reruns all secondary index functions
    /// atomically").
    pub fn modify_nfa(&mut self, id: NfaId, f: impl FnOnce(&mut Nfa)) -> ChainResult<()> {
        let old_tick_time = self.nfas.get(id)?.next_tick_time;
        self.nfas.modify(id, f)?;
        let new_tick_time = self.nfas.get(id)?.next_tick_time;
        if old_tick_time != new_tick_time {
            self.nfas_by_next_tick_time.remove(&(old_tick_time, id));
            self.nfas_by_next_tick_time.insert((new_tick_time, id));
        }
        Ok(())
    }

    /// The ascending prefix of `by_next_tick_time` with `next_tick_time <=
    /// now`, up to `limit` entries (`spec.md` §4.4 tick selection).
    pub fn nfas_due_for_tick(&self, now: Time, limit: usize) -> Vec<NfaId> {
        self.nfas_by_next_tick_time
            .iter()
            .take_while(|(t, _)| *t <= now)
            .take(limit)
            .map(|(_, id)| *id)
            .collect()
    }

    pub fn nfa_count(&self) -> usize {
        self.nfas.len()
    }

    pub fn nfa_iter(&self) -> impl Iterator<Item = (&NfaId, &Nfa)> {
        self.nfas.iter()
    }

    // --- NfaRegularBalance ------------------------------------------------

    pub fn find_nfa_balance(&self, nfa_id: NfaId, symbol: AssetSymbol) -> Option<&NfaRegularBalance> {
        self.nfa_regular_balances.get(&(nfa_id, symbol))
    }

    pub fn set_nfa_balance(&mut self, nfa_id: NfaId, symbol: AssetSymbol, liquid: i64) {
        self.nfa_regular_balances
            .insert((nfa_id, symbol), NfaRegularBalance { nfa_id, symbol, liquid });
    }

    pub fn remove_nfa_balance(&mut self, nfa_id: NfaId, symbol: AssetSymbol) {
        self.nfa_regular_balances.remove(&(nfa_id, symbol));
    }

    // --- Zone -------------------------------------------------------------

    pub fn create_zone(
        &mut self,
        name: ZoneName,
        build: impl FnOnce(ZoneId) -> Zone,
    ) -> ChainResult<&Zone> {
        if self.zones_by_name.contains_key(&name) {
            return Err(ChainError::validation(format!("zone {name} already exists")));
        }
        let (id, zone) = self.zones.create(build);
        self.zones_by_name.insert(zone.name.clone(), id);
        Ok(zone)
    }

    pub fn get_zone(&self, id: ZoneId) -> ChainResult<&Zone> {
        self.zones.get(id)
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    pub fn find_zone_by_name(&self, name: &ZoneName) -> Option<&Zone> {
        let id = *self.zones_by_name.get(name)?;
        self.zones.find(id)
    }

    // --- ZoneConnect --------------------------------------------------------

    pub fn zone_edge_exists(&self, from: ZoneId, to: ZoneId) -> bool {
        self.zone_connects.contains(&ZoneConnect { from, to })
    }

    pub fn insert_zone_edge(&mut self, from: ZoneId, to: ZoneId) -> ChainResult<()> {
        if !self.zone_connects.insert(ZoneConnect { from, to }) {
            return Err(ChainError::validation("zone edge already exists"));
        }
        Ok(())
    }

    /// The set of zones connected to `zone` in either direction
    /// (`spec.md` §4.5 degree-cap check).
    pub fn zone_neighbors(&self, zone: ZoneId) -> BTreeSet<ZoneId> {
        self.zone_connects
            .iter()
            .filter_map(|edge| {
                if edge.from == zone {
                    Some(edge.to)
                } else if edge.to == zone {
                    Some(edge.from)
                } else {
                    None
                }
            })
            .collect()
    }

    // --- TransactionObject --------------------------------------------------

    pub fn transaction_exists(&self, trx_id: &TransactionId) -> bool {
        self.transaction_objects.contains_key(trx_id)
    }

    pub fn insert_transaction(&mut self, object: TransactionObject) -> ChainResult<()> {
        if self.transaction_objects.contains_key(&object.trx_id) {
            return Err(ChainError::ingress("duplicate transaction"));
        }
        self.transaction_objects_by_expiration
            .insert((object.expiration, object.trx_id));
        self.transaction_objects.insert(object.trx_id, object);
        Ok(())
    }

    /// Evicts every transaction object whose `expiration <= now`
    /// (`spec.md` §3: "purged on expiration").
    pub fn purge_expired_transactions(&mut self, now: Time) {
        let expired: Vec<(Time, TransactionId)> = self
            .transaction_objects_by_expiration
            .iter()
            .take_while(|(expiration, _)| *expiration <= now)
            .copied()
            .collect();
        for key in expired {
            self.transaction_objects_by_expiration.remove(&key);
            self.transaction_objects.remove(&key.1);
        }
    }
}

impl RewardContractOwner for Database {
    /// Pays the contract owner `qi_amount` QI (`spec.md` §4.3: "every
    /// charge pays the contract's owner account an equal amount of `QI`").
    fn reward_contract_owner(&mut self, owner: &AccountName, qi_amount: i64) -> ChainResult<()> {
        self.modify_account(owner, |account| {
            account.qi_balance = account.qi_balance.saturating_add(qi_amount);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taiyi_mana::ManaBar;

    fn new_account(name: &str) -> Account {
        Account {
            name: name.to_string(),
            mana_bar: ManaBar::new(1_000, 0),
            qi_balance: 0,
        }
    }

    #[test]
    fn duplicate_account_name_rejected() {
        let mut db = Database::new();
        db.create_account(new_account("alice")).unwrap();
        assert!(db.create_account(new_account("alice")).is_err());
    }

    #[test]
    fn reward_contract_owner_credits_qi() {
        let mut db = Database::new();
        db.create_account(new_account("bob")).unwrap();
        db.reward_contract_owner(&"bob".to_string(), 42).unwrap();
        assert_eq!(db.get_account(&"bob".to_string()).unwrap().qi_balance, 42);
    }

    #[test]
    fn nfa_modify_reindexes_next_tick_time() {
        let mut db = Database::new();
        let id = db
            .create_nfa(|id| Nfa {
                id,
                creator: "alice".into(),
                owner_account: "alice".into(),
                symbol_id: 0,
                main_contract: 0,
                created_time: 0,
                mana_bar: ManaBar::new(1_000, 0),
                qi: 0,
                data: Default::default(),
                next_tick_time: 100,
            })
            .id;
        assert_eq!(db.nfas_due_for_tick(100, 10), vec![id]);
        db.modify_nfa(id, |nfa| nfa.next_tick_time = 200).unwrap();
        assert!(db.nfas_due_for_tick(100, 10).is_empty());
        assert_eq!(db.nfas_due_for_tick(200, 10), vec![id]);
    }

    #[test]
    fn zone_edge_rejects_duplicate_insert() {
        let mut db = Database::new();
        db.insert_zone_edge(1, 2).unwrap();
        assert!(db.insert_zone_edge(1, 2).is_err());
        assert!(db.zone_edge_exists(1, 2));
        assert_eq!(db.zone_neighbors(1), BTreeSet::from([2]));
        assert_eq!(db.zone_neighbors(2), BTreeSet::from([1]));
    }

    #[test]
    fn transaction_purge_evicts_expired_only() {
        let mut db = Database::new();
        db.insert_transaction(TransactionObject {
            trx_id: [1u8; 20],
            packed: vec![],
            expiration: 10,
        })
        .unwrap();
        db.insert_transaction(TransactionObject {
            trx_id: [2u8; 20],
            packed: vec![],
            expiration: 20,
        })
        .unwrap();
        db.purge_expired_transactions(10);
        assert!(!db.transaction_exists(&[1u8; 20]));
        assert!(db.transaction_exists(&[2u8; 20]));
    }
}

use taiyi_primitives::{AccountName, ChainResult, ContractId};
use taiyi_store::{Contract, Database};
use taiyi_traits::PublicKey;

use crate::symbol::{create_nfa_symbol, NFA_INIT_FUNCTION};

const ACTOR_CONTRACT_NAME: &str = "contract.actor.default";
const ZONE_CONTRACT_NAME: &str = "contract.zone.default";
const ACTOR_SYMBOL_NAME: &str = "nfa.actor.default";
const ZONE_SYMBOL_NAME: &str = "nfa.zone.default";

/// Seeds the two built-in NFA symbols a fresh chain needs (`spec.md` §8
/// scenario S1): `nfa.actor.default` and `nfa.zone.default`, each backed by
/// its own default contract. `create_zone` (`chain/zone/src/create.rs`)
/// hard-depends on `nfa.zone.default` existing, so this must run before any
/// write traffic is accepted on a fresh database. Idempotent: does nothing
/// if both symbols are already present.
pub fn create_basic_nfa_symbol_objects(db: &mut Database, creator: &AccountName) -> ChainResult<()> {
    if db.find_nfa_symbol_by_name(ACTOR_SYMBOL_NAME).is_some()
        && db.find_nfa_symbol_by_name(ZONE_SYMBOL_NAME).is_some()
    {
        return Ok(());
    }

    let actor_contract = default_contract(db, ACTOR_CONTRACT_NAME, creator)?;
    if db.find_nfa_symbol_by_name(ACTOR_SYMBOL_NAME).is_none() {
        create_nfa_symbol(
            db,
            creator.clone(),
            ACTOR_SYMBOL_NAME.to_string(),
            "default actor NFA symbol".to_string(),
            actor_contract,
        )?;
    }

    let zone_contract = default_contract(db, ZONE_CONTRACT_NAME, creator)?;
    if db.find_nfa_symbol_by_name(ZONE_SYMBOL_NAME).is_none() {
        create_nfa_symbol(
            db,
            creator.clone(),
            ZONE_SYMBOL_NAME.to_string(),
            "default zone NFA symbol".to_string(),
            zone_contract,
        )?;
    }

    Ok(())
}

fn default_contract(db: &mut Database, name: &str, owner: &AccountName) -> ChainResult<ContractId> {
    if let Some(existing) = db.find_contract_by_name(&name.to_string()) {
        return Ok(existing.id);
    }
    let name = name.to_string();
    let contract = db.create_contract(name.clone(), |id| Contract {
        id,
        name,
        owner: owner.clone(),
        abi: vec![NFA_INIT_FUNCTION.to_string()],
        contract_data: Default::default(),
        check_contract_authority: false,
        contract_authority: PublicKey(String::new()),
    })?;
    Ok(contract.id)
}

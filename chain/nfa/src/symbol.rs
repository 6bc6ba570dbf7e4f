use taiyi_primitives::{AccountName, ChainError, ChainResult, ContractId};
use taiyi_store::{Database, NfaSymbol};

/// The contract function every NFA symbol's default contract must expose
/// (`spec.md` §4.4).
pub const NFA_INIT_FUNCTION: &str = "nfa_init";

/// `create_nfa_symbol(creator, symbol, describe, default_contract)`
/// (`spec.md` §4.4): fails if `symbol` exists, or if `default_contract`
/// lacks an ABI entry for `nfa_init`.
pub fn create_nfa_symbol(
    db: &mut Database,
    creator: AccountName,
    symbol: String,
    describe: String,
    default_contract: ContractId,
) -> ChainResult<&NfaSymbol> {
    let contract = db.get_contract(default_contract)?;
    if !contract.has_abi_function(NFA_INIT_FUNCTION) {
        return Err(ChainError::validation(format!(
            "contract {} has no {NFA_INIT_FUNCTION} entry",
            contract.name
        )));
    }

    db.create_nfa_symbol(symbol.clone(), move |id| NfaSymbol {
        id,
        symbol,
        creator,
        describe,
        default_contract,
        count: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use taiyi_store::Contract;
    use taiyi_traits::PublicKey;

    fn contract_with_init(db: &mut Database, name: &str, has_init: bool) -> ContractId {
        let name = name.to_string();
        let abi = if has_init {
            vec![NFA_INIT_FUNCTION.to_string()]
        } else {
            vec![]
        };
        db.create_contract(name.clone(), |id| Contract {
            id,
            name,
            owner: "alice".into(),
            abi,
            contract_data: Default::default(),
            check_contract_authority: false,
            contract_authority: PublicKey(String::new()),
        })
        .unwrap()
        .id
    }

    #[test]
    fn rejects_contract_without_init_function() {
        let mut db = Database::new();
        let contract_id = contract_with_init(&mut db, "contract.actor.default", false);
        let result = create_nfa_symbol(
            &mut db,
            "alice".into(),
            "nfa.actor.default".into(),
            "default actor symbol".into(),
            contract_id,
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_duplicate_symbol() {
        let mut db = Database::new();
        let contract_id = contract_with_init(&mut db, "contract.actor.default", true);
        create_nfa_symbol(
            &mut db,
            "alice".into(),
            "nfa.actor.default".into(),
            "default actor symbol".into(),
            contract_id,
        )
        .unwrap();
        let result = create_nfa_symbol(
            &mut db,
            "alice".into(),
            "nfa.actor.default".into(),
            "again".into(),
            contract_id,
        );
        assert!(result.is_err());
    }
}

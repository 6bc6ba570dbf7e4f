use taiyi_mana::{Charge, ChainParameters};
use taiyi_primitives::{AccountName, ChainError, ChainResult, NfaId, SymbolId, Time, TIME_MAX};
use taiyi_store::{Database, Nfa};
use taiyi_traits::{pack_size, ContractVm, PublicKey, RewardContractOwner, VmContext};

use crate::symbol::NFA_INIT_FUNCTION;

const MAX_ACCOUNT_CONTRACT_DATA_BYTES: usize = 3 * 1024;
const MAX_CONTRACT_DATA_BYTES: usize = 10 * 1024 * 1024;
/// Packed-size estimate of a freshly created NFA's fixed fields with an
/// empty `data` table, used as the state-growth baseline in step 6 below.
const NFA_BASE_STATE_BYTES: u64 = 128;

/// `create_nfa(creator, symbol_obj, sigkeys, reset_vm_memused, vm_context)`
/// (`spec.md` §4.4), steps 1-8.
#[allow(clippy::too_many_arguments)]
pub fn create_nfa(
    db: &mut Database,
    vm: &dyn ContractVm,
    params: &ChainParameters,
    now: Time,
    creator: AccountName,
    symbol_id: SymbolId,
    sigkeys: &[PublicKey],
    reset_vm_memused: bool,
    skip_signature_checks: bool,
) -> ChainResult<NfaId> {
    // 1. Regenerate the creator's mana.
    db.modify_account(&creator, |account| account.mana_bar.update(now, params))?;

    let symbol = db.get_nfa_symbol(symbol_id)?;
    let main_contract = symbol.default_contract;
    let contract = db.get_contract(main_contract)?.clone();

    // 3. Authority check, unless signature-check skips are active.
    if contract.check_contract_authority
        && !skip_signature_checks
        && !sigkeys.contains(&contract.contract_authority)
    {
        return Err(ChainError::authority(format!(
            "contract {} requires its authority key in sigkeys",
            contract.name
        )));
    }

    // 4. Ensure AccountContractData exists; snapshot it.
    let mut account_data = db
        .account_contract_data_mut(&creator, &contract.name)
        .contract_data
        .clone();

    // 5. Invoke the VM. `vm_drops` is the drop budget the VM sees
    // (`current_mana / EXECUTION_SCALE`), decremented in place as it runs.
    let old_drops = db.get_account(&creator)?.mana_bar.current_mana / params.execution_scale as i64;
    let mut vm_drops = old_drops;
    let mut ctx = VmContext::new(());
    let result_table = vm.run_contract_function(
        &creator,
        NFA_INIT_FUNCTION,
        &[],
        &mut account_data,
        sigkeys,
        &mut vm_drops,
        reset_vm_memused,
        &mut ctx,
    )?;
    let used_drops = (old_drops - vm_drops).max(0) as u64;

    // 6. Compute used_mana from the NFA's state *before* `result_table` is
    // assigned to it (step 8 assigns `nfa.data = result_table` only after
    // this charge is taken, per `spec.md` §4.4) — so the state-growth term
    // is a fixed baseline for the NFA's own fields, not the size of
    // whatever table the VM happened to return.
    let state_bytes = NFA_BASE_STATE_BYTES;
    let charge = Charge {
        used_drops,
        state_bytes,
        overhead_drops: params.nfa_create_overhead_drops,
    };
    let total_mana = charge.total_mana(params);

    db.try_modify_account(&creator, |account| account.mana_bar.charge_or_fail(total_mana))?;
    db.reward_contract_owner(&contract.owner, total_mana)?;

    // 7. Size ceilings.
    if pack_size(&account_data) > MAX_ACCOUNT_CONTRACT_DATA_BYTES {
        return Err(ChainError::resource("account contract data exceeds 3 KiB"));
    }
    if pack_size(&contract.contract_data) > MAX_CONTRACT_DATA_BYTES {
        return Err(ChainError::resource("contract data exceeds 10 MiB"));
    }

    // 8. Persist updated account_data; construct and store the NFA.
    db.account_contract_data_mut(&creator, &contract.name)
        .contract_data = account_data;

    let nfa = db.create_nfa(|id| Nfa {
        id,
        creator: creator.clone(),
        owner_account: creator,
        symbol_id,
        main_contract,
        created_time: now,
        mana_bar: taiyi_mana::ManaBar::new(params.default_max_mana, now),
        qi: 0,
        data: result_table,
        next_tick_time: TIME_MAX,
    });

    Ok(nfa.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use taiyi_store::{Account, Contract, NfaSymbol};
    use taiyi_traits::ScriptTable;

    struct NoopVm {
        drops: i64,
    }

    impl ContractVm for NoopVm {
        fn run_contract_function(
            &self,
            _caller: &AccountName,
            _function: &str,
            _args: &[taiyi_traits::ScriptValue],
            _account_data: &mut ScriptTable,
            _sigkeys: &[PublicKey],
            vm_drops: &mut i64,
            _reset_vm_memused: bool,
            _context: &mut VmContext,
        ) -> ChainResult<ScriptTable> {
            *vm_drops -= self.drops;
            Ok(ScriptTable::new())
        }

        fn has_function(&self, _contract: &ScriptTable, _function: &str) -> bool {
            true
        }

        fn initialize_base_env(&self) -> VmContext {
            VmContext::new(())
        }
    }

    fn setup(db: &mut Database, mana: i64) -> (AccountName, SymbolId) {
        db.create_account(Account {
            name: "alice".into(),
            mana_bar: taiyi_mana::ManaBar::new(mana, 0),
            qi_balance: 0,
        })
        .unwrap();
        db.create_account(Account {
            name: "owner".into(),
            mana_bar: taiyi_mana::ManaBar::new(1_000, 0),
            qi_balance: 0,
        })
        .unwrap();
        let contract_id = db
            .create_contract("contract.actor.default".into(), |id| Contract {
                id,
                name: "contract.actor.default".into(),
                owner: "owner".into(),
                abi: vec!["nfa_init".into()],
                contract_data: Default::default(),
                check_contract_authority: false,
                contract_authority: PublicKey(String::new()),
            })
            .unwrap()
            .id;
        let symbol_id = db
            .create_nfa_symbol("nfa.actor.default".into(), |id| NfaSymbol {
                id,
                symbol: "nfa.actor.default".into(),
                creator: "alice".into(),
                describe: "default actor".into(),
                default_contract: contract_id,
                count: 0,
            })
            .unwrap()
            .id;
        ("alice".into(), symbol_id)
    }

    #[test]
    fn succeeds_with_exactly_enough_mana() {
        let mut db = Database::new();
        let params = ChainParameters::default();
        let exact = params.nfa_create_overhead_drops as i64 * params.execution_scale as i64
            + NFA_BASE_STATE_BYTES as i64 * params.state_bytes_scale as i64;
        let (creator, symbol_id) = setup(&mut db, exact);
        let vm = NoopVm { drops: 0 };
        let id = create_nfa(
            &mut db, &vm, &params, 0, creator.clone(), symbol_id, &[], false, true,
        )
        .unwrap();
        assert_eq!(db.get_account(&creator).unwrap().mana_bar.current_mana, 0);
        assert!(db.find_nfa(id).is_some());
    }

    #[test]
    fn fails_resource_error_with_insufficient_mana() {
        let mut db = Database::new();
        let params = ChainParameters::default();
        let exact = params.nfa_create_overhead_drops as i64 * params.execution_scale as i64
            + NFA_BASE_STATE_BYTES as i64 * params.state_bytes_scale as i64;
        let (creator, symbol_id) = setup(&mut db, exact - 1);
        let vm = NoopVm { drops: 0 };
        let result = create_nfa(
            &mut db, &vm, &params, 0, creator, symbol_id, &[], false, true,
        );
        assert!(result.is_err());
        assert_eq!(db.nfa_count(), 0);
    }

    /// A VM that returns a non-empty result table must not charge any more
    /// mana than one that returns an empty table — the state-growth term is
    /// a fixed baseline, not `pack_size` of the VM's returned data.
    struct ChattyVm {
        drops: i64,
    }

    impl ContractVm for ChattyVm {
        fn run_contract_function(
            &self,
            _caller: &AccountName,
            _function: &str,
            _args: &[taiyi_traits::ScriptValue],
            _account_data: &mut ScriptTable,
            _sigkeys: &[PublicKey],
            vm_drops: &mut i64,
            _reset_vm_memused: bool,
            _context: &mut VmContext,
        ) -> ChainResult<ScriptTable> {
            *vm_drops -= self.drops;
            let mut table = ScriptTable::new();
            for i in 0..50 {
                table.insert(format!("field_{i}"), taiyi_traits::ScriptValue::Str("x".repeat(100)));
            }
            Ok(table)
        }

        fn has_function(&self, _contract: &ScriptTable, _function: &str) -> bool {
            true
        }

        fn initialize_base_env(&self) -> VmContext {
            VmContext::new(())
        }
    }

    #[test]
    fn charge_is_independent_of_returned_table_size() {
        let mut db = Database::new();
        let params = ChainParameters::default();
        let exact = params.nfa_create_overhead_drops as i64 * params.execution_scale as i64
            + NFA_BASE_STATE_BYTES as i64 * params.state_bytes_scale as i64;
        let (creator, symbol_id) = setup(&mut db, exact);
        let vm = ChattyVm { drops: 0 };
        let id = create_nfa(
            &mut db, &vm, &params, 0, creator.clone(), symbol_id, &[], false, true,
        )
        .unwrap();
        assert_eq!(db.get_account(&creator).unwrap().mana_bar.current_mana, 0);
        let nfa = db.find_nfa(id).unwrap();
        assert_eq!(nfa.data.len(), 50);
    }
}

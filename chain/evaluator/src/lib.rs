//! Evaluator dispatch (`spec.md` §4.6, component C6): maps the operations
//! carried by a transaction onto the C4/C5 state transitions, collecting
//! the `NfaAffected` side-effect records each one emits.

mod context;
mod evaluators;
mod operation;

pub use context::EvalContext;
pub use evaluators::{
    apply_operation, ConnectToZoneEvaluator, CreateNfaEvaluator, CreateNfaSymbolEvaluator,
    CreateZoneEvaluator, Evaluator, TransferNfaEvaluator,
};
pub use operation::{Operation, OperationResult};

#[cfg(test)]
mod tests {
    use super::*;
    use taiyi_mana::{ChainParameters, ManaBar};
    use taiyi_primitives::ChainResult;
    use taiyi_store::{Account, Contract, Database};
    use taiyi_traits::{ContractVm, PublicKey, ScriptTable, ScriptValue, VmContext};
    use taiyi_zone::{GrowZone, ZoneParams};

    struct NoopVm;
    impl ContractVm for NoopVm {
        fn run_contract_function(
            &self,
            _caller: &taiyi_primitives::AccountName,
            _function: &str,
            _args: &[ScriptValue],
            _account_data: &mut ScriptTable,
            _sigkeys: &[PublicKey],
            _vm_drops: &mut i64,
            _reset_vm_memused: bool,
            _context: &mut VmContext,
        ) -> ChainResult<ScriptTable> {
            Ok(ScriptTable::new())
        }

        fn has_function(&self, _contract: &ScriptTable, _function: &str) -> bool {
            true
        }

        fn initialize_base_env(&self) -> VmContext {
            VmContext::new(())
        }
    }

    struct NoopGrower;
    impl GrowZone for NoopGrower {
        fn grow_zone(&self, _db: &mut Database, _zone_id: u64) -> ChainResult<()> {
            Ok(())
        }
    }

    #[test]
    fn create_nfa_symbol_then_nfa_emits_expected_affected_records() {
        let mut db = Database::new();
        db.create_account(Account {
            name: "alice".into(),
            mana_bar: ManaBar::new(10_000_000, 0),
            qi_balance: 0,
        })
        .unwrap();
        let contract_id = db
            .create_contract("contract.actor.default".into(), |id| Contract {
                id,
                name: "contract.actor.default".into(),
                owner: "alice".into(),
                abi: vec!["nfa_init".into()],
                contract_data: Default::default(),
                check_contract_authority: false,
                contract_authority: PublicKey(String::new()),
            })
            .unwrap()
            .id;

        let vm = NoopVm;
        let grower = NoopGrower;
        let mana_params = ChainParameters::default();
        let zone_params = ZoneParams::default();
        let committee: taiyi_primitives::AccountName = "alice".into();

        let mut ctx = EvalContext {
            db: &mut db,
            vm: &vm,
            grower: &grower,
            mana_params: &mana_params,
            zone_params: &zone_params,
            committee_account: &committee,
            now: 0,
        };

        let create_symbol = Operation::CreateNfaSymbol {
            creator: "alice".into(),
            symbol: "nfa.actor.default".into(),
            describe: "default actor".into(),
            default_contract: contract_id,
        };
        let result = apply_operation(&mut ctx, &create_symbol).unwrap();
        assert_eq!(result.affected.len(), 1);

        let symbol_id = ctx.db.find_nfa_symbol_by_name("nfa.actor.default").unwrap().id;
        let create_nfa = Operation::CreateNfa {
            creator: "alice".into(),
            symbol_id,
            sigkeys: vec![],
            reset_vm_memused: false,
        };
        let result = apply_operation(&mut ctx, &create_nfa).unwrap();
        assert_eq!(result.affected.len(), 1);
        assert_eq!(result.affected[0].action, taiyi_traits::AffectedAction::CreateFor);
    }
}

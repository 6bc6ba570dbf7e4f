//! Default collaborator implementations wired into the service binary.
//! `spec.md` §1 treats the script VM and zone-growth logic as pluggable
//! oracles out of scope for this core; these are the pass-through stand-ins
//! `main.rs` uses until a real VM/ecology plugin is registered, the same
//! role the `NoopVm`/`NoopGrower` test doubles play in the unit tests
//! scattered across `taiyi-nfa`/`taiyi-zone`/`taiyi-evaluator`.

use taiyi_primitives::{AccountName, ChainResult};
use taiyi_store::Database;
use taiyi_traits::{ContractVm, PublicKey, ScriptTable, ScriptValue, VmContext};
use taiyi_zone::GrowZone;

/// Charges a fixed number of drops per call and always returns an empty
/// result table. Stands in for the sandboxed script VM `spec.md` §1 calls
/// out as "treated as an oracle that returns a table and a mana-drop
/// cost" — wiring in a real VM means implementing `ContractVm` and
/// swapping this out in `main.rs`.
pub struct PassThroughVm {
    pub drops_per_call: i64,
}

impl Default for PassThroughVm {
    fn default() -> Self {
        Self { drops_per_call: 1 }
    }
}

impl ContractVm for PassThroughVm {
    fn run_contract_function(
        &self,
        _caller: &AccountName,
        _function: &str,
        _args: &[ScriptValue],
        _account_data: &mut ScriptTable,
        _sigkeys: &[PublicKey],
        vm_drops: &mut i64,
        _reset_vm_memused: bool,
        _context: &mut VmContext,
    ) -> ChainResult<ScriptTable> {
        *vm_drops = (*vm_drops - self.drops_per_call).max(0);
        Ok(ScriptTable::new())
    }

    fn has_function(&self, _contract: &ScriptTable, _function: &str) -> bool {
        false
    }

    fn initialize_base_env(&self) -> VmContext {
        VmContext::new(())
    }
}

/// No ecological initialization beyond what `create_zone` already does.
pub struct NoopGrowZone;

impl GrowZone for NoopGrowZone {
    fn grow_zone(&self, _db: &mut Database, _zone_id: u64) -> ChainResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_through_vm_charges_fixed_drops_and_returns_empty_table() {
        let vm = PassThroughVm { drops_per_call: 3 };
        let mut drops = 10;
        let mut data = ScriptTable::new();
        let mut ctx = VmContext::new(());
        let result = vm
            .run_contract_function(
                &"alice".to_string(),
                "nfa_init",
                &[],
                &mut data,
                &[],
                &mut drops,
                false,
                &mut ctx,
            )
            .unwrap();
        assert!(result.is_empty());
        assert_eq!(drops, 7);
    }
}

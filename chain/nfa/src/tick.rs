use log::{debug, warn};
use taiyi_mana::{Charge, ChainParameters};
use taiyi_primitives::{ChainResult, Time, TIME_MAX};
use taiyi_store::Database;
use taiyi_traits::{ContractVm, RewardContractOwner};

const HEART_BEAT_FUNCTION: &str = "heart_beat";

/// `process_nfa_tick()` (`spec.md` §4.4): scans `by_next_tick_time` in
/// ascending order, runs up to `run_num = total/TICK_PERIOD_MAX_BLOCKS + 1`
/// due NFAs' `heart_beat`, and returns how many were processed.
pub fn process_nfa_tick(db: &mut Database, vm: &dyn ContractVm, params: &ChainParameters, now: Time) -> ChainResult<usize> {
    let total = db.nfa_count();
    let run_num = total / params.tick_period_max_blocks as usize + 1;
    let due = db.nfas_due_for_tick(now, run_num);

    for nfa_id in &due {
        let nfa = match db.find_nfa(*nfa_id) {
            Some(nfa) => nfa.clone(),
            None => continue,
        };

        let contract = match db.find_contract(nfa.main_contract) {
            Some(contract) => contract.clone(),
            // Main contract is gone: skip silently, do not advance.
            None => continue,
        };

        if !contract.has_abi_function(HEART_BEAT_FUNCTION) {
            db.modify_nfa(*nfa_id, |nfa| nfa.next_tick_time = TIME_MAX)?;
            continue;
        }

        db.modify_nfa(*nfa_id, |nfa| {
            nfa.next_tick_time = now + params.tick_period_max_blocks as Time * params.block_interval;
            nfa.mana_bar.update(now, params);
        })?;

        let old_drops =
            db.get_nfa(*nfa_id)?.mana_bar.current_mana / params.execution_scale as i64;
        let mut vm_drops = old_drops;
        let mut ctx = vm.initialize_base_env();
        let mut account_data = Default::default();
        let beat_result = vm.run_contract_function(
            &nfa.owner_account,
            HEART_BEAT_FUNCTION,
            &[],
            &mut account_data,
            &[],
            &mut vm_drops,
            true,
            &mut ctx,
        );
        let used_drops = (old_drops - vm_drops).max(0) as u64;

        let charge = Charge {
            used_drops,
            state_bytes: 0,
            overhead_drops: params.heart_beat_overhead_drops,
        };
        let total_mana = charge.total_mana(params);
        db.modify_nfa(*nfa_id, |nfa| nfa.mana_bar.charge_clamped(total_mana))?;
        db.reward_contract_owner(&contract.owner, total_mana)?;

        if let Err(err) = beat_result {
            warn!(target: "taiyi-chain::nfa", "heart_beat failed for NFA {nfa_id}: {err}");
            db.modify_nfa(*nfa_id, |nfa| nfa.next_tick_time = TIME_MAX)?;
        } else {
            debug!(target: "taiyi-chain::nfa", "heart_beat succeeded for NFA {nfa_id}");
        }
    }

    Ok(due.len())
}

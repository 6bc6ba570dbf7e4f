use taiyi_primitives::ChainResult;
use taiyi_traits::{AffectedAction, NfaAffected};

use crate::context::EvalContext;
use crate::operation::{Operation, OperationResult};

/// `spec.md` §4.6: "for each operation type `T` there is an `Evaluator<T>`
/// with `do_apply(op) -> OperationResult`". Implementations perform all
/// pre-condition checks via assertions, mutate state, and never partially
/// apply: a `?` out of `do_apply` leaves the caller to roll the whole
/// transaction back.
pub trait Evaluator<T> {
    fn do_apply(&self, ctx: &mut EvalContext, op: &T) -> ChainResult<OperationResult>;
}

pub struct CreateNfaSymbolEvaluator;
pub struct CreateNfaEvaluator;
pub struct TransferNfaEvaluator;
pub struct CreateZoneEvaluator;
pub struct ConnectToZoneEvaluator;

impl Evaluator<Operation> for CreateNfaSymbolEvaluator {
    fn do_apply(&self, ctx: &mut EvalContext, op: &Operation) -> ChainResult<OperationResult> {
        let Operation::CreateNfaSymbol {
            creator,
            symbol,
            describe,
            default_contract,
        } = op
        else {
            unreachable!("dispatched by operation kind")
        };
        let nfa_symbol = taiyi_nfa::create_nfa_symbol(
            ctx.db,
            creator.clone(),
            symbol.clone(),
            describe.clone(),
            *default_contract,
        )?;
        Ok(OperationResult::with_affected(vec![NfaAffected {
            affected_account: creator.clone(),
            affected_item: nfa_symbol.id,
            action: AffectedAction::CreateBy,
        }]))
    }
}

impl Evaluator<Operation> for CreateNfaEvaluator {
    fn do_apply(&self, ctx: &mut EvalContext, op: &Operation) -> ChainResult<OperationResult> {
        let Operation::CreateNfa {
            creator,
            symbol_id,
            sigkeys,
            reset_vm_memused,
        } = op
        else {
            unreachable!("dispatched by operation kind")
        };
        let nfa_id = taiyi_nfa::create_nfa(
            ctx.db,
            ctx.vm,
            ctx.mana_params,
            ctx.now,
            creator.clone(),
            *symbol_id,
            sigkeys,
            *reset_vm_memused,
            false,
        )?;
        Ok(OperationResult::with_affected(vec![NfaAffected {
            affected_account: creator.clone(),
            affected_item: nfa_id,
            action: AffectedAction::CreateFor,
        }]))
    }
}

impl Evaluator<Operation> for TransferNfaEvaluator {
    fn do_apply(&self, ctx: &mut EvalContext, op: &Operation) -> ChainResult<OperationResult> {
        let Operation::TransferNfa { from, to, id } = op else {
            unreachable!("dispatched by operation kind")
        };
        let affected = taiyi_nfa::transfer_nfa(ctx.db, from.clone(), to.clone(), *id)?;
        Ok(OperationResult::with_affected(affected.to_vec()))
    }
}

impl Evaluator<Operation> for CreateZoneEvaluator {
    fn do_apply(&self, ctx: &mut EvalContext, op: &Operation) -> ChainResult<OperationResult> {
        let Operation::CreateZone {
            creator,
            name,
            zone_type,
            sigkeys,
        } = op
        else {
            unreachable!("dispatched by operation kind")
        };
        let zone_id = taiyi_zone::create_zone(
            ctx.db,
            ctx.vm,
            ctx.grower,
            ctx.mana_params,
            ctx.committee_account,
            creator.clone(),
            name.clone(),
            zone_type,
            sigkeys,
            ctx.now,
        )?;
        let zone_nfa = ctx.db.get_zone(zone_id)?.nfa_id;
        Ok(OperationResult::with_affected(vec![NfaAffected {
            affected_account: creator.clone(),
            affected_item: zone_nfa,
            action: AffectedAction::CreateFor,
        }]))
    }
}

impl Evaluator<Operation> for ConnectToZoneEvaluator {
    fn do_apply(&self, ctx: &mut EvalContext, op: &Operation) -> ChainResult<OperationResult> {
        let Operation::ConnectToZone { account, from, to } = op else {
            unreachable!("dispatched by operation kind")
        };
        taiyi_zone::connect_to_zone(ctx.db, ctx.zone_params, account, *from, *to)?;
        Ok(OperationResult::empty())
    }
}

/// Dispatches `op` to its evaluator (`spec.md` §4.6 control flow).
pub fn apply_operation(ctx: &mut EvalContext, op: &Operation) -> ChainResult<OperationResult> {
    match op {
        Operation::CreateNfaSymbol { .. } => CreateNfaSymbolEvaluator.do_apply(ctx, op),
        Operation::CreateNfa { .. } => CreateNfaEvaluator.do_apply(ctx, op),
        Operation::TransferNfa { .. } => TransferNfaEvaluator.do_apply(ctx, op),
        Operation::CreateZone { .. } => CreateZoneEvaluator.do_apply(ctx, op),
        Operation::ConnectToZone { .. } => ConnectToZoneEvaluator.do_apply(ctx, op),
    }
}

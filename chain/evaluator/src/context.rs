use taiyi_mana::ChainParameters;
use taiyi_primitives::{AccountName, Time};
use taiyi_store::Database;
use taiyi_traits::ContractVm;
use taiyi_zone::{GrowZone, ZoneParams};

/// Everything an `Evaluator` needs to apply one operation: the database it
/// mutates and the collaborators it reaches through narrow interfaces
/// (`spec.md` §1/§9).
pub struct EvalContext<'a> {
    pub db: &'a mut Database,
    pub vm: &'a dyn ContractVm,
    pub grower: &'a dyn GrowZone,
    pub mana_params: &'a ChainParameters,
    pub zone_params: &'a ZoneParams,
    pub committee_account: &'a AccountName,
    pub now: Time,
}

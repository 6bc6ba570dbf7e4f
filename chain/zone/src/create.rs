use taiyi_mana::ChainParameters;
use taiyi_primitives::{AccountName, ChainError, ChainResult, ZoneId, ZoneName};
use taiyi_store::{Database, Zone, ZoneType};
use taiyi_traits::{ContractVm, PublicKey};

/// The ecological/state-initialization collaborator `spec.md` §4.5 calls
/// `grow_zone` — a pluggable capability, same spirit as `ContractVm`
/// (`spec.md` §9).
pub trait GrowZone {
    fn grow_zone(&self, db: &mut Database, zone_id: ZoneId) -> ChainResult<()>;
}

const ZONE_DEFAULT_SYMBOL: &str = "nfa.zone.default";

/// `create_zone(creator, name, type_string)` (`spec.md` §4.5). Only the
/// committee account may create zones; the proposal/voting path for other
/// accounts is explicitly unimplemented (`spec.md` §9).
#[allow(clippy::too_many_arguments)]
pub fn create_zone(
    db: &mut Database,
    vm: &dyn ContractVm,
    grower: &dyn GrowZone,
    mana_params: &ChainParameters,
    committee_account: &AccountName,
    creator: AccountName,
    name: ZoneName,
    type_string: &str,
    sigkeys: &[PublicKey],
    now: u64,
) -> ChainResult<ZoneId> {
    if db.find_zone_by_name(&name).is_some() {
        return Err(ChainError::validation(format!("zone {name} already exists")));
    }

    let zone_type = ZoneType::from_token(type_string);
    if !zone_type.is_valid() {
        return Err(ChainError::validation(format!(
            "unrecognized zone type {type_string}"
        )));
    }

    if &creator != committee_account {
        return Err(ChainError::authority(
            "only the committee account may create zones directly; the proposal path is not implemented",
        ));
    }

    let symbol = db
        .find_nfa_symbol_by_name(ZONE_DEFAULT_SYMBOL)
        .ok_or_else(|| ChainError::not_found(format!("symbol {ZONE_DEFAULT_SYMBOL} not found")))?;
    let symbol_id = symbol.id;

    let nfa_id = taiyi_nfa::create_nfa(
        db,
        vm,
        mana_params,
        now,
        creator.clone(),
        symbol_id,
        sigkeys,
        true,
        false,
    )?;

    let zone = db.create_zone(name.clone(), |id| Zone {
        id,
        name,
        nfa_id,
        zone_type,
    })?;
    let zone_id = zone.id;

    grower.grow_zone(db, zone_id)?;
    Ok(zone_id)
}

use taiyi_primitives::{AccountName, ChainError, ChainResult, ZoneId};
use taiyi_store::Database;

use crate::params::ZoneParams;

/// `connect_to_zone(account, from, to)` (`spec.md` §4.5): both zones must
/// exist; `account` must own the `to` zone's NFA; the edge must be new;
/// neither endpoint may already be at its type's degree cap unless the
/// other endpoint is already among its neighbors (a cap violation only
/// blocks genuinely new edges).
pub fn connect_to_zone(
    db: &mut Database,
    params: &ZoneParams,
    account: &AccountName,
    from: ZoneId,
    to: ZoneId,
) -> ChainResult<()> {
    let from_zone = db.get_zone(from)?.clone();
    let to_zone = db.get_zone(to)?.clone();

    let to_owner = &db.get_nfa(to_zone.nfa_id)?.owner_account;
    if to_owner != account {
        return Err(ChainError::authority(format!(
            "{account} does not own zone {to}'s NFA"
        )));
    }

    if db.zone_edge_exists(from, to) {
        return Err(ChainError::validation(format!(
            "edge {from}->{to} already exists"
        )));
    }

    check_degree_cap(db, params, from, from_zone.zone_type, to)?;
    check_degree_cap(db, params, to, to_zone.zone_type, from)?;

    db.insert_zone_edge(from, to)
}

fn check_degree_cap(
    db: &Database,
    params: &ZoneParams,
    zone: ZoneId,
    zone_type: taiyi_store::ZoneType,
    other: ZoneId,
) -> ChainResult<()> {
    let neighbors = db.zone_neighbors(zone);
    if neighbors.contains(&other) {
        return Ok(());
    }
    let cap = params.max_connections(zone_type);
    if neighbors.len() as u32 >= cap {
        return Err(ChainError::validation(format!(
            "zone {zone} already has {cap} connections"
        )));
    }
    Ok(())
}

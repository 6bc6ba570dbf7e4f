use taiyi_primitives::{AccountName, ChainError, ChainResult, NfaId};
use taiyi_store::Database;
use taiyi_traits::{AffectedAction, NfaAffected};

/// `transfer_nfa(from, to, id)` (`spec.md` §4.4): requires `from ==
/// nfa.owner_account`; sets the new owner; emits `[transfer_from(from),
/// transfer_to(to)]` in that order (testable property 7: a self-transfer
/// is a no-op on ownership but still emits both records).
pub fn transfer_nfa(
    db: &mut Database,
    from: AccountName,
    to: AccountName,
    id: NfaId,
) -> ChainResult<[NfaAffected; 2]> {
    let owner = db.get_nfa(id)?.owner_account.clone();
    if owner != from {
        return Err(ChainError::authority(format!(
            "{from} is not the owner of NFA {id}"
        )));
    }

    db.modify_nfa(id, |nfa| nfa.owner_account = to.clone())?;

    Ok([
        NfaAffected {
            affected_account: from,
            affected_item: id,
            action: AffectedAction::TransferFrom,
        },
        NfaAffected {
            affected_account: to,
            affected_item: id,
            action: AffectedAction::TransferTo,
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use taiyi_mana::ManaBar;
    use taiyi_store::Nfa;

    fn setup_nfa(db: &mut Database, owner: &str) -> NfaId {
        db.create_nfa(|id| Nfa {
            id,
            creator: owner.into(),
            owner_account: owner.into(),
            symbol_id: 0,
            main_contract: 0,
            created_time: 0,
            mana_bar: ManaBar::new(1_000, 0),
            qi: 0,
            data: Default::default(),
            next_tick_time: u64::MAX,
        })
        .id
    }

    #[test]
    fn rejects_transfer_by_non_owner() {
        let mut db = Database::new();
        let id = setup_nfa(&mut db, "alice");
        let result = transfer_nfa(&mut db, "mallory".into(), "bob".into(), id);
        assert!(result.is_err());
    }

    #[test]
    fn transfer_updates_owner_and_emits_both_records() {
        let mut db = Database::new();
        let id = setup_nfa(&mut db, "alice");
        let affected = transfer_nfa(&mut db, "alice".into(), "bob".into(), id).unwrap();
        assert_eq!(affected[0].action, AffectedAction::TransferFrom);
        assert_eq!(affected[1].action, AffectedAction::TransferTo);
        assert_eq!(db.get_nfa(id).unwrap().owner_account, "bob");
    }

    #[test]
    fn self_transfer_is_ownership_no_op_but_still_emits_records() {
        let mut db = Database::new();
        let id = setup_nfa(&mut db, "alice");
        let affected = transfer_nfa(&mut db, "alice".into(), "alice".into(), id).unwrap();
        assert_eq!(affected.len(), 2);
        assert_eq!(db.get_nfa(id).unwrap().owner_account, "alice");
    }
}

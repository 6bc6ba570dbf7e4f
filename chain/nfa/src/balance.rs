use taiyi_asset::{Asset, AssetSymbol};
use taiyi_primitives::{ChainError, ChainResult, NfaId, Satoshis};
use taiyi_store::Database;

/// `get_nfa_balance(nfa, symbol)` (`spec.md` §4.4): `nfa.qi` for `QI`,
/// else the regular-balance record's amount or zero.
pub fn get_nfa_balance(db: &Database, nfa_id: NfaId, symbol: AssetSymbol) -> ChainResult<Satoshis> {
    if symbol == AssetSymbol::QI {
        return Ok(db.get_nfa(nfa_id)?.qi);
    }
    Ok(db
        .find_nfa_balance(nfa_id, symbol)
        .map(|balance| balance.liquid)
        .unwrap_or(0))
}

/// `adjust_nfa_balance(nfa, delta)` (`spec.md` §4.4): `QI` mutates
/// `nfa.qi` directly; any other qi-variant symbol is rejected, since qi
/// bookkeeping only ever happens through `nfa.qi`; everything else goes
/// through the regular-balance table, creating/modifying/deleting the
/// record to preserve "no zero-amount record exists" (§3 invariant 2).
pub fn adjust_nfa_balance(db: &mut Database, nfa_id: NfaId, delta: Asset) -> ChainResult<()> {
    if delta.symbol != AssetSymbol::QI && delta.symbol.is_qi() {
        return Err(ChainError::validation(
            "qi-variant balances can only be adjusted through nfa.qi",
        ));
    }

    let available = get_nfa_balance(db, nfa_id, delta.symbol)?;
    if delta.amount < 0 && available < -delta.amount {
        return Err(ChainError::validation(format!(
            "insufficient balance: have {available}, need {}",
            -delta.amount
        )));
    }

    if delta.symbol == AssetSymbol::QI {
        db.modify_nfa(nfa_id, |nfa| nfa.qi += delta.amount)?;
        return Ok(());
    }

    let combined = available + delta.amount;
    match db.find_nfa_balance(nfa_id, delta.symbol) {
        None if delta.amount == 0 => {}
        None => db.set_nfa_balance(nfa_id, delta.symbol, combined),
        Some(_) if combined == 0 => db.remove_nfa_balance(nfa_id, delta.symbol),
        Some(_) => db.set_nfa_balance(nfa_id, delta.symbol, combined),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use taiyi_mana::ManaBar;
    use taiyi_store::Nfa;

    fn setup_nfa(db: &mut Database) -> NfaId {
        db.create_nfa(|id| Nfa {
            id,
            creator: "alice".into(),
            owner_account: "alice".into(),
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
    fn qi_goes_through_nfa_qi_field() {
        let mut db = Database::new();
        let id = setup_nfa(&mut db);
        adjust_nfa_balance(&mut db, id, Asset::new(50, AssetSymbol::QI).unwrap()).unwrap();
        assert_eq!(get_nfa_balance(&db, id, AssetSymbol::QI).unwrap(), 50);
    }

    #[test]
    fn rejects_qi_variant_of_nai_symbol() {
        let mut db = Database::new();
        let id = setup_nfa(&mut db);
        let symbol = AssetSymbol::from_nai(20_000_000, 0).unwrap().get_paired_symbol();
        assert!(symbol.is_qi());
        assert!(adjust_nfa_balance(&mut db, id, Asset::new(1, symbol).unwrap()).is_err());
    }

    #[test]
    fn regular_balance_created_modified_and_deleted_at_zero() {
        let mut db = Database::new();
        let id = setup_nfa(&mut db);
        adjust_nfa_balance(&mut db, id, Asset::new(10, AssetSymbol::GOLD).unwrap()).unwrap();
        assert_eq!(get_nfa_balance(&db, id, AssetSymbol::GOLD).unwrap(), 10);

        adjust_nfa_balance(&mut db, id, Asset::new(-10, AssetSymbol::GOLD).unwrap()).unwrap();
        assert_eq!(get_nfa_balance(&db, id, AssetSymbol::GOLD).unwrap(), 0);
        assert!(db.find_nfa_balance(id, AssetSymbol::GOLD).is_none());
    }

    #[test]
    fn rejects_overdraft() {
        let mut db = Database::new();
        let id = setup_nfa(&mut db);
        adjust_nfa_balance(&mut db, id, Asset::new(5, AssetSymbol::GOLD).unwrap()).unwrap();
        assert!(adjust_nfa_balance(&mut db, id, Asset::new(-6, AssetSymbol::GOLD).unwrap()).is_err());
    }
}

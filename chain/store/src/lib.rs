//! The multi-index object store (`spec.md` §4.2, component C2): typed
//! collections with a primary ordered index plus caller-declared secondary
//! indexes, aggregated into the single `Database` every other chain-core
//! crate borrows `&`/`&mut` rather than owns.

mod database;
mod entities;
mod table;
mod zone_type;

pub use database::Database;
pub use entities::{
    Account, AccountContractData, Contract, Nfa, NfaRegularBalance, NfaSymbol, TransactionObject,
    Zone, ZoneConnect,
};
pub use table::{IdTable, NamedTable};
pub use zone_type::ZoneType;

//! Asset amounts and symbol codec (`spec.md` §4.1, component C1).
//!
//! `AssetSymbol` encodes either one of the eight legacy first-class assets or
//! a user-defined symbol living in NAI space, with a Damm checksum guarding
//! its wire string form. `Asset` and `Price` build ordinary fixed-point
//! arithmetic and exchange-rate conversion on top of a validated symbol.

mod asset;
mod damm;
mod symbol;

pub use asset::{Asset, Price, MAX_SATOSHIS};
pub use damm::damm_checksum_8digit;
pub use symbol::{legacy, AssetSymbol, MAX_DECIMALS, MAX_NAI, MIN_NAI};

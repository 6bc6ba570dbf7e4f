//! Mana accounting (`spec.md` §4.3, component C3): a regenerating resource
//! budget shared by accounts and NFAs, charged for VM execution and state
//! growth, with the charge rewarded back to the executing contract's owner.

mod charge;
mod params;

pub use charge::{Charge, ManaBar};
pub use params::ChainParameters;

//! The zone engine (`spec.md` §4.5, component C5): named zones backed by an
//! NFA, connected through a directed, degree-capped graph.

mod connect;
mod create;
mod params;

pub use connect::connect_to_zone;
pub use create::{create_zone, GrowZone};
pub use params::ZoneParams;

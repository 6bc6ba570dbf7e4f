/// Seconds since the Unix epoch. The chain only ever reasons about whole
/// seconds (block timestamps), so this is a plain integer rather than a
/// `std::time::SystemTime` — the latter can't represent the "infinite"
/// sentinel used to disable an NFA's tick schedule (`spec.md` §3 invariant
/// 4).
pub type Time = u64;

/// Sentinel meaning "never scheduled again".
pub const TIME_MAX: Time = u64::MAX;

/// A block height.
pub type BlockNumber = u64;

/// Nominal spacing between blocks. Used to derive the NFA tick interval
/// (`spec.md` §4.4) and the write pipeline's "head block is recent enough to
/// leave sync mode" check (`spec.md` §4.7).
pub const BLOCK_INTERVAL_SECS: Time = 3;

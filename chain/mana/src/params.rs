use taiyi_primitives::Time;

/// Global chain-wide constants that mana accounting, NFA ticking, and block
/// acceptance all read from (`spec.md` §9 Open Question #1: "global chain
/// parameters", resolved here as a plain struct threaded in by the caller
/// rather than a singleton).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainParameters {
    /// Mana charged per VM execution "drop".
    pub execution_scale: u64,
    /// Mana charged per byte of packed state growth.
    pub state_bytes_scale: u64,
    /// Seconds for an empty mana bar to regenerate to `max_mana`.
    pub regen_period: u64,
    /// Fixed overhead, in drops, charged for creating an NFA.
    pub nfa_create_overhead_drops: u64,
    /// Fixed overhead, in drops, charged for a heart-beat tick.
    pub heart_beat_overhead_drops: u64,
    /// Blocks between two scheduled ticks of the same NFA.
    pub tick_period_max_blocks: u32,
    /// Seconds per block, used to convert `tick_period_max_blocks` to a
    /// duration.
    pub block_interval: Time,
    /// `max_mana` assigned to a newly created mana-bearing entity
    /// (`spec.md` §4.3: "derived from global properties"; this workspace
    /// fixes it as a flat per-entity ceiling rather than stake-weighting,
    /// since no stake model is specified).
    pub default_max_mana: i64,
}

impl Default for ChainParameters {
    fn default() -> Self {
        Self {
            execution_scale: 1_000,
            state_bytes_scale: 10,
            regen_period: 5 * 24 * 60 * 60,
            nfa_create_overhead_drops: 100,
            heart_beat_overhead_drops: 50,
            tick_period_max_blocks: 20,
            block_interval: 3,
            default_max_mana: 1_000_000,
        }
    }
}

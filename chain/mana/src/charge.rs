use taiyi_primitives::{ChainError, ChainResult, Time};

use crate::params::ChainParameters;

/// A regenerating resource budget carried by every mana-bearing entity
/// (`Account`, `NFA`) per `spec.md` §3/§4.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManaBar {
    pub current_mana: i64,
    pub last_update_time: Time,
    pub max_mana: i64,
}

impl ManaBar {
    pub fn new(max_mana: i64, now: Time) -> Self {
        Self {
            current_mana: max_mana,
            last_update_time: now,
            max_mana,
        }
    }

    /// Regenerates linearly since `last_update_time`, saturating at
    /// `max_mana` (`spec.md` §4.3, testable property 4: idempotent within
    /// the same second, monotonic non-decreasing without charges).
    pub fn update(&mut self, now: Time, params: &ChainParameters) {
        if now <= self.last_update_time {
            return;
        }
        let elapsed = now - self.last_update_time;
        let delta = (elapsed as i128 * self.max_mana as i128) / params.regen_period as i128;
        self.current_mana = (self.current_mana as i128 + delta)
            .min(self.max_mana as i128)
            .max(0) as i64;
        self.last_update_time = now;
    }

    /// Charges `amount` mana, failing with `ResourceError` if insufficient.
    /// Used on the "create" paths (`spec.md` §4.3: "operation fails").
    pub fn charge_or_fail(&mut self, amount: i64) -> ChainResult<()> {
        if self.current_mana < amount {
            return Err(ChainError::resource(format!(
                "insufficient mana: have {}, need {amount}",
                self.current_mana
            )));
        }
        self.current_mana -= amount;
        Ok(())
    }

    /// Charges `amount` mana, clamping to zero on underfunding instead of
    /// failing. Used for NFA ticks (`spec.md` §4.3: "under-funding is
    /// tolerated by clamping `current_mana` to 0").
    pub fn charge_clamped(&mut self, amount: i64) {
        self.current_mana = (self.current_mana - amount).max(0);
    }
}

/// The components of a single mana charge (`spec.md` §4.3), kept separate so
/// callers can report `used_drops`/`state_bytes` to `reward_contract_owner`
/// or to logging before they're folded into a total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charge {
    pub used_drops: u64,
    pub state_bytes: u64,
    pub overhead_drops: u64,
}

impl Charge {
    /// `used_drops*EXECUTION_SCALE + state_bytes*STATE_BYTES_SCALE +
    /// overhead_drops*EXECUTION_SCALE` (`spec.md` §4.3).
    pub fn total_mana(&self, params: &ChainParameters) -> i64 {
        let total = (self.used_drops + self.overhead_drops) as u128 * params.execution_scale as u128
            + self.state_bytes as u128 * params.state_bytes_scale as u128;
        total as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regenerates_linearly_and_saturates() {
        let params = ChainParameters::default();
        let mut bar = ManaBar::new(1_000, 0);
        bar.current_mana = 0;
        bar.update(params.regen_period / 2, &params);
        assert_eq!(bar.current_mana, 500);
        bar.update(params.regen_period * 10, &params);
        assert_eq!(bar.current_mana, 1_000);
    }

    #[test]
    fn repeated_update_same_instant_is_idempotent() {
        let params = ChainParameters::default();
        let mut bar = ManaBar::new(1_000, 100);
        bar.current_mana = 500;
        bar.update(100, &params);
        assert_eq!(bar.current_mana, 500);
    }

    #[test]
    fn create_path_fails_on_insufficient_mana() {
        let mut bar = ManaBar::new(100, 0);
        bar.current_mana = 9;
        assert!(bar.charge_or_fail(10).is_err());
        assert_eq!(bar.current_mana, 9);
    }

    #[test]
    fn tick_path_clamps_instead_of_failing() {
        let mut bar = ManaBar::new(100, 0);
        bar.current_mana = 9;
        bar.charge_clamped(10);
        assert_eq!(bar.current_mana, 0);
    }

    #[test]
    fn total_mana_matches_spec_formula() {
        let params = ChainParameters::default();
        let charge = Charge {
            used_drops: 5,
            state_bytes: 20,
            overhead_drops: params.nfa_create_overhead_drops,
        };
        let expected = (5 + 100) * params.execution_scale as i64 + 20 * params.state_bytes_scale as i64;
        assert_eq!(charge.total_mana(&params), expected);
    }
}

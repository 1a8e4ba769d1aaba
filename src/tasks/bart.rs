//! Balloon Analogue Risk Task: a single stateful trial.
//!
//! ```text
//! Active --pump, no burst--> Active
//! Active --pump, burst-----> Burst      (terminal, value 0)
//! Active --cash out--------> CashedOut  (terminal, requires pumps > 0)
//! ```
//!
//! Terminal trials ignore every further action.

use serde::{Deserialize, Serialize};

use crate::random::RandomSource;

/// Points banked per pump.
pub const VALUE_PER_PUMP: u32 = 10;
/// Burst probability ceiling.
pub const MAX_BURST_PROBABILITY: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BartStatus {
    Active,
    Burst,
    CashedOut,
}

impl BartStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, BartStatus::Active)
    }
}

/// Observable trial state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BartState {
    pub pumps: u32,
    pub max_pumps: u32,
    pub current_value: u32,
    pub burst_probability: f64,
    pub status: BartStatus,
    /// Set once the trial is terminal: banked value, or 0 after a burst.
    pub final_value: Option<u32>,
}

/// Pump count at which the balloon is all but certain to burst.
pub fn max_pumps_for(difficulty: u8) -> u32 {
    match difficulty {
        0..=3 => 15,
        4..=6 => 12,
        _ => 10,
    }
}

pub fn burst_probability(pumps: u32, max_pumps: u32) -> f64 {
    if max_pumps == 0 {
        return MAX_BURST_PROBABILITY;
    }
    let ratio = f64::from(pumps) / f64::from(max_pumps);
    (ratio * ratio).min(MAX_BURST_PROBABILITY)
}

pub struct BartTrial<R: RandomSource> {
    state: BartState,
    rng: R,
}

impl<R: RandomSource> BartTrial<R> {
    pub fn new(difficulty: u8, rng: R) -> Self {
        Self {
            state: BartState {
                pumps: 0,
                max_pumps: max_pumps_for(difficulty),
                current_value: 0,
                burst_probability: 0.0,
                status: BartStatus::Active,
                final_value: None,
            },
            rng,
        }
    }

    pub fn state(&self) -> BartState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state.status.is_terminal()
    }

    /// Inflate once. The burst roll uses the probability *after* the increment.
    pub fn pump(&mut self) -> BartState {
        if self.is_terminal() {
            return self.state;
        }
        let s = &mut self.state;
        s.pumps += 1;
        s.burst_probability = burst_probability(s.pumps, s.max_pumps);

        if self.rng.chance(s.burst_probability) {
            s.status = BartStatus::Burst;
            s.current_value = 0;
            s.final_value = Some(0);
            tracing::debug!(pumps = s.pumps, "balloon burst");
        } else {
            s.current_value = s.pumps * VALUE_PER_PUMP;
        }
        self.state
    }

    /// Bank the current value. No-op before the first pump or once terminal.
    pub fn cash_out(&mut self) -> BartState {
        if self.is_terminal() || self.state.pumps == 0 {
            return self.state;
        }
        self.state.status = BartStatus::CashedOut;
        self.state.final_value = Some(self.state.current_value);
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::FixedSequence;

    #[test]
    fn max_pumps_by_difficulty() {
        assert_eq!(max_pumps_for(1), 15);
        assert_eq!(max_pumps_for(3), 15);
        assert_eq!(max_pumps_for(4), 12);
        assert_eq!(max_pumps_for(6), 12);
        assert_eq!(max_pumps_for(7), 10);
        assert_eq!(max_pumps_for(10), 10);
    }

    #[test]
    fn probability_reaches_ceiling_at_max_pumps() {
        // 0.99 never beats the 0.95 ceiling, so the balloon survives every pump.
        let mut trial = BartTrial::new(5, FixedSequence::constant(0.99));
        for _ in 0..12 {
            trial.pump();
        }
        let state = trial.state();
        assert_eq!(state.pumps, 12);
        assert_eq!(state.burst_probability, 0.95);
        assert_eq!(state.current_value, 120);
        assert_eq!(state.status, BartStatus::Active);
    }

    #[test]
    fn cash_out_freezes_value_and_ends_trial() {
        let mut trial = BartTrial::new(2, FixedSequence::constant(0.99));
        assert_eq!(trial.cash_out().status, BartStatus::Active);

        trial.pump();
        trial.pump();
        let cashed = trial.cash_out();
        assert_eq!(cashed.status, BartStatus::CashedOut);
        assert_eq!(cashed.final_value, Some(20));

        assert_eq!(trial.pump(), cashed);
        assert_eq!(trial.cash_out(), cashed);
    }

    #[test]
    fn burst_is_terminal() {
        let mut trial = BartTrial::new(9, FixedSequence::constant(0.0));
        let burst = trial.pump();
        assert_eq!(burst.status, BartStatus::Burst);
        assert_eq!(burst.current_value, 0);
        assert_eq!(burst.final_value, Some(0));
        assert_eq!(trial.pump(), burst);
        assert_eq!(trial.cash_out(), burst);
    }
}

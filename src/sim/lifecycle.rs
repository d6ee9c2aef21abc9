//! Run lifecycle phases
//!
//! Idle -> Countdown -> Playing <-> Paused -> GameOver -> Idle/Countdown.
//! The countdown runs on real-time delays, not frames.

use serde::{Deserialize, Serialize};

/// One step of the pre-run countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountdownStep {
    Three,
    Two,
    One,
    Go,
}

impl CountdownStep {
    /// Real-time delay in milliseconds before the following step
    pub fn delay_ms(self) -> u32 {
        match self {
            CountdownStep::Go => 500,
            _ => 800,
        }
    }

    /// Next step, or `None` once GO has been shown
    pub fn next(self) -> Option<Self> {
        match self {
            CountdownStep::Three => Some(CountdownStep::Two),
            CountdownStep::Two => Some(CountdownStep::One),
            CountdownStep::One => Some(CountdownStep::Go),
            CountdownStep::Go => None,
        }
    }

    /// Text shown in the countdown overlay
    pub fn label(self) -> &'static str {
        match self {
            CountdownStep::Three => "3",
            CountdownStep::Two => "2",
            CountdownStep::One => "1",
            CountdownStep::Go => "GO!",
        }
    }
}

/// Lifecycle gate for the run loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Main menu (or shop)
    #[default]
    Idle,
    Countdown(CountdownStep),
    /// Ticks are being scheduled
    Playing,
    /// Run state frozen, no tick pending
    Paused,
    /// Run ended; summary shown
    GameOver,
}

impl Phase {
    /// Whether a run exists (its state may be rendered)
    pub fn has_run(self) -> bool {
        matches!(self, Phase::Playing | Phase::Paused | Phase::GameOver)
    }

    /// Shop and theme selection are only reachable outside a run
    pub fn allows_shop(self) -> bool {
        matches!(self, Phase::Idle | Phase::GameOver)
    }

    /// A new run may be started from here
    pub fn can_start(self) -> bool {
        matches!(self, Phase::Idle | Phase::GameOver | Phase::Paused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_sequence() {
        let mut step = CountdownStep::Three;
        let mut labels = vec![step.label()];
        let mut total = step.delay_ms();
        while let Some(next) = step.next() {
            step = next;
            labels.push(step.label());
            total += step.delay_ms();
        }
        assert_eq!(labels, ["3", "2", "1", "GO!"]);
        assert_eq!(total, 800 * 3 + 500);
    }

    #[test]
    fn test_phase_gates() {
        assert!(Phase::Idle.allows_shop());
        assert!(Phase::GameOver.allows_shop());
        assert!(!Phase::Playing.allows_shop());
        assert!(!Phase::Paused.allows_shop());
        assert!(!Phase::Countdown(CountdownStep::Two).allows_shop());

        assert!(!Phase::Countdown(CountdownStep::One).can_start());
        assert!(!Phase::Playing.can_start());
        assert!(Phase::Paused.can_start());
    }
}

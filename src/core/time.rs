//! Fixed-step simulation clock

use std::time::Duration;

use crate::ai::Tick;

/// Clock that advances in equal steps.
///
/// Simulation time is counted in whole steps so it never drifts from the
/// step count, however many ticks run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimClock {
    step: Duration,
    steps: u64,
}

impl SimClock {
    /// Create a clock ticking `rate` times per second
    #[must_use]
    pub fn with_rate(rate: u32) -> Self {
        Self::with_step(Duration::from_secs(1) / rate.max(1))
    }

    /// Create a clock with an explicit step length
    #[must_use]
    pub fn with_step(step: Duration) -> Self {
        Self { step, steps: 0 }
    }

    /// Length of one step
    #[must_use]
    pub fn step(&self) -> Duration {
        self.step
    }

    /// Length of one step in seconds
    #[must_use]
    pub fn delta_seconds(&self) -> f32 {
        self.step.as_secs_f32()
    }

    /// Current simulation time
    #[must_use]
    pub fn now(&self) -> Duration {
        self.step
            .saturating_mul(u32::try_from(self.steps).unwrap_or(u32::MAX))
    }

    /// Number of steps taken
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// The tick for the current step
    #[must_use]
    pub fn tick(&self) -> Tick {
        Tick::new(self.now(), self.delta_seconds())
    }

    /// Move to the next step
    pub fn advance(&mut self) {
        self.steps += 1;
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::with_rate(50)
    }
}

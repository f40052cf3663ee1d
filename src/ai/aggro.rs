//! Aggro state machine
//!
//! Two states: the agent either ignores its target or is engaged with it.
//! Engagement starts when the target comes within the aggro radius and ends
//! only when the engagement timer runs out. Walking away does not end it,
//! and staying close does not extend it.

use std::time::Duration;

/// Engagement state of a pursuing agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggroState {
    /// Not pursuing anything
    #[default]
    Idle,
    /// Pursuing the target until `deadline`
    Engaged {
        /// Simulation time after which engagement lapses
        deadline: Duration,
    },
}

impl AggroState {
    /// State name for debugging and logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Engaged { .. } => "Engaged",
        }
    }

    /// Whether the agent is currently engaged
    #[must_use]
    pub fn is_engaged(&self) -> bool {
        matches!(self, Self::Engaged { .. })
    }

    /// Deadline of the current engagement, if any
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        match self {
            Self::Idle => None,
            Self::Engaged { deadline } => Some(*deadline),
        }
    }

    /// Engage if idle and the target is inside the aggro radius.
    ///
    /// Returns `true` when this call caused the Idle → Engaged transition.
    /// An already engaged state keeps its original deadline.
    pub fn try_acquire(
        &mut self,
        now: Duration,
        target_distance: f32,
        aggro_distance: f32,
        timeout: Duration,
    ) -> bool {
        if self.is_engaged() || target_distance >= aggro_distance {
            return false;
        }

        *self = Self::Engaged {
            deadline: now.saturating_add(timeout),
        };
        true
    }

    /// Drop back to idle once `now` is past the deadline.
    ///
    /// Returns `true` when this call caused the Engaged → Idle transition.
    pub fn expire(&mut self, now: Duration) -> bool {
        match *self {
            Self::Engaged { deadline } if now > deadline => {
                *self = Self::Idle;
                true
            }
            _ => false,
        }
    }
}

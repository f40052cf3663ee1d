//! Pursuit behavior for a single agent
//!
//! Each fixed tick the pursuer:
//!
//! 1. Engages the target if it is inside the aggro radius
//! 2. Computes a horizontal heading straight at the target
//! 3. While engaged, probes ahead and swaps that heading for a detour when an
//!    obstacle sits between it and the target
//! 4. While engaged, turns towards the heading and walks forward
//! 5. Drops engagement once the aggro timer has run out
//!
//! The clock and the ray-cast are supplied by the caller, so a tick is a pure
//! function of its inputs and the pursuer's own state.

use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::aggro::AggroState;
use super::probe::{RayCaster, RayHit};
use super::steering::{Detour, direct_heading, horizontal, look_rotation, select_detour};
use crate::core::{ConfigError, DebugColor, DebugLines};
use crate::ecs::Transform;

/// Tuning for a pursuing agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuitConfig {
    /// Forward speed in units per second
    pub move_speed: f32,
    /// Rotation blend rate per second
    pub rotate_speed: f32,
    /// The agent stops advancing once this close to the target
    pub max_follow_distance: f32,
    /// Target distance that starts an engagement
    pub aggro_distance: f32,
    /// How long an engagement lasts
    pub aggro_timeout_secs: f32,
    /// Agent's horizontal half size, used to clear obstacle corners
    pub footprint: Vec3,
    /// Record debug segments in tick reports
    pub debug_lines: bool,
}

impl Default for PursuitConfig {
    fn default() -> Self {
        Self {
            move_speed: 2.0,
            rotate_speed: 1.0,
            max_follow_distance: 4.0,
            aggro_distance: 20.0,
            aggro_timeout_secs: 10.0,
            footprint: Vec3::new(0.5, 0.0, 0.5),
            debug_lines: false,
        }
    }
}

impl PursuitConfig {
    /// Set movement speed
    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed;
        self
    }

    /// Set rotation rate
    pub fn with_rotate_speed(mut self, speed: f32) -> Self {
        self.rotate_speed = speed;
        self
    }

    /// Set the follow distance
    pub fn with_max_follow_distance(mut self, distance: f32) -> Self {
        self.max_follow_distance = distance;
        self
    }

    /// Set the aggro radius
    pub fn with_aggro_distance(mut self, distance: f32) -> Self {
        self.aggro_distance = distance;
        self
    }

    /// Set the aggro timeout in seconds
    pub fn with_aggro_timeout(mut self, seconds: f32) -> Self {
        self.aggro_timeout_secs = seconds;
        self
    }

    /// Set the agent footprint half-extents
    pub fn with_footprint(mut self, footprint: Vec3) -> Self {
        self.footprint = footprint;
        self
    }

    /// Enable or disable debug segments
    pub fn with_debug_lines(mut self, enabled: bool) -> Self {
        self.debug_lines = enabled;
        self
    }

    /// Aggro timeout as a duration.
    ///
    /// Timeouts too long for a [`Duration`] saturate to [`Duration::MAX`].
    #[must_use]
    pub fn aggro_timeout(&self) -> Duration {
        let seconds = self.aggro_timeout_secs;
        Duration::try_from_secs_f32(seconds).unwrap_or(if seconds > 0.0 {
            Duration::MAX
        } else {
            Duration::ZERO
        })
    }

    /// Check that every value is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scalars = [
            ("move_speed", self.move_speed),
            ("rotate_speed", self.rotate_speed),
            ("max_follow_distance", self.max_follow_distance),
            ("aggro_distance", self.aggro_distance),
            ("aggro_timeout_secs", self.aggro_timeout_secs),
            ("footprint.x", self.footprint.x),
            ("footprint.y", self.footprint.y),
            ("footprint.z", self.footprint.z),
        ];

        for (name, value) in scalars {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        Ok(())
    }
}

/// Inputs of one fixed simulation step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tick {
    /// Simulation time at this step
    pub now: Duration,
    /// Step length in seconds
    pub dt: f32,
}

impl Tick {
    /// Create a tick
    #[must_use]
    pub fn new(now: Duration, dt: f32) -> Self {
        Self { now, dt }
    }
}

/// What happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Aggro state after the tick
    pub aggro: AggroState,
    /// Heading chosen this tick (horizontal, unit length or zero)
    pub heading: Vec3,
    /// Obstacle struck by the forward probe
    pub obstacle: Option<RayHit>,
    /// Route chosen around the obstacle
    pub detour: Option<Detour>,
    /// Whether motion was allowed this tick
    pub should_move: bool,
    /// Whether the agent's position changed
    pub advanced: bool,
    /// Diagnostic segments
    pub debug: DebugLines,
}

/// Pursuit state of one agent.
///
/// The agent's pose lives in its [`Transform`]; the pursuer owns everything
/// that persists between ticks.
#[derive(Debug, Clone)]
pub struct Pursuer {
    config: PursuitConfig,
    aggro: AggroState,
    /// Last usable heading
    heading: Option<Vec3>,
    /// Force added to the next heading
    pending_deflection: Vec3,
    movement_suppressed: bool,
}

impl Pursuer {
    /// Create an idle pursuer
    #[must_use]
    pub fn new(config: PursuitConfig) -> Self {
        Self {
            config,
            aggro: AggroState::Idle,
            heading: None,
            pending_deflection: Vec3::ZERO,
            movement_suppressed: false,
        }
    }

    /// Configuration in use
    #[must_use]
    pub fn config(&self) -> &PursuitConfig {
        &self.config
    }

    /// Current aggro state
    #[must_use]
    pub fn aggro(&self) -> AggroState {
        self.aggro
    }

    /// Whether the pursuer is engaged
    #[must_use]
    pub fn is_engaged(&self) -> bool {
        self.aggro.is_engaged()
    }

    /// Last heading chosen, if any tick produced one
    #[must_use]
    pub fn heading(&self) -> Option<Vec3> {
        self.heading
    }

    /// Add a push to the next heading computation.
    ///
    /// Used by collision response; consumed by the next tick that has a target.
    pub fn apply_deflection(&mut self, force: Vec3) {
        self.pending_deflection += force;
    }

    /// Deflection not yet consumed
    #[must_use]
    pub fn pending_deflection(&self) -> Vec3 {
        self.pending_deflection
    }

    /// Hold the agent in place (it still tracks the target)
    pub fn set_movement_suppressed(&mut self, suppressed: bool) {
        self.movement_suppressed = suppressed;
    }

    /// Check if movement is held
    #[must_use]
    pub fn is_movement_suppressed(&self) -> bool {
        self.movement_suppressed
    }

    /// Run one fixed step.
    ///
    /// Returns `None`, touching nothing, when there is no target.
    pub fn tick<R: RayCaster + ?Sized>(
        &mut self,
        transform: &mut Transform,
        target: Option<Vec3>,
        probe: &R,
        tick: Tick,
    ) -> Option<TickReport> {
        let target = target?;
        let position = transform.position;
        let target_distance = position.distance(target);

        if self.aggro.try_acquire(
            tick.now,
            target_distance,
            self.config.aggro_distance,
            self.config.aggro_timeout(),
        ) {
            log::debug!(
                "Aggro acquired at {:.2}s, target {:.2} away",
                tick.now.as_secs_f32(),
                target_distance
            );
        }

        let deflection = std::mem::take(&mut self.pending_deflection);
        let mut heading = direct_heading(position, target, deflection)
            .or(self.heading)
            .unwrap_or_else(|| horizontal(transform.forward()).normalize_or_zero());

        let mut debug = DebugLines::new(self.config.debug_lines);
        let mut obstacle = None;
        let mut detour = None;

        if self.aggro.is_engaged() {
            debug.line(target, position, DebugColor::Red);

            let hit = if heading == Vec3::ZERO {
                None
            } else {
                probe
                    .cast_ray(position, heading, target_distance)
                    .filter(RayHit::is_obstacle)
            };

            if let Some(hit) = hit {
                debug.line(position, hit.point, DebugColor::Blue);

                if position.distance(hit.bounds.center) < target_distance {
                    let footprint = self.config.footprint;
                    let chosen = select_detour(position, target, &hit.bounds, footprint);
                    debug.polyline(
                        &[position, chosen.edge.near, chosen.edge.far, target],
                        DebugColor::White,
                    );

                    if let Some(around) = chosen.heading {
                        heading = around;
                    }

                    log::debug!(
                        "Obstacle {:?} ahead, detour via edge {} (cost {})",
                        hit.object,
                        chosen.index,
                        chosen.edge.cost
                    );
                    detour = Some(chosen);
                }

                obstacle = Some(hit);
            }
        }

        if heading != Vec3::ZERO {
            self.heading = Some(heading);
        }

        let should_move = self.aggro.is_engaged() && !self.movement_suppressed;
        let mut advanced = false;

        if should_move {
            let dt = tick.dt.max(0.0);

            if heading != Vec3::ZERO {
                let blend = (self.config.rotate_speed * dt).clamp(0.0, 1.0);
                transform.rotation = transform.rotation.slerp(look_rotation(heading), blend);
            }

            if target_distance > self.config.max_follow_distance {
                let step = self.config.move_speed * dt;
                transform.translate(transform.forward() * step);
                advanced = step > 0.0;
            }
        }

        if self.aggro.expire(tick.now) {
            log::debug!("Aggro timed out at {:.2}s", tick.now.as_secs_f32());
        }

        log::trace!(
            "Pursuit tick: {} heading={heading} moved={advanced}",
            self.aggro.name()
        );

        Some(TickReport {
            aggro: self.aggro,
            heading,
            obstacle,
            detour,
            should_move,
            advanced,
            debug,
        })
    }
}

impl Default for Pursuer {
    fn default() -> Self {
        Self::new(PursuitConfig::default())
    }
}

//! Headless fixed-step simulation
//!
//! Builds a scene from a [`SimulationConfig`] (one pursuing agent, one moving
//! target, static box obstacles on a ground plane) and steps it.

use glam::{Quat, Vec3};
use hecs::Entity;

use super::config::{ConfigError, SimulationConfig};
use super::debug::DebugLines;
use super::time::SimClock;
use crate::ai::{Pursuer, TickReport};
use crate::ecs::{Transform, World, apply_velocities, update_pursuers};
use crate::physics::Physics;

/// Aggregate results of a run
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunSummary {
    /// Steps executed
    pub steps: u32,
    /// Steps that ended engaged
    pub engaged_steps: u32,
    /// Steps that steered around an obstacle
    pub detour_steps: u32,
    /// Agent-target distance before the first step
    pub start_distance: f32,
    /// Agent-target distance after the last step
    pub final_distance: f32,
    /// Smallest distance seen
    pub closest_distance: f32,
    /// Debug segments emitted to the log
    pub debug_segments: u32,
}

impl RunSummary {
    /// Format as a single log line
    pub fn format_summary(&self) -> String {
        format!(
            "{} steps | engaged {} | detours {} | distance {:.2} -> {:.2} (closest {:.2})",
            self.steps,
            self.engaged_steps,
            self.detour_steps,
            self.start_distance,
            self.final_distance,
            self.closest_distance
        )
    }
}

/// Emit every segment at debug level and return how many there were
fn log_debug_lines(step: u64, lines: &DebugLines) -> u32 {
    for segment in lines.segments() {
        log::debug!(
            "step {step}: {:?} line {} -> {} rgba {}",
            segment.color,
            segment.start,
            segment.end,
            segment.color.rgba()
        );
    }
    lines.len() as u32
}

/// A running pursuit scene
pub struct Simulation {
    config: SimulationConfig,
    clock: SimClock,
    world: World,
    physics: Physics,
    agent: Entity,
    target: Entity,
}

impl Simulation {
    /// Build the scene described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the config does not validate.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let scene = &config.scene;
        let mut world = World::new();
        let mut physics = Physics::new();

        if scene.ground {
            let ground = physics.create_static_body(Vec3::ZERO, Quat::IDENTITY);
            physics.add_ground_plane(ground);
        }

        for obstacle in &scene.obstacles {
            let body = physics.create_static_body(obstacle.center, Quat::IDENTITY);
            physics.add_box_collider(body, obstacle.half_extents);
        }

        let transform = Transform::facing(scene.agent_position, scene.agent_facing);
        let body = physics.create_kinematic_body(transform.position, transform.rotation);
        let footprint = config.pursuit.footprint;
        physics.add_box_collider(
            body,
            Vec3::new(footprint.x, 0.5, footprint.z).max(Vec3::splat(0.1)),
        );

        let agent = world.spawn_pursuer(
            "pursuer",
            transform,
            Pursuer::new(config.pursuit.clone()),
            Some(body),
        );
        let target = world.spawn_target("target", scene.target_position, scene.target_velocity);

        log::info!(
            "Scene ready: {} obstacle(s), agent at {}, target at {}",
            scene.obstacles.len(),
            scene.agent_position,
            scene.target_position
        );

        Ok(Self {
            clock: SimClock::with_rate(config.tick_rate),
            config,
            world,
            physics,
            agent,
            target,
        })
    }

    /// Run one fixed step and return the agent's report
    pub fn step(&mut self) -> Option<TickReport> {
        let tick = self.clock.tick();

        self.physics.step(tick.dt);
        apply_velocities(&mut self.world, &mut self.physics, tick.dt);

        let report = update_pursuers(&mut self.world, &mut self.physics, Some(self.target), tick)
            .into_iter()
            .find(|(entity, _)| *entity == self.agent)
            .map(|(_, report)| report);

        self.clock.advance();
        report
    }

    /// Run the configured number of steps
    pub fn run(&mut self) -> RunSummary {
        self.run_for(self.config.steps)
    }

    /// Run `steps` steps
    pub fn run_for(&mut self, steps: u32) -> RunSummary {
        let start_distance = self.distance();
        let mut summary = RunSummary {
            start_distance,
            closest_distance: start_distance,
            ..Default::default()
        };

        for _ in 0..steps {
            let Some(report) = self.step() else {
                log::warn!("Pursuer skipped a step");
                continue;
            };

            summary.steps += 1;
            if report.aggro.is_engaged() {
                summary.engaged_steps += 1;
            }
            if report.detour.is_some() {
                summary.detour_steps += 1;
            }
            if report.debug.is_enabled() {
                summary.debug_segments += log_debug_lines(self.clock.steps(), &report.debug);
            }
            summary.closest_distance = summary.closest_distance.min(self.distance());
        }

        summary.final_distance = self.distance();
        summary
    }

    /// Agent-target distance
    pub fn distance(&self) -> f32 {
        match (self.agent_position(), self.target_position()) {
            (Some(agent), Some(target)) => agent.distance(target),
            _ => f32::INFINITY,
        }
    }

    /// Current agent position
    pub fn agent_position(&self) -> Option<Vec3> {
        self.world.position_of(self.agent)
    }

    /// Current target position
    pub fn target_position(&self) -> Option<Vec3> {
        self.world.position_of(self.target)
    }

    /// Whether the agent is engaged
    pub fn agent_engaged(&self) -> bool {
        self.world
            .aggro_of(self.agent)
            .is_some_and(|aggro| aggro.is_engaged())
    }

    /// Simulation clock
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Configuration in use
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BoxConfig, SceneConfig};
    use std::time::Duration;

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig::default().with_tick_rate(0);
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn test_first_step_detours_around_wall() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();

        let report = sim.step().unwrap();

        assert!(report.aggro.is_engaged());
        let detour = report.detour.unwrap();
        assert_eq!(detour.index, 0);
        // Heads right of the wall, not straight at the target
        assert!(report.heading.x > 0.4);
        assert_eq!(sim.clock().steps(), 1);
    }

    #[test]
    fn test_run_closes_distance() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();

        let summary = sim.run();

        assert_eq!(summary.steps, 500);
        assert!(summary.detour_steps > 0);
        assert!(summary.final_distance < summary.start_distance);
        assert!(summary.closest_distance <= summary.final_distance);
    }

    #[test]
    fn test_run_for_continues_clock() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();

        let first = sim.run_for(10);
        let second = sim.run_for(5);

        assert_eq!(first.steps, 10);
        assert_eq!(second.steps, 5);
        assert_eq!(sim.clock().steps(), 15);
        assert!((second.start_distance - first.final_distance).abs() < 1e-6);
    }

    #[test]
    fn test_debug_lines_reach_the_runner() {
        let mut config = SimulationConfig::default();
        config.pursuit.debug_lines = true;
        let mut sim = Simulation::new(config).unwrap();

        let summary = sim.run_for(1);

        // Pursuit line, obstacle hit and three detour legs
        assert_eq!(summary.debug_segments, 5);

        let mut quiet = Simulation::new(SimulationConfig::default()).unwrap();
        assert_eq!(quiet.run_for(1).debug_segments, 0);
    }

    #[test]
    fn test_far_target_never_engages() {
        let scene = SceneConfig {
            target_position: Vec3::new(0.0, 1.0, 50.0),
            obstacles: vec![BoxConfig {
                center: Vec3::new(0.0, 1.0, 7.0),
                half_extents: Vec3::ONE,
            }],
            ..Default::default()
        };
        let mut sim =
            Simulation::new(SimulationConfig::default().with_scene(scene).with_steps(20)).unwrap();

        let summary = sim.run();

        assert_eq!(summary.engaged_steps, 0);
        assert_eq!(summary.detour_steps, 0);
        assert!((summary.final_distance - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_engagement_times_out_while_target_flees() {
        let mut config = SimulationConfig::default().with_steps(100);
        config.pursuit.aggro_timeout_secs = 1.0;
        config.scene.obstacles.clear();
        config.scene.target_velocity = Vec3::new(0.0, 0.0, 20.0);
        let mut sim = Simulation::new(config).unwrap();

        sim.step();
        assert!(sim.agent_engaged());

        sim.run();
        assert!(!sim.agent_engaged());
        assert!(sim.clock().now() > Duration::from_secs(1));
    }
}

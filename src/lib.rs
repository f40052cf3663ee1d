//! Enemy pursuit steering for fixed-step game simulations
//!
//! This crate provides:
//! - Aggro tracking with a one-shot engagement timer
//! - Horizontal pursuit headings with a single-obstacle detour
//! - A ray-cast probe backed by rapier3d
//! - hecs integration and a headless simulation runner

pub mod ai;
pub mod core;
pub mod ecs;
pub mod physics;

// Re-exports for convenience
pub use glam;
pub use hecs;
pub use rapier3d;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::ai::{
        AggroState, ObstacleBounds, Pursuer, PursuitConfig, RayCaster, RayHit, Tick, TickReport,
    };
    pub use crate::core::{ConfigError, SimClock, Simulation, SimulationConfig};
    pub use crate::ecs::{Name, PhysicsBody, Transform, World};
    pub use crate::physics::{Physics, PhysicsProbe, RigidBodyHandle};
    pub use glam::{Quat, Vec3};
}

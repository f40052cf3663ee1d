//! Entity Component System module
//!
//! Built on top of the hecs ECS library

mod components;
mod systems;
mod world;

pub use components::{Name, PhysicsBody, Transform, Velocity};
pub use systems::{apply_velocities, update_pursuers};
pub use world::World;

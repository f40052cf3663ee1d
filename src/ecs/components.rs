//! Components carried by pursuit entities

use glam::{Quat, Vec3};

use crate::ai::look_rotation;
use crate::physics::RigidBodyHandle;

/// World-space pose of an entity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,
    /// Orientation, yaw only for pursuing agents
    pub rotation: Quat,
}

impl Transform {
    /// Pose at the origin facing -Z
    pub fn new() -> Self {
        Self::default()
    }

    /// Pose at `position` with identity rotation
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Pose at `position` yawed so that [`Transform::forward`] points along `facing`.
    ///
    /// The vertical part of `facing` is ignored.
    pub fn facing(position: Vec3, facing: Vec3) -> Self {
        Self {
            position,
            rotation: look_rotation(facing),
        }
    }

    /// Local -Z in world space
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Local +X in world space
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Move by a world-space delta
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }
}

/// Constant-velocity motion, used for scripted targets
#[derive(Debug, Clone, Copy, Default)]
pub struct Velocity {
    /// Units per second
    pub linear: Vec3,
}

/// Kinematic body that mirrors this entity's transform
#[derive(Debug, Clone, Copy)]
pub struct PhysicsBody(pub RigidBodyHandle);

/// Label used in log output
#[derive(Debug, Clone)]
pub struct Name(pub String);

impl Name {
    /// Create a name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

//! Obstacle probing
//!
//! The steering code never talks to a physics world directly. It asks a
//! [`RayCaster`] for the first thing in front of the agent and gets back a
//! plain [`RayHit`] describing the struck object's bounds.

use glam::Vec3;

/// Opaque identifier of a struck object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ObjectId(pub u64);

/// Axis-aligned bounds of an obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleBounds {
    /// Center of the box
    pub center: Vec3,
    /// Half size along each axis
    pub half_extents: Vec3,
}

impl ObstacleBounds {
    /// Create bounds from center and half-extents
    #[must_use]
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Create bounds from min/max corners
    #[must_use]
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self {
            center: (min + max) * 0.5,
            half_extents: (max - min) * 0.5,
        }
    }

    /// Height of the bottom face
    #[must_use]
    pub fn floor(&self) -> f32 {
        self.center.y - self.half_extents.y
    }
}

/// Result of a ray-cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// The point of intersection
    pub point: Vec3,
    /// The object that was hit
    pub object: ObjectId,
    /// Bounds of the struck collider
    pub bounds: ObstacleBounds,
    /// The ray struck the casting agent's own body
    pub is_agent_self: bool,
    /// The ray struck ground or terrain
    pub is_ground: bool,
}

impl RayHit {
    /// Create a hit against an ordinary obstacle
    #[must_use]
    pub fn obstacle(point: Vec3, object: ObjectId, bounds: ObstacleBounds) -> Self {
        Self {
            point,
            object,
            bounds,
            is_agent_self: false,
            is_ground: false,
        }
    }

    /// Whether this hit should be steered around
    #[must_use]
    pub fn is_obstacle(&self) -> bool {
        !self.is_agent_self && !self.is_ground
    }
}

/// Capability to cast a ray into the world
pub trait RayCaster {
    /// Cast a ray and return the first hit within `max_distance`
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;
}

impl<F> RayCaster for F
where
    F: Fn(Vec3, Vec3, f32) -> Option<RayHit>,
{
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        self(origin, direction, max_distance)
    }
}

/// A world with nothing in it
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyWorld;

impl RayCaster for EmptyWorld {
    fn cast_ray(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Option<RayHit> {
        None
    }
}

//! Physics world using rapier3d
//!
//! Only what pursuit needs: static obstacles, kinematic agents and a ray-cast
//! probe that reports the struck collider's bounds.

use glam::{Quat, Vec3};
use rapier3d::na::{Quaternion, Translation3, UnitQuaternion};
use rapier3d::parry::query::PointQuery;
use rapier3d::prelude::*;
use rustc_hash::FxHashSet;

use crate::ai::{ObjectId, ObstacleBounds, RayCaster, RayHit};

/// Handle to a rigid body in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RigidBodyHandle(pub rapier3d::dynamics::RigidBodyHandle);

/// Handle to a collider in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub rapier3d::geometry::ColliderHandle);

impl ColliderHandle {
    /// Stable object id for this collider
    #[must_use]
    pub fn object_id(self) -> ObjectId {
        let (index, generation) = self.0.into_raw_parts();
        ObjectId((u64::from(generation) << 32) | u64::from(index))
    }
}

/// Convert glam Quat to rapier3d UnitQuaternion
fn quat_to_rapier(q: Quat) -> UnitQuaternion<f32> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

/// Convert rapier3d UnitQuaternion to glam Quat
fn rapier_to_quat(uq: &UnitQuaternion<f32>) -> Quat {
    let q = uq.quaternion();
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

fn isometry(position: Vec3, rotation: Quat) -> Isometry<f32> {
    Isometry::from_parts(
        Translation3::new(position.x, position.y, position.z),
        quat_to_rapier(rotation),
    )
}

fn point_to_vec(p: &Point<f32>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

/// Rapier world holding obstacles, ground and agent bodies
pub struct Physics {
    /// Gravity vector
    pub gravity: Vec3,
    pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    integration_parameters: IntegrationParameters,
    /// Colliders reported with the ground flag
    ground: FxHashSet<ColliderHandle>,
}

impl Physics {
    /// Create a new physics world with default gravity
    pub fn new() -> Self {
        Self::with_gravity(Vec3::new(0.0, -9.81, 0.0))
    }

    /// Create a new physics world with custom gravity
    pub fn with_gravity(gravity: Vec3) -> Self {
        Self {
            gravity,
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            integration_parameters: IntegrationParameters::default(),
            ground: FxHashSet::default(),
        }
    }

    /// Step the physics simulation.
    ///
    /// Also refreshes the query pipeline, so ray-casts see colliders added or
    /// moved before this call.
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;

        self.pipeline.step(
            &vector![self.gravity.x, self.gravity.y, self.gravity.z],
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Create a static rigid body (doesn't move)
    pub fn create_static_body(&mut self, position: Vec3, rotation: Quat) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed()
            .position(isometry(position, rotation))
            .build();

        RigidBodyHandle(self.rigid_body_set.insert(body))
    }

    /// Create a kinematic rigid body (controlled directly)
    pub fn create_kinematic_body(&mut self, position: Vec3, rotation: Quat) -> RigidBodyHandle {
        let body = RigidBodyBuilder::kinematic_position_based()
            .position(isometry(position, rotation))
            .build();

        RigidBodyHandle(self.rigid_body_set.insert(body))
    }

    /// Add a box collider to a rigid body
    pub fn add_box_collider(&mut self, body: RigidBodyHandle, half_extents: Vec3) -> ColliderHandle {
        let collider =
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build();

        ColliderHandle(self.collider_set.insert_with_parent(
            collider,
            body.0,
            &mut self.rigid_body_set,
        ))
    }

    /// Add a ground plane collider.
    ///
    /// Ray hits against it are reported as ground.
    pub fn add_ground_plane(&mut self, body: RigidBodyHandle) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(100.0, 0.1, 100.0).build();

        let handle = ColliderHandle(self.collider_set.insert_with_parent(
            collider,
            body.0,
            &mut self.rigid_body_set,
        ));
        self.ground.insert(handle);
        handle
    }

    /// Check if a collider was registered as ground
    pub fn is_ground(&self, collider: ColliderHandle) -> bool {
        self.ground.contains(&collider)
    }

    /// Get the position of a rigid body
    pub fn get_position(&self, body: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set.get(body.0).map(|rb| {
            let pos = rb.translation();
            Vec3::new(pos.x, pos.y, pos.z)
        })
    }

    /// Get the rotation of a rigid body
    pub fn get_rotation(&self, body: RigidBodyHandle) -> Option<Quat> {
        self.rigid_body_set
            .get(body.0)
            .map(|rb| rapier_to_quat(rb.rotation()))
    }

    /// Set the pose a kinematic body reaches on the next step
    pub fn set_kinematic_pose(&mut self, body: RigidBodyHandle, position: Vec3, rotation: Quat) {
        if let Some(rb) = self.rigid_body_set.get_mut(body.0) {
            rb.set_next_kinematic_position(isometry(position, rotation));
        }
    }

    /// Cast a ray and return the first hit.
    ///
    /// Colliders containing the ray origin are skipped, so an agent probing
    /// from inside its own body sees past it.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );
        let outside = |_: rapier3d::geometry::ColliderHandle, collider: &Collider| {
            !collider
                .shape()
                .contains_point(collider.position(), &ray.origin)
        };
        let filter = QueryFilter::default().predicate(&outside);

        self.query_pipeline
            .cast_ray(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                filter,
            )
            .map(|(handle, distance)| {
                let point = ray.point_at(distance);
                RaycastHit {
                    collider: ColliderHandle(handle),
                    point: point_to_vec(&point),
                    distance,
                }
            })
    }

    /// World-space bounds of a collider
    pub fn collider_bounds(&self, collider: ColliderHandle) -> Option<ObstacleBounds> {
        self.collider_set.get(collider.0).map(|c| {
            let aabb = c.compute_aabb();
            ObstacleBounds::from_min_max(point_to_vec(&aabb.mins), point_to_vec(&aabb.maxs))
        })
    }

    /// Body a collider is attached to
    pub fn collider_body(&self, collider: ColliderHandle) -> Option<RigidBodyHandle> {
        self.collider_set
            .get(collider.0)
            .and_then(Collider::parent)
            .map(RigidBodyHandle)
    }

    /// Ray-cast probe for an agent.
    ///
    /// Hits on colliders of `agent` are flagged as self hits.
    pub fn probe(&self, agent: Option<RigidBodyHandle>) -> PhysicsProbe<'_> {
        PhysicsProbe {
            physics: self,
            agent,
        }
    }
}

impl Default for Physics {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a raycast
#[derive(Debug, Clone)]
pub struct RaycastHit {
    /// The collider that was hit
    pub collider: ColliderHandle,
    /// The point of intersection
    pub point: Vec3,
    /// Distance from ray origin
    pub distance: f32,
}

/// [`RayCaster`] backed by a [`Physics`] world
#[derive(Clone, Copy)]
pub struct PhysicsProbe<'a> {
    physics: &'a Physics,
    agent: Option<RigidBodyHandle>,
}

impl RayCaster for PhysicsProbe<'_> {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let hit = self.physics.raycast(origin, direction, max_distance)?;
        let bounds = self.physics.collider_bounds(hit.collider)?;
        let body = self.physics.collider_body(hit.collider);

        Some(RayHit {
            point: hit.point,
            object: hit.collider.object_id(),
            bounds,
            is_agent_self: self.agent.is_some() && body == self.agent,
            is_ground: self.physics.is_ground(hit.collider),
        })
    }
}

//! Entity storage for pursuit scenes, backed by hecs

use glam::Vec3;
use hecs::Entity;

use super::components::{Name, PhysicsBody, Transform, Velocity};
use crate::ai::{AggroState, Pursuer};
use crate::physics::RigidBodyHandle;

/// Pursuers, their targets and any other entities in a scene
pub struct World {
    inner: hecs::World,
}

impl World {
    /// Create an empty world
    pub fn new() -> Self {
        Self {
            inner: hecs::World::new(),
        }
    }

    /// Spawn an entity with arbitrary components
    pub fn spawn(&mut self, components: impl hecs::DynamicBundle) -> Entity {
        self.inner.spawn(components)
    }

    /// Spawn a pursuing agent, optionally mirrored to a kinematic body
    pub fn spawn_pursuer(
        &mut self,
        name: &str,
        transform: Transform,
        pursuer: Pursuer,
        body: Option<RigidBodyHandle>,
    ) -> Entity {
        let entity = match body {
            Some(body) => {
                self.inner
                    .spawn((Name::new(name), transform, pursuer, PhysicsBody(body)))
            }
            None => self.inner.spawn((Name::new(name), transform, pursuer)),
        };
        log::debug!("Spawned pursuer '{}' at {}", name, transform.position);
        entity
    }

    /// Spawn a target moving at a constant velocity
    pub fn spawn_target(&mut self, name: &str, position: Vec3, velocity: Vec3) -> Entity {
        log::debug!("Spawned target '{}' at {}", name, position);
        self.inner.spawn((
            Name::new(name),
            Transform::from_position(position),
            Velocity { linear: velocity },
        ))
    }

    /// Remove an entity. Returns false if it was already gone.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        self.inner.despawn(entity).is_ok()
    }

    /// Borrow a component of an entity
    pub fn get<T: hecs::Component>(
        &self,
        entity: Entity,
    ) -> Result<hecs::Ref<'_, T>, hecs::ComponentError> {
        self.inner.get::<&T>(entity)
    }

    /// World position of an entity, if it exists and has a transform
    pub fn position_of(&self, entity: Entity) -> Option<Vec3> {
        self.get::<Transform>(entity).ok().map(|t| t.position)
    }

    /// Aggro state of a pursuing entity
    pub fn aggro_of(&self, entity: Entity) -> Option<AggroState> {
        self.get::<Pursuer>(entity).ok().map(|p| p.aggro())
    }

    /// Number of live entities
    pub fn len(&self) -> u32 {
        self.inner.len()
    }

    /// Check if the world has no entities
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Query entities with mutable access
    pub fn query_mut<Q: hecs::Query>(&mut self) -> hecs::QueryMut<'_, Q> {
        self.inner.query_mut::<Q>()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    use crate::physics::Physics;

    #[test]
    fn test_spawn_pursuer_with_body() {
        let mut world = World::new();
        let mut physics = Physics::new();
        let body = physics.create_kinematic_body(Vec3::ZERO, Quat::IDENTITY);

        let with_body =
            world.spawn_pursuer("a", Transform::new(), Pursuer::default(), Some(body));
        let without = world.spawn_pursuer("b", Transform::new(), Pursuer::default(), None);

        assert_eq!(world.len(), 2);
        assert!(world.get::<PhysicsBody>(with_body).is_ok());
        assert!(world.get::<PhysicsBody>(without).is_err());
        assert_eq!(world.aggro_of(without), Some(AggroState::Idle));
    }

    #[test]
    fn test_spawn_target() {
        let mut world = World::new();
        let target = world.spawn_target("t", Vec3::new(1.0, 0.0, 2.0), Vec3::X);

        assert_eq!(world.position_of(target), Some(Vec3::new(1.0, 0.0, 2.0)));
        assert_eq!(world.get::<Velocity>(target).unwrap().linear, Vec3::X);
        assert_eq!(world.aggro_of(target), None);
    }

    #[test]
    fn test_despawn() {
        let mut world = World::new();
        let entity = world.spawn((Transform::new(),));

        assert!(world.despawn(entity));
        assert!(!world.despawn(entity));
        assert!(world.is_empty());
        assert_eq!(world.position_of(entity), None);
    }
}

//! Per-tick systems over the ECS world

use glam::{Quat, Vec3};
use hecs::Entity;

use super::components::{PhysicsBody, Transform, Velocity};
use super::world::World;
use crate::ai::{Pursuer, Tick, TickReport};
use crate::physics::{Physics, RigidBodyHandle};

/// Tick every pursuer against `target`.
///
/// Agents with a [`PhysicsBody`] probe the physics world as themselves and
/// have their kinematic body moved to the new pose. Returns the report of
/// every agent that ran; a missing or despawned target yields none.
pub fn update_pursuers(
    world: &mut World,
    physics: &mut Physics,
    target: Option<Entity>,
    tick: Tick,
) -> Vec<(Entity, TickReport)> {
    let target_position = target.and_then(|entity| world.position_of(entity));
    let mut reports = Vec::new();
    let mut poses: Vec<(RigidBodyHandle, Vec3, Quat)> = Vec::new();

    for (entity, (transform, pursuer, body)) in
        world.query_mut::<(&mut Transform, &mut Pursuer, Option<&PhysicsBody>)>()
    {
        let body = body.map(|b| b.0);
        let probe = physics.probe(body);

        if let Some(report) = pursuer.tick(transform, target_position, &probe, tick) {
            if let Some(body) = body {
                poses.push((body, transform.position, transform.rotation));
            }
            reports.push((entity, report));
        }
    }

    for (body, position, rotation) in poses {
        physics.set_kinematic_pose(body, position, rotation);
    }

    reports
}

/// Move entities with a [`Velocity`] and sync their kinematic bodies
pub fn apply_velocities(world: &mut World, physics: &mut Physics, dt: f32) {
    for (_, (transform, velocity, body)) in
        world.query_mut::<(&mut Transform, &Velocity, Option<&PhysicsBody>)>()
    {
        transform.translate(velocity.linear * dt);
        if let Some(body) = body {
            physics.set_kinematic_pose(body.0, transform.position, transform.rotation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::PursuitConfig;
    use std::time::Duration;

    fn tick() -> Tick {
        Tick::new(Duration::ZERO, 0.02)
    }

    #[test]
    fn test_pursuers_chase_target_entity() {
        let mut world = World::new();
        let mut physics = Physics::new();

        let target = world.spawn_target("player", Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let agent = world.spawn_pursuer(
            "enemy",
            Transform::facing(Vec3::ZERO, Vec3::Z),
            Pursuer::new(PursuitConfig::default()),
            None,
        );

        let reports = update_pursuers(&mut world, &mut physics, Some(target), tick());

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].0, agent);
        assert!(reports[0].1.advanced);
        assert!(world.get::<Pursuer>(agent).unwrap().is_engaged());
        assert!(world.position_of(agent).unwrap().z > 0.0);
    }

    #[test]
    fn test_missing_target_is_noop() {
        let mut world = World::new();
        let mut physics = Physics::new();
        let agent = world.spawn((Transform::new(), Pursuer::default()));

        let gone = world.spawn((Transform::new(),));
        assert!(world.despawn(gone));

        assert!(update_pursuers(&mut world, &mut physics, None, tick()).is_empty());
        assert!(update_pursuers(&mut world, &mut physics, Some(gone), tick()).is_empty());
        assert!(!world.get::<Pursuer>(agent).unwrap().is_engaged());
        assert_eq!(world.position_of(agent), Some(Vec3::ZERO));
    }

    #[test]
    fn test_kinematic_body_follows_agent() {
        let mut world = World::new();
        let mut physics = Physics::new();

        let body = physics.create_kinematic_body(Vec3::ZERO, Quat::IDENTITY);
        physics.add_box_collider(body, Vec3::splat(0.5));
        let target = world.spawn((Transform::from_position(Vec3::new(0.0, 0.0, 10.0)),));
        let agent = world.spawn_pursuer(
            "enemy",
            Transform::facing(Vec3::ZERO, Vec3::Z),
            Pursuer::default(),
            Some(body),
        );
        physics.step(0.02);

        update_pursuers(&mut world, &mut physics, Some(target), tick());
        physics.step(0.02);

        let expected = world.position_of(agent).unwrap();
        let actual = physics.get_position(body).unwrap();
        assert!((expected - actual).length() < 1e-4);
    }

    #[test]
    fn test_apply_velocities() {
        let mut world = World::new();
        let mut physics = Physics::new();
        let entity = world.spawn((
            Transform::new(),
            Velocity {
                linear: Vec3::new(1.0, 0.0, -2.0),
            },
        ));

        apply_velocities(&mut world, &mut physics, 0.5);

        assert_eq!(world.position_of(entity), Some(Vec3::new(0.5, 0.0, -1.0)));
    }
}

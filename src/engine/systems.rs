// ECS systems for the particle field
// One frame per schedule run: each particle goes through field::advance

use bevy_ecs::prelude::*;
use super::components::*;
use super::config::FieldConfig;
use super::field::{self, Kinematics, ParticleField};

/// Attract, damp, integrate and wrap every particle for one frame
pub fn field_step_system(
    mut query: Query<(&mut Transform, &mut Velocity), With<Particle>>,
    field: Res<ParticleField>,
    config: Res<FieldConfig>,
) {
    let bounds = field.bounds();
    for (mut transform, mut velocity) in query.iter_mut() {
        let next = field::advance(
            Kinematics {
                position: transform.position,
                velocity: velocity.linear,
            },
            field.pointer,
            bounds,
            &config,
        );
        transform.position = next.position;
        velocity.linear = next.velocity;
    }
}

/// Run condition backing the field's start/stop handle
pub fn field_running(field: Res<ParticleField>) -> bool {
    field.is_running()
}

/// One run of this schedule is one animation frame of the field.
pub fn field_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(field_step_system.run_if(field_running));
    schedule
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::field::Pointer;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn world_with_particles(seed: u64) -> World {
        let mut world = World::new();
        world.insert_resource(FieldConfig::default());
        world.insert_resource(ParticleField::new(640.0, 480.0));
        field::spawn_particles(&mut world, &mut StdRng::seed_from_u64(seed));
        world
    }

    fn snapshot(world: &mut World) -> Vec<(Entity, Kinematics)> {
        let mut rows: Vec<_> = world
            .query::<(Entity, &Transform, &Velocity)>()
            .iter(world)
            .map(|(e, t, v)| {
                (
                    e,
                    Kinematics {
                        position: t.position,
                        velocity: v.linear,
                    },
                )
            })
            .collect();
        rows.sort_by_key(|(e, _)| *e);
        rows
    }

    #[test]
    fn one_run_is_attract_damp_integrate_wrap() {
        let mut world = world_with_particles(21);
        let pointer = Pointer(Some(Vec2::new(320.0, 240.0)));
        world.resource_mut::<ParticleField>().pointer = pointer;
        let before = snapshot(&mut world);

        let mut schedule = field_schedule();
        schedule.run(&mut world);

        let config = FieldConfig::default();
        let bounds = Vec2::new(640.0, 480.0);
        let after = snapshot(&mut world);
        assert_eq!(after.len(), 55);
        for ((_, old), (_, new)) in before.iter().zip(&after) {
            let velocity = field::damp(field::attract(old.velocity, old.position, pointer, &config), &config);
            let position = field::wrap(old.position + velocity, bounds);
            assert_eq!(new.velocity, velocity);
            assert_eq!(new.position, position);
        }
    }

    #[test]
    fn positions_stay_inside_bounds_over_many_frames() {
        let mut world = world_with_particles(5);
        let mut schedule = field_schedule();
        for frame in 0..2_000 {
            if frame % 300 == 0 {
                world.resource_mut::<ParticleField>().pointer =
                    Pointer(Some(Vec2::new((frame % 640) as f32, 100.0)));
            }
            schedule.run(&mut world);
            for (transform,) in world.query::<(&Transform,)>().iter(&world) {
                assert!(transform.position.x >= 0.0 && transform.position.x < 640.0);
                assert!(transform.position.y >= 0.0 && transform.position.y < 480.0);
            }
        }
    }

    #[test]
    fn stopped_field_does_not_move() {
        let mut world = world_with_particles(9);
        world.resource_mut::<ParticleField>().stop();
        let before = snapshot(&mut world);

        let mut schedule = field_schedule();
        schedule.run(&mut world);
        assert_eq!(before, snapshot(&mut world));

        world.resource_mut::<ParticleField>().start();
        schedule.run(&mut world);
        assert_ne!(before, snapshot(&mut world));
    }
}

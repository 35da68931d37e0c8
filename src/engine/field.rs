// Particle field state: surface bounds, pointer, the run handle, and the
// per-particle physics step shared by the ECS systems.

use bevy_ecs::prelude::*;
use glam::Vec2;
use rand::Rng;

use super::components::*;
use super::config::FieldConfig;

/// Pointer position relative to the surface origin.
/// `None` means the pointer has left the host region and attracts nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer(pub Option<Vec2>);

#[derive(Resource, Debug, Clone)]
pub struct ParticleField {
    width: f32,
    height: f32,
    pub pointer: Pointer,
    running: bool,
}

impl ParticleField {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            pointer: Pointer::default(),
            running: true,
        }
    }

    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

/// Position and velocity of one particle, the state `advance` evolves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Soft pull toward the pointer while it is inside the attraction radius.
pub fn attract(velocity: Vec2, position: Vec2, pointer: Pointer, config: &FieldConfig) -> Vec2 {
    match pointer.0 {
        Some(target) => {
            let delta = target - position;
            if delta.length() < config.attraction_radius {
                velocity + delta * config.attraction_scale
            } else {
                velocity
            }
        }
        None => velocity,
    }
}

/// Damp both components once the speed exceeds the cap. Converges over
/// several frames rather than clamping.
pub fn damp(velocity: Vec2, config: &FieldConfig) -> Vec2 {
    if velocity.length() > config.speed_cap {
        velocity * config.damping
    } else {
        velocity
    }
}

/// Toroidal wrap of one coordinate into [0, max).
///
/// Falling below 0 lands on the largest value below `max`; reaching `max`
/// lands on 0. Velocity is untouched.
pub fn wrap_axis(value: f32, max: f32) -> f32 {
    if value < 0.0 {
        (max - max * f32::EPSILON).max(0.0)
    } else if value >= max {
        0.0
    } else {
        value
    }
}

pub fn wrap(position: Vec2, bounds: Vec2) -> Vec2 {
    Vec2::new(wrap_axis(position.x, bounds.x), wrap_axis(position.y, bounds.y))
}

/// One frame of physics for a single particle: attract, damp, integrate, wrap.
pub fn advance(state: Kinematics, pointer: Pointer, bounds: Vec2, config: &FieldConfig) -> Kinematics {
    let velocity = attract(state.velocity, state.position, pointer, config);
    let velocity = damp(velocity, config);
    let position = wrap(state.position + velocity, bounds);
    Kinematics { position, velocity }
}

/// Spawn `config.count` particles uniformly inside the field bounds.
pub fn spawn_particles(world: &mut World, rng: &mut impl Rng) {
    let config = *world.resource::<FieldConfig>();
    let bounds = world.resource::<ParticleField>().bounds();
    let spread = config.velocity_spread;

    let batch: Vec<_> = (0..config.count)
        .map(|_| {
            let position = Vec2::new(rng.gen_range(0.0..bounds.x), rng.gen_range(0.0..bounds.y));
            let velocity = Vec2::new(rng.gen_range(-spread..=spread), rng.gen_range(-spread..=spread));
            let color = config.palette[rng.gen_range(0..config.palette.len())];
            let glow = Glow {
                radius: rng.gen_range(config.radius_min..=config.radius_max),
                alpha: rng.gen_range(config.alpha_min..=config.alpha_max),
            };
            (
                Particle,
                Transform::from_position(position),
                Velocity::new(velocity),
                color,
                glow,
            )
        })
        .collect();

    world.spawn_batch(batch);
}

pub fn despawn_particles(world: &mut World) {
    let entities: Vec<Entity> = world
        .query_filtered::<Entity, With<Particle>>()
        .iter(world)
        .collect();
    for entity in entities {
        world.despawn(entity);
    }
}

/// Resize handling: discard every particle, adopt the new bounds, respawn.
/// Returns false (and leaves the field untouched) for an empty surface.
pub fn reset(world: &mut World, width: f32, height: f32, rng: &mut impl Rng) -> bool {
    if !(width >= 1.0 && height >= 1.0) {
        log::debug!("ignoring particle field reset to {width}x{height}");
        return false;
    }

    despawn_particles(world);
    {
        let mut field = world.resource_mut::<ParticleField>();
        field.width = width;
        field.height = height;
    }
    spawn_particles(world, rng);
    true
}

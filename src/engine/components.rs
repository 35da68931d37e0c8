// ECS components for one particle of the hero backdrop
// A particle entity is (Particle, Transform, Velocity, Color, Glow)

use bevy_ecs::prelude::*;
use glam::Vec2;

/// Marker for entities owned by the particle field.
/// Resizes despawn everything carrying it.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Particle;

/// Position in logical pixels, origin at the window's top-left corner
#[derive(Component, Debug, Clone, Copy)]
pub struct Transform {
    pub position: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec2) -> Self {
        Self { position }
    }
}

/// Velocity in logical pixels per frame
#[derive(Component, Debug, Clone, Copy)]
pub struct Velocity {
    pub linear: Vec2,
}

impl Velocity {
    pub fn new(linear: Vec2) -> Self {
        Self { linear }
    }
}

/// sRGB color, each channel in [0, 1]
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    pub fn to_rgb8(self) -> [u8; 3] {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [quantize(self.r), quantize(self.g), quantize(self.b)]
    }

    /// Linear-light channels for writing into an sRGB render target.
    pub fn to_linear(self) -> [f32; 3] {
        fn decode(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        [decode(self.r), decode(self.g), decode(self.b)]
    }
}

/// Visual size and opacity, fixed when the particle is spawned
#[derive(Component, Debug, Clone, Copy)]
pub struct Glow {
    pub radius: f32,
    pub alpha: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb8_round_trips() {
        let c = Color::from_rgb8(0x81, 0x8C, 0xF8);
        assert_eq!(c.to_rgb8(), [0x81, 0x8C, 0xF8]);
        assert_eq!(Color { r: 2.0, g: -1.0, b: 0.5 }.to_rgb8(), [255, 0, 128]);
    }

    #[test]
    fn linear_conversion_keeps_extremes() {
        assert_eq!(Color { r: 0.0, g: 1.0, b: 0.0 }.to_linear(), [0.0, 1.0, 0.0]);
        let [r, _, _] = Color { r: 0.5, g: 0.5, b: 0.5 }.to_linear();
        assert!(r > 0.2 && r < 0.22);
    }
}

// Connecting lines between nearby particles.
// Brute-force pair pass: 55 particles is 1485 pairs per frame.

use glam::Vec2;

use super::components::Color;
use super::config::FieldConfig;

/// Render snapshot of one particle, in spawn order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleDraw {
    pub position: Vec2,
    pub radius: f32,
    pub alpha: f32,
    pub color: Color,
}

/// One line segment to stroke on top of the dots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub from: Vec2,
    pub to: Vec2,
    /// Color of the first particle of the pair.
    pub color: Color,
    pub opacity: f32,
}

/// Opacity falls linearly from `max_opacity` at distance 0 to 0 at `max_distance`.
pub fn link_opacity(distance: f32, config: &FieldConfig) -> f32 {
    (1.0 - distance / config.link_distance) * config.link_max_opacity
}

pub fn collect_links(particles: &[ParticleDraw], config: &FieldConfig) -> Vec<Link> {
    let mut links = Vec::new();
    for (i, a) in particles.iter().enumerate() {
        for b in &particles[i + 1..] {
            let distance = a.position.distance(b.position);
            if distance < config.link_distance {
                links.push(Link {
                    from: a.position,
                    to: b.position,
                    color: a.color,
                    opacity: link_opacity(distance, config),
                });
            }
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(x: f32, y: f32, color: Color) -> ParticleDraw {
        ParticleDraw {
            position: Vec2::new(x, y),
            radius: 1.0,
            alpha: 0.5,
            color,
        }
    }

    #[test]
    fn links_only_close_pairs_once() {
        let config = FieldConfig::default();
        let red = Color::from_rgb8(255, 0, 0);
        let blue = Color::from_rgb8(0, 0, 255);
        let particles = [dot(0.0, 0.0, red), dot(100.0, 0.0, blue), dot(400.0, 0.0, blue)];

        let links = collect_links(&particles, &config);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].from, Vec2::ZERO);
        assert_eq!(links[0].to, Vec2::new(100.0, 0.0));
        assert_eq!(links[0].color, red);
    }

    #[test]
    fn opacity_scales_with_distance() {
        let config = FieldConfig::default();
        assert!((link_opacity(0.0, &config) - 0.18).abs() < 1e-6);
        assert!((link_opacity(65.0, &config) - 0.09).abs() < 1e-6);
        assert!(link_opacity(129.9, &config) > 0.0);
    }

    #[test]
    fn threshold_is_exclusive() {
        let config = FieldConfig::default();
        let c = Color::from_rgb8(255, 255, 255);
        assert!(collect_links(&[dot(0.0, 0.0, c), dot(130.0, 0.0, c)], &config).is_empty());
    }

    #[test]
    fn full_field_pair_count_is_bounded() {
        let config = FieldConfig::default();
        let c = Color::from_rgb8(255, 255, 255);
        let clustered: Vec<_> = (0..55).map(|i| dot(i as f32, 0.0, c)).collect();
        assert_eq!(collect_links(&clustered, &config).len(), 55 * 54 / 2);
    }
}

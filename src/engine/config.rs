// Tuned constants for the hero section, grouped per component.
// The particle numbers are empirical visual values; keep them as data.

use std::time::Duration;

use bevy_ecs::prelude::*;

use super::components::Color;

#[derive(Resource, Debug, Clone, Copy)]
pub struct FieldConfig {
    pub count: usize,
    /// Each velocity component is drawn from [-spread, spread].
    pub velocity_spread: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    pub alpha_min: f32,
    pub alpha_max: f32,
    pub attraction_radius: f32,
    /// Per-axis fraction of the pointer displacement added to velocity.
    pub attraction_scale: f32,
    pub speed_cap: f32,
    pub damping: f32,
    pub link_distance: f32,
    pub link_max_opacity: f32,
    pub link_width: f32,
    pub palette: [Color; 4],
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            count: 55,
            velocity_spread: 0.275,
            radius_min: 0.8,
            radius_max: 3.0,
            alpha_min: 0.25,
            alpha_max: 0.75,
            attraction_radius: 180.0,
            attraction_scale: 0.00012,
            speed_cap: 1.2,
            damping: 0.98,
            link_distance: 130.0,
            link_max_opacity: 0.18,
            link_width: 0.8,
            palette: [
                Color::from_rgb8(0x81, 0x8C, 0xF8),
                Color::from_rgb8(0x22, 0xD3, 0xEE),
                Color::from_rgb8(0xEC, 0x48, 0x99),
                Color::from_rgb8(0x63, 0x66, 0xF1),
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct TypingConfig {
    pub phrases: Vec<String>,
    pub start_delay: Duration,
    pub type_delay: Duration,
    pub delete_delay: Duration,
    pub full_dwell: Duration,
    pub empty_dwell: Duration,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            phrases: [
                "Java Full Stack Developer",
                "Web Application Builder",
                "Problem Solver",
                "Clean Code Advocate",
                "Backend Enthusiast",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            start_delay: Duration::from_millis(2600),
            type_delay: Duration::from_millis(120),
            delete_delay: Duration::from_millis(55),
            full_dwell: Duration::from_millis(2000),
            empty_dwell: Duration::from_millis(380),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ToastConfig {
    pub lifetime: Duration,
    pub fade: Duration,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            lifetime: Duration::from_millis(3200),
            fade: Duration::from_millis(250),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SplashConfig {
    pub duration: Duration,
    pub fade: Duration,
}

impl Default for SplashConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(2200),
            fade: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CursorConfig {
    /// Fraction of the remaining distance covered each frame.
    pub easing: f32,
    pub ring_radius: f32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            easing: 0.12,
            ring_radius: 17.0,
        }
    }
}

/// Floating resume control, revealed once the loading screen is done.
#[derive(Debug, Clone, Copy)]
pub struct ResumeConfig {
    pub reveal_delay: Duration,
}

impl Default for ResumeConfig {
    fn default() -> Self {
        Self {
            reveal_delay: Duration::from_millis(2600),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeroConfig {
    pub field: FieldConfig,
    pub typing: TypingConfig,
    pub toast: ToastConfig,
    pub splash: SplashConfig,
    pub cursor: CursorConfig,
    pub resume: ResumeConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_page_values() {
        let cfg = HeroConfig::default();
        assert_eq!(cfg.field.count, 55);
        assert_eq!(cfg.field.palette[0].to_rgb8(), [0x81, 0x8C, 0xF8]);
        assert_eq!(cfg.field.palette[3].to_rgb8(), [0x63, 0x66, 0xF1]);
        assert_eq!(cfg.typing.phrases.len(), 5);
        assert_eq!(cfg.typing.phrases[2], "Problem Solver");
        assert_eq!(cfg.toast.lifetime, Duration::from_millis(3200));
        assert!(cfg.splash.duration < cfg.typing.start_delay);
        assert!(cfg.splash.duration < cfg.resume.reveal_delay);
    }
}

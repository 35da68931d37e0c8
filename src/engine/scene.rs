// The hero section without a GPU: particle world + schedule, typing,
// toast, splash, cursor ring and theme. The host feeds it events and
// frame deltas, then reads snapshots to draw.

use std::time::Duration;

use bevy_ecs::prelude::*;
use glam::Vec2;
use rand::Rng;

use super::components::*;
use super::config::{FieldConfig, HeroConfig, ResumeConfig};
use super::cursor::CursorFollower;
use super::field::{self, ParticleField, Pointer};
use super::links::{self, Link, ParticleDraw};
use super::splash::Splash;
use super::systems;
use super::theme::{PreferenceStore, Theme};
use super::toast::{Toast, ToastKind};
use super::typing::TypingSequencer;

pub struct HeroScene {
    world: World,
    field_schedule: Schedule,
    pub typing: TypingSequencer,
    pub toast: Toast,
    pub splash: Splash,
    pub cursor: CursorFollower,
    theme: Theme,
    resume: ResumeConfig,
    elapsed: Duration,
}

impl HeroScene {
    pub fn new(config: HeroConfig, size: Vec2, theme: Theme, rng: &mut impl Rng) -> Self {
        let mut world = World::new();
        world.insert_resource(config.field);
        world.insert_resource(ParticleField::new(size.x, size.y));
        if size.x >= 1.0 && size.y >= 1.0 {
            field::spawn_particles(&mut world, rng);
        }

        Self {
            world,
            field_schedule: systems::field_schedule(),
            typing: TypingSequencer::new(config.typing),
            toast: Toast::new(config.toast),
            splash: Splash::new(config.splash),
            cursor: CursorFollower::new(config.cursor),
            theme,
            resume: config.resume,
            elapsed: Duration::ZERO,
        }
    }

    /// Host surface changed size: the field is rebuilt from scratch.
    pub fn resize(&mut self, size: Vec2, rng: &mut impl Rng) {
        if field::reset(&mut self.world, size.x, size.y, rng) {
            log::info!("particle field reset to {:.0}x{:.0}", size.x, size.y);
        }
    }

    pub fn pointer_moved(&mut self, position: Vec2) {
        self.world.resource_mut::<ParticleField>().pointer = Pointer(Some(position));
    }

    pub fn pointer_left(&mut self) {
        self.world.resource_mut::<ParticleField>().pointer = Pointer(None);
    }

    pub fn pointer(&self) -> Pointer {
        self.world.resource::<ParticleField>().pointer
    }

    /// One animation frame. `dt` drives the timers; the particle step is
    /// per frame, independent of `dt`.
    pub fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
        self.field_schedule.run(&mut self.world);
        self.typing.tick(dt);
        self.toast.tick(dt);
        self.splash.tick(dt);
        self.cursor.update(self.pointer().0);
    }

    /// Pause or resume both engines through their start/stop handles.
    /// Returns whether the particle field now runs.
    pub fn toggle_field(&mut self) -> bool {
        let mut field = self.world.resource_mut::<ParticleField>();
        if field.is_running() {
            field.stop();
            self.typing.stop();
        } else {
            field.start();
            self.typing.start();
        }
        let running = field.is_running();
        let note = if running { "Animations resumed" } else { "Animations paused" };
        self.toast.show(note, ToastKind::Success);
        running
    }

    pub fn field_running(&self) -> bool {
        self.world.resource::<ParticleField>().is_running()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Flip the theme, persist it when a store is available, and announce it.
    /// A failed save still switches the theme for this session.
    pub fn toggle_theme(&mut self, store: Option<&PreferenceStore>) -> Theme {
        self.theme = self.theme.toggled();
        log::info!("theme switched to {}", self.theme);
        match store.map(|store| store.save(self.theme)) {
            Some(Err(err)) => {
                log::error!("{err}");
                self.toast.show("Could not save theme preference", ToastKind::Error);
            }
            _ => self.toast.show(self.theme.announcement(), ToastKind::Success),
        }
        self.theme
    }

    pub fn resume_visible(&self) -> bool {
        self.elapsed >= self.resume.reveal_delay
    }

    /// Resume control activated. Ignored until the control is revealed.
    pub fn request_resume(&mut self) -> bool {
        if !self.resume_visible() {
            return false;
        }
        log::info!("resume download requested");
        self.toast.show("Resume download started!", ToastKind::Success);
        true
    }

    pub fn bounds(&self) -> Vec2 {
        self.world.resource::<ParticleField>().bounds()
    }

    pub fn particles(&mut self) -> Vec<ParticleDraw> {
        self.world
            .query_filtered::<(&Transform, &Glow, &Color), With<Particle>>()
            .iter(&self.world)
            .map(|(transform, glow, color)| ParticleDraw {
                position: transform.position,
                radius: glow.radius,
                alpha: glow.alpha,
                color: *color,
            })
            .collect()
    }

    pub fn links(&self, particles: &[ParticleDraw]) -> Vec<Link> {
        links::collect_links(particles, self.world.resource::<FieldConfig>())
    }

    pub fn link_width(&self) -> f32 {
        self.world.resource::<FieldConfig>().link_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn scene(width: f32, height: f32) -> (HeroScene, StdRng) {
        let mut rng = StdRng::seed_from_u64(42);
        let scene = HeroScene::new(
            HeroConfig::default(),
            Vec2::new(width, height),
            Theme::Dark,
            &mut rng,
        );
        (scene, rng)
    }

    #[test]
    fn resize_replaces_particles_inside_new_bounds() {
        let (mut scene, mut rng) = scene(1280.0, 720.0);
        let before = scene.particles();

        scene.resize(Vec2::new(800.0, 600.0), &mut rng);
        let after = scene.particles();

        assert_eq!(after.len(), 55);
        assert_ne!(before, after);
        for p in &after {
            assert!(p.position.x >= 0.0 && p.position.x < 800.0);
            assert!(p.position.y >= 0.0 && p.position.y < 600.0);
        }
        assert_eq!(scene.bounds(), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn frames_keep_invariants() {
        let (mut scene, _) = scene(500.0, 400.0);
        scene.pointer_moved(Vec2::new(250.0, 200.0));
        for _ in 0..600 {
            scene.tick(Duration::from_millis(16));
        }
        let particles = scene.particles();
        assert_eq!(particles.len(), 55);
        for p in &particles {
            assert!(p.position.x >= 0.0 && p.position.x < 500.0);
            assert!(p.position.y >= 0.0 && p.position.y < 400.0);
            assert!((0.8..=3.0).contains(&p.radius));
            assert!((0.25..=0.75).contains(&p.alpha));
        }
    }

    #[test]
    fn pointer_leaving_clears_attraction_target() {
        let (mut scene, _) = scene(500.0, 400.0);
        scene.pointer_moved(Vec2::new(10.0, 20.0));
        assert_eq!(scene.pointer(), Pointer(Some(Vec2::new(10.0, 20.0))));
        scene.pointer_left();
        assert_eq!(scene.pointer(), Pointer(None));
        scene.tick(Duration::from_millis(16));
        assert_eq!(scene.cursor.position(), None);
    }

    #[test]
    fn toggling_field_freezes_particles_and_toasts() {
        let (mut scene, _) = scene(500.0, 400.0);
        assert!(!scene.toggle_field());
        assert_eq!(scene.toast.current().unwrap().text, "Animations paused");

        let frozen = scene.particles();
        scene.tick(Duration::from_millis(16));
        assert_eq!(frozen, scene.particles());

        assert!(scene.toggle_field());
        assert_eq!(scene.toast.current().unwrap().text, "Animations resumed");
        scene.tick(Duration::from_millis(16));
        assert_ne!(frozen, scene.particles());
    }

    #[test]
    fn toggling_field_pauses_headline_too() {
        let (mut scene, _) = scene(500.0, 400.0);
        scene.tick(Duration::from_millis(2600));
        assert_eq!(scene.typing.text(), "J");

        scene.toggle_field();
        assert!(!scene.typing.is_running());
        scene.tick(Duration::from_secs(5));
        assert_eq!(scene.typing.text(), "J");

        scene.toggle_field();
        assert!(scene.typing.is_running());
        scene.tick(Duration::from_millis(120));
        assert_eq!(scene.typing.text(), "Ja");
    }

    #[test]
    fn nearby_particles_are_linked() {
        let (mut scene, _) = scene(500.0, 400.0);
        let particles = scene.particles();
        let links = scene.links(&particles);
        for link in &links {
            assert!(link.from.distance(link.to) < 130.0);
            assert!(link.opacity > 0.0 && link.opacity <= 0.18);
        }
    }

    #[test]
    fn theme_toggle_persists_and_announces() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::new(dir.path().join("theme"));
        let (mut scene, _) = scene(100.0, 100.0);

        assert_eq!(scene.toggle_theme(Some(&store)), Theme::Light);
        assert_eq!(store.load(), Theme::Light);
        assert_eq!(scene.toast.current().unwrap().text, "Switched to Light Mode");

        assert_eq!(scene.toggle_theme(Some(&store)), Theme::Dark);
        assert_eq!(store.load(), Theme::Dark);
        assert_eq!(scene.toast.current().unwrap().text, "Switched to Dark Mode");
    }

    #[test]
    fn theme_toggle_survives_failed_save() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let store = PreferenceStore::new(blocker.join("theme"));
        let (mut scene, _) = scene(100.0, 100.0);

        assert_eq!(scene.toggle_theme(Some(&store)), Theme::Light);
        assert_eq!(scene.theme(), Theme::Light);
        assert_eq!(scene.toast.current().unwrap().kind, ToastKind::Error);
    }

    #[test]
    fn resume_control_appears_after_loading() {
        let (mut scene, _) = scene(300.0, 200.0);
        assert!(!scene.resume_visible());
        assert!(!scene.request_resume());
        assert!(scene.toast.current().is_none());

        scene.tick(Duration::from_millis(2600));
        assert!(scene.resume_visible());
        assert!(scene.request_resume());
        let toast = scene.toast.current().unwrap();
        assert_eq!(toast.text, "Resume download started!");
        assert_eq!(toast.kind, ToastKind::Success);
    }

    #[test]
    fn empty_surface_starts_without_particles() {
        let (mut scene, mut rng) = scene(0.0, 0.0);
        assert!(scene.particles().is_empty());
        scene.tick(Duration::from_millis(16));
        scene.resize(Vec2::new(320.0, 240.0), &mut rng);
        assert_eq!(scene.particles().len(), 55);
    }
}

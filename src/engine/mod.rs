// Engine module - hero section components, GPU-free except the overlay
// Particle field (ECS) + typing sequencer are the animated core

pub mod components;
pub mod config;
pub mod cursor;
pub mod field;
pub mod input;
pub mod links;
pub mod overlay;
pub mod scene;
pub mod splash;
pub mod systems;
pub mod theme;
pub mod toast;
pub mod typing;

// Re-export commonly used items
pub use config::HeroConfig;
pub use input::InputState;
pub use links::ParticleDraw;
pub use overlay::{Overlay, OverlayFrame, OverlayStats};
pub use scene::HeroScene;
pub use theme::PreferenceStore;

// Input state tracking for the pointer, window size and key presses
// Abstracts winit events into a queryable per-frame snapshot

use glam::Vec2;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Physical cursor coordinates to logical pixels from the window origin.
pub fn pointer_from_physical(position: PhysicalPosition<f64>, scale_factor: f64) -> Vec2 {
    let logical = position.to_logical::<f32>(scale_factor);
    Vec2::new(logical.x, logical.y)
}

pub struct InputState {
    // Pointer in logical pixels relative to the window origin; None once it leaves
    pub pointer: Option<Vec2>,

    // Keys pressed since the last drain, in arrival order (repeats excluded)
    pressed: Vec<KeyCode>,

    pub scale_factor: f64,
    pub physical_size: PhysicalSize<u32>,
}

impl InputState {
    pub fn new(physical_size: PhysicalSize<u32>, scale_factor: f64) -> Self {
        Self {
            pointer: None,
            pressed: Vec::new(),
            scale_factor,
            physical_size,
        }
    }

    /// Feed a winit WindowEvent into the input state.
    /// Call this once per event before the app's own event handling.
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if event.state == ElementState::Pressed && !event.repeat {
                        self.pressed.push(key);
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => self.pointer_moved(*position),
            WindowEvent::CursorLeft { .. } => self.pointer_left(),
            WindowEvent::Resized(size) => {
                self.physical_size = *size;
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = *scale_factor;
            }
            _ => {}
        }
    }

    pub fn pointer_moved(&mut self, position: PhysicalPosition<f64>) {
        self.pointer = Some(pointer_from_physical(position, self.scale_factor));
    }

    pub fn pointer_left(&mut self) {
        self.pointer = None;
    }

    /// Window size in logical pixels, the unit the particle field works in.
    pub fn logical_size(&self) -> Vec2 {
        let logical = self.physical_size.to_logical::<f32>(self.scale_factor);
        Vec2::new(logical.width, logical.height)
    }

    /// Take every key pressed since the previous call.
    pub fn drain_pressed(&mut self) -> Vec<KeyCode> {
        std::mem::take(&mut self.pressed)
    }
}

use egui::epaint::Shadow;

use super::links::Link;
use super::theme::Theme;
use super::toast::{ToastKind, ToastMessage};

pub struct OverlayStats {
    pub fps: u32,
    pub frame_time_avg_ms: f32,
    pub frame_time_min_ms: f32,
    pub frame_time_max_ms: f32,
    pub particle_count: usize,
    pub link_count: usize,
    pub resolution: (u32, u32),
    pub field_running: bool,
    pub typing_running: bool,
}

/// Everything the overlay paints for one frame, in logical pixels.
pub struct OverlayFrame<'a> {
    pub theme: Theme,
    pub links: &'a [Link],
    pub link_width: f32,
    /// Typed prefix of the current headline phrase.
    pub typed: &'a str,
    pub caret: bool,
    /// Cursor ring centre and radius.
    pub cursor_ring: Option<(egui::Pos2, f32)>,
    pub cursor_dot: Option<egui::Pos2>,
    /// Floating resume button, shown once the page has loaded.
    pub resume_visible: bool,
    pub toast: Option<(&'a ToastMessage, f32)>,
    /// Loading screen opacity; 0 once it is gone.
    pub splash_opacity: f32,
    /// F3 stats panel (`None` = hidden).
    pub stats: Option<&'a OverlayStats>,
}

pub struct Overlay {
    pub stats_visible: bool,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

fn rgba(rgb: [u8; 3], opacity: f32) -> egui::Color32 {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(rgb[0], rgb[1], rgb[2], alpha)
}

const SUCCESS: [u8; 3] = [0x22, 0xC5, 0x5E];
const ERROR: [u8; 3] = [0xEF, 0x44, 0x44];

impl Overlay {
    pub fn new(
        window: &winit::window::Window,
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        theme: Theme,
    ) -> Self {
        let egui_ctx = egui::Context::default();

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface_format,
            None,  // no depth
            1,     // msaa samples
            false, // no dithering
        );

        let overlay = Self {
            stats_visible: false,
            egui_ctx,
            egui_state,
            egui_renderer,
        };
        overlay.apply_theme(theme);
        overlay
    }

    pub fn apply_theme(&self, theme: Theme) {
        let mut visuals = match theme {
            Theme::Dark => egui::Visuals::dark(),
            Theme::Light => egui::Visuals::light(),
        };
        visuals.window_stroke = egui::Stroke::NONE;
        visuals.window_shadow = Shadow::NONE;
        visuals.override_text_color = Some(rgba(theme.text(), 1.0));
        self.egui_ctx.set_visuals(visuals);
    }

    pub fn toggle_stats(&mut self) {
        self.stats_visible = !self.stats_visible;
    }

    pub fn handle_window_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) -> egui_winit::EventResponse {
        self.egui_state.on_window_event(window, event)
    }

    /// Render one egui frame on top of the particle dots:
    ///
    /// - link lines and the cursor ring on a background layer
    /// - the typed headline with its caret
    /// - the resume button and the toast, bottom-right
    /// - the stats panel (F3)
    /// - the loading screen, above everything while it lasts
    ///
    /// Returns whether the resume button was clicked this frame.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &winit::window::Window,
        view: &wgpu::TextureView,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
        frame: &OverlayFrame<'_>,
    ) -> bool {
        let raw_input = self.egui_state.take_egui_input(window);
        let mut resume_clicked = false;

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            let screen = ctx.screen_rect();
            let theme = frame.theme;

            // ── Links between nearby particles ───────────────────────────────
            if !frame.links.is_empty() {
                let painter = ctx.layer_painter(egui::LayerId::new(
                    egui::Order::Background,
                    egui::Id::new("particle_links"),
                ));
                for link in frame.links {
                    let stroke = egui::Stroke::new(
                        frame.link_width,
                        rgba(link.color.to_rgb8(), link.opacity),
                    );
                    painter.line_segment(
                        [
                            egui::pos2(link.from.x, link.from.y),
                            egui::pos2(link.to.x, link.to.y),
                        ],
                        stroke,
                    );
                }
            }

            // ── Cursor dot + ring ────────────────────────────────────────────
            let cursor_painter = ctx.layer_painter(egui::LayerId::new(
                egui::Order::Foreground,
                egui::Id::new("cursor"),
            ));
            if let Some((pos, radius)) = frame.cursor_ring {
                cursor_painter.circle_stroke(pos, radius, egui::Stroke::new(1.5, rgba(theme.accent(), 0.6)));
            }
            if let Some(pos) = frame.cursor_dot {
                cursor_painter.circle_filled(pos, 4.0, rgba(theme.accent(), 1.0));
            }

            // ── Headline ─────────────────────────────────────────────────────
            let painter = ctx.layer_painter(egui::LayerId::new(
                egui::Order::Middle,
                egui::Id::new("headline"),
            ));
            let caret = if frame.caret { "|" } else { " " };
            painter.text(
                screen.center(),
                egui::Align2::CENTER_CENTER,
                format!("{}{caret}", frame.typed),
                egui::FontId::proportional(34.0),
                rgba(theme.accent(), 1.0),
            );

            // ── Resume button ────────────────────────────────────────────────
            if frame.resume_visible {
                egui::Area::new(egui::Id::new("resume_button"))
                    .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-24.0, -84.0))
                    .order(egui::Order::Middle)
                    .show(ctx, |ui| {
                        let label = egui::RichText::new("Resume (R)")
                            .color(egui::Color32::WHITE)
                            .size(15.0);
                        let button = egui::Button::new(label)
                            .fill(rgba(theme.accent(), 1.0))
                            .rounding(18.0)
                            .min_size(egui::vec2(120.0, 36.0));
                        resume_clicked = ui.add(button).clicked();
                    });
            }

            // ── Toast ────────────────────────────────────────────────────────
            if let Some((message, opacity)) = frame.toast {
                let bar = match message.kind {
                    ToastKind::Success => SUCCESS,
                    ToastKind::Error => ERROR,
                };
                egui::Area::new(egui::Id::new("toast"))
                    .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-24.0, -24.0))
                    .order(egui::Order::Foreground)
                    .show(ctx, |ui| {
                        egui::Frame::none()
                            .fill(rgba(theme.background(), 0.92 * opacity))
                            .stroke(egui::Stroke::new(1.0, rgba(bar, opacity)))
                            .inner_margin(egui::Margin::same(12.0))
                            .rounding(8.0)
                            .show(ui, |ui: &mut egui::Ui| {
                                ui.label(
                                    egui::RichText::new(&message.text)
                                        .color(rgba(theme.text(), opacity)),
                                );
                            });
                    });
            }

            // ── F3: stats panel ──────────────────────────────────────────────
            if let Some(stats) = frame.stats {
                egui::Area::new(egui::Id::new("stats_overlay"))
                    .fixed_pos(egui::pos2(10.0, 10.0))
                    .show(ctx, |ui| {
                        egui::Frame::none()
                            .fill(egui::Color32::from_rgba_premultiplied(0, 0, 0, 180))
                            .inner_margin(egui::Margin::same(8.0))
                            .rounding(4.0)
                            .show(ui, |ui: &mut egui::Ui| {
                                let mono = |text: String| {
                                    egui::RichText::new(text)
                                        .monospace()
                                        .color(egui::Color32::WHITE)
                                };
                                ui.label(mono(format!("FPS: {}", stats.fps)));
                                ui.label(mono(format!(
                                    "Frame: {:.2} ms (min: {:.1} | max: {:.1})",
                                    stats.frame_time_avg_ms,
                                    stats.frame_time_min_ms,
                                    stats.frame_time_max_ms
                                )));
                                ui.label(mono(format!(
                                    "Particles: {}  Links: {}",
                                    stats.particle_count, stats.link_count
                                )));
                                ui.label(mono(format!(
                                    "Resolution: {} x {}",
                                    stats.resolution.0, stats.resolution.1
                                )));
                                let state = |running: bool| if running { "running" } else { "stopped" };
                                ui.label(mono(format!(
                                    "Field: {}  Headline: {}",
                                    state(stats.field_running),
                                    state(stats.typing_running)
                                )));
                            });
                    });
            }

            // ── Loading screen ───────────────────────────────────────────────
            if frame.splash_opacity > 0.0 {
                let painter = ctx.layer_painter(egui::LayerId::new(
                    egui::Order::Tooltip,
                    egui::Id::new("splash"),
                ));
                painter.rect_filled(screen, 0.0, rgba(theme.background(), frame.splash_opacity));
                painter.text(
                    screen.center(),
                    egui::Align2::CENTER_CENTER,
                    "Loading…",
                    egui::FontId::proportional(22.0),
                    rgba(theme.text(), frame.splash_opacity),
                );
            }
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, &tris, screen_descriptor);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.egui_renderer
                .render(&mut render_pass.forget_lifetime(), &tris, screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        resume_clicked
    }
}

// Hero backdrop: ambient particle field + typing headline in one window
// Particles are drawn in a single instanced draw call; links, text, toast
// and the loading screen come from an egui overlay on top.

mod engine;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::KeyCode,
    window::{Window, WindowId},
};
use engine::{
    HeroConfig, HeroScene, InputState, Overlay, OverlayFrame, OverlayStats, ParticleDraw,
    PreferenceStore,
};
use engine::components::Color;

// ============================================================================
// VERTEX DEFINITION
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    corner: [f32; 2],
}

impl Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

// ============================================================================
// INSTANCE DATA (per-particle)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct InstanceData {
    center: [f32; 2],
    radius: f32,
    alpha: f32,
    color: [f32; 4],
}

impl InstanceData {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,  // One per instance, not per vertex
            attributes: &[
                // Center (location 1)
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // Radius (location 2)
                wgpu::VertexAttribute {
                    offset: 8,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32,
                },
                // Alpha (location 3)
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32,
                },
                // Color (location 4)
                wgpu::VertexAttribute {
                    offset: 16,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

impl From<&ParticleDraw> for InstanceData {
    fn from(p: &ParticleDraw) -> Self {
        let [r, g, b] = p.color.to_linear();
        Self {
            center: p.position.to_array(),
            radius: p.radius,
            alpha: p.alpha,
            color: [r, g, b, 1.0],
        }
    }
}

// Unit quad, scaled per instance to the particle's radius
const QUAD_VERTICES: &[Vertex] = &[
    Vertex { corner: [-1.0, -1.0] },
    Vertex { corner: [ 1.0, -1.0] },
    Vertex { corner: [ 1.0,  1.0] },
    Vertex { corner: [-1.0,  1.0] },
];

const QUAD_INDICES: &[u16] = &[0, 1, 2, 0, 2, 3];

// ============================================================================
// UNIFORM DATA (viewport only)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    viewport: [f32; 2],
    _padding: [f32; 2],
}

impl Uniforms {
    fn new(viewport: glam::Vec2) -> Self {
        Self {
            viewport: viewport.max(glam::Vec2::ONE).to_array(),
            _padding: [0.0; 2],
        }
    }
}

// ============================================================================
// FRAME STATS
// ============================================================================

struct FrameStats {
    window_start: Instant,
    frames: u32,
    sum_ms: f32,
    min_ms: f32,
    max_ms: f32,
    last: OverlayStats,
}

impl FrameStats {
    fn new() -> Self {
        Self {
            window_start: Instant::now(),
            frames: 0,
            sum_ms: 0.0,
            min_ms: f32::MAX,
            max_ms: 0.0,
            last: OverlayStats {
                fps: 0,
                frame_time_avg_ms: 0.0,
                frame_time_min_ms: 0.0,
                frame_time_max_ms: 0.0,
                particle_count: 0,
                link_count: 0,
                resolution: (0, 0),
                field_running: true,
                typing_running: true,
            },
        }
    }

    /// Accumulate one frame; the FPS figures roll over once per second.
    fn record(&mut self, dt: Duration) {
        let ms = dt.as_secs_f32() * 1000.0;
        self.frames += 1;
        self.sum_ms += ms;
        self.min_ms = self.min_ms.min(ms);
        self.max_ms = self.max_ms.max(ms);

        if self.window_start.elapsed() >= Duration::from_secs(1) {
            self.last.fps = self.frames;
            self.last.frame_time_avg_ms = self.sum_ms / self.frames as f32;
            self.last.frame_time_min_ms = self.min_ms;
            self.last.frame_time_max_ms = self.max_ms;
            log::debug!(
                "FPS: {} | Particles: {} | Links: {}",
                self.frames, self.last.particle_count, self.last.link_count
            );
            self.window_start = Instant::now();
            self.frames = 0;
            self.sum_ms = 0.0;
            self.min_ms = f32::MAX;
            self.max_ms = 0.0;
        }
    }
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

struct State {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    num_indices: u32,
    max_instances: usize,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,

    overlay: Overlay,
    input: InputState,
    scene: HeroScene,
    prefs: Option<PreferenceStore>,
    last_update: Instant,
    stats: FrameStats,
}

impl State {
    async fn new(window: Arc<Window>, config: HeroConfig, prefs: Option<PreferenceStore>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("creating window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter compatible with the window surface")?;
        log::info!("using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await
            .context("requesting GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no supported formats")?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &surface_config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Particle Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader_instanced.wgsl").into()),
        });

        let input = InputState::new(size, window.scale_factor());

        use wgpu::util::DeviceExt;

        let uniforms = Uniforms::new(input.logical_size());

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("uniform_bind_group_layout"),
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("uniform_bind_group"),
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Render Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Particle Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc(), InstanceData::desc()],  // Vertex + Instance buffers
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        // Instance buffer holds the whole field; the count never changes at runtime
        let max_instances = config.field.count.max(1);
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (max_instances * std::mem::size_of::<InstanceData>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let num_indices = QUAD_INDICES.len() as u32;

        let theme = prefs.as_ref().map(PreferenceStore::load).unwrap_or_default();
        log::info!("starting with {theme} theme");

        let overlay = Overlay::new(&window, &device, surface_format, theme);
        let scene = HeroScene::new(config, input.logical_size(), theme, &mut rand::thread_rng());

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config: surface_config,
            size,
            render_pipeline,
            vertex_buffer,
            index_buffer,
            instance_buffer,
            num_indices,
            max_instances,
            uniform_buffer,
            uniform_bind_group,
            overlay,
            input,
            scene,
            prefs,
            last_update: Instant::now(),
            stats: FrameStats::new(),
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.reconfigure_surface();
        }
        self.scene.resize(self.input.logical_size(), &mut rand::thread_rng());
    }

    /// Lost/outdated surface: same size, so the particle field is kept.
    fn reconfigure_surface(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn handle_key(&mut self, key: KeyCode, event_loop: &ActiveEventLoop) {
        match key {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::KeyT => {
                let theme = self.scene.toggle_theme(self.prefs.as_ref());
                self.overlay.apply_theme(theme);
            }
            KeyCode::Space => {
                let running = self.scene.toggle_field();
                log::info!("animations {}", if running { "resumed" } else { "paused" });
            }
            KeyCode::KeyR => {
                self.scene.request_resume();
            }
            KeyCode::F3 => self.overlay.toggle_stats(),
            _ => {}
        }
    }

    fn update(&mut self) {
        let now = Instant::now();
        let dt = now - self.last_update;
        self.last_update = now;

        self.scene.tick(dt);
        self.stats.record(dt);
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Collect instance data from ECS BEFORE creating render pass
        let particles = self.scene.particles();
        let links = self.scene.links(&particles);
        let instance_data: Vec<InstanceData> = particles.iter().map(InstanceData::from).collect();
        let instance_count = instance_data.len().min(self.max_instances);

        if instance_count > 0 {
            self.queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&instance_data[..instance_count]),
            );
        }

        let uniforms = Uniforms::new(self.scene.bounds());
        self.queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let theme = self.scene.theme();
        let [br, bg, bb] = theme.background();
        let [r, g, b] = Color::from_rgb8(br, bg, bb).to_linear();

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Particle Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));  // Instance data
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);

            // ONE DRAW CALL for all particles
            render_pass.draw_indexed(0..self.num_indices, 0, 0..instance_count as u32);
        }

        self.stats.last.particle_count = particles.len();
        self.stats.last.link_count = links.len();
        self.stats.last.resolution = (self.size.width, self.size.height);
        self.stats.last.field_running = self.scene.field_running();
        self.stats.last.typing_running = self.scene.typing.is_running();

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let cursor_ring = self
            .scene
            .cursor
            .position()
            .map(|p| (egui::pos2(p.x, p.y), self.scene.cursor.ring_radius()));
        let cursor_dot = self.scene.cursor.dot().map(|p| egui::pos2(p.x, p.y));
        let toast = self
            .scene
            .toast
            .current()
            .map(|message| (message, self.scene.toast.opacity()));

        let frame = OverlayFrame {
            theme,
            links: &links,
            link_width: self.scene.link_width(),
            typed: self.scene.typing.text(),
            caret: self.scene.typing.caret_visible(),
            cursor_ring,
            cursor_dot,
            resume_visible: self.scene.resume_visible(),
            toast,
            splash_opacity: self.scene.splash.opacity(),
            stats: self.overlay.stats_visible.then_some(&self.stats.last),
        };

        let resume_clicked = self.overlay.render(
            &self.device,
            &self.queue,
            &mut encoder,
            &self.window,
            &view,
            &screen_descriptor,
            &frame,
        );
        if resume_clicked {
            self.scene.request_resume();
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// What the host does when acquiring or presenting a frame fails.
/// None of these touch the particle field; only a real resize does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SurfaceRecovery {
    Reconfigure,
    Exit,
    SkipFrame,
}

impl SurfaceRecovery {
    fn for_error(err: &wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceRecovery::Reconfigure,
            wgpu::SurfaceError::OutOfMemory => SurfaceRecovery::Exit,
            _ => SurfaceRecovery::SkipFrame,
        }
    }
}

// ============================================================================
// EVENT LOOP
// ============================================================================

struct App {
    config: HeroConfig,
    prefs: Option<PreferenceStore>,
    state: Option<State>,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: HeroConfig, prefs: Option<PreferenceStore>) -> Self {
        Self {
            config,
            prefs,
            state: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<State> {
        let window_attributes = Window::default_attributes()
            .with_title("Hero Backdrop")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("creating window")?,
        );

        pollster::block_on(State::new(window, self.config.clone(), self.prefs.take()))
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match self.init(event_loop) {
            Ok(state) => {
                log::info!("window ready at {:?}", state.size);
                self.state = Some(state);
            }
            Err(err) => {
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if window_id != state.window.id() {
            return;
        }

        let _ = state.overlay.handle_window_event(&state.window, &event);
        state.input.process_event(&event);
        for key in state.input.drain_pressed() {
            state.handle_key(key, event_loop);
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(physical_size) => state.resize(physical_size),
            WindowEvent::ScaleFactorChanged { .. } => state.resize(state.size),
            WindowEvent::CursorMoved { .. } => {
                if let Some(pointer) = state.input.pointer {
                    state.scene.pointer_moved(pointer);
                }
            }
            WindowEvent::CursorLeft { .. } => state.scene.pointer_left(),
            WindowEvent::RedrawRequested => {
                state.update();
                if let Err(err) = state.render() {
                    match SurfaceRecovery::for_error(&err) {
                        SurfaceRecovery::Reconfigure => state.reconfigure_surface(),
                        SurfaceRecovery::Exit => {
                            log::error!("surface out of memory, exiting");
                            event_loop.exit();
                        }
                        SurfaceRecovery::SkipFrame => log::warn!("dropped frame: {err:?}"),
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let prefs = match PreferenceStore::in_config_dir() {
        Ok(store) => Some(store),
        Err(err) => {
            log::warn!("theme preference disabled: {err}");
            None
        }
    };

    let event_loop = EventLoop::new().context("creating event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll); // Continuous for animations

    let mut app = App::new(HeroConfig::default(), prefs);
    event_loop.run_app(&mut app).context("running event loop")?;

    match app.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_surface_is_reconfigured_not_resized() {
        assert_eq!(
            SurfaceRecovery::for_error(&wgpu::SurfaceError::Lost),
            SurfaceRecovery::Reconfigure
        );
        assert_eq!(
            SurfaceRecovery::for_error(&wgpu::SurfaceError::Outdated),
            SurfaceRecovery::Reconfigure
        );
        assert_eq!(
            SurfaceRecovery::for_error(&wgpu::SurfaceError::OutOfMemory),
            SurfaceRecovery::Exit
        );
        assert_eq!(
            SurfaceRecovery::for_error(&wgpu::SurfaceError::Timeout),
            SurfaceRecovery::SkipFrame
        );
    }
}

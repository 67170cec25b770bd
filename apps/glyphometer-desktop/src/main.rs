mod overlay;
mod state;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use egui::Context as EguiContext;
use glyphometer_render::{DEFAULT_SHADER_DIR, ProgramSources};
use glyphometer_render_wgpu::{CanvasSize, RenderError, WgpuRenderer};
use glyphometer_shader::{LinkedProgram, ShaderProgramBuilder};
use overlay::{EguiWgpuPainter, OverlayBatch, OverlayPainter, PaintTarget};
use state::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "glyphometer-desktop", about = "Glyph odometer desktop application")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory holding line.{vert,frag} and blit.{vert,frag}
    #[arg(long, default_value = DEFAULT_SHADER_DIR)]
    shader_dir: PathBuf,

    /// Number of digit slots
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u16).range(1..=64))]
    digits: u16,

    /// Frames between automatic increments
    #[arg(long, default_value_t = glyphometer_digits::DEFAULT_AUTO_INTERVAL)]
    auto_interval: u32,

    /// Off-screen canvas width in pixels
    #[arg(long, default_value_t = 200)]
    canvas_width: u32,

    /// Off-screen canvas height in pixels
    #[arg(long, default_value_t = 150)]
    canvas_height: u32,

    /// Window width
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Window height
    #[arg(long, default_value_t = 600)]
    height: u32,
}

/// Window and every GPU object, created together once the loop resumes.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    painter: Box<dyn OverlayPainter>,
}

struct GpuApp {
    state: AppState,
    line: LinkedProgram,
    blit: LinkedProgram,
    window_size: PhysicalSize<u32>,
    canvas_size: CanvasSize,
    egui_ctx: EguiContext,
    gpu: Option<Gpu>,
    fatal: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(cli: &Cli, line: LinkedProgram, blit: LinkedProgram) -> Self {
        Self {
            state: AppState::new(cli.digits as usize, cli.auto_interval),
            line,
            blit,
            window_size: PhysicalSize::new(cli.width.max(1), cli.height.max(1)),
            canvas_size: CanvasSize {
                width: cli.canvas_width.max(1),
                height: cli.canvas_height.max(1),
            },
            egui_ctx: EguiContext::default(),
            gpu: None,
            fatal: None,
        }
    }

    fn init_gpu(&self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let attrs = Window::default_attributes()
            .with_title("glyphometer")
            .with_inner_size(self.window_size)
            .with_resizable(false);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(RenderError::from)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(RenderError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("glyphometer_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .map_err(RenderError::from)?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no texture formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(
            &device,
            surface_format,
            &self.line,
            &self.blit,
            &self.state.shapes,
            self.state.digits.len(),
            self.canvas_size,
        )?;

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let painter: Box<dyn OverlayPainter> =
            Box::new(EguiWgpuPainter::new(&device, surface_format));

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            canvas = ?renderer.canvas_size(),
            "GPU initialized"
        );

        Ok(Gpu {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            painter,
        })
    }

    fn redraw(&mut self) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            self.state.draw_ui(ctx);
        });
        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let Some(output) = self.state.begin_frame(|| acquire_frame(gpu)) else {
            return;
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.renderer.render(
            &gpu.device,
            &gpu.queue,
            &view,
            &self.state.digits,
            &self.state.view(),
        );

        let batch = OverlayBatch {
            primitives: self
                .egui_ctx
                .tessellate(full_output.shapes, full_output.pixels_per_point),
            textures_delta: full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        };
        gpu.painter.paint(
            &PaintTarget {
                device: &gpu.device,
                queue: &gpu.queue,
                view: &view,
                size_in_pixels: [gpu.config.width, gpu.config.height],
            },
            &batch,
        );

        output.present();
        self.state.end_frame();
        gpu.window.request_redraw();
    }
}

/// Next surface texture, or `None` when this frame cannot be presented.
fn acquire_frame(gpu: &Gpu) -> Option<wgpu::SurfaceTexture> {
    match gpu.surface.get_current_texture() {
        Ok(t) => Some(t),
        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
            gpu.surface.configure(&gpu.device, &gpu.config);
            None
        }
        Err(e) => {
            tracing::error!("surface error: {e}");
            None
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match self.init_gpu(event_loop) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                tracing::error!("failed to initialize graphics: {e:#}");
                self.fatal = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.config.width = new_size.width.max(1);
                    gpu.config.height = new_size.height.max(1);
                    gpu.surface.configure(&gpu.device, &gpu.config);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape | KeyCode::KeyQ),
                        state: ElementState::Released,
                        ..
                    },
                ..
            } => {
                tracing::info!("quit requested");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn build_program(sources: &ProgramSources) -> Result<LinkedProgram> {
    ShaderProgramBuilder::new()
        .label(sources.name)
        .build(&sources.vertex, &sources.fragment)
        .map_err(|e| {
            tracing::error!(program = sources.name, "failed to make shader");
            anyhow!("failed to make shader\n{e}")
        })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("glyphometer-desktop starting");

    let [line, blit] = ProgramSources::all(&cli.shader_dir);
    let line = build_program(&line)?;
    let blit = build_program(&blit)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(&cli, line, blit);
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

//! Backdrop builder and frame loop.
//!
//! [`Backdrop::run`] owns the whole lifecycle: create the window, acquire the
//! GPU, seed the field, then step-compose-render once per redraw until the
//! host closes the window. Exactly one writer touches simulation state, the
//! redraw handler itself.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::FieldConfig;
use crate::error::BackdropError;
use crate::field::Field;
use crate::gpu::GpuState;
use crate::scene::Scene;
use crate::spawn::Spawner;
use crate::time::FrameClock;

/// An animated arrow-and-target backdrop.
///
/// Use method chaining to configure, then call `.run()`, which blocks for
/// the lifetime of the animation:
///
/// ```ignore
/// use quiver::Backdrop;
///
/// Backdrop::new()
///     .with_title("my backdrop")
///     .with_size(1280, 720)
///     .run()?;
/// ```
pub struct Backdrop {
    config: FieldConfig,
    seed: Option<u64>,
    title: String,
    width: u32,
    height: u32,
}

impl Backdrop {
    /// Backdrop with default field tuning and a 1280x720 logical window.
    pub fn new() -> Self {
        Self {
            config: FieldConfig::default(),
            seed: None,
            title: "quiver".to_string(),
            width: 1280,
            height: 720,
        }
    }

    /// Replace the field tuning.
    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self
    }

    /// Seed the spawner for a reproducible animation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the logical window size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Run the backdrop. Blocks until the window is closed; returns early
    /// with an error if the window or GPU cannot be acquired.
    pub fn run(self) -> Result<(), BackdropError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for Backdrop {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    settings: Backdrop,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    field: Option<Field>,
    clock: FrameClock,
    error: Option<BackdropError>,
}

impl App {
    fn new(settings: Backdrop) -> Self {
        Self {
            settings,
            window: None,
            gpu: None,
            field: None,
            clock: FrameClock::new(),
            error: None,
        }
    }

    fn attach(&mut self, event_loop: &ActiveEventLoop) -> Result<(), BackdropError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.settings.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.settings.width,
                self.settings.height,
            ));

        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let gpu = pollster::block_on(GpuState::new(
            window.clone(),
            self.settings.config.max_targets,
            self.settings.config.max_arrows,
        ))?;

        let spawner = match self.settings.seed {
            Some(seed) => Spawner::with_seed(seed),
            None => Spawner::new(),
        };
        let mut field = Field::new(self.settings.config.clone(), spawner, gpu.logical_size());

        self.clock = FrameClock::new();
        field.seed(self.clock.elapsed());

        let size = gpu.logical_size();
        tracing::info!(width = size.x, height = size.y, "backdrop attached");

        window.request_redraw();
        self.window = Some(window);
        self.gpu = Some(gpu);
        self.field = Some(field);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.attach(event_loop) {
            tracing::error!(error = %e, "failed to start backdrop");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                let Some(window) = &self.window else { return };
                let scale_factor = window.scale_factor();
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size, scale_factor);
                    if let Some(field) = &mut self.field {
                        field.resize(gpu.logical_size());
                    }
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let Some(window) = &self.window else { return };
                let physical_size = window.inner_size();
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size, scale_factor);
                    if let Some(field) = &mut self.field {
                        field.resize(gpu.logical_size());
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                let (Some(gpu), Some(field)) = (&mut self.gpu, &mut self.field) else {
                    return;
                };

                let now = self.clock.tick();
                field.step(now);
                let scene = Scene::compose(field);

                match gpu.render(&scene) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(window) = &self.window {
                            let size = window.inner_size();
                            gpu.resize(size, window.scale_factor());
                        }
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("surface out of memory");
                        event_loop.exit();
                    }
                    Err(e) => tracing::warn!(error = %e, "render error"),
                }

                // schedule the next frame; stops once the loop exits
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // drop GPU state (and its surface) before the window it points at
        self.gpu = None;
        self.field = None;
        tracing::info!(frames = self.clock.frame(), "backdrop stopped");
    }
}

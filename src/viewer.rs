//! Standalone environment window backed by winit.
//!
//! ```no_run
//! # use skyscape::Viewer;
//! # use skyscape::engine::loader::CubeFaces;
//! Viewer::builder()
//!     .with_cubemap(CubeFaces::from_directory("assets/sky".as_ref(), "jpg"))
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use web_time::Instant;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::engine::loader::{CubeFaces, ThreadedImageLoader};
use crate::environment::{EnvironmentController, Platform};
use crate::error::SkyscapeError;
use crate::gpu::WgpuRenderer;
use crate::input::{InputEvent, MouseButton};
use crate::options::Options;
use crate::platform::{Host, ManualScheduler};
use crate::util::frame_timing::FrameTiming;

/// How often the viewer logs its frame rate.
const FPS_REPORT_INTERVAL: Duration = Duration::from_secs(5);

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    cubemap: Option<CubeFaces>,
    options: Options,
    title: String,
    target_fps: u32,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            cubemap: None,
            options: Options::default(),
            title: "Skyscape".into(),
            target_fps: 60,
        }
    }

    /// Cubemap to show once the window opens.
    #[must_use]
    pub fn with_cubemap(mut self, faces: CubeFaces) -> Self {
        self.cubemap = Some(faces);
        self
    }

    /// Override the default options. A particle effect is started when
    /// `options.particles.sprite` is set.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Frame cap (0 = every redraw).
    #[must_use]
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            cubemap: self.cubemap,
            options: self.options,
            title: self.title,
            target_fps: self.target_fps,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window showing a skybox, optional particles and an orbit
/// camera.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    cubemap: Option<CubeFaces>,
    options: Options,
    title: String,
    target_fps: u32,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`SkyscapeError::Viewer`] if the event loop cannot be
    /// created or exits with an error.
    pub fn run(self) -> Result<(), SkyscapeError> {
        let event_loop = EventLoop::new()
            .map_err(|e| SkyscapeError::Viewer(e.to_string()))?;

        let mut app = ViewerApp {
            window: None,
            session: None,
            timing: FrameTiming::new(self.target_fps),
            cubemap: self.cubemap,
            options: self.options,
            title: self.title,
        };
        event_loop
            .run_app(&mut app)
            .map_err(|e| SkyscapeError::Viewer(e.to_string()))
    }
}

// ── Window host ──────────────────────────────────────────────────────────

/// The winit window as an environment host.
struct WindowHost {
    window: Arc<Window>,
}

impl Host for WindowHost {
    fn size(&self) -> (u32, u32) {
        let logical = self
            .window
            .inner_size()
            .to_logical::<u32>(self.window.scale_factor());
        (logical.width, logical.height)
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.scale_factor()
    }

    fn mount(&mut self) {
        self.window.set_visible(true);
    }

    fn clear(&mut self) {
        self.window.set_visible(false);
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Controller plus the scheduler whose frames the redraw loop fires.
struct Session {
    environment: EnvironmentController,
    scheduler: Rc<ManualScheduler>,
}

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    session: Option<Session>,
    timing: FrameTiming,
    cubemap: Option<CubeFaces>,
    options: Options,
    title: String,
}

impl ViewerApp {
    fn create_session(
        &mut self,
        window: &Arc<Window>,
    ) -> Result<Session, SkyscapeError> {
        let host = WindowHost {
            window: Arc::clone(window),
        };
        let pixel_ratio = self
            .options
            .environment
            .pixel_ratio(host.device_pixel_ratio());
        let renderer = pollster::block_on(WgpuRenderer::new(
            Arc::clone(window),
            host.size(),
            pixel_ratio,
        ))?;

        let scheduler = Rc::new(ManualScheduler::new());
        let environment = EnvironmentController::new(
            Platform {
                host: Box::new(host),
                renderer: Box::new(renderer),
                scheduler: scheduler.clone(),
                loader: Rc::new(ThreadedImageLoader::new()),
                orientation_events: None,
            },
            &self.options,
        );

        if let Some(faces) = self.cubemap.take() {
            environment.load_cubemap(
                &faces,
                || log::info!("cubemap loaded"),
                |e| log::error!("cubemap failed: {e}"),
            );
        }
        if self.options.particles.sprite.is_some() {
            environment.init_particle_effect(&self.options.particles);
        }
        environment.start();

        Ok(Session {
            environment,
            scheduler,
        })
    }

    fn redraw(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        if self.timing.should_render() {
            let _ = session.scheduler.run_pending();
            self.timing.end_frame();
            if let Some((fps, frames)) =
                self.timing.take_report(FPS_REPORT_INTERVAL)
            {
                log::debug!("{fps:.1} fps ({frames} frames)");
            }
        }
    }

    fn forward(&self, event: &InputEvent) {
        if let Some(session) = &self.session {
            let _ = session.environment.handle_input(event);
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        let mut attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_visible(false);
        if let Some(mon) = &monitor {
            let mon_size = mon.size().to_logical::<f64>(mon.scale_factor());
            attrs = attrs.with_inner_size(winit::dpi::LogicalSize::new(
                mon_size.width * 0.75,
                mon_size.height * 0.75,
            ));
        }

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match self.create_session(&window) {
            Ok(session) => self.session = Some(session),
            Err(e) => {
                log::error!("Failed to initialize environment: {e}");
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        let scale = self.window.as_deref().map_or(1.0, Window::scale_factor);
        match event {
            WindowEvent::CloseRequested => {
                if let Some(session) = self.session.take() {
                    session.environment.dispose();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(_)
            | WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(session) = &self.session {
                    session.environment.resize();
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            WindowEvent::MouseInput { button, state, .. } => {
                self.forward(&InputEvent::MouseButton {
                    button: MouseButton::from(button),
                    pressed: state == ElementState::Pressed,
                });
            }
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(scale);
                self.forward(&InputEvent::CursorMoved {
                    x: logical.x,
                    y: logical.y,
                });
            }
            WindowEvent::CursorLeft { .. } => {
                self.forward(&InputEvent::PointerLeft);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll_delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                self.forward(&InputEvent::Scroll {
                    delta: scroll_delta,
                });
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };
        let wait = self.timing.until_next_frame();
        if wait.is_zero() {
            window.request_redraw();
            event_loop.set_control_flow(ControlFlow::Poll);
        } else {
            event_loop
                .set_control_flow(ControlFlow::WaitUntil(Instant::now() + wait));
        }
    }
}

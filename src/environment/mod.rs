//! The environment controller: skybox, particle effect and camera control
//! wired to a host surface and driven by a frame loop.
//!
//! All state lives behind one `Rc<RefCell<_>>`. Frame callbacks and image
//! load completions hold only a [`Weak`](std::rc::Weak) handle, so they
//! become no-ops once the controller is dropped, and they never keep a
//! borrow alive while calling back into user code.

mod accessors;
mod assets;
mod frame_loop;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::camera::Camera;
use crate::control::{select_control, Control};
use crate::engine::loader::ImageLoader;
use crate::engine::scene::Scene;
use crate::engine::RenderBackend;
use crate::options::Options;
use crate::platform::{FrameScheduler, Host, OrientationEvents};

/// Simulation step applied on every frame, independent of wall time.
pub const FRAME_DELTA: Duration = Duration::from_millis(16);

/// Everything the controller takes from its surroundings.
pub struct Platform {
    /// Element or window the environment renders into.
    pub host: Box<dyn Host>,
    /// Rendering engine, already configured with its pixel ratio.
    pub renderer: Box<dyn RenderBackend>,
    /// Source of frame callbacks.
    pub scheduler: Rc<dyn FrameScheduler>,
    /// Asynchronous image loading.
    pub loader: Rc<dyn ImageLoader>,
    /// Orientation sensor bus, when the platform has one.
    pub orientation_events: Option<Rc<dyn OrientationEvents>>,
}

/// Controller state shared with frame and load callbacks.
struct State {
    host: Box<dyn Host>,
    renderer: Box<dyn RenderBackend>,
    scene: Scene,
    camera: Camera,
    control: Control,
    scheduler: Rc<dyn FrameScheduler>,
    loader: Rc<dyn ImageLoader>,

    running: bool,
    disposed: bool,
    /// Bumped on every `start`; a frame callback from an older loop exits.
    loop_generation: u64,
    /// Bumped on every `load_cubemap`; older completions are discarded.
    cubemap_generation: u64,
}

/// Owns the renderer, scene, camera and control, and runs the frame loop.
///
/// ```ignore
/// let env = EnvironmentController::new(platform, &Options::default());
/// env.load_cubemap(&faces, || log::info!("sky ready"), |e| log::error!("{e}"));
/// env.init_particle_effect(&ParticleOptions::default());
/// env.start();
/// ```
///
/// Dropping the controller disposes it.
pub struct EnvironmentController {
    state: Rc<RefCell<State>>,
}

impl EnvironmentController {
    /// Mount the renderer into the host, build the scene, camera and the
    /// selected control, and size everything to the host.
    #[must_use]
    pub fn new(platform: Platform, options: &Options) -> Self {
        let Platform {
            mut host,
            renderer,
            scheduler,
            loader,
            orientation_events,
        } = platform;

        host.mount();

        let kind = select_control(
            options.environment.mobile,
            host.supports_device_orientation(),
        );
        let control =
            Control::new(kind, &options.camera, orientation_events.as_deref());
        log::debug!("environment created with {kind:?} control");

        let mut state = State {
            host,
            renderer,
            scene: Scene::new(),
            camera: Camera::from_options(&options.camera),
            control,
            scheduler,
            loader,
            running: false,
            disposed: false,
            loop_generation: 0,
            cubemap_generation: 0,
        };
        state.resize();

        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Re-read the host size and apply it to the renderer and the camera
    /// aspect. Zero sizes leave the aspect unchanged.
    pub fn resize(&self) {
        let mut state = self.state.borrow_mut();
        if state.disposed {
            log::debug!("resize ignored: environment disposed");
            return;
        }
        state.resize();
    }

    /// Stop the loop and release everything the controller owns: control
    /// listeners, textures, scene resources, the renderer and the host's
    /// drawing surface. Calling it again does nothing.
    pub fn dispose(&self) {
        self.state.borrow_mut().dispose();
    }
}

impl Drop for EnvironmentController {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.dispose();
        }
    }
}

impl State {
    fn resize(&mut self) {
        let (width, height) = self.host.size();
        self.renderer.resize(width, height);
        self.camera.set_viewport(width, height);
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.stop();
        self.control.dispose();

        if let Some(texture) = self.scene.skybox.take_texture() {
            self.renderer.release_texture(texture);
        }
        if let Some(texture) = self.scene.take_particle_sprite() {
            self.renderer.release_texture(texture);
        }
        self.renderer.dispose_scene(&self.scene);
        self.scene.clear();
        self.renderer.dispose();
        self.host.clear();

        self.disposed = true;
        log::debug!("environment disposed");
    }
}

//! Recording fakes for the environment controller's collaborators.
#![allow(dead_code, missing_docs, clippy::expect_used)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use skyscape::camera::Camera;
use skyscape::engine::loader::{
    CubeImages, DecodedImage, ImageLoader, LoadCallback, LoadError,
};
use skyscape::engine::scene::Scene;
use skyscape::engine::{RenderBackend, TextureId};
use skyscape::options::{ImageSource, Options};
use skyscape::platform::{
    ManualScheduler, OrientationEvents, OrientationSink, Subscription,
};
use skyscape::{EnvironmentController, Platform, SkyscapeError};

// ── Renderer ──

/// Everything the fake renderer saw, shared with the test.
#[derive(Debug, Default)]
pub struct RenderLog {
    pub renders: usize,
    pub resizes: Vec<(u32, u32)>,
    pub created: Vec<TextureId>,
    pub released: Vec<TextureId>,
    pub drawn_particles: Vec<usize>,
    pub scene_disposals: usize,
    pub disposals: usize,
    /// Number of upcoming renders that fail with a surface error.
    pub failing_renders: usize,
    pub failed_renders: usize,
}

impl RenderLog {
    /// Textures created and not yet released.
    pub fn live_textures(&self) -> usize {
        self.created
            .iter()
            .filter(|id| !self.released.contains(id))
            .count()
    }
}

pub struct RecordingRenderer {
    log: Rc<RefCell<RenderLog>>,
    next_id: u64,
}

impl RecordingRenderer {
    pub fn new(log: Rc<RefCell<RenderLog>>) -> Self {
        Self { log, next_id: 1 }
    }

    fn allocate(&mut self) -> TextureId {
        let id = TextureId(self.next_id);
        self.next_id += 1;
        self.log.borrow_mut().created.push(id);
        id
    }
}

impl RenderBackend for RecordingRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        self.log.borrow_mut().resizes.push((width, height));
    }

    fn create_cube_texture(
        &mut self,
        _faces: &CubeImages,
    ) -> Result<TextureId, SkyscapeError> {
        Ok(self.allocate())
    }

    fn create_texture_2d(
        &mut self,
        _image: &DecodedImage,
    ) -> Result<TextureId, SkyscapeError> {
        Ok(self.allocate())
    }

    fn release_texture(&mut self, texture: TextureId) {
        self.log.borrow_mut().released.push(texture);
    }

    fn render(
        &mut self,
        scene: &Scene,
        _camera: &Camera,
    ) -> Result<(), SkyscapeError> {
        let mut log = self.log.borrow_mut();
        if log.failing_renders > 0 {
            log.failing_renders -= 1;
            log.failed_renders += 1;
            return Err(SkyscapeError::Surface("surface lost".into()));
        }
        log.renders += 1;
        let drawn = scene
            .renderable_particles()
            .map_or(0, |(particles, _)| particles.len());
        log.drawn_particles.push(drawn);
        Ok(())
    }

    fn dispose_scene(&mut self, _scene: &Scene) {
        self.log.borrow_mut().scene_disposals += 1;
    }

    fn dispose(&mut self) {
        self.log.borrow_mut().disposals += 1;
    }
}

// ── Loader ──

/// Loader that holds requests until the test completes them.
#[derive(Default)]
pub struct ManualLoader {
    requests: RefCell<Vec<(Vec<ImageSource>, Option<LoadCallback>)>>,
}

impl ManualLoader {
    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn sources(&self, index: usize) -> Vec<ImageSource> {
        self.requests.borrow()[index].0.clone()
    }

    /// Deliver `result` to request `index`. The borrow is released before
    /// the callback runs.
    pub fn complete(
        &self,
        index: usize,
        result: Result<Vec<DecodedImage>, LoadError>,
    ) {
        let callback = self.requests.borrow_mut()[index]
            .1
            .take()
            .expect("request already completed");
        callback(result);
    }

    /// Deliver six valid 4x4 faces to request `index`.
    pub fn complete_cube(&self, index: usize) {
        self.complete(index, Ok(cube_faces(4)));
    }

    /// Deliver one valid image to request `index`.
    pub fn complete_image(&self, index: usize) {
        self.complete(index, Ok(vec![DecodedImage::solid(8, 8, [255; 4])]));
    }
}

impl ImageLoader for ManualLoader {
    fn load(&self, sources: Vec<ImageSource>, on_done: LoadCallback) {
        self.requests.borrow_mut().push((sources, Some(on_done)));
    }
}

pub fn cube_faces(size: u32) -> Vec<DecodedImage> {
    (0..6)
        .map(|i| DecodedImage::solid(size, size, [i * 40, 0, 0, 255]))
        .collect()
}

// ── Orientation ──

/// Orientation bus that exposes its sink and counts live listeners.
#[derive(Default)]
pub struct ManualOrientationEvents {
    sink: RefCell<Option<OrientationSink>>,
    listeners: Rc<Cell<i32>>,
}

impl ManualOrientationEvents {
    pub fn live_listeners(&self) -> i32 {
        self.listeners.get()
    }

    pub fn sink(&self) -> OrientationSink {
        self.sink.borrow().clone().expect("no listener registered")
    }
}

impl OrientationEvents for ManualOrientationEvents {
    fn listen(&self, sink: OrientationSink) -> Option<Subscription> {
        *self.sink.borrow_mut() = Some(sink);
        // One for screen rotation, one for device orientation.
        self.listeners.set(self.listeners.get() + 2);
        let listeners = Rc::clone(&self.listeners);
        Some(Subscription::new(move || {
            listeners.set(listeners.get() - 2);
        }))
    }
}

// ── Host ──

#[derive(Debug, Default)]
pub struct HostLog {
    pub mounts: usize,
    pub clears: usize,
}

pub struct FakeHost {
    pub size: Rc<Cell<(u32, u32)>>,
    pub orientation: bool,
    pub log: Rc<RefCell<HostLog>>,
}

impl skyscape::platform::Host for FakeHost {
    fn size(&self) -> (u32, u32) {
        self.size.get()
    }

    fn supports_device_orientation(&self) -> bool {
        self.orientation
    }

    fn mount(&mut self) {
        self.log.borrow_mut().mounts += 1;
    }

    fn clear(&mut self) {
        self.log.borrow_mut().clears += 1;
    }
}

// ── Harness ──

/// A controller wired to fakes, with handles to inspect them.
pub struct Harness {
    pub environment: EnvironmentController,
    pub scheduler: Rc<ManualScheduler>,
    pub loader: Rc<ManualLoader>,
    pub orientation: Rc<ManualOrientationEvents>,
    pub render_log: Rc<RefCell<RenderLog>>,
    pub host_log: Rc<RefCell<HostLog>>,
    pub host_size: Rc<Cell<(u32, u32)>>,
}

impl Harness {
    pub fn new(options: &Options) -> Self {
        Self::with_host(options, (800, 600), false)
    }

    pub fn with_host(
        options: &Options,
        size: (u32, u32),
        supports_orientation: bool,
    ) -> Self {
        let scheduler = Rc::new(ManualScheduler::new());
        let loader = Rc::new(ManualLoader::default());
        let orientation = Rc::new(ManualOrientationEvents::default());
        let render_log = Rc::new(RefCell::new(RenderLog::default()));
        let host_log = Rc::new(RefCell::new(HostLog::default()));
        let host_size = Rc::new(Cell::new(size));

        let environment = EnvironmentController::new(
            Platform {
                host: Box::new(FakeHost {
                    size: Rc::clone(&host_size),
                    orientation: supports_orientation,
                    log: Rc::clone(&host_log),
                }),
                renderer: Box::new(RecordingRenderer::new(Rc::clone(
                    &render_log,
                ))),
                scheduler: scheduler.clone(),
                loader: loader.clone(),
                orientation_events: Some(orientation.clone()),
            },
            options,
        );

        Self {
            environment,
            scheduler,
            loader,
            orientation,
            render_log,
            host_log,
            host_size,
        }
    }

    pub fn renders(&self) -> usize {
        self.render_log.borrow().renders
    }

    /// Fire `n` scheduler frames.
    pub fn frames(&self, n: usize) {
        for _ in 0..n {
            let _ = self.scheduler.run_pending();
        }
    }
}

pub fn sources(names: &[&str]) -> skyscape::engine::loader::CubeFaces {
    skyscape::engine::loader::CubeFaces {
        px: ImageSource::from(names[0]),
        nx: ImageSource::from(names[1]),
        py: ImageSource::from(names[2]),
        ny: ImageSource::from(names[3]),
        pz: ImageSource::from(names[4]),
        nz: ImageSource::from(names[5]),
    }
}

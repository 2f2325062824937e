//! Browser bindings: the environment as a JavaScript class.
//!
//! ```js
//! import init, { SkyscapeEnvironment } from "./skyscape.js";
//! await init();
//! const env = await SkyscapeEnvironment.create(document.getElementById("sky"));
//! env.loadCubemap({ px: "px.jpg", nx: "nx.jpg", py: "py.jpg",
//!                   ny: "ny.jpg", pz: "pz.jpg", nz: "nz.jpg" },
//!                 () => console.log("ready"), (e) => console.error(e));
//! env.initParticleEffect(JSON.stringify({ sprite: "spark.png" }));
//! env.start();
//! ```

mod host;
mod input;
mod listener;
mod loader;
mod orientation;
mod scheduler;

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use self::host::ElementHost;
use self::listener::Listener;
use self::loader::FetchImageLoader;
use self::orientation::WindowOrientationEvents;
use self::scheduler::AnimationFrameScheduler;
use crate::engine::loader::CubeFaces;
use crate::environment::{EnvironmentController, Platform};
use crate::gpu::WgpuRenderer;
use crate::options::{ImageSource, Options, ParticleOptions};
use crate::platform::Host;

/// Install the panic hook and route `log` to the browser console. Runs
/// once when the module is instantiated.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("console logger already installed");
    }
}

fn parse_json<T: serde::de::DeserializeOwned + Default>(
    json: Option<String>,
) -> Result<T, JsValue> {
    json.map_or_else(
        || Ok(T::default()),
        |s| {
            serde_json::from_str(&s)
                .map_err(|e| JsValue::from_str(&format!("invalid options: {e}")))
        },
    )
}

fn face(faces: &js_sys::Object, name: &str) -> Result<ImageSource, JsValue> {
    js_sys::Reflect::get(faces, &JsValue::from_str(name))?
        .as_string()
        .map(ImageSource)
        .ok_or_else(|| JsValue::from_str(&format!("missing cubemap face '{name}'")))
}

/// Skybox, particles and camera control inside a page element.
#[wasm_bindgen]
pub struct SkyscapeEnvironment {
    environment: Rc<EnvironmentController>,
    _pointer: Vec<Listener>,
}

#[wasm_bindgen]
impl SkyscapeEnvironment {
    /// Create the environment inside `host`. `options` is an optional JSON
    /// document with `environment`, `camera` and `particles` sections.
    ///
    /// # Errors
    ///
    /// Rejects if the options are invalid or no GPU is available.
    #[allow(clippy::future_not_send)]
    pub async fn create(
        host: HtmlElement,
        options: Option<String>,
    ) -> Result<SkyscapeEnvironment, JsValue> {
        let options: Options = parse_json(options)?;
        let element_host = ElementHost::new(host)?;
        let canvas = element_host.canvas().clone();

        let pixel_ratio = options
            .environment
            .pixel_ratio(element_host.device_pixel_ratio());
        let renderer = WgpuRenderer::new(
            wgpu::SurfaceTarget::Canvas(canvas.clone()),
            element_host.size(),
            pixel_ratio,
        )
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let environment = Rc::new(EnvironmentController::new(
            Platform {
                host: Box::new(element_host),
                renderer: Box::new(renderer),
                scheduler: Rc::new(AnimationFrameScheduler),
                loader: Rc::new(FetchImageLoader),
                orientation_events: Some(Rc::new(WindowOrientationEvents)),
            },
            &options,
        ));
        let pointer =
            input::pointer_listeners(&canvas, &Rc::downgrade(&environment))?;

        Ok(Self {
            environment,
            _pointer: pointer,
        })
    }

    /// Load six face images (`{px, nx, py, ny, pz, nz}` URLs) as the
    /// skybox.
    ///
    /// # Errors
    ///
    /// Throws if a face URL is missing.
    #[wasm_bindgen(js_name = loadCubemap)]
    pub fn load_cubemap(
        &self,
        faces: &js_sys::Object,
        on_success: Option<js_sys::Function>,
        on_error: Option<js_sys::Function>,
    ) -> Result<(), JsValue> {
        let faces = CubeFaces {
            px: face(faces, "px")?,
            nx: face(faces, "nx")?,
            py: face(faces, "py")?,
            ny: face(faces, "ny")?,
            pz: face(faces, "pz")?,
            nz: face(faces, "nz")?,
        };
        self.environment.load_cubemap(
            &faces,
            move || {
                if let Some(f) = on_success {
                    let _ = f.call0(&JsValue::NULL);
                }
            },
            move |e| {
                if let Some(f) = on_error {
                    let _ = f.call1(&JsValue::NULL, &JsValue::from_str(&e.to_string()));
                }
            },
        );
        Ok(())
    }

    /// Start the particle effect. `options` is an optional JSON document
    /// (`sprite`, `amount`, `max`, `life`, `size`, `speed`).
    ///
    /// # Errors
    ///
    /// Throws if the options are invalid.
    #[wasm_bindgen(js_name = initParticleEffect)]
    pub fn init_particle_effect(
        &self,
        options: Option<String>,
    ) -> Result<(), JsValue> {
        let options: ParticleOptions = parse_json(options)?;
        self.environment.init_particle_effect(&options);
        Ok(())
    }

    /// Begin rendering.
    pub fn start(&self) {
        self.environment.start();
    }

    /// Pause rendering.
    pub fn stop(&self) {
        self.environment.stop();
    }

    /// Re-read the host size, e.g. from a window `resize` handler.
    pub fn resize(&self) {
        self.environment.resize();
    }

    /// Release the canvas, GPU resources and sensor listeners.
    pub fn dispose(&self) {
        self.environment.dispose();
    }
}

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlCanvasElement, HtmlElement};

use crate::platform::Host;

/// A page element hosting the environment canvas.
pub(super) struct ElementHost {
    container: HtmlElement,
    canvas: HtmlCanvasElement,
}

impl ElementHost {
    /// Create the canvas the renderer will draw into. It is attached to
    /// `container` on mount.
    pub(super) fn new(container: HtmlElement) -> Result<Self, JsValue> {
        let document = container
            .owner_document()
            .ok_or_else(|| JsValue::from_str("host element has no document"))?;
        let canvas: HtmlCanvasElement =
            document.create_element("canvas")?.dyn_into()?;
        let style = canvas.style();
        style.set_property("display", "block")?;
        style.set_property("width", "100%")?;
        style.set_property("height", "100%")?;
        Ok(Self { container, canvas })
    }

    pub(super) fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Host for ElementHost {
    fn size(&self) -> (u32, u32) {
        (
            self.container.client_width().max(0) as u32,
            self.container.client_height().max(0) as u32,
        )
    }

    fn device_pixel_ratio(&self) -> f64 {
        web_sys::window().map_or(1.0, |w| w.device_pixel_ratio())
    }

    fn supports_device_orientation(&self) -> bool {
        web_sys::window().is_some_and(|w| {
            js_sys::Reflect::has(&w, &JsValue::from_str("DeviceOrientationEvent"))
                .unwrap_or(false)
        })
    }

    fn mount(&mut self) {
        if let Err(e) = self.container.append_child(&self.canvas) {
            log::warn!("could not attach canvas: {e:?}");
        }
    }

    fn clear(&mut self) {
        self.canvas.remove();
    }
}

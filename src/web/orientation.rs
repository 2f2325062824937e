use wasm_bindgen::JsCast;
use web_sys::{DeviceOrientationEvent, Window};

use super::listener::Listener;
use crate::camera::OrientationSample;
use crate::platform::{OrientationEvents, OrientationSink, Subscription};

/// `deviceorientation` and `orientationchange` events of the page window.
pub(super) struct WindowOrientationEvents;

fn screen_angle(window: &Window) -> Option<i32> {
    let angle = window.screen().ok()?.orientation().angle().ok()?;
    Some(i32::from(angle))
}

impl OrientationEvents for WindowOrientationEvents {
    fn listen(&self, sink: OrientationSink) -> Option<Subscription> {
        let window = web_sys::window()?;
        sink.screen_rotation(screen_angle(&window));

        let rotation_sink = sink.clone();
        let rotation_window = window.clone();
        let rotation = Listener::new(&window, "orientationchange", move |_| {
            rotation_sink.screen_rotation(screen_angle(&rotation_window));
        });

        let device = Listener::new(&window, "deviceorientation", move |event| {
            if let Some(event) = event.dyn_ref::<DeviceOrientationEvent>() {
                sink.device_orientation(OrientationSample {
                    alpha: event.alpha(),
                    beta: event.beta(),
                    gamma: event.gamma(),
                });
            }
        });

        match (rotation, device) {
            (Ok(rotation), Ok(device)) => Some(Subscription::new(move || {
                drop(rotation);
                drop(device);
            })),
            (Err(e), _) | (_, Err(e)) => {
                log::warn!("orientation listeners unavailable: {e:?}");
                None
            }
        }
    }
}

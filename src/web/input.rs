use std::rc::Weak;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{EventTarget, MouseEvent, WheelEvent};

use super::listener::Listener;
use crate::environment::EnvironmentController;
use crate::input::{InputEvent, MouseButton};

fn button(code: i16) -> Option<MouseButton> {
    match code {
        0 => Some(MouseButton::Left),
        1 => Some(MouseButton::Middle),
        2 => Some(MouseButton::Right),
        _ => None,
    }
}

/// Forward canvas mouse events to the controller.
pub(super) fn pointer_listeners(
    canvas: &EventTarget,
    environment: &Weak<EnvironmentController>,
) -> Result<Vec<Listener>, JsValue> {
    let forward = |map: fn(&web_sys::Event) -> Option<InputEvent>| {
        let environment = Weak::clone(environment);
        move |event: web_sys::Event| {
            if let (Some(env), Some(input)) = (environment.upgrade(), map(&event))
            {
                if env.handle_input(&input) {
                    event.prevent_default();
                }
            }
        }
    };

    Ok(vec![
        Listener::new(
            canvas,
            "mousemove",
            forward(|e| {
                let e = e.dyn_ref::<MouseEvent>()?;
                Some(InputEvent::CursorMoved {
                    x: e.offset_x() as f32,
                    y: e.offset_y() as f32,
                })
            }),
        )?,
        Listener::new(
            canvas,
            "mousedown",
            forward(|e| {
                let e = e.dyn_ref::<MouseEvent>()?;
                Some(InputEvent::MouseButton {
                    button: button(e.button())?,
                    pressed: true,
                })
            }),
        )?,
        Listener::new(
            canvas,
            "mouseup",
            forward(|e| {
                let e = e.dyn_ref::<MouseEvent>()?;
                Some(InputEvent::MouseButton {
                    button: button(e.button())?,
                    pressed: false,
                })
            }),
        )?,
        Listener::new(
            canvas,
            "mouseleave",
            forward(|_| Some(InputEvent::PointerLeft)),
        )?,
        Listener::new(
            canvas,
            "wheel",
            forward(|e| {
                let e = e.dyn_ref::<WheelEvent>()?;
                Some(InputEvent::Scroll {
                    delta: (-e.delta_y() * 0.01) as f32,
                })
            }),
        )?,
    ])
}

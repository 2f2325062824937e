use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::platform::{FrameCallback, FrameScheduler};

/// Fallback frame interval when `requestAnimationFrame` is unavailable.
const FALLBACK_FRAME_MS: i32 = 16;

/// Schedules frames with `requestAnimationFrame`, falling back to a 16 ms
/// timeout.
pub(super) struct AnimationFrameScheduler;

impl FrameScheduler for AnimationFrameScheduler {
    fn schedule_next_frame(&self, callback: FrameCallback) {
        let Some(window) = web_sys::window() else {
            log::error!("no window: frame dropped");
            return;
        };
        let js = Closure::once_into_js(callback);
        let scheduled = window
            .request_animation_frame(js.unchecked_ref())
            .map(|_| ())
            .or_else(|_| {
                window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(
                        js.unchecked_ref(),
                        FALLBACK_FRAME_MS,
                    )
                    .map(|_| ())
            });
        if let Err(e) = scheduled {
            log::error!("could not schedule frame: {e:?}");
        }
    }
}

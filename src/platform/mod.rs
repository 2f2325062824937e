//! Host-platform capabilities consumed by the environment controller.
//!
//! Everything the controller needs from its surroundings (host element
//! geometry, frame scheduling, orientation sensor events) goes through the
//! traits in this module, so the same orchestration runs in a browser, in a
//! winit window, or under test with manual fakes.

/// Device orientation event subscription and latest-sample holder.
pub mod orientation;
/// Injectable per-frame callback scheduling.
pub mod scheduler;

pub use orientation::{
    OrientationEventSource, OrientationEvents, OrientationReading,
    OrientationSink, Subscription,
};
pub use scheduler::{FrameCallback, FrameScheduler, ManualScheduler};

/// The element (or window) the environment renders into.
pub trait Host {
    /// Current size of the host area in logical pixels.
    fn size(&self) -> (u32, u32);

    /// Native ratio of physical to logical pixels.
    fn device_pixel_ratio(&self) -> f64 {
        1.0
    }

    /// Whether the platform reports a device-orientation sensor.
    fn supports_device_orientation(&self) -> bool {
        false
    }

    /// Attach the renderer's drawing surface to the host.
    fn mount(&mut self) {}

    /// Remove everything the environment added to the host.
    fn clear(&mut self) {}
}

//! Camera state and the device-orientation transform.

/// Core camera struct and GPU uniform types.
pub mod core;
/// Device orientation angles to camera rotation.
pub mod orientation;

pub use self::core::{Camera, CameraUniform};
pub use orientation::{device_orientation_to_rotation, OrientationSample};

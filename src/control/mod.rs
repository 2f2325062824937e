//! Camera controls: pointer-drag orbit or device orientation.
//!
//! A [`Control`] is chosen once at construction by [`select_control`] and
//! then driven every frame with a nominal delta. Both variants share the
//! same capability set: `update`, `handle_input` and `dispose`.

/// Device-orientation camera control.
pub mod device_orientation;
/// Pointer-drag orbit camera control.
pub mod orbit;

use std::time::Duration;

pub use device_orientation::DeviceOrientationControl;
pub use orbit::OrbitControl;

use crate::camera::Camera;
use crate::input::InputEvent;
use crate::options::CameraOptions;
use crate::platform::OrientationEvents;

/// Which control variant drives the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// Pointer-drag rotation around a fixed target.
    Orbit,
    /// Camera follows the device's physical orientation.
    DeviceOrientation,
}

/// Pick device orientation when the caller forces mobile mode or the
/// platform reports an orientation sensor, else orbit.
#[must_use]
pub fn select_control(mobile: bool, supports_orientation: bool) -> ControlKind {
    if mobile || supports_orientation {
        ControlKind::DeviceOrientation
    } else {
        ControlKind::Orbit
    }
}

/// The active camera control.
pub enum Control {
    /// Pointer-drag orbit control.
    Orbit(OrbitControl),
    /// Device-orientation control.
    DeviceOrientation(DeviceOrientationControl),
}

impl Control {
    /// Build the control of the given kind. `events` is only used by the
    /// device-orientation variant; `None` leaves it without a sensor.
    #[must_use]
    pub fn new(
        kind: ControlKind,
        options: &CameraOptions,
        events: Option<&dyn OrientationEvents>,
    ) -> Self {
        match kind {
            ControlKind::Orbit => Self::Orbit(OrbitControl::new(options)),
            ControlKind::DeviceOrientation => Self::DeviceOrientation(
                DeviceOrientationControl::new(events, options.alpha_offset),
            ),
        }
    }

    /// The variant in use.
    #[must_use]
    pub fn kind(&self) -> ControlKind {
        match self {
            Self::Orbit(_) => ControlKind::Orbit,
            Self::DeviceOrientation(_) => ControlKind::DeviceOrientation,
        }
    }

    /// Advance the control by `delta` and write the result into `camera`.
    pub fn update(&mut self, camera: &mut Camera, delta: Duration) {
        match self {
            Self::Orbit(orbit) => orbit.update(camera, delta),
            Self::DeviceOrientation(device) => device.update(camera),
        }
    }

    /// Forward a pointer event. Returns `true` if the control consumed it.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match self {
            Self::Orbit(orbit) => orbit.handle_input(event),
            Self::DeviceOrientation(_) => false,
        }
    }

    /// Release platform resources held by the control.
    pub fn dispose(&mut self) {
        match self {
            Self::Orbit(orbit) => orbit.dispose(),
            Self::DeviceOrientation(device) => device.dispose(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_table() {
        assert_eq!(select_control(false, false), ControlKind::Orbit);
        assert_eq!(select_control(true, false), ControlKind::DeviceOrientation);
        assert_eq!(select_control(false, true), ControlKind::DeviceOrientation);
        assert_eq!(select_control(true, true), ControlKind::DeviceOrientation);
    }

    #[test]
    fn device_control_ignores_pointer_input() {
        let mut control = Control::new(
            ControlKind::DeviceOrientation,
            &CameraOptions::default(),
            None,
        );
        assert_eq!(control.kind(), ControlKind::DeviceOrientation);
        assert!(!control.handle_input(&InputEvent::Scroll { delta: 1.0 }));
    }
}

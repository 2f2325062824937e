//! Device orientation to camera rotation.
//!
//! Sensors report the device frame as intrinsic Z-X'-Y'' Tait-Bryan angles
//! (`alpha` about Z, `beta` about X, `gamma` about Y), with the device
//! looking out of its back along +Z. The camera looks along its local −Z
//! with +Y up, so the angles are re-expressed in Y-X-Z order, corrected by
//! a −90° turn about X, then counter-rotated by the UI screen rotation.

use std::f64::consts::FRAC_1_SQRT_2;

use glam::{DQuat, EulerRot, Quat};

/// Raw device orientation sample in degrees. Missing angles are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrientationSample {
    /// Compass heading, rotation about the device Z axis.
    pub alpha: Option<f64>,
    /// Front-back tilt, rotation about the device X axis.
    pub beta: Option<f64>,
    /// Left-right tilt, rotation about the device Y axis.
    pub gamma: Option<f64>,
}

impl OrientationSample {
    /// Sample with all three angles present.
    #[must_use]
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self {
            alpha: Some(alpha),
            beta: Some(beta),
            gamma: Some(gamma),
        }
    }
}

/// −90° about X: camera −Z forward vs device +Z out of the back.
const SCREEN_TRANSFORM: DQuat =
    DQuat::from_xyzw(-FRAC_1_SQRT_2, 0.0, 0.0, FRAC_1_SQRT_2);

/// Convert a device orientation sample and the current screen rotation
/// (degrees) into a camera rotation.
///
/// `alpha_offset` (degrees) is added to the heading before conversion.
/// The result is a unit quaternion and a pure function of its inputs.
#[must_use]
pub fn device_orientation_to_rotation(
    sample: &OrientationSample,
    screen_orientation: f64,
    alpha_offset: f64,
) -> Quat {
    let alpha = (sample.alpha.unwrap_or(0.0) + alpha_offset).to_radians();
    let beta = sample.beta.unwrap_or(0.0).to_radians();
    let gamma = sample.gamma.unwrap_or(0.0).to_radians();
    let orient = screen_orientation.to_radians();

    let device = DQuat::from_euler(EulerRot::YXZ, alpha, beta, -gamma);
    let screen = DQuat::from_rotation_z(-orient);
    (device * SCREEN_TRANSFORM * screen).normalize().as_quat()
}

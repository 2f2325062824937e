use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection and control parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 120.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub zfar: f32,
    /// Orbit rotation per dragged pixel, in radians.
    #[schemars(title = "Rotate Speed", range(min = 0.001, max = 0.02), extend("step" = 0.001))]
    pub rotate_speed: f32,
    /// Fraction of pending orbit motion applied per frame (1 = no inertia).
    #[schemars(title = "Damping", range(min = 0.05, max = 1.0), extend("step" = 0.05))]
    pub damping: f32,
    /// Zoom sensitivity multiplier.
    #[schemars(title = "Zoom Speed", range(min = 0.01, max = 0.5), extend("step" = 0.01))]
    pub zoom_speed: f32,
    /// Initial orbit distance from the target.
    #[schemars(skip)]
    pub distance: f32,
    /// Closest allowed orbit distance.
    #[schemars(skip)]
    pub min_distance: f32,
    /// Farthest allowed orbit distance.
    #[schemars(skip)]
    pub max_distance: f32,
    /// Calibration added to the device compass heading, in degrees.
    #[schemars(title = "Heading Offset", range(min = -180.0, max = 180.0), extend("step" = 1.0))]
    pub alpha_offset: f64,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 75.0,
            znear: 0.1,
            zfar: 1000.0,
            rotate_speed: 0.005,
            damping: 0.25,
            zoom_speed: 0.1,
            distance: 1.0,
            min_distance: 0.1,
            max_distance: 15.0,
            alpha_offset: 0.0,
        }
    }
}

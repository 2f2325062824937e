use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Host surface and control-selection parameters.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[schemars(title = "Environment", inline)]
#[serde(default)]
pub struct EnvironmentOptions {
    /// Renderer pixel ratio. `None` uses the host's native ratio.
    #[schemars(title = "Pixel Ratio", range(min = 0.5, max = 4.0))]
    pub device_pixel_ratio: Option<f64>,
    /// Force device-orientation camera control.
    #[schemars(title = "Mobile")]
    pub mobile: bool,
}

impl EnvironmentOptions {
    /// Pixel ratio to render at, given the host's native ratio.
    #[must_use]
    pub fn pixel_ratio(&self, native: f64) -> f64 {
        self.device_pixel_ratio
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or(native)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_prefers_explicit_value() {
        let mut options = EnvironmentOptions::default();
        assert_eq!(options.pixel_ratio(2.0), 2.0);
        options.device_pixel_ratio = Some(1.5);
        assert_eq!(options.pixel_ratio(2.0), 1.5);
        options.device_pixel_ratio = Some(0.0);
        assert_eq!(options.pixel_ratio(2.0), 2.0);
    }
}

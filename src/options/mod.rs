//! Centralized environment options with TOML preset support.
//!
//! Host, camera-control and particle-effect settings are consolidated here.
//! Options serialize to/from TOML so a viewer can be configured from a
//! preset file, and every section uses `#[serde(default)]` so partial files
//! work.

mod camera;
mod environment;
mod particles;

use std::path::Path;

pub use camera::CameraOptions;
pub use environment::EnvironmentOptions;
pub use particles::{ImageSource, ParticleOptions};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::SkyscapeError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[camera]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Host surface and control-selection parameters.
    pub environment: EnvironmentOptions,
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
    /// Particle effect spawn parameters.
    pub particles: ParticleOptions,
}

impl Options {
    /// Generate JSON Schema describing the options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from a TOML string. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SkyscapeError::OptionsParse`] on malformed TOML.
    pub fn from_toml(content: &str) -> Result<Self, SkyscapeError> {
        toml::from_str(content)
            .map_err(|e| SkyscapeError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SkyscapeError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, SkyscapeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`SkyscapeError`] if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), SkyscapeError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SkyscapeError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(SkyscapeError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[environment]
mobile = true

[particles]
sprite = "assets/snowflake.png"
amount = 12
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert!(opts.environment.mobile);
        assert_eq!(opts.environment.device_pixel_ratio, None);
        assert_eq!(opts.particles.amount, 12);
        assert_eq!(
            opts.particles.sprite,
            Some(ImageSource::from("assets/snowflake.png"))
        );
        // Everything else should be default
        assert_eq!(opts.particles.max, 1000);
        assert_eq!(opts.particles.life, [5.0, 8.0]);
        assert_eq!(opts.camera, CameraOptions::default());
    }

    #[test]
    fn malformed_toml_is_reported() {
        let err = Options::from_toml("[camera\nfovy = ").unwrap_err();
        assert!(matches!(err, SkyscapeError::OptionsParse(_)));
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("environment"));
        assert!(props.contains_key("camera"));
        assert!(props.contains_key("particles"));

        let camera = &props["camera"]["properties"];
        assert!(camera.get("fovy").is_some());
        assert!(camera.get("znear").is_none());
    }
}

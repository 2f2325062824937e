use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Identifier of an image to load: a file path on native hosts, a URL on
/// the web.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct ImageSource(pub String);

impl ImageSource {
    /// The raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImageSource {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ImageSource {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Particle effect spawn parameters.
///
/// Ranges are `[min, max]` and sampled uniformly per particle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Particles", inline)]
#[serde(default)]
pub struct ParticleOptions {
    /// Sprite drawn for every particle. Without one nothing is drawn.
    #[schemars(skip)]
    pub sprite: Option<ImageSource>,
    /// Particles spawned per simulation tick.
    #[schemars(title = "Amount", range(min = 0, max = 100))]
    pub amount: u32,
    /// Cap on live particles.
    #[schemars(title = "Max Particles", range(min = 0, max = 20000))]
    pub max: u32,
    /// Lifetime range in seconds.
    pub life: [f32; 2],
    /// On-screen size range in pixels.
    pub size: [f32; 2],
    /// Velocity box in units per second: `[min_xyz, max_xyz]`.
    pub speed: [[f32; 3]; 2],
}

impl Default for ParticleOptions {
    fn default() -> Self {
        Self {
            sprite: None,
            amount: 5,
            max: 1000,
            life: [5.0, 8.0],
            size: [20.0, 100.0],
            speed: [[-0.1, -2.0, -0.1], [0.1, -1.0, 0.1]],
        }
    }
}

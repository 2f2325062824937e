//! Crate-level error types.

use std::fmt;

use crate::engine::loader::LoadError;
use crate::gpu::render_context::RenderContextError;

/// Errors produced by the skyscape crate.
#[derive(Debug)]
pub enum SkyscapeError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// An image (cubemap face or sprite) failed to load or decode.
    ImageLoad(LoadError),
    /// Six faces were loaded but do not form a valid cubemap.
    InvalidCubemap(String),
    /// A decoded image cannot be used as a texture.
    InvalidImage(String),
    /// The renderer could not acquire or present a frame.
    Surface(String),
    /// WGSL composition or validation failure.
    Shader(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
    /// The controller was used after `dispose`.
    Disposed,
}

impl fmt::Display for SkyscapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::ImageLoad(e) => write!(f, "image load error: {e}"),
            Self::InvalidCubemap(msg) => write!(f, "invalid cubemap: {msg}"),
            Self::InvalidImage(msg) => write!(f, "invalid image: {msg}"),
            Self::Surface(msg) => write!(f, "surface error: {msg}"),
            Self::Shader(msg) => write!(f, "shader error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
            Self::Disposed => write!(f, "environment already disposed"),
        }
    }
}

impl std::error::Error for SkyscapeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::ImageLoad(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for SkyscapeError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<LoadError> for SkyscapeError {
    fn from(e: LoadError) -> Self {
        Self::ImageLoad(e)
    }
}

impl From<std::io::Error> for SkyscapeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

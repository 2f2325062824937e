//! GPU resource management and the wgpu renderer.
//!
//! Provides wgpu device/surface initialization, growable instance buffers,
//! image texture uploads, shader composition and the [`WgpuRenderer`] that
//! draws the skybox and particle sprites.

/// Growable GPU buffers with automatic reallocation.
pub mod dynamic_buffer;
/// Shared wgpu boilerplate helpers for the skybox and particle pipelines.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Skybox and particle rendering behind [`crate::engine::RenderBackend`].
pub mod renderer;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Cube and 2D texture uploads from decoded images.
pub mod texture;

pub use renderer::WgpuRenderer;

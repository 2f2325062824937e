//! Rendering-engine collaborator surface.
//!
//! The environment controller only orchestrates: it decides *what* is in
//! the scene and *when* a frame is drawn, and hands the drawing to a
//! [`RenderBackend`]. [`crate::gpu::WgpuRenderer`] is the wgpu
//! implementation; tests substitute a recording fake.

/// Asynchronous image loading and cubemap face handling.
pub mod loader;
/// Particle emitter and simulation.
pub mod particles;
/// What gets drawn: skybox slot and particle layer.
pub mod scene;

use crate::camera::Camera;
use crate::error::SkyscapeError;
use loader::{CubeImages, DecodedImage};
use scene::Scene;

/// Opaque handle to a texture owned by a [`RenderBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u64);

/// Operations the controller needs from the rendering engine.
pub trait RenderBackend {
    /// Resize the drawing surface to a logical size. The backend applies
    /// its own pixel ratio.
    fn resize(&mut self, width: u32, height: u32);

    /// Upload six decoded faces as a cube texture.
    ///
    /// # Errors
    ///
    /// Returns [`SkyscapeError`] if the backend rejects the images.
    fn create_cube_texture(
        &mut self,
        faces: &CubeImages,
    ) -> Result<TextureId, SkyscapeError>;

    /// Upload a decoded image as a 2D texture.
    ///
    /// # Errors
    ///
    /// Returns [`SkyscapeError`] if the backend rejects the image.
    fn create_texture_2d(
        &mut self,
        image: &DecodedImage,
    ) -> Result<TextureId, SkyscapeError>;

    /// Release a texture. Unknown ids are ignored.
    fn release_texture(&mut self, texture: TextureId);

    /// Draw the scene through the camera.
    ///
    /// # Errors
    ///
    /// Returns [`SkyscapeError::Surface`] if the frame could not be
    /// acquired or presented.
    fn render(
        &mut self,
        scene: &Scene,
        camera: &Camera,
    ) -> Result<(), SkyscapeError>;

    /// Release any per-scene GPU resources (instance buffers, bind groups).
    fn dispose_scene(&mut self, scene: &Scene);

    /// Release the backend itself. Further calls are no-ops.
    fn dispose(&mut self);
}

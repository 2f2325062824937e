//! Read-only queries and input forwarding for [`EnvironmentController`].

use super::EnvironmentController;
use crate::camera::Camera;
use crate::control::ControlKind;
use crate::engine::particles::ParticleSystem;
use crate::engine::TextureId;
use crate::input::InputEvent;

// ── Lifecycle ──

impl EnvironmentController {
    /// Whether the frame loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.state.borrow().disposed
    }
}

// ── Camera ──

impl EnvironmentController {
    /// Which control drives the camera.
    #[must_use]
    pub fn control_kind(&self) -> ControlKind {
        self.state.borrow().control.kind()
    }

    /// Snapshot of the camera.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.state.borrow().camera.clone()
    }

    /// Forward a pointer event to the active control. Returns `true` if it
    /// was consumed.
    pub fn handle_input(&self, event: &InputEvent) -> bool {
        let mut state = self.state.borrow_mut();
        if state.disposed {
            return false;
        }
        state.control.handle_input(event)
    }
}

// ── Scene ──

impl EnvironmentController {
    /// The skybox texture, once a cubemap has loaded.
    #[must_use]
    pub fn cubemap_texture(&self) -> Option<TextureId> {
        self.state.borrow().scene.skybox.texture()
    }

    /// Whether a cubemap is shown.
    #[must_use]
    pub fn has_cubemap(&self) -> bool {
        self.cubemap_texture().is_some()
    }

    /// Whether the particle effect has been created.
    #[must_use]
    pub fn has_particle_effect(&self) -> bool {
        self.state.borrow().scene.has_particles()
    }

    /// Live particle count (0 without an effect).
    #[must_use]
    pub fn particle_count(&self) -> usize {
        self.state
            .borrow()
            .scene
            .particles()
            .map_or(0, ParticleSystem::len)
    }
}

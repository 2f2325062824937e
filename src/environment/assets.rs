//! Cubemap and particle-sprite loading.

use std::rc::Rc;

use super::{EnvironmentController, State};
use crate::engine::loader::{CubeFaces, CubeImages, DecodedImage, LoadError};
use crate::engine::particles::ParticleSystem;
use crate::error::SkyscapeError;
use crate::options::ParticleOptions;

/// What happened to a finished cubemap load.
enum CubemapCommit {
    Applied,
    Failed(SkyscapeError),
    /// Superseded by a newer request, or the controller was disposed.
    Stale,
}

impl EnvironmentController {
    /// Replace the skybox with the cube texture built from `faces`.
    ///
    /// The current cubemap is released immediately, so the background is
    /// empty until the new faces arrive. On success the texture becomes the
    /// skybox and `on_success` runs; on failure the skybox stays empty and
    /// `on_error` receives the cause. If another `load_cubemap` is issued
    /// before this one finishes, this one's result is discarded and neither
    /// callback runs.
    pub fn load_cubemap<S, E>(&self, faces: &CubeFaces, on_success: S, on_error: E)
    where
        S: FnOnce() + 'static,
        E: FnOnce(SkyscapeError) + 'static,
    {
        let (generation, loader) = {
            let mut state = self.state.borrow_mut();
            if state.disposed {
                log::debug!("load_cubemap ignored: environment disposed");
                return;
            }
            state.cubemap_generation += 1;
            if let Some(previous) = state.scene.skybox.take_texture() {
                state.renderer.release_texture(previous);
            }
            (state.cubemap_generation, Rc::clone(&state.loader))
        };
        log::debug!("loading cubemap {generation}");

        let weak = Rc::downgrade(&self.state);
        loader.load(
            faces.in_layer_order(),
            Box::new(move |result| {
                let Some(state) = weak.upgrade() else {
                    log::debug!("cubemap {generation} finished after drop");
                    return;
                };
                let commit = state.borrow_mut().commit_cubemap(generation, result);
                match commit {
                    CubemapCommit::Applied => on_success(),
                    CubemapCommit::Failed(e) => {
                        log::warn!("cubemap {generation} failed: {e}");
                        on_error(e);
                    }
                    CubemapCommit::Stale => {
                        log::debug!("discarding stale cubemap {generation}");
                    }
                }
            }),
        );
    }

    /// Create the particle emitter and load its sprite.
    ///
    /// Only the first call has an effect. The emitter starts simulating at
    /// once; particles are drawn only after the sprite has loaded. A sprite
    /// failure is logged and leaves the effect invisible.
    pub fn init_particle_effect(&self, options: &ParticleOptions) {
        let (sprite, loader) = {
            let mut state = self.state.borrow_mut();
            if state.disposed {
                log::debug!("init_particle_effect ignored: environment disposed");
                return;
            }
            if !state.scene.add_particles(ParticleSystem::new(options)) {
                log::debug!("particle effect already initialised");
                return;
            }
            (options.sprite.clone(), Rc::clone(&state.loader))
        };

        let Some(sprite) = sprite else {
            log::warn!("particle effect has no sprite, nothing will be drawn");
            return;
        };
        log::debug!("loading particle sprite {sprite}");

        let weak = Rc::downgrade(&self.state);
        loader.load(
            vec![sprite],
            Box::new(move |result| {
                if let Some(state) = weak.upgrade() {
                    state.borrow_mut().commit_sprite(result);
                }
            }),
        );
    }
}

impl State {
    fn commit_cubemap(
        &mut self,
        generation: u64,
        result: Result<Vec<DecodedImage>, LoadError>,
    ) -> CubemapCommit {
        if self.disposed || generation != self.cubemap_generation {
            return CubemapCommit::Stale;
        }
        let texture = result
            .map_err(SkyscapeError::from)
            .and_then(CubeImages::from_faces)
            .and_then(|cube| self.renderer.create_cube_texture(&cube));
        match texture {
            Ok(texture) => {
                if let Some(previous) = self.scene.skybox.set_texture(texture) {
                    self.renderer.release_texture(previous);
                }
                CubemapCommit::Applied
            }
            Err(e) => CubemapCommit::Failed(e),
        }
    }

    fn commit_sprite(&mut self, result: Result<Vec<DecodedImage>, LoadError>) {
        if self.disposed {
            return;
        }
        let texture = result
            .map_err(SkyscapeError::from)
            .and_then(|mut images| {
                images.pop().ok_or(SkyscapeError::ImageLoad(LoadError::Cancelled))
            })
            .and_then(|image| self.renderer.create_texture_2d(&image));
        match texture {
            Ok(texture) => {
                if let Some(previous) = self.scene.set_particle_sprite(texture) {
                    self.renderer.release_texture(previous);
                }
                log::debug!("particle sprite ready");
            }
            Err(e) => log::warn!("particle sprite failed to load: {e}"),
        }
    }
}

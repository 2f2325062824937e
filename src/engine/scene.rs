use super::particles::ParticleSystem;
use super::TextureId;

/// Background cube texture slot. Holds at most one texture.
#[derive(Debug, Default)]
pub struct Skybox {
    texture: Option<TextureId>,
}

impl Skybox {
    /// The cube texture currently shown, if any.
    #[must_use]
    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    /// Show `texture`, returning the one it replaces.
    pub fn set_texture(&mut self, texture: TextureId) -> Option<TextureId> {
        self.texture.replace(texture)
    }

    /// Remove and return the current texture.
    pub fn take_texture(&mut self) -> Option<TextureId> {
        self.texture.take()
    }
}

/// Everything the backend draws for one frame.
///
/// The particle system is simulated as soon as it exists, but it is only
/// drawn once a sprite texture has been attached.
#[derive(Default)]
pub struct Scene {
    /// Cubemap background.
    pub skybox: Skybox,
    particles: Option<ParticleSystem>,
    particle_sprite: Option<TextureId>,
}

impl Scene {
    /// Empty scene: no cubemap, no particles.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a particle system has been added.
    #[must_use]
    pub fn has_particles(&self) -> bool {
        self.particles.is_some()
    }

    /// Add the particle system. Returns `false` (and drops `system`) if one
    /// already exists.
    pub fn add_particles(&mut self, system: ParticleSystem) -> bool {
        if self.particles.is_some() {
            return false;
        }
        self.particles = Some(system);
        true
    }

    /// The particle system, if added.
    #[must_use]
    pub fn particles(&self) -> Option<&ParticleSystem> {
        self.particles.as_ref()
    }

    /// Mutable particle system, if added.
    pub fn particles_mut(&mut self) -> Option<&mut ParticleSystem> {
        self.particles.as_mut()
    }

    /// Attach the sprite texture, making the particles renderable.
    pub fn set_particle_sprite(&mut self, texture: TextureId) -> Option<TextureId> {
        self.particle_sprite.replace(texture)
    }

    /// Remove and return the sprite texture.
    pub fn take_particle_sprite(&mut self) -> Option<TextureId> {
        self.particle_sprite.take()
    }

    /// Particles to draw together with their sprite, or `None` when
    /// nothing should be drawn.
    #[must_use]
    pub fn renderable_particles(&self) -> Option<(&ParticleSystem, TextureId)> {
        Some((self.particles.as_ref()?, self.particle_sprite?))
    }

    /// Remove every element. Textures must have been released first.
    pub fn clear(&mut self) {
        self.skybox = Skybox::default();
        self.particles = None;
        self.particle_sprite = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParticleOptions;

    #[test]
    fn particles_added_once() {
        let mut scene = Scene::new();
        assert!(scene.add_particles(ParticleSystem::new(&ParticleOptions::default())));
        assert!(!scene.add_particles(ParticleSystem::new(&ParticleOptions::default())));
        assert!(scene.has_particles());
    }

    #[test]
    fn particles_render_only_with_sprite() {
        let mut scene = Scene::new();
        let _ = scene.add_particles(ParticleSystem::new(&ParticleOptions::default()));
        assert!(scene.renderable_particles().is_none());

        let _ = scene.set_particle_sprite(TextureId(7));
        let (_, sprite) = scene.renderable_particles().unwrap();
        assert_eq!(sprite, TextureId(7));
    }

    #[test]
    fn skybox_replace_returns_previous() {
        let mut skybox = Skybox::default();
        assert_eq!(skybox.set_texture(TextureId(1)), None);
        assert_eq!(skybox.set_texture(TextureId(2)), Some(TextureId(1)));
        assert_eq!(skybox.take_texture(), Some(TextureId(2)));
        assert_eq!(skybox.texture(), None);
    }
}

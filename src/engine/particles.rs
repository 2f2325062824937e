use std::time::Duration;

use glam::Vec3;
use rand::distr::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::options::ParticleOptions;

/// Half-extent of the cube particles spawn in, centred on the origin.
pub const SPAWN_EXTENT: f32 = 10.0;

/// Upper bound on the particle buffer reserved up front; larger caps grow
/// on demand.
const PREALLOCATED_PARTICLES: usize = 1024;

/// A single live particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// World-space position.
    pub position: Vec3,
    /// Velocity in units per second.
    pub velocity: Vec3,
    /// On-screen size in logical pixels.
    pub size: f32,
    /// Seconds since spawn.
    pub age: f32,
    /// Seconds until the particle expires.
    pub life: f32,
}

impl Particle {
    /// Fade-in/fade-out opacity over the particle's life.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        if self.life <= 0.0 {
            return 0.0;
        }
        let t = (self.age / self.life).clamp(0.0, 1.0);
        // Ramp up over the first and down over the last 10% of life.
        (t / 0.1).min((1.0 - t) / 0.1).min(1.0)
    }
}

/// Spawn parameters with every range ordered `min <= max`.
#[derive(Debug, Clone, PartialEq)]
pub struct Emitter {
    /// Particles spawned per tick.
    pub amount: u32,
    /// Cap on live particles.
    pub max: u32,
    /// Lifetime range in seconds.
    pub life: [f32; 2],
    /// Size range in pixels.
    pub size: [f32; 2],
    /// Velocity box corners.
    pub velocity: [Vec3; 2],
}

impl Emitter {
    /// Build from options, ordering any reversed ranges.
    ///
    /// A range that cannot be sampled (non-finite bounds, or a width that
    /// overflows `f32`) is replaced by the default for that field.
    #[must_use]
    pub fn from_options(options: &ParticleOptions) -> Self {
        let defaults = ParticleOptions::default();
        let [lo, hi] = options.speed;
        let [default_lo, default_hi] = defaults.speed;
        let axes: [[f32; 2]; 3] = std::array::from_fn(|axis| {
            sampleable(
                "speed",
                [lo[axis], hi[axis]],
                [default_lo[axis], default_hi[axis]],
            )
        });
        Self {
            amount: options.amount,
            max: options.max,
            life: sampleable("life", options.life, defaults.life),
            size: sampleable("size", options.size, defaults.size),
            velocity: [
                Vec3::new(axes[0][0], axes[1][0], axes[2][0]),
                Vec3::new(axes[0][1], axes[1][1], axes[2][1]),
            ],
        }
    }

    fn spawn(&self, rng: &mut StdRng) -> Particle {
        let position = Vec3::new(
            rng.random_range(-SPAWN_EXTENT..=SPAWN_EXTENT),
            rng.random_range(-SPAWN_EXTENT..=SPAWN_EXTENT),
            rng.random_range(-SPAWN_EXTENT..=SPAWN_EXTENT),
        );
        let [lo, hi] = self.velocity;
        let velocity = Vec3::new(
            rng.random_range(lo.x..=hi.x),
            rng.random_range(lo.y..=hi.y),
            rng.random_range(lo.z..=hi.z),
        );
        Particle {
            position,
            velocity,
            size: rng.random_range(self.size[0]..=self.size[1]),
            age: 0.0,
            life: rng.random_range(self.life[0]..=self.life[1]),
        }
    }
}

/// Order `[a, b]` and check it can be sampled uniformly, falling back to
/// `default` otherwise.
fn sampleable(field: &str, [a, b]: [f32; 2], default: [f32; 2]) -> [f32; 2] {
    let range = if a <= b { [a, b] } else { [b, a] };
    match Uniform::new_inclusive(range[0], range[1]) {
        Ok(_) => range,
        Err(e) => {
            log::warn!(
                "particle {field} range [{a}, {b}] unusable ({e}); using {default:?}"
            );
            default
        }
    }
}

/// An emitter plus its live particles.
///
/// Particles move linearly and are removed once their age reaches their
/// life; each tick then spawns up to `amount` new ones without exceeding
/// `max`.
pub struct ParticleSystem {
    emitter: Emitter,
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleSystem {
    /// New system seeded from the thread RNG.
    #[must_use]
    pub fn new(options: &ParticleOptions) -> Self {
        Self::with_rng(options, StdRng::from_rng(&mut rand::rng()))
    }

    /// New system with a fixed seed, for reproducible simulations.
    #[must_use]
    pub fn with_seed(options: &ParticleOptions, seed: u64) -> Self {
        Self::with_rng(options, StdRng::seed_from_u64(seed))
    }

    fn with_rng(options: &ParticleOptions, rng: StdRng) -> Self {
        let emitter = Emitter::from_options(options);
        Self {
            particles: Vec::with_capacity(
                (emitter.max as usize).min(PREALLOCATED_PARTICLES),
            ),
            emitter,
            rng,
        }
    }

    /// Spawn parameters in use.
    #[must_use]
    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    /// Live particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of live particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether no particles are alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Advance the simulation by `delta`.
    pub fn update(&mut self, delta: Duration) {
        let dt = delta.as_secs_f32();
        for particle in &mut self.particles {
            particle.age += dt;
            particle.position += particle.velocity * dt;
        }
        self.particles.retain(|p| p.age < p.life);

        let room = (self.emitter.max as usize).saturating_sub(self.particles.len());
        let count = room.min(self.emitter.amount as usize);
        for _ in 0..count {
            let particle = self.emitter.spawn(&mut self.rng);
            self.particles.push(particle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn spawns_amount_per_tick() {
        let mut system = ParticleSystem::with_seed(&ParticleOptions::default(), 1);
        assert!(system.is_empty());
        system.update(FRAME);
        assert_eq!(system.len(), 5);
        system.update(FRAME);
        assert_eq!(system.len(), 10);
    }

    #[test]
    fn never_exceeds_max() {
        let options = ParticleOptions {
            amount: 7,
            max: 20,
            ..ParticleOptions::default()
        };
        let mut system = ParticleSystem::with_seed(&options, 2);
        for _ in 0..50 {
            system.update(FRAME);
            assert!(system.len() <= 20);
        }
        assert_eq!(system.len(), 20);
    }

    #[test]
    fn spawned_values_within_ranges() {
        let options = ParticleOptions::default();
        let mut system = ParticleSystem::with_seed(&options, 3);
        for _ in 0..20 {
            system.update(FRAME);
        }
        let [vlo, vhi] = options.speed.map(Vec3::from_array);
        for p in system.particles() {
            let start = p.position - p.velocity * p.age;
            assert!(start.abs().max_element() <= SPAWN_EXTENT + 1e-3);
            assert!(p.velocity.cmpge(vlo).all() && p.velocity.cmple(vhi).all());
            assert!((20.0..=100.0).contains(&p.size));
            assert!((5.0..=8.0).contains(&p.life));
        }
    }

    #[test]
    fn particles_expire() {
        let options = ParticleOptions {
            amount: 3,
            life: [0.05, 0.05],
            ..ParticleOptions::default()
        };
        let mut system = ParticleSystem::with_seed(&options, 4);
        system.update(FRAME);
        assert_eq!(system.len(), 3);
        // The first three die after ~0.05s; only the latest spawns remain.
        for _ in 0..4 {
            system.update(FRAME);
        }
        assert!(system.particles().iter().all(|p| p.age < 0.05));
    }

    #[test]
    fn reversed_ranges_are_ordered() {
        let options = ParticleOptions {
            size: [100.0, 20.0],
            speed: [[0.1, -1.0, 0.1], [-0.1, -2.0, -0.1]],
            ..ParticleOptions::default()
        };
        let emitter = Emitter::from_options(&options);
        assert_eq!(emitter.size, [20.0, 100.0]);
        assert_eq!(emitter.velocity[0], Vec3::new(-0.1, -2.0, -0.1));
    }

    #[test]
    fn opacity_fades_at_both_ends() {
        let mut p = Particle {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            size: 1.0,
            age: 0.0,
            life: 10.0,
        };
        assert_eq!(p.opacity(), 0.0);
        p.age = 5.0;
        assert_eq!(p.opacity(), 1.0);
        p.age = 9.5;
        assert!((p.opacity() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn same_seed_same_simulation() {
        let mut a = ParticleSystem::with_seed(&ParticleOptions::default(), 9);
        let mut b = ParticleSystem::with_seed(&ParticleOptions::default(), 9);
        for _ in 0..10 {
            a.update(FRAME);
            b.update(FRAME);
        }
        assert_eq!(a.particles(), b.particles());
    }

    fn assert_sane(system: &ParticleSystem) {
        for p in system.particles() {
            assert!(p.position.is_finite() && p.velocity.is_finite());
            assert!(p.size.is_finite() && p.life.is_finite());
        }
    }

    #[test]
    fn infinite_life_falls_back_to_default() {
        let options = ParticleOptions {
            life: [5.0, f32::INFINITY],
            ..ParticleOptions::default()
        };
        let emitter = Emitter::from_options(&options);
        assert_eq!(emitter.life, ParticleOptions::default().life);

        let mut system = ParticleSystem::with_seed(&options, 5);
        system.update(FRAME);
        assert_eq!(system.len(), 5);
        assert_sane(&system);
        assert!(system.particles().iter().all(|p| (5.0..=8.0).contains(&p.life)));
    }

    #[test]
    fn nan_size_falls_back_to_default() {
        let options = ParticleOptions {
            size: [f32::NAN, 50.0],
            ..ParticleOptions::default()
        };
        let mut system = ParticleSystem::with_seed(&options, 6);
        assert_eq!(system.emitter().size, [20.0, 100.0]);
        system.update(FRAME);
        assert_sane(&system);
        assert!(system.particles().iter().all(|p| (20.0..=100.0).contains(&p.size)));
    }

    #[test]
    fn overflowing_speed_axis_falls_back_per_axis() {
        let options = ParticleOptions {
            speed: [[-3e38, -2.0, -0.5], [3e38, -1.0, 0.5]],
            ..ParticleOptions::default()
        };
        let mut system = ParticleSystem::with_seed(&options, 7);
        let [lo, hi] = system.emitter().velocity;
        assert_eq!(lo, Vec3::new(-0.1, -2.0, -0.5));
        assert_eq!(hi, Vec3::new(0.1, -1.0, 0.5));
        for _ in 0..10 {
            system.update(FRAME);
        }
        assert_sane(&system);
    }

    #[test]
    fn parsed_infinite_range_does_not_panic() {
        let options = crate::options::Options::from_toml(
            "[particles]\nlife = [5.0, inf]\nsize = [-inf, 10.0]\n",
        )
        .expect("valid toml");
        let mut system = ParticleSystem::with_seed(&options.particles, 8);
        for _ in 0..5 {
            system.update(FRAME);
        }
        assert_eq!(system.len(), 25);
        assert_sane(&system);
    }

    #[test]
    fn huge_cap_does_not_reserve_everything() {
        let options = ParticleOptions {
            max: u32::MAX,
            ..ParticleOptions::default()
        };
        let mut system = ParticleSystem::with_seed(&options, 10);
        assert!(system.particles.capacity() <= PREALLOCATED_PARTICLES);
        system.update(FRAME);
        assert_eq!(system.len(), 5);
    }
}

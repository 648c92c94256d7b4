//! Ambient feedback effects: screen shake, hit-stop, particles
//!
//! None of these affect gameplay. They keep advancing during hit-stop.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Shake strength lost per second
const SHAKE_DECAY: f32 = 22.0;
/// Downward pull on particles (pixels/s²)
const PARTICLE_GRAVITY: f32 = 1600.0;
/// Radius lost per second
const PARTICLE_SHRINK: f32 = 6.0;

/// Maximum live particles
pub const MAX_PARTICLES: usize = 256;

/// Camera shake envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenShake {
    pub time_left: f32,
    pub strength: f32,
}

impl ScreenShake {
    /// Start or extend a shake. Never weakens an ongoing one.
    pub fn kick(&mut self, strength: f32, seconds: f32) {
        self.strength = self.strength.max(strength);
        self.time_left = self.time_left.max(seconds);
    }

    pub fn update(&mut self, dt: f32) {
        self.time_left = (self.time_left - dt).max(0.0);
        self.strength = (self.strength - dt * SHAKE_DECAY).max(0.0);
    }

    pub fn is_active(&self) -> bool {
        self.time_left > 0.0 && self.strength > 0.0
    }

    /// Whole-pixel render offset
    pub fn offset<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        if !self.is_active() {
            return Vec2::ZERO;
        }
        let s = self.strength;
        Vec2::new(
            rng.random_range(-s..=s).trunc(),
            rng.random_range(-s..=s).trunc(),
        )
    }
}

/// Frame-freeze counter for impactful hits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitStop {
    pub frames_left: u32,
}

impl HitStop {
    pub fn trigger(&mut self, frames: u32) {
        self.frames_left = self.frames_left.max(frames);
    }

    /// Consume one frozen frame. Returns true if this frame is frozen.
    pub fn consume_frame(&mut self) -> bool {
        if self.frames_left == 0 {
            return false;
        }
        self.frames_left -= 1;
        true
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Palette index
    pub color: u8,
    /// Seconds remaining
    pub life: f32,
}

/// Burst particles
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    pub particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn burst<R: Rng + ?Sized>(&mut self, rng: &mut R, origin: Vec2, color: u8, count: usize, speed: f32) {
        for _ in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                break;
            }
            let angle = rng.random::<f32>() * std::f32::consts::TAU;
            let mag = speed * (0.35 + rng.random::<f32>() * 0.85);
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::from_angle(angle) * mag,
                radius: 2.0 + rng.random::<f32>() * 3.0,
                color,
                life: 0.45 + rng.random::<f32>() * 0.35,
            });
        }
    }

    pub fn update(&mut self, dt: f32) {
        for p in self.particles.iter_mut() {
            p.life -= dt;
            p.vel.y += PARTICLE_GRAVITY * dt;
            p.pos += p.vel * dt;
            p.radius = (p.radius - dt * PARTICLE_SHRINK).max(0.0);
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_shake_kick_takes_max_and_decays() {
        let mut shake = ScreenShake::default();
        shake.kick(9.0, 0.16);
        shake.kick(2.0, 0.07);
        assert_eq!(shake.strength, 9.0);
        assert_eq!(shake.time_left, 0.16);

        let mut rng = Pcg32::seed_from_u64(1);
        let off = shake.offset(&mut rng);
        assert!(off.x.abs() <= 9.0 && off.y.abs() <= 9.0);

        for _ in 0..20 {
            shake.update(1.0 / 60.0);
        }
        assert!(!shake.is_active());
        assert_eq!(shake.offset(&mut rng), Vec2::ZERO);
    }

    #[test]
    fn test_hitstop_counts_down() {
        let mut hs = HitStop::default();
        assert!(!hs.consume_frame());
        hs.trigger(3);
        hs.trigger(1);
        assert!(hs.consume_frame());
        assert!(hs.consume_frame());
        assert!(hs.consume_frame());
        assert!(!hs.consume_frame());
    }

    #[test]
    fn test_particles_expire() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut ps = ParticleSystem::default();
        ps.burst(&mut rng, Vec2::ZERO, 3, 18, 560.0);
        assert_eq!(ps.len(), 18);
        for _ in 0..60 {
            ps.update(1.0 / 60.0);
        }
        assert!(ps.is_empty());
    }

    #[test]
    fn test_particle_cap() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut ps = ParticleSystem::default();
        ps.burst(&mut rng, Vec2::ZERO, 3, MAX_PARTICLES + 50, 100.0);
        assert_eq!(ps.len(), MAX_PARTICLES);
    }
}

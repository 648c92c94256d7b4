//! Character spec: cosmetic styles plus the trait multipliers read at run start
//!
//! Specs arrive from an external generator as JSON. Anything malformed falls
//! back to a spec derived from the run seed, so a run always starts.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Lower/upper bound for every trait multiplier
pub const TRAIT_MULT_MIN: f32 = 0.78;
pub const TRAIT_MULT_MAX: f32 = 1.22;
/// Bounds for the starting hit points
pub const BASE_HP_MIN: i32 = 2;
pub const BASE_HP_MAX: i32 = 5;

/// Gameplay-relevant traits, read once when a run is constructed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Traits {
    pub speed_mult: f32,
    pub jump_mult: f32,
    pub charge_mult: f32,
    pub base_hp: i32,
    pub gravity_mult: f32,
}

impl Default for Traits {
    fn default() -> Self {
        Self {
            speed_mult: 1.0,
            jump_mult: 1.0,
            charge_mult: 1.0,
            base_hp: 3,
            gravity_mult: 1.0,
        }
    }
}

impl Traits {
    /// Deterministic traits for a seed
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        Self {
            speed_mult: rng.random_range(TRAIT_MULT_MIN..=TRAIT_MULT_MAX),
            jump_mult: rng.random_range(TRAIT_MULT_MIN..=TRAIT_MULT_MAX),
            charge_mult: rng.random_range(TRAIT_MULT_MIN..=TRAIT_MULT_MAX),
            base_hp: rng.random_range(BASE_HP_MIN..=BASE_HP_MAX),
            gravity_mult: rng.random_range(TRAIT_MULT_MIN..=TRAIT_MULT_MAX),
        }
    }

    /// Clamp every field into its safe range (non-finite values become 1.0)
    pub fn clamped(self) -> Self {
        fn mult(v: f32) -> f32 {
            if v.is_finite() {
                v.clamp(TRAIT_MULT_MIN, TRAIT_MULT_MAX)
            } else {
                1.0
            }
        }
        Self {
            speed_mult: mult(self.speed_mult),
            jump_mult: mult(self.jump_mult),
            charge_mult: mult(self.charge_mult),
            base_hp: self.base_hp.clamp(BASE_HP_MIN, BASE_HP_MAX),
            gravity_mult: mult(self.gravity_mult),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EyeStyle {
    #[default]
    Dot,
    Sleepy,
    Angry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouthStyle {
    #[default]
    Smile,
    Flat,
    Fang,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HatStyle {
    #[default]
    None,
    Triangle,
    Halo,
}

/// A generated character
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterSpec {
    pub eye_style: EyeStyle,
    pub mouth_style: MouthStyle,
    pub hat_style: HatStyle,
    pub traits: Traits,
}

impl CharacterSpec {
    /// Deterministic local character for a seed
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed ^ 0x5eed_c4a2);
        let eye_style = match rng.random_range(0..3) {
            0 => EyeStyle::Dot,
            1 => EyeStyle::Sleepy,
            _ => EyeStyle::Angry,
        };
        let mouth_style = match rng.random_range(0..3) {
            0 => MouthStyle::Smile,
            1 => MouthStyle::Flat,
            _ => MouthStyle::Fang,
        };
        let hat_style = match rng.random_range(0..3) {
            0 => HatStyle::None,
            1 => HatStyle::Triangle,
            _ => HatStyle::Halo,
        };
        Self {
            eye_style,
            mouth_style,
            hat_style,
            traits: Traits::from_seed(seed),
        }
    }

    /// Parse an externally generated spec; fall back to the seeded one.
    ///
    /// Missing fields take defaults, traits are always clamped.
    pub fn from_json_or_seed(json: &str, seed: u64) -> Self {
        match serde_json::from_str::<CharacterSpec>(json) {
            Ok(mut spec) => {
                spec.traits = spec.traits.clamped();
                spec
            }
            Err(e) => {
                log::warn!("Malformed character spec ({e}), using seeded character");
                Self::from_seed(seed)
            }
        }
    }

    /// Traits ready to hand to a run
    pub fn effective(&self) -> Traits {
        self.traits.clamped()
    }
}

//! Vertical Jump - run simulation core for an endless climbing game
//!
//! Core modules:
//! - `sim`: Deterministic run simulation (physics, collisions, spawning, hazard)
//! - `platform`: Input edge detection
//! - `persistence`: Run snapshots with integrity verification
//! - `highscores`: Run history and high score store
//! - `settings`: Tunables with environment overrides
//! - `character`, `theme`: Run-start collaborators (traits, seed, palette)
//! - `audio`: Feedback cue routing

pub mod audio;
pub mod character;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod theme;

pub use character::{CharacterSpec, Traits};
pub use highscores::{RunRecord, ScoreStore};
pub use settings::Settings;
pub use theme::Theme;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Visible world dimensions
    pub const WIDTH: i32 = 960;
    pub const HEIGHT: i32 = 720;

    /// Player hitbox
    pub const PLAYER_W: i32 = 34;
    pub const PLAYER_H: i32 = 44;

    /// Horizontal movement (pixels/s, pixels/s²)
    pub const PLAYER_MAX_X_SPEED: f32 = 320.0;
    pub const PLAYER_X_ACCEL: f32 = 2400.0;
    pub const PLAYER_X_FRICTION: f32 = 2200.0;

    /// Downward acceleration before the character's gravity multiplier
    pub const GRAVITY: f32 = 1800.0;

    /// Jump launch speed range (pixels/s, upward)
    pub const JUMP_MIN_VY: f32 = 520.0;
    pub const JUMP_MAX_VY: f32 = 980.0;
    /// Seconds of holding to reach full charge at charge multiplier 1.0
    pub const JUMP_CHARGE_SECONDS: f32 = 0.55;

    /// Grace period after taking a hit
    pub const INVULN_SECONDS_ON_HIT: f32 = 1.0;
    pub const MAX_HP_CAP: i32 = 8;

    /// Boost multipliers while an item timer is active
    pub const SPEED_BOOST_MULT: f32 = 1.55;
    pub const JUMP_BOOST_MULT: f32 = 1.45;

    /// World y the run starts at (y grows downward)
    pub const START_Y: f32 = 320.0;
}

/// Linear interpolation from `a` to `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

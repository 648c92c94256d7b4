//! Run tunables and feedback preferences
//!
//! Defaults come from `Settings::default()`; `from_env()` applies `GAME_*`
//! overrides. Values are sanitised before a run sees them.

use serde::{Deserialize, Serialize};

use crate::consts::HEIGHT;
use crate::sim::hazard::{DEFAULT_FLOOR_HEIGHT_PX, DEFAULT_ZONE_FLOOR_STEP};

/// Fallback zone popup duration (seconds)
pub const DEFAULT_ZONE_POPUP_SECONDS: f32 = 0.55;

/// Run tunables and preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Camera ===
    /// Screen y the player is held at while climbing
    pub scroll_start_player_screen_y: f32,
    /// How far below the screen the player may fall before the run ends
    pub fall_below_screen_px: f32,

    // === Rising water ===
    /// Initial distance from run start down to the water
    pub water_start_offset: f32,
    /// Rise speed at floor 0 (pixels/s)
    pub water_base_speed: f32,
    /// Extra rise speed per floor
    pub water_speed_per_floor: f32,

    // === Depth ===
    pub floor_height_px: f32,
    /// Floors per zone
    pub zone_floor_step: u32,
    pub zone_popup_seconds: f32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scroll_start_player_screen_y: (HEIGHT * 3 / 5) as f32,
            fall_below_screen_px: (HEIGHT * 4 / 5) as f32,

            water_start_offset: 420.0,
            water_base_speed: 40.0,
            water_speed_per_floor: 2.5,

            floor_height_px: DEFAULT_FLOOR_HEIGHT_PX,
            zone_floor_step: DEFAULT_ZONE_FLOOR_STEP,
            zone_popup_seconds: DEFAULT_ZONE_POPUP_SECONDS,

            master_volume: 0.7,
            sfx_volume: 0.9,
            muted: false,
        }
    }
}

impl Settings {
    /// Defaults with overrides from the process environment
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `GAME_*` overrides from a lookup. Blank or unparseable values
    /// keep the current value.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let float = |key: &str, current: f32| -> f32 {
            lookup(key)
                .and_then(|raw| raw.trim().parse::<f32>().ok())
                .unwrap_or(current)
        };

        self.scroll_start_player_screen_y = float(
            "GAME_SCROLL_START_PLAYER_SCREEN_Y",
            self.scroll_start_player_screen_y,
        );
        self.fall_below_screen_px = float("GAME_FALL_BELOW_SCREEN_PX", self.fall_below_screen_px);
        self.water_start_offset = float("GAME_WATER_START_OFFSET", self.water_start_offset);
        self.water_base_speed = float("GAME_WATER_BASE_SPEED", self.water_base_speed);
        self.water_speed_per_floor = float("GAME_WATER_SPEED_PER_FLOOR", self.water_speed_per_floor);
        self.floor_height_px = float("GAME_FLOOR_HEIGHT_PX", self.floor_height_px);
        self.zone_popup_seconds = float("GAME_ZONE_POPUP_SECONDS", self.zone_popup_seconds);

        if let Some(step) = lookup("GAME_ZONE_FLOOR_STEP").and_then(|raw| raw.trim().parse::<i64>().ok()) {
            self.zone_floor_step = step.clamp(0, u32::MAX as i64) as u32;
        }
        if let Some(raw) = lookup("GAME_MUTE") {
            self.muted = !matches!(raw.trim(), "" | "0" | "false" | "False");
        }

        self
    }

    /// Replace unusable values with safe ones
    pub fn sanitized(mut self) -> Self {
        let defaults = Settings::default();
        let positive = |v: f32, fallback: f32| if v.is_finite() && v > 0.0 { v } else { fallback };
        let finite = |v: f32, fallback: f32| if v.is_finite() { v } else { fallback };

        self.floor_height_px = positive(self.floor_height_px, DEFAULT_FLOOR_HEIGHT_PX);
        if self.zone_floor_step == 0 {
            self.zone_floor_step = DEFAULT_ZONE_FLOOR_STEP;
        }
        self.zone_popup_seconds = positive(self.zone_popup_seconds, DEFAULT_ZONE_POPUP_SECONDS).max(0.05);

        self.scroll_start_player_screen_y =
            finite(self.scroll_start_player_screen_y, defaults.scroll_start_player_screen_y);
        self.fall_below_screen_px = finite(self.fall_below_screen_px, defaults.fall_below_screen_px);
        self.water_start_offset = finite(self.water_start_offset, defaults.water_start_offset);
        // The water only ever rises
        self.water_base_speed = positive(self.water_base_speed, defaults.water_base_speed);
        self.water_speed_per_floor =
            finite(self.water_speed_per_floor, defaults.water_speed_per_floor).max(0.0);

        self.master_volume = finite(self.master_volume, defaults.master_volume).clamp(0.0, 1.0);
        self.sfx_volume = finite(self.sfx_volume, defaults.sfx_volume).clamp(0.0, 1.0);
        self
    }
}

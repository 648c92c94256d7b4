//! Rising water, camera tracking, floor depth and zones
//!
//! World y grows downward, so "up" is decreasing y:
//! - camera.y only ever decreases
//! - water.level only ever decreases
//! - floor only ever increases

use serde::{Deserialize, Serialize};

use crate::consts::HEIGHT;
use crate::settings::Settings;

/// Fallback floor height when configured as non-positive
pub const DEFAULT_FLOOR_HEIGHT_PX: f32 = 120.0;
/// Fallback zone step when configured as non-positive
pub const DEFAULT_ZONE_FLOOR_STEP: u32 = 10;

/// Gap (pixels) under which the water warning sounds
pub const WATER_WARN_DISTANCE: f32 = 180.0;
/// Minimum ticks between two warnings
pub const WATER_WARN_COOLDOWN_TICKS: u64 = 55;

/// Platforms and items further than this below the camera are dropped
pub const PLATFORM_LOOKBACK: f32 = HEIGHT as f32 * 2.5;
/// Enemies further than this below the camera are dropped
pub const ENEMY_LOOKBACK: f32 = HEIGHT as f32 * 3.0;
/// Content is generated until the frontier is this far above the camera
pub const SPAWN_LOOKAHEAD: f32 = HEIGHT as f32 * 2.0;

/// Floor depth reached for a highest point `min_y`
pub fn floor_for_height(start_y: f32, min_y: f32, floor_height_px: f32) -> u32 {
    let h = if floor_height_px > 0.0 {
        floor_height_px
    } else {
        DEFAULT_FLOOR_HEIGHT_PX
    };
    ((start_y - min_y) / h).floor().max(0.0) as u32
}

/// A cosmetic region keyed by floor bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone {
    pub index: usize,
    pub name: &'static str,
}

pub const ZONES: [Zone; 11] = [
    Zone { index: 0, name: "Beach" },
    Zone { index: 1, name: "Road" },
    Zone { index: 2, name: "Village" },
    Zone { index: 3, name: "Town" },
    Zone { index: 4, name: "Mountain" },
    Zone { index: 5, name: "Mt. Fuji" },
    Zone { index: 6, name: "Sky" },
    Zone { index: 7, name: "Space" },
    Zone { index: 8, name: "Moon" },
    Zone { index: 9, name: "Mars" },
    Zone { index: 10, name: "Heaven" },
];

/// Zone for a floor depth. Deeper than the last zone stays in the last zone.
pub fn zone_for_floor(floor: u32, step: u32) -> Zone {
    let step = if step == 0 { DEFAULT_ZONE_FLOOR_STEP } else { step };
    let idx = (floor / step) as usize;
    ZONES[idx.min(ZONES.len() - 1)]
}

/// The pursuing water surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Water {
    /// Surface y
    pub level: f32,
    /// Tick of the last warning
    pub last_warn_tick: Option<u64>,
}

impl Water {
    pub fn new(level: f32) -> Self {
        Self {
            level,
            last_warn_tick: None,
        }
    }

    /// Rise speed at a floor depth
    pub fn speed(floor: u32, settings: &Settings) -> f32 {
        settings.water_base_speed + floor as f32 * settings.water_speed_per_floor
    }

    pub fn advance(&mut self, dt: f32, floor: u32, settings: &Settings) {
        self.level -= Self::speed(floor, settings) * dt;
    }

    /// Distance from a bottom edge down to the surface
    pub fn gap(&self, bottom: f32) -> f32 {
        self.level - bottom
    }

    /// Whether a warning should fire now; records it if so
    pub fn check_warning(&mut self, bottom: f32, tick: u64) -> bool {
        if self.gap(bottom) >= WATER_WARN_DISTANCE {
            return false;
        }
        let cooled = self
            .last_warn_tick
            .is_none_or(|last| tick.saturating_sub(last) > WATER_WARN_COOLDOWN_TICKS);
        if cooled {
            self.last_warn_tick = Some(tick);
        }
        cooled
    }

    /// The bottom edge has passed the surface
    pub fn submerges(&self, bottom: f32) -> bool {
        bottom > self.level
    }
}

/// Vertical-only camera that never scrolls back down
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub y: f32,
}

impl Camera {
    /// Camera placing the player at `anchor` pixels from the top of the screen
    pub fn following(player_y: f32, anchor: f32) -> Self {
        Self {
            y: player_y - anchor,
        }
    }

    pub fn track(&mut self, player_y: f32, anchor: f32) {
        self.y = self.y.min(player_y - anchor);
    }

    /// Player top is beyond the fall margin under the visible region
    pub fn has_fallen_out(&self, player_y: f32, fall_margin: f32) -> bool {
        player_y > self.y + HEIGHT as f32 + fall_margin
    }

    pub fn platform_cutoff(&self) -> f32 {
        self.y + PLATFORM_LOOKBACK
    }

    pub fn enemy_cutoff(&self) -> f32 {
        self.y + ENEMY_LOOKBACK
    }

    pub fn spawn_horizon(&self) -> f32 {
        self.y - SPAWN_LOOKAHEAD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_floor_for_height() {
        assert_eq!(floor_for_height(320.0, 320.0, 120.0), 0);
        assert_eq!(floor_for_height(320.0, 201.0, 120.0), 0);
        assert_eq!(floor_for_height(320.0, 200.0, 120.0), 1);
        assert_eq!(floor_for_height(320.0, -1000.0, 120.0), 11);
        // Below start never goes negative
        assert_eq!(floor_for_height(320.0, 900.0, 120.0), 0);
    }

    #[test]
    fn test_floor_height_non_positive_uses_default() {
        assert_eq!(floor_for_height(0.0, -240.0, 0.0), 2);
        assert_eq!(floor_for_height(0.0, -240.0, -5.0), 2);
    }

    #[test]
    fn test_zone_for_floor() {
        assert_eq!(zone_for_floor(0, 10).name, "Beach");
        assert_eq!(zone_for_floor(19, 10).index, 1);
        assert_eq!(zone_for_floor(500, 10).name, "Heaven");
        assert_eq!(zone_for_floor(25, 0).index, 2);
    }

    #[test]
    fn test_water_speed_grows_with_floor() {
        let settings = Settings::default();
        let mut water = Water::new(1000.0);
        water.advance(1.0, 0, &settings);
        assert!((water.level - (1000.0 - settings.water_base_speed)).abs() < 1e-3);
        assert!(Water::speed(10, &settings) > Water::speed(0, &settings));
    }

    #[test]
    fn test_water_warning_is_rate_limited() {
        let mut water = Water::new(100.0);
        assert!(!water.check_warning(-500.0, 0));
        assert!(water.check_warning(50.0, 10));
        assert!(!water.check_warning(50.0, 30));
        assert!(!water.check_warning(50.0, 65));
        assert!(water.check_warning(50.0, 66));
    }

    #[test]
    fn test_camera_only_moves_up() {
        let mut cam = Camera::following(500.0, 432.0);
        assert_eq!(cam.y, 68.0);
        cam.track(600.0, 432.0);
        assert_eq!(cam.y, 68.0);
        cam.track(300.0, 432.0);
        assert_eq!(cam.y, -132.0);
    }

    proptest! {
        #[test]
        fn prop_camera_monotonic(ys in proptest::collection::vec(-5000.0f32..5000.0, 1..64)) {
            let mut cam = Camera::following(0.0, 432.0);
            let mut prev = cam.y;
            for y in ys {
                cam.track(y, 432.0);
                prop_assert!(cam.y <= prev);
                prev = cam.y;
            }
        }

        #[test]
        fn prop_floor_monotonic_in_height(a in -10000.0f32..400.0, b in -10000.0f32..400.0) {
            let (hi, lo) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(floor_for_height(320.0, hi, 120.0) >= floor_for_height(320.0, lo, 120.0));
        }
    }
}

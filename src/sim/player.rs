//! Player kinematics: horizontal motion, charge jump, timed status effects, damage
//!
//! Position is a float top-left corner; the collision rect is derived from it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::character::Traits;
use crate::consts::*;
use crate::lerp;

/// The climbing player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Authoritative position (top-left)
    pub pos: Vec2,
    pub vel: Vec2,
    pub grounded: bool,

    pub hp: i32,
    pub max_hp: i32,

    /// Post-hit grace (seconds)
    pub invuln: f32,
    pub speed_boost: f32,
    pub jump_boost: f32,
    /// Pass-through of platforms and enemies, screen wrap
    pub phase: f32,
    /// Invulnerability granted by an item
    pub invuln_item: f32,

    /// Jump charge in [0, 1]
    pub charge: f32,

    pub trait_speed_mult: f32,
    pub trait_jump_mult: f32,
    pub trait_charge_mult: f32,
}

impl Player {
    pub fn new(pos: Vec2, traits: &Traits) -> Self {
        let max_hp = traits.base_hp.max(1);
        Self {
            pos,
            vel: Vec2::ZERO,
            grounded: false,
            hp: max_hp,
            max_hp,
            invuln: 0.0,
            speed_boost: 0.0,
            jump_boost: 0.0,
            phase: 0.0,
            invuln_item: 0.0,
            charge: 0.0,
            trait_speed_mult: traits.speed_mult,
            trait_jump_mult: traits.jump_mult,
            trait_charge_mult: traits.charge_mult,
        }
    }

    /// Collision rect snapped to whole pixels
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, PLAYER_W, PLAYER_H)
    }

    /// Float bottom edge (used by swept checks)
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + PLAYER_H as f32
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invuln > 0.0 || self.invuln_item > 0.0
    }

    pub fn is_phased(&self) -> bool {
        self.phase > 0.0
    }

    /// Effective horizontal multiplier (boost replaces nothing, it stacks on the trait)
    pub fn speed_mult(&self) -> f32 {
        let boost = if self.speed_boost > 0.0 { SPEED_BOOST_MULT } else { 1.0 };
        self.trait_speed_mult * boost
    }

    /// Effective jump multiplier
    pub fn jump_mult(&self) -> f32 {
        let boost = if self.jump_boost > 0.0 { JUMP_BOOST_MULT } else { 1.0 };
        self.trait_jump_mult * boost
    }

    /// Upward launch speed for a given charge
    pub fn launch_speed(&self, charge: f32) -> f32 {
        lerp(JUMP_MIN_VY, JUMP_MAX_VY, charge.clamp(0.0, 1.0)) * self.jump_mult()
    }

    /// Decrement every status timer toward zero
    pub fn update_timers(&mut self, dt: f32) {
        for timer in [
            &mut self.invuln,
            &mut self.speed_boost,
            &mut self.jump_boost,
            &mut self.phase,
            &mut self.invuln_item,
        ] {
            *timer = (*timer - dt).max(0.0);
        }
    }

    /// Accelerate toward the input direction or apply friction, then clamp
    pub fn update_horizontal(&mut self, dt: f32, left: bool, right: bool) {
        let target = if right {
            1.0
        } else if left {
            -1.0
        } else {
            0.0
        };

        let mult = self.speed_mult();
        if target != 0.0 {
            self.vel.x += target * PLAYER_X_ACCEL * mult * dt;
        } else if self.vel.x > 0.0 {
            self.vel.x = (self.vel.x - PLAYER_X_FRICTION * dt).max(0.0);
        } else if self.vel.x < 0.0 {
            self.vel.x = (self.vel.x + PLAYER_X_FRICTION * dt).min(0.0);
        }

        let max_speed = PLAYER_MAX_X_SPEED * mult;
        self.vel.x = self.vel.x.clamp(-max_speed, max_speed);
    }

    /// Accumulate charge while grounded and held; fire on release.
    ///
    /// Returns true when a jump was launched this call. Charge never
    /// survives into the air, so there are no banked jumps.
    pub fn update_jump_charge(&mut self, dt: f32, jump_held: bool, jump_released: bool) -> bool {
        if !self.grounded {
            self.charge = 0.0;
            return false;
        }

        if jump_held {
            self.charge = (self.charge + (dt * self.trait_charge_mult) / JUMP_CHARGE_SECONDS)
                .clamp(0.0, 1.0);
        }

        if jump_released {
            self.vel.y = -self.launch_speed(self.charge);
            self.grounded = false;
            self.charge = 0.0;
            return true;
        }

        false
    }

    /// Take damage unless invulnerable. Starts the post-hit grace period.
    pub fn apply_damage(&mut self, amount: i32) -> bool {
        if self.is_invulnerable() {
            return false;
        }
        self.hp = (self.hp - amount).max(0);
        self.invuln = INVULN_SECONDS_ON_HIT;
        true
    }

    /// Raise max HP (capped) and heal by the same amount
    pub fn heal_max_hp(&mut self, amount: i32, cap: i32) {
        self.max_hp = (self.max_hp + amount).min(cap);
        self.hp = (self.hp + amount).min(self.max_hp);
    }
}

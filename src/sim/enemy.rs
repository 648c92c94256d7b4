//! Enemy kinds and their per-kind behavior state machines
//!
//! Each kind owns one pure behavior function selected through `BEHAVIORS`.
//! Behaviors only touch velocity/state (and clamp position at world bounds);
//! position integration happens uniformly afterwards in `Enemy::update`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// Spiker cycle length (seconds)
pub const SPIKER_PERIOD: f32 = 1.8;
/// Phase fraction above which a spiker is dangerous
pub const SPIKER_DANGER_FRACTION: f32 = 0.62;
/// Jumper launch speed (upward)
pub const JUMPER_IMPULSE: f32 = 680.0;
/// Jumper private gravity
pub const JUMPER_GRAVITY: f32 = 1800.0;
pub const FLYER_AMPLITUDE: f32 = 70.0;
pub const FLYER_FREQUENCY: f32 = 2.3;
pub const FLYER_MAX_VX: f32 = 150.0;

/// Spiker state values
pub const SPIKER_SAFE: u8 = 0;
pub const SPIKER_DANGER: u8 = 1;
/// Jumper state values
pub const JUMPER_READY: u8 = 0;
pub const JUMPER_RISING: u8 = 1;

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Walker = 0,
    Flyer = 1,
    Jumper = 2,
    Spiker = 3,
    Giant = 4,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 5] = [
        EnemyKind::Walker,
        EnemyKind::Flyer,
        EnemyKind::Jumper,
        EnemyKind::Spiker,
        EnemyKind::Giant,
    ];

    /// Hitbox (w, h)
    pub fn size(self) -> (i32, i32) {
        match self {
            Self::Walker => (42, 34),
            Self::Flyer => (46, 30),
            Self::Jumper => (40, 36),
            Self::Spiker => (46, 40),
            Self::Giant => (130, 90),
        }
    }

    /// Horizontal speed at spawn
    pub fn initial_vx(self) -> f32 {
        match self {
            Self::Walker => 70.0,
            Self::Flyer => 110.0,
            Self::Giant => 40.0,
            Self::Jumper | Self::Spiker => 0.0,
        }
    }

    /// Whether the kind can ever be stomped
    pub fn stompable(self) -> bool {
        !matches!(self, Self::Giant)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Walker => "walker",
            Self::Flyer => "flyer",
            Self::Jumper => "jumper",
            Self::Spiker => "spiker",
            Self::Giant => "giant",
        }
    }

    /// Behavior function for this kind
    #[inline]
    pub fn behavior(self) -> Behavior {
        BEHAVIORS[self as usize]
    }
}

/// Per-kind update: `(enemy, dt, (left_x, right_x))`
pub type Behavior = fn(&mut Enemy, f32, (i32, i32));

/// Indexed by `EnemyKind as usize`
const BEHAVIORS: [Behavior; 5] = [walker, flyer, jumper, spiker, giant];

/// An enemy entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    /// Authoritative position (top-left)
    pub pos: Vec2,
    pub w: i32,
    pub h: i32,
    pub vel: Vec2,
    pub alive: bool,
    pub can_stomp: bool,
    /// Seconds since spawn
    pub age: f32,
    /// Kind-specific state (spiker danger, jumper rising)
    pub state: u8,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, x: i32, y: i32) -> Self {
        let (w, h) = kind.size();
        Self {
            id,
            kind,
            pos: Vec2::new(x as f32, y as f32),
            w,
            h,
            vel: Vec2::new(kind.initial_vx(), 0.0),
            alive: true,
            can_stomp: kind.stompable(),
            age: 0.0,
            state: 0,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, self.w, self.h)
    }

    /// Stompable right now (spikers in danger state never are)
    pub fn is_stompable(&self) -> bool {
        self.can_stomp && !(self.kind == EnemyKind::Spiker && self.state == SPIKER_DANGER)
    }

    /// Advance age, run the kind behavior, then integrate position
    pub fn update(&mut self, dt: f32, bounds: (i32, i32)) {
        if !self.alive {
            return;
        }
        self.age += dt;
        (self.kind.behavior())(self, dt, bounds);
        self.pos += self.vel * dt;
    }

    /// Send velocity back inward when the rect pokes outside the world.
    /// Returns true if a bound was crossed.
    fn reflect_at_bounds(&mut self, (left_x, right_x): (i32, i32)) -> bool {
        let r = self.rect();
        if r.left() < left_x {
            self.vel.x = self.vel.x.abs();
            true
        } else if r.right() > right_x {
            self.vel.x = -self.vel.x.abs();
            true
        } else {
            false
        }
    }

    fn clamp_inside(&mut self, (left_x, right_x): (i32, i32)) {
        let max_x = (right_x - self.w).max(left_x) as f32;
        self.pos.x = self.pos.x.clamp(left_x as f32, max_x);
    }
}

fn walker(e: &mut Enemy, _dt: f32, bounds: (i32, i32)) {
    if e.reflect_at_bounds(bounds) {
        e.clamp_inside(bounds);
    }
}

fn flyer(e: &mut Enemy, _dt: f32, bounds: (i32, i32)) {
    e.vel.y = FLYER_AMPLITUDE * (e.age * FLYER_FREQUENCY).sin();
    e.reflect_at_bounds(bounds);
    e.vel.x = e.vel.x.clamp(-FLYER_MAX_VX, FLYER_MAX_VX);
}

/// Jumps on each whole-second boundary of `age` while ready. Ready again
/// once past the apex; there is no ground check.
fn jumper(e: &mut Enemy, dt: f32, _bounds: (i32, i32)) {
    let crossed_second = e.age.floor() > (e.age - dt).floor();
    if e.state == JUMPER_READY && crossed_second {
        e.state = JUMPER_RISING;
        e.vel.y = -JUMPER_IMPULSE;
    }
    e.vel.y += JUMPER_GRAVITY * dt;
    if e.state == JUMPER_RISING && e.vel.y >= 0.0 {
        e.state = JUMPER_READY;
    }
}

fn spiker(e: &mut Enemy, _dt: f32, _bounds: (i32, i32)) {
    let phase = (e.age % SPIKER_PERIOD) / SPIKER_PERIOD;
    e.state = if phase > SPIKER_DANGER_FRACTION {
        SPIKER_DANGER
    } else {
        SPIKER_SAFE
    };
}

fn giant(e: &mut Enemy, dt: f32, bounds: (i32, i32)) {
    walker(e, dt, bounds);
}

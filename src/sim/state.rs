//! Run state and core simulation types
//!
//! Everything needed to resume a run bit-for-bit lives here and is
//! serialisable, including both random generators.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::{HitStop, ParticleSystem, ScreenShake};
use super::enemy::Enemy;
use super::hazard::{Camera, Water};
use super::player::Player;
use super::rect::Rect;
use super::spawn::Spawner;
use crate::audio::{Cue, LoopCue};
use crate::character::Traits;
use crate::consts::*;
use crate::settings::Settings;
use crate::theme::Theme;

/// Spawn cycles run when a run is created
pub const INITIAL_SPAWN_CYCLES: usize = 24;
/// Stream offset for the cosmetic generator
const FX_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

/// A static platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub rect: Rect,
}

/// Item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Speed,
    Jump,
    Phase,
    Invuln,
    Hp,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Speed => "speed",
            ItemKind::Jump => "jump",
            ItemKind::Phase => "phase",
            ItemKind::Invuln => "invuln",
            ItemKind::Hp => "hp",
        }
    }
}

/// A collectible buff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub kind: ItemKind,
    pub rect: Rect,
    pub taken: bool,
}

/// Feedback requests raised during a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Cue(Cue),
    LoopStart(LoopCue),
    LoopStop(LoopCue),
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    #[serde(rename = "submerged")]
    Submerged,
    #[serde(rename = "health depleted")]
    HealthDepleted,
    #[serde(rename = "fell")]
    Fell,
}

impl TerminationReason {
    pub fn as_str(self) -> &'static str {
        match self {
            TerminationReason::Submerged => "submerged",
            TerminationReason::HealthDepleted => "health depleted",
            TerminationReason::Fell => "fell",
        }
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal event of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub floor: u32,
    pub reason: TerminationReason,
    pub prompt: String,
}

/// Complete run state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Run seed (from the theme)
    pub seed: u64,
    /// Prompt the theme was built from
    pub prompt: String,
    /// Level generator: every stochastic gameplay draw goes through here
    pub rng: Pcg32,
    /// Cosmetic generator (shake offsets, particles)
    pub fx_rng: Pcg32,
    pub settings: Settings,
    /// Gravity after the character multiplier
    pub gravity: f32,
    /// Accent palette index for particle bursts
    pub accent: u8,

    /// Simulated (non-frozen) frames
    pub time_ticks: u64,
    /// Every update call, frozen or not
    pub frame_count: u64,

    pub player: Player,
    pub was_grounded: bool,
    /// Charge loop currently requested
    pub charge_loop: bool,
    /// Active platforms (spawn order, ascending id)
    pub platforms: Vec<Platform>,
    /// Active items (spawn order, ascending id)
    pub items: Vec<Item>,
    /// Active enemies (spawn order, ascending id)
    pub enemies: Vec<Enemy>,

    pub camera: Camera,
    pub water: Water,
    pub spawner: Spawner,

    /// y the run started at
    pub start_y: f32,
    /// Highest point reached (smallest y)
    pub min_y: f32,
    /// Floor depth, never decreases
    pub floor: u32,
    pub zone_index: usize,
    /// Seconds left on the zone name popup
    pub zone_popup: f32,

    pub shake: ScreenShake,
    pub hitstop: HitStop,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: ParticleSystem,
    /// Feedback raised since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,

    /// Reason recorded during collision resolution
    pub pending_reason: Option<TerminationReason>,
    /// Set once the run has ended
    pub outcome: Option<RunOutcome>,

    next_id: u32,
}

impl RunState {
    /// Create a run for a theme and character
    pub fn new(theme: &Theme, traits: &Traits, settings: &Settings) -> Self {
        Self::with_seed(theme.seed, &theme.prompt, theme.accent, traits, settings)
    }

    /// Create a run from a raw seed
    pub fn with_seed(seed: u64, prompt: &str, accent: u8, traits: &Traits, settings: &Settings) -> Self {
        let settings = settings.clone().sanitized();
        let start_y = START_Y;
        let player = Player::new(Vec2::new((WIDTH / 2 - 16) as f32, start_y), traits);
        let ground_y = start_y as i32 + 90;

        let mut state = Self {
            seed,
            prompt: prompt.to_string(),
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::seed_from_u64(seed ^ FX_STREAM),
            gravity: GRAVITY * traits.gravity_mult,
            accent,
            time_ticks: 0,
            frame_count: 0,
            camera: Camera::following(player.pos.y, settings.scroll_start_player_screen_y),
            water: Water::new(start_y + settings.water_start_offset),
            spawner: Spawner::new(ground_y as f32),
            player,
            was_grounded: false,
            charge_loop: false,
            platforms: Vec::new(),
            items: Vec::new(),
            enemies: Vec::new(),
            start_y,
            min_y: start_y,
            floor: 0,
            zone_index: 0,
            zone_popup: 0.0,
            shake: ScreenShake::default(),
            hitstop: HitStop::default(),
            particles: ParticleSystem::default(),
            events: Vec::new(),
            pending_reason: None,
            outcome: None,
            settings,
            next_id: 1,
        };

        let ground = Platform {
            id: state.next_entity_id(),
            rect: Rect::new(40, ground_y, WIDTH - 80, 26),
        };
        state.platforms.push(ground);

        for _ in 0..INITIAL_SPAWN_CYCLES {
            state.spawn_cycle();
        }

        log::info!(
            "Run started: seed={} prompt={:?} platforms={} items={} enemies={}",
            seed,
            state.prompt,
            state.platforms.len(),
            state.items.len(),
            state.enemies.len()
        );
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Run one spawner cycle and adopt what it produced
    pub fn spawn_cycle(&mut self) {
        let batch = self.spawner.spawn_next(&mut self.rng, self.floor, &mut self.next_id);
        self.platforms.push(batch.platform);
        self.items.extend(batch.item);
        self.enemies.extend(batch.enemy);
    }

    /// Spawn until the frontier is far enough above the camera
    pub fn top_up_spawns(&mut self) {
        while self.spawner.needs_more(&self.camera) {
            self.spawn_cycle();
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn cue(&mut self, cue: Cue) {
        self.events.push(GameEvent::Cue(cue));
    }

    /// Take the feedback raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Render offset for the current shake
    pub fn shake_offset(&mut self) -> Vec2 {
        self.shake.offset(&mut self.fx_rng)
    }
}

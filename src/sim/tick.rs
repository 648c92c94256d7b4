//! Fixed timestep simulation tick
//!
//! One call advances a run by exactly one frame. Ambient effects keep moving
//! during hit-stop; everything else is frozen.

use serde::{Deserialize, Serialize};

use super::collision::{self, Contact, STOMP_HITSTOP_FRAMES};
use super::hazard::{floor_for_height, zone_for_floor};
use super::state::{GameEvent, RunOutcome, RunState, TerminationReason};
use crate::audio::{Cue, LoopCue};
use crate::consts::*;

/// Charge above which the charge loop plays
const CHARGE_LOOP_THRESHOLD: f32 = 0.02;
const STOMP_PARTICLES: usize = 18;
const STOMP_PARTICLE_SPEED: f32 = 560.0;
const PICKUP_PARTICLES: usize = 10;
const PICKUP_PARTICLE_SPEED: f32 = 420.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Jump button is held
    pub jump_down: bool,
    /// Jump went down this frame
    pub jump_pressed: bool,
    /// Jump went up this frame
    pub jump_released: bool,
    /// Menu confirm (consumed by the host's scene flow)
    pub confirm: bool,
    /// Menu back (consumed by the host's scene flow)
    pub back: bool,
    /// Idle/demo mode - autopilot plays the run
    pub idle_mode: bool,
}

/// Advance the run by one fixed timestep.
///
/// Returns the terminal event once the run has ended, and keeps returning it
/// on every later call.
pub fn tick(state: &mut RunState, input: &TickInput, dt: f32) -> Option<RunOutcome> {
    if let Some(outcome) = &state.outcome {
        return Some(outcome.clone());
    }

    state.frame_count += 1;
    state.shake.update(dt);
    state.particles.update(dt);
    state.zone_popup = (state.zone_popup - dt).max(0.0);

    if state.hitstop.consume_frame() {
        return None;
    }

    let input = if input.idle_mode {
        autopilot(state)
    } else {
        *input
    };

    state.time_ticks += 1;

    // --- Player controls ---
    state.player.update_timers(dt);
    state.player.update_horizontal(dt, input.left, input.right);
    if state
        .player
        .update_jump_charge(dt, input.jump_down, input.jump_released)
    {
        state.cue(Cue::Jump);
        state.shake.kick(2.0, 0.07);
    }

    // --- Integration ---
    let prev_bottom = state.player.bottom();
    let phased = state.player.is_phased();
    {
        let player = &mut state.player;
        player.vel.y += state.gravity * dt;
        player.pos += player.vel * dt;
        player.grounded = false;

        if phased {
            if player.pos.x + (PLAYER_W as f32) < 0.0 {
                player.pos.x = WIDTH as f32;
            } else if player.pos.x > WIDTH as f32 {
                player.pos.x = -(PLAYER_W as f32);
            }
        } else {
            player.pos.x = player.pos.x.clamp(0.0, (WIDTH - PLAYER_W) as f32);
        }
    }

    // --- Collisions ---
    if !phased {
        collision::resolve_platforms(&mut state.player, prev_bottom, &state.platforms);

        match collision::resolve_enemies(&mut state.player, prev_bottom, &mut state.enemies) {
            Contact::Stomp { at, .. } => {
                state.hitstop.trigger(STOMP_HITSTOP_FRAMES);
                state.shake.kick(9.0, 0.16);
                state.particles.burst(
                    &mut state.fx_rng,
                    at,
                    state.accent,
                    STOMP_PARTICLES,
                    STOMP_PARTICLE_SPEED,
                );
                state.cue(Cue::Stomp);
            }
            Contact::Hit { depleted, .. } => {
                state.cue(Cue::Hit);
                if depleted {
                    state.pending_reason = Some(TerminationReason::HealthDepleted);
                }
            }
            Contact::Absorbed | Contact::None => {}
        }
    }
    if !state.was_grounded && state.player.grounded {
        state.cue(Cue::Land);
    }
    state.was_grounded = state.player.grounded;
    // Walking off an edge mid-charge must not carry the charge into the air
    if !state.player.grounded {
        state.player.charge = 0.0;
    }
    update_charge_loop(state, input.jump_down);

    // --- Items ---
    for (_, at) in collision::pickup_items(&mut state.player, &mut state.items) {
        state.cue(Cue::Pickup);
        state.particles.burst(
            &mut state.fx_rng,
            at,
            state.accent,
            PICKUP_PARTICLES,
            PICKUP_PARTICLE_SPEED,
        );
    }
    state.items.retain(|i| !i.taken);

    // --- Spawning ---
    state.top_up_spawns();

    // --- Progress ---
    state.min_y = state.min_y.min(state.player.pos.y);
    let reached = floor_for_height(state.start_y, state.min_y, state.settings.floor_height_px);
    state.floor = state.floor.max(reached);

    let zone = zone_for_floor(state.floor, state.settings.zone_floor_step);
    if zone.index != state.zone_index {
        state.zone_index = zone.index;
        state.zone_popup = state.settings.zone_popup_seconds;
        state.cue(Cue::ZoneChange);
        log::info!("Entered zone {} at floor {}", zone.name, state.floor);
    }

    // --- Hazard and camera ---
    state.water.advance(dt, state.floor, &state.settings);
    if state
        .water
        .check_warning(state.player.bottom(), state.time_ticks)
    {
        state.cue(Cue::WaterWarn);
    }
    state
        .camera
        .track(state.player.pos.y, state.settings.scroll_start_player_screen_y);

    // --- Enemies and pruning ---
    for enemy in state.enemies.iter_mut() {
        enemy.update(dt, (0, WIDTH));
    }
    let platform_cutoff = state.camera.platform_cutoff();
    let enemy_cutoff = state.camera.enemy_cutoff();
    state
        .platforms
        .retain(|p| p.rect.top() as f32 <= platform_cutoff);
    state.items.retain(|i| i.rect.top() as f32 <= platform_cutoff);
    // Live enemies this far below are already unreachable (the fall margin ends the run first)
    state.enemies.retain(|e| e.pos.y <= enemy_cutoff);

    // --- Termination ---
    let reason = if state.water.submerges(state.player.bottom()) {
        Some(TerminationReason::Submerged)
    } else if state.pending_reason.is_some() || state.player.hp <= 0 {
        Some(
            state
                .pending_reason
                .unwrap_or(TerminationReason::HealthDepleted),
        )
    } else if state
        .camera
        .has_fallen_out(state.player.pos.y, state.settings.fall_below_screen_px)
    {
        Some(TerminationReason::Fell)
    } else {
        None
    };

    reason.map(|reason| finish(state, reason))
}

/// Start or stop the charge loop on transitions only
fn update_charge_loop(state: &mut RunState, jump_down: bool) {
    let charging =
        state.player.grounded && jump_down && state.player.charge > CHARGE_LOOP_THRESHOLD;
    if charging != state.charge_loop {
        state.charge_loop = charging;
        state.emit(if charging {
            GameEvent::LoopStart(LoopCue::Charge)
        } else {
            GameEvent::LoopStop(LoopCue::Charge)
        });
    }
}

fn finish(state: &mut RunState, reason: TerminationReason) -> RunOutcome {
    if state.charge_loop {
        state.charge_loop = false;
        state.emit(GameEvent::LoopStop(LoopCue::Charge));
    }
    state.cue(Cue::GameOver);

    let outcome = RunOutcome {
        floor: state.floor,
        reason,
        prompt: state.prompt.clone(),
    };
    log::info!(
        "Run over: {} at floor {} after {} ticks (seed {})",
        reason,
        outcome.floor,
        state.time_ticks,
        state.seed
    );
    state.outcome = Some(outcome.clone());
    outcome
}

/// Deterministic demo controller.
///
/// Picks the nearest platform above within jump reach, steers toward its
/// centre and charges just enough to clear it.
pub fn autopilot(state: &RunState) -> TickInput {
    let player = &state.player;
    let bottom = player.bottom();
    let center_x = player.rect().center_x();

    // Highest rise with a full charge
    let full = player.launch_speed(1.0);
    let reach = full * full / (2.0 * state.gravity.max(1.0));

    let target = state
        .platforms
        .iter()
        .filter(|p| {
            let top = p.rect.top() as f32;
            top < bottom - 4.0 && bottom - top < reach - 10.0
        })
        .max_by_key(|p| p.rect.top());

    let mut input = TickInput::default();

    let Some(target) = target else {
        // Nothing in reach: full jumps in place
        input.jump_down = player.grounded && player.charge < 1.0;
        input.jump_pressed = input.jump_down && player.charge == 0.0;
        input.jump_released = player.grounded && player.charge >= 1.0;
        return input;
    };

    let dx = target.rect.center_x() - center_x;
    input.right = dx > 8;
    input.left = dx < -8;

    if player.grounded {
        let rise = bottom - target.rect.top() as f32 + 30.0;
        let needed = (2.0 * state.gravity * rise).sqrt() / player.jump_mult().max(0.01);
        let desired = ((needed - JUMP_MIN_VY) / (JUMP_MAX_VY - JUMP_MIN_VY)).clamp(0.0, 1.0);
        if player.charge >= desired {
            input.jump_released = true;
        } else {
            input.jump_down = true;
            input.jump_pressed = player.charge == 0.0;
        }
    }

    input
}

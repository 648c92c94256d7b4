//! Collision resolution between the player and the world
//!
//! All checks compare the player's previous-frame bottom edge against the
//! current one, so a fast fall can never skip over a thin platform or land
//! a stomp from the side.

use glam::Vec2;

use super::enemy::Enemy;
use super::player::Player;
use super::state::{Item, ItemKind, Platform};
use crate::consts::{MAX_HP_CAP, PLAYER_H};

/// Current bottom may sit this far above a platform top and still land
pub const LANDING_TOLERANCE: f32 = 1.0;
/// Previous bottom may sit this far below an enemy top and still stomp
pub const STOMP_TOLERANCE: f32 = 6.0;
/// Minimum downward speed for a stomp
pub const STOMP_MIN_FALL_SPEED: f32 = 50.0;
/// Upward bounce after a stomp, before the jump multiplier
pub const STOMP_BOUNCE_VY: f32 = 540.0;
pub const KNOCKBACK_VX: f32 = 320.0;
pub const KNOCKBACK_VY: f32 = 420.0;
pub const STOMP_HITSTOP_FRAMES: u32 = 4;

/// Item durations (seconds)
pub const SPEED_BOOST_SECONDS: f32 = 6.0;
pub const JUMP_BOOST_SECONDS: f32 = 6.0;
pub const PHASE_SECONDS: f32 = 4.0;
pub const INVULN_ITEM_SECONDS: f32 = 4.0;

/// Result of the enemy pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// No living enemy overlaps the player
    None,
    /// Enemy killed from above
    Stomp { enemy_id: u32, at: Vec2 },
    /// Damage landed. `depleted` when it took the last HP.
    Hit { enemy_id: u32, depleted: bool },
    /// Overlap while invulnerable
    Absorbed,
}

/// Swept landing test against every platform.
///
/// Lands on the highest platform crossed this frame. Returns true on landing.
pub fn resolve_platforms(player: &mut Player, prev_bottom: f32, platforms: &[Platform]) -> bool {
    if player.vel.y < 0.0 {
        return false;
    }

    let rect = player.rect();
    let bottom = player.bottom();

    let landing_top = platforms
        .iter()
        .filter(|p| rect.overlaps_x(&p.rect))
        .map(|p| p.rect.top() as f32)
        .filter(|&top| prev_bottom <= top && bottom >= top - LANDING_TOLERANCE)
        .min_by(|a, b| a.total_cmp(b));

    match landing_top {
        Some(top) => {
            player.pos.y = top - PLAYER_H as f32;
            player.vel.y = 0.0;
            player.grounded = true;
            true
        }
        None => false,
    }
}

/// Resolve the first living enemy overlapping the player
pub fn resolve_enemies(player: &mut Player, prev_bottom: f32, enemies: &mut [Enemy]) -> Contact {
    let rect = player.rect();

    let Some(enemy) = enemies
        .iter_mut()
        .find(|e| e.alive && rect.overlaps(&e.rect()))
    else {
        return Contact::None;
    };

    let enemy_rect = enemy.rect();
    let from_above = prev_bottom <= enemy_rect.top() as f32 + STOMP_TOLERANCE;

    if player.vel.y > STOMP_MIN_FALL_SPEED && from_above && enemy.is_stompable() {
        enemy.alive = false;
        player.vel.y = -STOMP_BOUNCE_VY * player.jump_mult();
        return Contact::Stomp {
            enemy_id: enemy.id,
            at: enemy_rect.center(),
        };
    }

    if !player.apply_damage(1) {
        return Contact::Absorbed;
    }

    if player.hp <= 0 {
        return Contact::Hit {
            enemy_id: enemy.id,
            depleted: true,
        };
    }

    let away = if rect.center_x() < enemy_rect.center_x() {
        -1.0
    } else {
        1.0
    };
    player.vel.x = away * KNOCKBACK_VX;
    player.vel.y = -KNOCKBACK_VY;
    player.grounded = false;

    Contact::Hit {
        enemy_id: enemy.id,
        depleted: false,
    }
}

/// Apply an item's effect to the player
pub fn apply_item(player: &mut Player, kind: ItemKind) {
    match kind {
        ItemKind::Speed => player.speed_boost = player.speed_boost.max(SPEED_BOOST_SECONDS),
        ItemKind::Jump => player.jump_boost = player.jump_boost.max(JUMP_BOOST_SECONDS),
        ItemKind::Phase => player.phase = player.phase.max(PHASE_SECONDS),
        ItemKind::Invuln => player.invuln_item = player.invuln_item.max(INVULN_ITEM_SECONDS),
        ItemKind::Hp => player.heal_max_hp(1, MAX_HP_CAP),
    }
}

/// Take every untaken item overlapping the player.
///
/// Returns what was collected and where, for feedback.
pub fn pickup_items(player: &mut Player, items: &mut [Item]) -> Vec<(ItemKind, Vec2)> {
    let rect = player.rect();
    let mut collected = Vec::new();
    for item in items.iter_mut().filter(|i| !i.taken) {
        if rect.overlaps(&item.rect) {
            item.taken = true;
            apply_item(player, item.kind);
            collected.push((item.kind, item.rect.center()));
        }
    }
    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Traits;
    use crate::sim::enemy::{EnemyKind, SPIKER_DANGER};
    use crate::sim::rect::Rect;

    fn player_at(x: f32, y: f32, vy: f32) -> Player {
        let mut p = Player::new(Vec2::new(x, y), &Traits::default());
        p.vel.y = vy;
        p
    }

    fn platform(x: i32, y: i32, w: i32) -> Platform {
        Platform {
            id: 1,
            rect: Rect::new(x, y, w, 22),
        }
    }

    #[test]
    fn test_lands_when_crossing_top() {
        let mut p = player_at(100.0, 258.0, 200.0);
        let prev_bottom = 298.0;
        assert!(resolve_platforms(&mut p, prev_bottom, &[platform(80, 300, 150)]));
        assert_eq!(p.pos.y, 300.0 - PLAYER_H as f32);
        assert_eq!(p.vel.y, 0.0);
        assert!(p.grounded);
    }

    #[test]
    fn test_fast_fall_cannot_tunnel() {
        // One frame moved the bottom from 280 to 360, past the whole platform
        let mut p = player_at(100.0, 316.0, 3000.0);
        assert!(resolve_platforms(&mut p, 280.0, &[platform(80, 300, 150)]));
        assert_eq!(p.pos.y, 256.0);
    }

    #[test]
    fn test_lands_on_highest_crossed_platform() {
        let mut p = player_at(100.0, 400.0, 3000.0);
        let platforms = [platform(80, 380, 150), platform(80, 320, 150)];
        assert!(resolve_platforms(&mut p, 300.0, &platforms));
        assert_eq!(p.pos.y, 320.0 - PLAYER_H as f32);
    }

    #[test]
    fn test_no_landing_from_below_or_rising() {
        // Previous bottom already under the top
        let mut p = player_at(100.0, 270.0, 200.0);
        assert!(!resolve_platforms(&mut p, 310.0, &[platform(80, 300, 150)]));
        assert!(!p.grounded);

        // Moving up
        let mut p = player_at(100.0, 258.0, -10.0);
        assert!(!resolve_platforms(&mut p, 290.0, &[platform(80, 300, 150)]));
    }

    #[test]
    fn test_no_landing_without_horizontal_overlap() {
        let mut p = player_at(400.0, 258.0, 200.0);
        assert!(!resolve_platforms(&mut p, 290.0, &[platform(80, 300, 150)]));
    }

    #[test]
    fn test_stomp_from_above_keeps_hp() {
        let mut enemies = vec![Enemy::new(7, EnemyKind::Walker, 100, 200)];
        let mut p = player_at(100.0, 161.0, 300.0);
        p.hp = 1;
        let contact = resolve_enemies(&mut p, 198.0, &mut enemies);
        assert!(matches!(contact, Contact::Stomp { enemy_id: 7, .. }));
        assert!(!enemies[0].alive);
        assert_eq!(p.hp, 1);
        assert!(p.vel.y < 0.0);
        assert!((p.vel.y + STOMP_BOUNCE_VY).abs() < 1e-3);
    }

    #[test]
    fn test_side_contact_while_rising_depletes_last_hp() {
        let mut enemies = vec![Enemy::new(3, EnemyKind::Walker, 100, 200)];
        let mut p = player_at(70.0, 190.0, -200.0);
        p.hp = 1;
        let contact = resolve_enemies(&mut p, 237.0, &mut enemies);
        assert_eq!(
            contact,
            Contact::Hit {
                enemy_id: 3,
                depleted: true
            }
        );
        assert_eq!(p.hp, 0);
        assert!(enemies[0].alive);
    }

    #[test]
    fn test_knockback_away_from_enemy() {
        let mut enemies = vec![Enemy::new(1, EnemyKind::Walker, 100, 200)];
        // Player to the right of the enemy centre
        let mut p = player_at(130.0, 190.0, 0.0);
        let contact = resolve_enemies(&mut p, 234.0, &mut enemies);
        assert!(matches!(contact, Contact::Hit { depleted: false, .. }));
        assert_eq!(p.hp, 2);
        assert_eq!(p.vel.x, KNOCKBACK_VX);
        assert_eq!(p.vel.y, -KNOCKBACK_VY);

        // Grace period absorbs the next contact
        assert_eq!(resolve_enemies(&mut p, 234.0, &mut enemies), Contact::Absorbed);
        assert_eq!(p.hp, 2);
    }

    #[test]
    fn test_spiker_in_danger_cannot_be_stomped() {
        let mut spiker = Enemy::new(2, EnemyKind::Spiker, 100, 200);
        spiker.state = SPIKER_DANGER;
        let mut enemies = vec![spiker];
        let mut p = player_at(100.0, 161.0, 300.0);
        let contact = resolve_enemies(&mut p, 198.0, &mut enemies);
        assert!(matches!(contact, Contact::Hit { .. }));
        assert!(enemies[0].alive);
    }

    #[test]
    fn test_giant_is_never_stomped() {
        let mut enemies = vec![Enemy::new(2, EnemyKind::Giant, 100, 200)];
        let mut p = player_at(120.0, 161.0, 400.0);
        assert!(matches!(
            resolve_enemies(&mut p, 198.0, &mut enemies),
            Contact::Hit { .. }
        ));
    }

    #[test]
    fn test_slow_fall_is_not_a_stomp() {
        let mut enemies = vec![Enemy::new(1, EnemyKind::Walker, 100, 200)];
        let mut p = player_at(100.0, 161.0, 40.0);
        assert!(matches!(
            resolve_enemies(&mut p, 198.0, &mut enemies),
            Contact::Hit { .. }
        ));
    }

    #[test]
    fn test_dead_enemies_are_ignored() {
        let mut dead = Enemy::new(1, EnemyKind::Walker, 100, 200);
        dead.alive = false;
        let mut enemies = vec![dead];
        let mut p = player_at(100.0, 190.0, 0.0);
        assert_eq!(resolve_enemies(&mut p, 234.0, &mut enemies), Contact::None);
        assert_eq!(p.hp, 3);
    }

    #[test]
    fn test_pickup_applies_effects_once() {
        let mut items = vec![
            Item {
                id: 1,
                kind: ItemKind::Speed,
                rect: Rect::new(105, 110, 24, 24),
                taken: false,
            },
            Item {
                id: 2,
                kind: ItemKind::Hp,
                rect: Rect::new(110, 120, 24, 24),
                taken: false,
            },
            Item {
                id: 3,
                kind: ItemKind::Phase,
                rect: Rect::new(600, 120, 24, 24),
                taken: false,
            },
        ];
        let mut p = player_at(100.0, 100.0, 0.0);
        let got = pickup_items(&mut p, &mut items);
        assert_eq!(got.len(), 2);
        assert_eq!(p.speed_boost, SPEED_BOOST_SECONDS);
        assert_eq!((p.hp, p.max_hp), (4, 4));
        assert_eq!(p.phase, 0.0);
        assert!(items[0].taken && items[1].taken && !items[2].taken);

        assert!(pickup_items(&mut p, &mut items).is_empty());
        assert_eq!(p.max_hp, 4);
    }

    #[test]
    fn test_item_timers_do_not_shorten() {
        let mut p = player_at(0.0, 0.0, 0.0);
        p.invuln_item = 9.0;
        apply_item(&mut p, ItemKind::Invuln);
        assert_eq!(p.invuln_item, 9.0);
        apply_item(&mut p, ItemKind::Jump);
        assert_eq!(p.jump_boost, JUMP_BOOST_SECONDS);
    }
}

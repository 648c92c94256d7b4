//! Edge-detected input
//!
//! The host samples its devices once per frame into a `RawInput`; the tracker
//! remembers the previous jump state and derives press/release edges.

use serde::{Deserialize, Serialize};

use crate::sim::TickInput;

/// Raw button state sampled by the host (keyboard, gamepad, touch)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Confirm went down this frame
    pub confirm: bool,
    /// Back went down this frame
    pub back: bool,
}

/// Remembers last frame's jump button
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    prev_jump: bool,
    idle_mode: bool,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let the autopilot drive the run
    pub fn set_idle_mode(&mut self, idle: bool) {
        self.idle_mode = idle;
    }

    /// Forget held state, e.g. after the window loses focus
    pub fn reset(&mut self) {
        self.prev_jump = false;
    }

    /// Build this frame's tick input
    pub fn next(&mut self, raw: RawInput) -> TickInput {
        let input = TickInput {
            left: raw.left,
            right: raw.right,
            jump_down: raw.jump,
            jump_pressed: raw.jump && !self.prev_jump,
            jump_released: self.prev_jump && !raw.jump,
            confirm: raw.confirm,
            back: raw.back,
            idle_mode: self.idle_mode,
        };
        self.prev_jump = raw.jump;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jump(down: bool) -> RawInput {
        RawInput {
            jump: down,
            ..RawInput::default()
        }
    }

    #[test]
    fn test_press_and_release_edges() {
        let mut tracker = InputTracker::new();

        let first = tracker.next(jump(true));
        assert!(first.jump_down && first.jump_pressed && !first.jump_released);

        let held = tracker.next(jump(true));
        assert!(held.jump_down && !held.jump_pressed && !held.jump_released);

        let up = tracker.next(jump(false));
        assert!(!up.jump_down && !up.jump_pressed && up.jump_released);

        let idle = tracker.next(jump(false));
        assert_eq!(idle, TickInput::default());
    }

    #[test]
    fn test_reset_drops_release_edge() {
        let mut tracker = InputTracker::new();
        tracker.next(jump(true));
        tracker.reset();
        assert!(!tracker.next(jump(false)).jump_released);
    }

    #[test]
    fn test_directions_and_menu_pass_through() {
        let mut tracker = InputTracker::new();
        tracker.set_idle_mode(true);
        let input = tracker.next(RawInput {
            left: true,
            right: true,
            confirm: true,
            ..RawInput::default()
        });
        assert!(input.left && input.right && input.confirm && !input.back);
        assert!(input.idle_mode);
    }
}

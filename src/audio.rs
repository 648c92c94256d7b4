//! Feedback cue routing
//!
//! The simulation only names cues. `AudioMixer` applies per-cue cooldowns and
//! volume, then forwards to whatever `FeedbackSink` the host plugs in.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::GameEvent;

/// One-shot feedback cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// Jump launched
    Jump,
    /// Airborne -> grounded
    Land,
    /// Enemy stomped
    Stomp,
    /// Player took damage
    Hit,
    /// Item collected
    Pickup,
    /// Water is close
    WaterWarn,
    /// Entered a new zone
    ZoneChange,
    /// Run ended
    GameOver,
}

impl Cue {
    pub fn name(self) -> &'static str {
        match self {
            Cue::Jump => "jump",
            Cue::Land => "land",
            Cue::Stomp => "stomp",
            Cue::Hit => "hit",
            Cue::Pickup => "pickup",
            Cue::WaterWarn => "water_warn",
            Cue::ZoneChange => "zone_change",
            Cue::GameOver => "game_over",
        }
    }

    /// Minimum frames between two plays of the same cue
    pub fn cooldown_frames(self) -> u64 {
        match self {
            Cue::Jump => 4,
            Cue::Land => 3,
            Cue::Pickup => 3,
            Cue::Stomp => 4,
            Cue::Hit => 8,
            Cue::GameOver => 30,
            Cue::WaterWarn => 55,
            Cue::ZoneChange => 18,
        }
    }
}

/// Looping cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopCue {
    /// Held while charging a jump
    Charge,
}

impl LoopCue {
    pub fn name(self) -> &'static str {
        match self {
            LoopCue::Charge => "charge",
        }
    }
}

/// Where cues end up (a synth, a sample player, a test recorder)
pub trait FeedbackSink {
    fn play(&mut self, cue: Cue, volume: f32);
    fn start_loop(&mut self, cue: LoopCue, volume: f32);
    fn stop_loop(&mut self, cue: LoopCue);
}

/// Sink that only logs
#[derive(Debug, Default)]
pub struct LogSink;

impl FeedbackSink for LogSink {
    fn play(&mut self, cue: Cue, volume: f32) {
        log::debug!("cue {} (vol {:.2})", cue.name(), volume);
    }

    fn start_loop(&mut self, cue: LoopCue, volume: f32) {
        log::debug!("loop start {} (vol {:.2})", cue.name(), volume);
    }

    fn stop_loop(&mut self, cue: LoopCue) {
        log::debug!("loop stop {}", cue.name());
    }
}

/// Cooldown + volume front end for a sink
#[derive(Debug)]
pub struct AudioMixer<S: FeedbackSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    last_play_frame: HashMap<Cue, u64>,
    active_loops: Vec<LoopCue>,
}

impl<S: FeedbackSink> AudioMixer<S> {
    pub fn new(sink: S, settings: &Settings) -> Self {
        Self {
            sink,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
            last_play_frame: HashMap::new(),
            active_loops: Vec::new(),
        }
    }

    /// Mute/unmute all audio. Muting stops running loops.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            for cue in std::mem::take(&mut self.active_loops) {
                self.sink.stop_loop(cue);
            }
        }
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a cue unless muted or still cooling down
    pub fn play(&mut self, cue: Cue, frame: u64) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        if let Some(&last) = self.last_play_frame.get(&cue) {
            if frame.saturating_sub(last) < cue.cooldown_frames() {
                return;
            }
        }
        self.last_play_frame.insert(cue, frame);
        self.sink.play(cue, vol);
    }

    /// Start a loop if it is not already running
    pub fn start_loop(&mut self, cue: LoopCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 || self.active_loops.contains(&cue) {
            return;
        }
        self.active_loops.push(cue);
        self.sink.start_loop(cue, vol);
    }

    pub fn stop_loop(&mut self, cue: LoopCue) {
        if let Some(i) = self.active_loops.iter().position(|c| *c == cue) {
            self.active_loops.swap_remove(i);
            self.sink.stop_loop(cue);
        }
    }

    /// Route a frame's worth of simulation events
    pub fn dispatch(&mut self, events: impl IntoIterator<Item = GameEvent>, frame: u64) {
        for event in events {
            match event {
                GameEvent::Cue(cue) => self.play(cue, frame),
                GameEvent::LoopStart(cue) => self.start_loop(cue),
                GameEvent::LoopStop(cue) => self.stop_loop(cue),
            }
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        played: Vec<(Cue, f32)>,
        loops: Vec<(LoopCue, bool)>,
    }

    impl FeedbackSink for Recorder {
        fn play(&mut self, cue: Cue, volume: f32) {
            self.played.push((cue, volume));
        }
        fn start_loop(&mut self, cue: LoopCue, _volume: f32) {
            self.loops.push((cue, true));
        }
        fn stop_loop(&mut self, cue: LoopCue) {
            self.loops.push((cue, false));
        }
    }

    #[test]
    fn test_cooldown_suppresses_repeats() {
        let mut mixer = AudioMixer::new(Recorder::default(), &Settings::default());
        mixer.play(Cue::Hit, 100);
        mixer.play(Cue::Jump, 104);
        mixer.play(Cue::Hit, 104);
        mixer.play(Cue::Hit, 107);
        mixer.play(Cue::Hit, 108);
        let cues: Vec<Cue> = mixer.sink().played.iter().map(|(c, _)| *c).collect();
        assert_eq!(cues, vec![Cue::Hit, Cue::Jump, Cue::Hit]);
    }

    #[test]
    fn test_volume_and_mute() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            ..Settings::default()
        };
        let mut mixer = AudioMixer::new(Recorder::default(), &settings);
        mixer.play(Cue::Land, 0);
        assert_eq!(mixer.sink().played[0].1, 0.25);

        mixer.start_loop(LoopCue::Charge);
        mixer.set_muted(true);
        mixer.play(Cue::Land, 100);
        assert_eq!(mixer.sink().played.len(), 1);
        assert_eq!(
            mixer.sink().loops,
            vec![(LoopCue::Charge, true), (LoopCue::Charge, false)]
        );
    }

    #[test]
    fn test_dispatch_loops_are_idempotent() {
        let mut mixer = AudioMixer::new(Recorder::default(), &Settings::default());
        mixer.dispatch(
            [
                GameEvent::LoopStart(LoopCue::Charge),
                GameEvent::LoopStart(LoopCue::Charge),
                GameEvent::LoopStop(LoopCue::Charge),
                GameEvent::LoopStop(LoopCue::Charge),
                GameEvent::Cue(Cue::Jump),
            ],
            0,
        );
        assert_eq!(
            mixer.sink().loops,
            vec![(LoopCue::Charge, true), (LoopCue::Charge, false)]
        );
        assert_eq!(mixer.sink().played.len(), 1);
    }
}

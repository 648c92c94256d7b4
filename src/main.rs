//! Vertical Jump entry point
//!
//! Headless native runner: builds a run from a prompt, lets the autopilot
//! play it at the fixed timestep, records the result and prints the board.

#[cfg(not(target_arch = "wasm32"))]
use vertical_jump::{
    CharacterSpec, RunRecord, ScoreStore, Settings, Theme,
    audio::{AudioMixer, LogSink},
    consts::SIM_DT,
    platform::{InputTracker, RawInput},
    sim::{RunOutcome, RunState, tick},
};

/// Prompt used when none is given on the command line
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_PROMPT: &str = "sunken clockwork tower";
/// Ten minutes of simulated time
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u64 = 60 * 60 * 10;
#[cfg(not(target_arch = "wasm32"))]
const SAVE_DIR: &str = "save";

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let prompt = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let prompt = if prompt.trim().is_empty() {
        DEFAULT_PROMPT.to_string()
    } else {
        prompt
    };

    let settings = Settings::from_env();
    let theme = Theme::build(&prompt);
    let character = match std::env::var("GAME_CHARACTER_JSON") {
        Ok(json) => CharacterSpec::from_json_or_seed(&json, theme.seed),
        Err(_) => CharacterSpec::from_seed(theme.seed),
    };
    let traits = character.effective();
    log::info!("Vertical Jump (native) starting: prompt={:?} traits={:?}", prompt, traits);

    let mut state = RunState::new(&theme, &traits, &settings);
    let mut mixer = AudioMixer::new(LogSink, &settings);
    let mut input = InputTracker::new();
    input.set_idle_mode(true);

    let outcome = run(&mut state, &mut input, &mut mixer);

    let mut store = ScoreStore::open(SAVE_DIR);
    match &outcome {
        Some(outcome) => {
            println!(
                "Run over: floor {} ({}) - {}",
                outcome.floor, outcome.reason, outcome.prompt
            );
            if let Err(err) = store.record(RunRecord::from_outcome(outcome)) {
                log::error!("Failed to save run: {}", err);
            }
        }
        None => {
            log::warn!("Run still going after {} frames, not recorded", MAX_FRAMES);
            println!("Stopped at floor {} after {} frames", state.floor, MAX_FRAMES);
        }
    }

    println!("\nHigh score: floor {}", store.highscore());
    for (rank, record) in store.top(10).iter().enumerate() {
        println!(
            "{:>2}. floor {:>4}  {:<16} {}  {}",
            rank + 1,
            record.floor,
            record.reason,
            record.timestamp,
            record.prompt
        );
    }
}

/// Step the run until it ends or the frame cap is hit
#[cfg(not(target_arch = "wasm32"))]
fn run(
    state: &mut RunState,
    input: &mut InputTracker,
    mixer: &mut AudioMixer<LogSink>,
) -> Option<RunOutcome> {
    for _ in 0..MAX_FRAMES {
        let outcome = tick(state, &input.next(RawInput::default()), SIM_DT);
        mixer.dispatch(state.drain_events(), state.frame_count);
        if outcome.is_some() {
            return outcome;
        }
    }
    None
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive the simulation through the library
}

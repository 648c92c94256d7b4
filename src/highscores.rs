//! Run history and high score
//!
//! Persisted as two JSON files under a save directory, written atomically.
//! Keeps the most recent runs and the best floor ever reached.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::RunOutcome;

/// Maximum number of runs to keep
pub const MAX_RUNS: usize = 100;

const HIGHSCORE_FILE: &str = "highscore.json";
const RUNS_FILE: &str = "runs.json";

/// Errors that can occur while saving the store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    #[serde(default)]
    pub floor: u32,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub prompt: String,
    /// RFC 3339 UTC, second precision
    #[serde(default, alias = "ts")]
    pub timestamp: String,
}

impl RunRecord {
    /// Stamp a terminal event with the current time
    pub fn from_outcome(outcome: &RunOutcome) -> Self {
        Self::at(outcome, SystemTime::now())
    }

    pub fn at(outcome: &RunOutcome, when: SystemTime) -> Self {
        Self {
            floor: outcome.floor,
            reason: outcome.reason.as_str().to_string(),
            prompt: outcome.prompt.clone(),
            timestamp: humantime::format_rfc3339_seconds(when).to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HighscoreFile {
    #[serde(default)]
    highscore: u32,
}

/// Run history backed by a save directory
#[derive(Debug, Clone)]
pub struct ScoreStore {
    dir: PathBuf,
    highscore: u32,
    runs: Vec<RunRecord>,
}

impl ScoreStore {
    /// Load the store from `dir`. Missing or unreadable files start empty.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();

        let highscore = read_json::<HighscoreFile>(&dir.join(HIGHSCORE_FILE))
            .map(|f| f.highscore)
            .unwrap_or(0);

        // Skip individual malformed records rather than the whole file
        let runs: Vec<RunRecord> = read_json::<Vec<serde_json::Value>>(&dir.join(RUNS_FILE))
            .unwrap_or_default()
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect();

        log::info!(
            "Loaded score store from {} ({} runs, high score {})",
            dir.display(),
            runs.len(),
            highscore
        );

        Self {
            dir,
            highscore,
            runs,
        }
    }

    /// Best floor ever recorded
    pub fn highscore(&self) -> u32 {
        self.highscore
    }

    /// Stored runs, oldest first
    pub fn runs(&self) -> &[RunRecord] {
        &self.runs
    }

    /// Append a run, trim history, raise the high score and save
    pub fn record(&mut self, record: RunRecord) -> Result<(), StoreError> {
        if record.floor > self.highscore {
            log::info!("New high score: floor {}", record.floor);
            self.highscore = record.floor;
        }
        self.runs.push(record);
        if self.runs.len() > MAX_RUNS {
            let excess = self.runs.len() - MAX_RUNS;
            self.runs.drain(..excess);
        }
        self.save()
    }

    /// Best `n` runs by floor, newest first among equal floors
    pub fn top(&self, n: usize) -> Vec<RunRecord> {
        let mut sorted = self.runs.clone();
        sorted.sort_by(|a, b| {
            b.floor
                .cmp(&a.floor)
                .then_with(|| b.timestamp.cmp(&a.timestamp))
        });
        sorted.truncate(n);
        sorted
    }

    pub fn save(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        write_json_atomic(
            &self.dir.join(HIGHSCORE_FILE),
            &HighscoreFile {
                highscore: self.highscore,
            },
        )?;
        write_json_atomic(&self.dir.join(RUNS_FILE), &self.runs)?;
        Ok(())
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Option<T> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
        Err(err) => {
            log::warn!("Could not read {}: {}", path.display(), err);
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("Ignoring malformed {}: {}", path.display(), err);
            None
        }
    }
}

fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_string_pretty(value)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

//! Platform abstraction layer
//!
//! Turns raw device state into deterministic per-frame simulation input.

pub mod input;

pub use input::{InputTracker, RawInput};

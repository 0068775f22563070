// src/fleet/mod.rs
//! Simulated vehicle fleet

pub mod state;
pub mod vehicle;

pub use state::{Fleet, TickSummary, DEFAULT_TRAIL_CAPACITY};
pub use vehicle::{Position, SentenceSet, Vehicle};

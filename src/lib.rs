// src/lib.rs
//! NMEA Fleet Library
//!
//! Simulates a small fleet of moving vehicles and represents each vehicle's
//! position and status as NMEA 0183 sentences (GGA, ZDA, GSV).

pub mod config;
pub mod display;
pub mod error;
pub mod fleet;
pub mod nmea;
pub mod simulator;

// Re-export main types for convenience
pub use config::SimConfig;
pub use error::{FleetError, Result};
pub use fleet::{Fleet, Position, SentenceSet, Vehicle};
pub use simulator::{Clock, FleetSimulator, SystemClock};

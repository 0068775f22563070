// src/fleet/vehicle.rs
//! Vehicle data structures

use crate::nmea::{decode_gga, decode_zda, GgaRecord, Telemetry, ZdaRecord};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Signed decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// The most recently encoded sentences of a vehicle, replaced wholesale each tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentenceSet {
    pub gga: String,
    pub zda: String,
    pub gsv: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Vehicle {
    pub id: u32,
    pub name: String,
    pub position: Position,
    pub trail: VecDeque<Position>, // oldest first
    pub altitude: f64,             // meters
    pub satellite_count: u8,
    pub horizontal_dilution: f64,
    pub sentences: Option<SentenceSet>,
}

impl Vehicle {
    /// A freshly placed vehicle with zeroed sensors and no telemetry yet
    pub fn new(id: u32, position: Position) -> Self {
        Self {
            id,
            name: format!("Vehicle {}", id),
            position,
            trail: VecDeque::new(),
            altitude: 0.0,
            satellite_count: 0,
            horizontal_dilution: 0.0,
            sentences: None,
        }
    }

    /// Current values in the shape the encoder consumes
    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            latitude: self.position.latitude,
            longitude: self.position.longitude,
            altitude: self.altitude,
            satellites: self.satellite_count,
            hdop: self.horizontal_dilution,
        }
    }

    /// Record `previous` in the trail, dropping the oldest entries beyond `capacity`
    pub(crate) fn push_trail(&mut self, previous: Position, capacity: usize) {
        self.trail.push_back(previous);
        while self.trail.len() > capacity {
            self.trail.pop_front();
        }
    }

    pub fn latest_gga(&self) -> Option<GgaRecord> {
        self.sentences.as_ref().and_then(|s| decode_gga(&s.gga))
    }

    pub fn latest_zda(&self) -> Option<ZdaRecord> {
        self.sentences.as_ref().and_then(|s| decode_zda(&s.zda))
    }

    pub fn has_telemetry(&self) -> bool {
        self.sentences.is_some()
    }
}

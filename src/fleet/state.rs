// src/fleet/state.rs
//! Fleet state and the per-tick telemetry update

use super::vehicle::{Position, Vehicle};
use crate::error::{FleetError, Result};
use crate::nmea::encode_all;
use chrono::{DateTime, Utc};
use rand::Rng;

pub const DEFAULT_TRAIL_CAPACITY: usize = 10;

/// Maximum lat/lon drift per tick, in degrees
const MAX_OFFSET: f64 = 0.0025;

const ALTITUDE_RANGE: std::ops::RangeInclusive<f64> = 500.0..=600.0;
const SATELLITE_RANGE: std::ops::RangeInclusive<u8> = 7..=11;
const HDOP_RANGE: std::ops::RangeInclusive<f64> = 0.0..=2.0;

/// Outcome of one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub updated: usize,
    pub failed: usize,
}

/// All vehicles in the simulation
#[derive(Debug, Clone)]
pub struct Fleet {
    vehicles: Vec<Vehicle>,
    next_id: u32,
    trail_capacity: usize,
}

impl Fleet {
    pub fn new() -> Self {
        Self::with_trail_capacity(DEFAULT_TRAIL_CAPACITY)
    }

    /// Capacities above `DEFAULT_TRAIL_CAPACITY` are capped to it
    pub fn with_trail_capacity(trail_capacity: usize) -> Self {
        Self {
            vehicles: Vec::new(),
            next_id: 1,
            trail_capacity: trail_capacity.min(DEFAULT_TRAIL_CAPACITY),
        }
    }

    /// Add a vehicle at the given position and return its id.
    ///
    /// Ids start at 1 and are never handed out twice.
    pub fn place_vehicle(&mut self, latitude: f64, longitude: f64) -> Result<u32> {
        let position = Position::new(latitude, longitude);
        if !position.is_finite() {
            return Err(FleetError::InvalidTelemetry(format!(
                "cannot place vehicle at ({}, {})",
                latitude, longitude
            )));
        }

        let id = self.next_id;
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| FleetError::Other("vehicle ids exhausted".to_string()))?;

        self.vehicles.push(Vehicle::new(id, position));
        tracing::info!(id, latitude, longitude, "placed vehicle");
        Ok(id)
    }

    /// Advance every vehicle by one step and re-encode its sentences.
    ///
    /// Vehicles are independent; one that fails to encode keeps its previous
    /// sentence set and does not stop the others.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, now: DateTime<Utc>) -> TickSummary {
        let mut summary = TickSummary::default();

        for vehicle in &mut self.vehicles {
            advance(vehicle, rng, self.trail_capacity);

            match encode_all(&vehicle.telemetry(), now) {
                Ok(sentences) => {
                    vehicle.sentences = Some(sentences);
                    summary.updated += 1;
                }
                Err(e) => {
                    tracing::warn!(id = vehicle.id, error = %e, "failed to encode telemetry");
                    summary.failed += 1;
                }
            }
        }

        tracing::debug!(updated = summary.updated, failed = summary.failed, "fleet tick");
        summary
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, id: u32) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn trail_capacity(&self) -> usize {
        self.trail_capacity
    }
}

impl Default for Fleet {
    fn default() -> Self {
        Self::new()
    }
}

/// Random walk plus fresh synthetic sensor readings
fn advance<R: Rng + ?Sized>(vehicle: &mut Vehicle, rng: &mut R, trail_capacity: usize) {
    let previous = vehicle.position;

    vehicle.position = Position::new(
        previous.latitude + rng.random_range(-MAX_OFFSET..MAX_OFFSET),
        previous.longitude + rng.random_range(-MAX_OFFSET..MAX_OFFSET),
    );
    vehicle.altitude = rng.random_range(ALTITUDE_RANGE);
    vehicle.satellite_count = rng.random_range(SATELLITE_RANGE);
    vehicle.horizontal_dilution = (rng.random_range(HDOP_RANGE) * 10.0).round() / 10.0;

    vehicle.push_trail(previous, trail_capacity);
}

// src/config.rs
//! Simulation configuration stored as JSON

use crate::error::{FleetError, Result};
use crate::fleet::{Position, DEFAULT_TRAIL_CAPACITY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where the first vehicle is placed when nothing else is configured
pub const DEFAULT_START: Position = Position {
    latitude: 10.762622,
    longitude: 106.660172,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub tick_interval_ms: u64,
    pub trail_capacity: usize,
    pub vehicles: Vec<Position>, // initial placements, in id order
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 800,
            trail_capacity: DEFAULT_TRAIL_CAPACITY,
            vehicles: vec![DEFAULT_START],
        }
    }
}

impl SimConfig {
    /// Load configuration from the user config file, or defaults if there is none
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Save configuration to the user config file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| FleetError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| FleetError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| FleetError::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn get_config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .map_err(|_| FleetError::Config("HOME environment variable not set".to_string()))?;

        Ok(PathBuf::from(home).join(".config").join("nmea-fleet").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(FleetError::Config("tick_interval_ms must be positive".to_string()));
        }
        if !(1..=DEFAULT_TRAIL_CAPACITY).contains(&self.trail_capacity) {
            return Err(FleetError::Config(format!(
                "trail_capacity must be between 1 and {}, got {}",
                DEFAULT_TRAIL_CAPACITY, self.trail_capacity
            )));
        }
        if let Some(p) = self.vehicles.iter().find(|p| !p.is_finite()) {
            return Err(FleetError::Config(format!(
                "vehicle position ({}, {}) is not finite",
                p.latitude, p.longitude
            )));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

// src/display/mod.rs
//! Display modules consuming fleet snapshots

pub mod terminal;

use crate::fleet::Vehicle;

const NOT_AVAILABLE: &str = "N/A";

/// One line of the fleet table, every cell already rendered as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetRow {
    pub vehicle: String,
    pub date: String,
    pub time: String,
    pub latitude: String,
    pub longitude: String,
    pub altitude: String,
    pub fix: String,
    pub fix_quality: String,
    pub satellites: String,
    pub hdop: String,
}

impl FleetRow {
    /// Build a row from the vehicle's decoded sentences
    pub fn from_vehicle(vehicle: &Vehicle) -> Self {
        let gga = vehicle.latest_gga();
        let zda = vehicle.latest_zda();

        Self {
            vehicle: vehicle.name.clone(),
            date: or_na(zda.as_ref().and_then(|z| z.date.clone())),
            time: or_na(zda.as_ref().and_then(|z| z.time.clone())),
            latitude: or_na(gga.as_ref().and_then(|g| g.latitude).map(|v| format!("{:.5}", v))),
            longitude: or_na(gga.as_ref().and_then(|g| g.longitude).map(|v| format!("{:.5}", v))),
            altitude: or_na(gga.as_ref().and_then(|g| g.altitude).map(|v| format!("{:.1}", v))),
            fix: or_na(gga.as_ref().map(|g| g.fix.to_string())),
            fix_quality: or_na(gga.as_ref().and_then(|g| g.fix_quality.clone())),
            satellites: or_na(gga.as_ref().and_then(|g| g.satellites).map(|v| v.to_string())),
            hdop: or_na(gga.as_ref().and_then(|g| g.hdop).map(|v| format!("{:.1}", v))),
        }
    }
}

fn or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

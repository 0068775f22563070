// src/nmea/encoder.rs
//! Build GGA, ZDA and GSV sentences from simulated telemetry

use super::{checksum::encode_sentence, TALKER};
use crate::error::{FleetError, Result};
use crate::fleet::SentenceSet;
use chrono::{DateTime, Utc};

/// GGA carries no real time of day, the simulator uses a fixed placeholder
const GGA_TIME_PLACEHOLDER: &str = "123519";

/// GPS fix
const GGA_FIX_QUALITY: &str = "1";

/// Satellites-in-view sample data, first sentence of a two-sentence group
const GSV_TEMPLATE: &str = "2,1,08,01,40,083,46,02,17,308,41,12,07,344,39,14,22,228,45";

/// Values the encoder needs from a vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Telemetry {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub satellites: u8,
    pub hdop: f64,
}

impl Telemetry {
    fn validate(&self) -> Result<()> {
        let fields = [
            ("latitude", self.latitude),
            ("longitude", self.longitude),
            ("altitude", self.altitude),
            ("hdop", self.hdop),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(FleetError::InvalidTelemetry(format!("{} is {}", name, value)));
            }
        }
        Ok(())
    }
}

/// Encode a GGA (fix data) sentence
pub fn encode_gga(telemetry: &Telemetry) -> Result<String> {
    telemetry.validate()?;

    let lat_hemisphere = if telemetry.latitude < 0.0 { 'S' } else { 'N' };
    let lon_hemisphere = if telemetry.longitude < 0.0 { 'W' } else { 'E' };

    let body = format!(
        "${}GGA,{},{:.5},{},{:.5},{},{},{:02},{:.1},{:.1},M,,",
        TALKER,
        GGA_TIME_PLACEHOLDER,
        telemetry.latitude.abs(),
        lat_hemisphere,
        telemetry.longitude.abs(),
        lon_hemisphere,
        GGA_FIX_QUALITY,
        telemetry.satellites,
        telemetry.hdop,
        telemetry.altitude,
    );
    encode_sentence(&body)
}

/// Encode a ZDA (UTC date and time) sentence; local zone fields are always zero
pub fn encode_zda(now: DateTime<Utc>) -> Result<String> {
    let body = format!("${}ZDA,{},00,00", TALKER, now.format("%H%M%S,%d,%m,%Y"));
    encode_sentence(&body)
}

/// Encode the fixed GSV sample sentence
pub fn encode_gsv() -> Result<String> {
    encode_sentence(&format!("${}GSV,{}", TALKER, GSV_TEMPLATE))
}

/// Encode the full sentence set for one vehicle
pub fn encode_all(telemetry: &Telemetry, now: DateTime<Utc>) -> Result<SentenceSet> {
    Ok(SentenceSet {
        gga: encode_gga(telemetry)?,
        zda: encode_zda(now)?,
        gsv: encode_gsv()?,
    })
}

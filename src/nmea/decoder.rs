// src/nmea/decoder.rs
//! NMEA sentence decoding into structured records
//!
//! Decoding never fails. Fields that are absent or do not parse come back as
//! `None` so a display can render them as unavailable, and sentences with an
//! unknown tag decode to no record at all.

use serde::Serialize;
use std::fmt;

const GGA_TAG: &str = "$GPGGA";
const ZDA_TAG: &str = "$GPZDA";

/// Fix label derived from the GGA fix-quality field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FixLabel {
    Gps,
    NotAvailable,
}

impl FixLabel {
    fn from_quality(quality: Option<&str>) -> Self {
        match quality {
            Some("1") => FixLabel::Gps,
            _ => FixLabel::NotAvailable,
        }
    }
}

impl fmt::Display for FixLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixLabel::Gps => write!(f, "GPS"),
            FixLabel::NotAvailable => write!(f, "N/A"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GgaRecord {
    pub time: Option<String>, // HHMMSS
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub fix_quality: Option<String>,
    pub fix: FixLabel,
    pub satellites: Option<u8>,
    pub hdop: Option<f64>,
    pub altitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZdaRecord {
    pub time: Option<String>, // HHMMSS
    pub date: Option<String>, // DD/MM/YYYY
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SentenceRecord {
    Gga(GgaRecord),
    Zda(ZdaRecord),
}

/// Decode any supported sentence; unrecognized tags yield `None`
pub fn decode(sentence: &str) -> Option<SentenceRecord> {
    let parts = split_fields(sentence);
    match parts.first().copied() {
        Some(GGA_TAG) => Some(SentenceRecord::Gga(gga_from_parts(&parts))),
        Some(ZDA_TAG) => Some(SentenceRecord::Zda(zda_from_parts(&parts))),
        _ => None,
    }
}

/// Decode a GGA sentence, `None` if the sentence is not GGA
pub fn decode_gga(sentence: &str) -> Option<GgaRecord> {
    let parts = split_fields(sentence);
    (parts.first() == Some(&GGA_TAG)).then(|| gga_from_parts(&parts))
}

/// Decode a ZDA sentence, `None` if the sentence is not ZDA
pub fn decode_zda(sentence: &str) -> Option<ZdaRecord> {
    let parts = split_fields(sentence);
    (parts.first() == Some(&ZDA_TAG)).then(|| zda_from_parts(&parts))
}

/// Split the data part of a sentence (everything before `*`) on commas
fn split_fields(sentence: &str) -> Vec<&str> {
    let data = sentence.trim().split('*').next().unwrap_or("");
    data.split(',').collect()
}

fn field<'a>(parts: &[&'a str], index: usize) -> Option<&'a str> {
    parts.get(index).copied().filter(|s| !s.is_empty())
}

fn parse_field<T: std::str::FromStr>(parts: &[&str], index: usize) -> Option<T> {
    field(parts, index).and_then(|s| s.parse::<T>().ok())
}

/// Parse a decimal-degree coordinate and apply its hemisphere letter
fn parse_coordinate(parts: &[&str], index: usize, negative: &str) -> Option<f64> {
    let value = parse_field::<f64>(parts, index).filter(|v| v.is_finite())?;
    if field(parts, index + 1) == Some(negative) {
        Some(-value)
    } else {
        Some(value)
    }
}

fn gga_from_parts(parts: &[&str]) -> GgaRecord {
    let fix_quality = field(parts, 6);

    GgaRecord {
        time: field(parts, 1).map(str::to_string),
        latitude: parse_coordinate(parts, 2, "S"),
        longitude: parse_coordinate(parts, 4, "W"),
        fix_quality: fix_quality.map(str::to_string),
        fix: FixLabel::from_quality(fix_quality),
        satellites: parse_field(parts, 7),
        hdop: parse_field::<f64>(parts, 8).filter(|v| v.is_finite()),
        altitude: parse_field::<f64>(parts, 9).filter(|v| v.is_finite()),
    }
}

fn zda_from_parts(parts: &[&str]) -> ZdaRecord {
    let date = match (field(parts, 2), field(parts, 3), field(parts, 4)) {
        (Some(day), Some(month), Some(year)) => Some(format!("{}/{}/{}", day, month, year)),
        _ => None,
    };

    ZdaRecord {
        time: field(parts, 1).map(str::to_string),
        date,
    }
}

// src/nmea/mod.rs
//! NMEA 0183 sentence codec

pub mod checksum;
pub mod decoder;
pub mod encoder;

/// Fixed talker prefix for every sentence the simulator emits
pub const TALKER: &str = "GP";

pub use checksum::{checksum, encode_sentence, verify_checksum};
pub use decoder::{decode, decode_gga, decode_zda, FixLabel, GgaRecord, SentenceRecord, ZdaRecord};
pub use encoder::{encode_all, encode_gga, encode_gsv, encode_zda, Telemetry};

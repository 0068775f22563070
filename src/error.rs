// src/error.rs
//! Error types for the fleet simulator

use std::fmt;

pub type Result<T> = std::result::Result<T, FleetError>;

#[derive(Debug)]
pub enum FleetError {
    /// A sentence body that violates the encoder's framing rules
    MalformedInput(String),
    /// Non-finite position or sensor values offered to the encoder
    InvalidTelemetry(String),
    Io(std::io::Error),
    Json(serde_json::Error),
    Config(String),
    Other(String),
}

impl fmt::Display for FleetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FleetError::MalformedInput(msg) => write!(f, "Malformed input: {}", msg),
            FleetError::InvalidTelemetry(msg) => write!(f, "Invalid telemetry: {}", msg),
            FleetError::Io(e) => write!(f, "IO error: {}", e),
            FleetError::Json(e) => write!(f, "JSON error: {}", e),
            FleetError::Config(msg) => write!(f, "Config error: {}", msg),
            FleetError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for FleetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FleetError::Io(e) => Some(e),
            FleetError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FleetError {
    fn from(error: std::io::Error) -> Self {
        FleetError::Io(error)
    }
}

impl From<serde_json::Error> for FleetError {
    fn from(error: serde_json::Error) -> Self {
        FleetError::Json(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = FleetError::MalformedInput("stray '*'".to_string());
        assert_eq!(err.to_string(), "Malformed input: stray '*'");

        let err = FleetError::InvalidTelemetry("latitude is NaN".to_string());
        assert_eq!(err.to_string(), "Invalid telemetry: latitude is NaN");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: FleetError = io.into();
        assert!(matches!(err, FleetError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}

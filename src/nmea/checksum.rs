// src/nmea/checksum.rs
//! NMEA XOR checksum

use crate::error::{FleetError, Result};

/// Compute the two-digit uppercase hex checksum of a sentence body.
///
/// A leading `$` and anything from the first `*` onwards are ignored, so both
/// bare bodies and complete sentences give the same result.
pub fn checksum(body: &str) -> String {
    let body = body.strip_prefix('$').unwrap_or(body);
    let data = body.split('*').next().unwrap_or("");

    let sum = data.bytes().fold(0u8, |acc, b| acc ^ b);
    format!("{:02X}", sum)
}

/// Append `*HH` to a `$`-prefixed body that carries no checksum yet
pub fn encode_sentence(body: &str) -> Result<String> {
    if !body.starts_with('$') {
        return Err(FleetError::MalformedInput(format!(
            "sentence body must start with '$': {}",
            body
        )));
    }
    if body.contains('*') {
        return Err(FleetError::MalformedInput(format!(
            "sentence body already contains '*': {}",
            body
        )));
    }

    Ok(format!("{}*{}", body, checksum(body)))
}

/// Check that a sentence ends in a `*HH` suffix matching its content
pub fn verify_checksum(sentence: &str) -> bool {
    let sentence = sentence.trim();
    match sentence.rsplit_once('*') {
        Some((data, given)) => given.len() == 2 && given.eq_ignore_ascii_case(&checksum(data)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_vector() {
        let body = "GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,";
        assert_eq!(checksum(body), "47");
    }

    #[test]
    fn test_strips_dollar_and_suffix() {
        let body = "GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,";
        assert_eq!(checksum(&format!("${}", body)), "47");
        assert_eq!(checksum(&format!("${}*00", body)), "47");
    }

    #[test]
    fn test_small_body_matches_manual_xor() {
        let expected = "GPGGA,1,2,3".bytes().fold(0u8, |acc, b| acc ^ b);
        assert_eq!(checksum("GPGGA,1,2,3"), format!("{:02X}", expected));
        assert_eq!(checksum("GPGGA,1,2,3"), "4A");
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(checksum(""), "00");
        assert_eq!(checksum("$"), "00");
    }

    #[test]
    fn test_always_two_uppercase_hex_digits() {
        for body in ["", "A", "a", "GPZDA,070809,05,03,2024,00,00", "\u{7f}", "xyz,,,"] {
            let sum = checksum(body);
            assert_eq!(sum.len(), 2, "checksum of {:?}", body);
            assert!(sum.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
        }
        // values below 0x10 are zero-padded
        assert_eq!(checksum("\u{1}"), "01");
    }

    #[test]
    fn test_encode_sentence() {
        let sentence = encode_sentence("$GPZDA,070809,05,03,2024,00,00").unwrap();
        assert_eq!(sentence, "$GPZDA,070809,05,03,2024,00,00*4C");
    }

    #[test]
    fn test_encode_sentence_rejects_existing_checksum() {
        let result = encode_sentence("$GPGGA,1,2,3*4A");
        assert!(matches!(result, Err(FleetError::MalformedInput(_))));
    }

    #[test]
    fn test_encode_sentence_rejects_missing_dollar() {
        let result = encode_sentence("GPGGA,1,2,3");
        assert!(matches!(result, Err(FleetError::MalformedInput(_))));
    }

    #[test]
    fn test_verify_checksum() {
        assert!(verify_checksum("$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47"));
        assert!(verify_checksum("$GPZDA,070809,05,03,2024,00,00*4c\r\n"));
        assert!(!verify_checksum("$GPZDA,070809,05,03,2024,00,01*4C"));
        assert!(!verify_checksum("$GPZDA,070809,05,03,2024,00,00"));
        assert!(!verify_checksum(""));
    }
}

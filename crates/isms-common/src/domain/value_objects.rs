//! Value Objects - Immutable domain primitives with validation

use crate::error::{IsmsError, IsmsResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Surrogate identity of a stored control
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlId(i64);

impl ControlId {
    /// Wrap a raw store id
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw value
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human identifier of an Annex-A control (Value Object)
///
/// # Invariants
/// - One or more dot-separated decimal segments (`5.1`, `8.34`)
/// - A leading `A.` is accepted and dropped
/// - Stored in canonical form, so `05.1` and `5.1` are the same code
/// - Ordering is numeric per segment, so `5.9 < 5.10 < 6.1`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ControlCode {
    raw: String,
    segments: Vec<u32>,
}

impl ControlCode {
    /// Parse and validate a control code
    pub fn new(code: impl AsRef<str>) -> IsmsResult<Self> {
        let trimmed = code.as_ref().trim();
        let body = trimmed
            .strip_prefix("A.")
            .or_else(|| trimmed.strip_prefix("a."))
            .unwrap_or(trimmed);

        if body.is_empty() {
            return Err(IsmsError::InvalidCode(code.as_ref().to_string()));
        }

        let segments = body
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(IsmsError::InvalidCode(code.as_ref().to_string()));
                }
                part.parse::<u32>()
                    .map_err(|_| IsmsError::InvalidCode(code.as_ref().to_string()))
            })
            .collect::<IsmsResult<Vec<_>>>()?;

        let raw = segments
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(".");
        Ok(Self { raw, segments })
    }

    /// Canonical text, without the `A.` prefix
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Numeric segments
    pub fn segments(&self) -> &[u32] {
        &self.segments
    }

    /// First segment (Annex-A theme number)
    pub fn theme(&self) -> u32 {
        self.segments[0]
    }
}

impl Ord for ControlCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments.cmp(&other.segments)
    }
}

impl PartialOrd for ControlCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl TryFrom<String> for ControlCode {
    type Error = IsmsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ControlCode> for String {
    fn from(code: ControlCode) -> Self {
        code.raw
    }
}

impl fmt::Display for ControlCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Round to a fixed number of decimal places, halves to even
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_code_valid() {
        let code = ControlCode::new("5.1").unwrap();
        assert_eq!(code.as_str(), "5.1");
        assert_eq!(code.segments(), &[5, 1]);
        assert_eq!(code.theme(), 5);
    }

    #[test]
    fn test_control_code_strips_annex_prefix() {
        let code = ControlCode::new("A.8.34").unwrap();
        assert_eq!(code.as_str(), "8.34");
    }

    #[test]
    fn test_control_code_canonical_form() {
        let padded = ControlCode::new("A.05.01").unwrap();
        let plain = ControlCode::new("5.1").unwrap();
        assert_eq!(padded.as_str(), "5.1");
        assert_eq!(padded, plain);
        assert_eq!(padded.cmp(&plain), Ordering::Equal);
        assert_eq!(serde_json::to_string(&padded).unwrap(), "\"5.1\"");
    }

    #[test]
    fn test_control_code_rejects_garbage() {
        assert!(ControlCode::new("").is_err());
        assert!(ControlCode::new("A.").is_err());
        assert!(ControlCode::new("5..1").is_err());
        assert!(ControlCode::new("5.x").is_err());
        assert!(ControlCode::new("-5.1").is_err());
    }

    #[test]
    fn test_control_code_natural_order() {
        let mut codes: Vec<_> = ["6.1", "5.10", "5.9", "8.2", "5.1"]
            .iter()
            .map(|c| ControlCode::new(c).unwrap())
            .collect();
        codes.sort();
        let sorted: Vec<_> = codes.iter().map(|c| c.as_str()).collect();
        assert_eq!(sorted, vec!["5.1", "5.9", "5.10", "6.1", "8.2"]);
    }

    #[test]
    fn test_control_code_serde() {
        let code: ControlCode = serde_json::from_str("\"7.4\"").unwrap();
        assert_eq!(code.as_str(), "7.4");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"7.4\"");
        assert!(serde_json::from_str::<ControlCode>("\"seven\"").is_err());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(74.0, 2), 74.0);
        assert_eq!(round_to(66.666_666, 2), 66.67);
        assert_eq!(round_to(33.333_3, 1), 33.3);
    }

    #[test]
    fn test_round_to_halves_go_to_even() {
        assert_eq!(round_to(3.125, 2), 3.12);
        assert_eq!(round_to(3.375, 2), 3.38);
        assert_eq!(round_to(6.25, 1), 6.2);
        assert_eq!(round_to(18.75, 1), 18.8);
        assert_eq!(round_to(0.5, 0), 0.0);
    }
}

//! Conformity status scale and control categories
//!
//! Both are closed sets. Display labels are the French strings shown to
//! users; the serde form is a stable snake_case identifier.

use super::value_objects::ControlCode;
use crate::error::{IsmsError, IsmsResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Five-level conformity scale, ordered worst to best
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConformityStatus {
    #[default]
    NonConforming,
    WeaklyConforming,
    PartiallyConforming,
    LargelyConforming,
    Conforming,
}

impl ConformityStatus {
    /// All statuses, worst first
    pub const ALL: [ConformityStatus; 5] = [
        Self::NonConforming,
        Self::WeaklyConforming,
        Self::PartiallyConforming,
        Self::LargelyConforming,
        Self::Conforming,
    ];

    /// Level on the 1..=5 scale
    pub const fn level(&self) -> u8 {
        *self as u8 + 1
    }

    /// Position in `ALL`
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Stable identifier used in storage and serde
    pub const fn key(&self) -> &'static str {
        match self {
            Self::NonConforming => "non_conforming",
            Self::WeaklyConforming => "weakly_conforming",
            Self::PartiallyConforming => "partially_conforming",
            Self::LargelyConforming => "largely_conforming",
            Self::Conforming => "conforming",
        }
    }

    /// User-facing label
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NonConforming => "Non conforme",
            Self::WeaklyConforming => "Faiblement conforme",
            Self::PartiallyConforming => "Partiellement conforme",
            Self::LargelyConforming => "Largement conforme",
            Self::Conforming => "Conforme",
        }
    }

    /// Binary split used by the category breakdown: largely conforming or better
    pub fn counts_as_conforming(&self) -> bool {
        *self >= Self::LargelyConforming
    }

    /// Weakly or non conforming
    pub fn is_at_risk(&self) -> bool {
        *self <= Self::WeaklyConforming
    }

    /// Parse either the identifier or the display label, case-insensitively
    pub fn parse(value: &str) -> IsmsResult<Self> {
        let needle = value.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.key().eq_ignore_ascii_case(needle) || s.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| IsmsError::InvalidStatus(value.to_string()))
    }
}

impl FromStr for ConformityStatus {
    type Err = IsmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ConformityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Annex-A control theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Organisational,
    Personnel,
    Physical,
    Technological,
}

impl Category {
    /// All categories in Annex-A order
    pub const ALL: [Category; 4] = [
        Self::Organisational,
        Self::Personnel,
        Self::Physical,
        Self::Technological,
    ];

    /// Stable identifier used in storage and serde
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Organisational => "organisational",
            Self::Personnel => "personnel",
            Self::Physical => "physical",
            Self::Technological => "technological",
        }
    }

    /// User-facing label
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Organisational => "Organisationnelle",
            Self::Personnel => "Personnel",
            Self::Physical => "Physique",
            Self::Technological => "Technologique",
        }
    }

    /// Theme implied by the first segment of an Annex-A code
    pub fn for_code(code: &ControlCode) -> Option<Self> {
        match code.theme() {
            5 => Some(Self::Organisational),
            6 => Some(Self::Personnel),
            7 => Some(Self::Physical),
            8 => Some(Self::Technological),
            _ => None,
        }
    }

    /// Parse either the identifier or the display label, case-insensitively
    pub fn parse(value: &str) -> IsmsResult<Self> {
        let needle = value.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(needle) || c.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| IsmsError::InvalidCategory(value.to_string()))
    }
}

impl FromStr for Category {
    type Err = IsmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_order_worst_to_best() {
        assert!(ConformityStatus::NonConforming < ConformityStatus::WeaklyConforming);
        assert!(ConformityStatus::LargelyConforming < ConformityStatus::Conforming);
        assert_eq!(ConformityStatus::Conforming.level(), 5);
        assert_eq!(ConformityStatus::NonConforming.level(), 1);
    }

    #[test]
    fn test_status_parse_labels_and_keys() {
        assert_eq!(
            ConformityStatus::parse("Largement conforme").unwrap(),
            ConformityStatus::LargelyConforming
        );
        assert_eq!(
            "non conforme".parse::<ConformityStatus>().unwrap(),
            ConformityStatus::NonConforming
        );
        assert_eq!(
            ConformityStatus::parse("partially_conforming").unwrap(),
            ConformityStatus::PartiallyConforming
        );
    }

    #[test]
    fn test_status_parse_rejects_unknown() {
        let err = ConformityStatus::parse("Presque conforme").unwrap_err();
        assert!(matches!(err, IsmsError::InvalidStatus(_)));
    }

    #[test]
    fn test_binary_threshold() {
        let conforming: Vec<_> = ConformityStatus::ALL
            .iter()
            .filter(|s| s.counts_as_conforming())
            .collect();
        assert_eq!(
            conforming,
            vec![&ConformityStatus::LargelyConforming, &ConformityStatus::Conforming]
        );
    }

    #[test]
    fn test_category_for_code() {
        let code = ControlCode::new("7.12").unwrap();
        assert_eq!(Category::for_code(&code), Some(Category::Physical));
        let code = ControlCode::new("9.1").unwrap();
        assert_eq!(Category::for_code(&code), None);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::parse("Technologique").unwrap(), Category::Technological);
        assert_eq!(Category::parse("personnel").unwrap(), Category::Personnel);
        assert!(Category::parse("Juridique").is_err());
    }
}

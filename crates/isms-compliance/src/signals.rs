//! Environment Signal Snapshot
//!
//! Raw telemetry handed to the scorer. Each field is either a concrete
//! observation or unknown; an unknown value never earns a bonus.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a protective service (firewall, antivirus)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceState {
    Active,
    Inactive,
    #[default]
    Unknown,
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Inactive => write!(f, "INACTIVE"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Operating system patch level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatchState {
    UpToDate,
    Outdated,
    #[default]
    Unknown,
}

impl fmt::Display for PatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpToDate => write!(f, "UP_TO_DATE"),
            Self::Outdated => write!(f, "OUTDATED"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Immutable set of raw signals for one scoring pass
///
/// Counts and disk usage use `None` for unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainSignalSnapshot {
    pub firewall: ServiceState,
    pub antivirus: ServiceState,
    pub patch: PatchState,
    pub open_ports: Option<u32>,
    pub active_connections: Option<u32>,
    /// Percentage of the system volume in use, 0-100
    pub disk_usage_percent: Option<u8>,
    pub collected_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl DomainSignalSnapshot {
    /// Snapshot with every signal unknown
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Builder-style firewall state
    pub fn with_firewall(mut self, state: ServiceState) -> Self {
        self.firewall = state;
        self
    }

    /// Builder-style antivirus state
    pub fn with_antivirus(mut self, state: ServiceState) -> Self {
        self.antivirus = state;
        self
    }

    /// Builder-style patch state
    pub fn with_patch(mut self, state: PatchState) -> Self {
        self.patch = state;
        self
    }

    /// Builder-style listening port count
    pub fn with_open_ports(mut self, count: u32) -> Self {
        self.open_ports = Some(count);
        self
    }

    /// Builder-style established connection count
    pub fn with_active_connections(mut self, count: u32) -> Self {
        self.active_connections = Some(count);
        self
    }

    /// Builder-style disk usage, clamped to 100
    pub fn with_disk_usage(mut self, percent: u8) -> Self {
        self.disk_usage_percent = Some(percent.min(100));
        self
    }

    /// Number of signals that carry a concrete value
    pub fn known_signals(&self) -> usize {
        [
            self.firewall != ServiceState::Unknown,
            self.antivirus != ServiceState::Unknown,
            self.patch != PatchState::Unknown,
            self.open_ports.is_some(),
            self.active_connections.is_some(),
            self.disk_usage_percent.is_some(),
        ]
        .iter()
        .filter(|known| **known)
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_snapshot() {
        let snapshot = DomainSignalSnapshot::unknown();
        assert_eq!(snapshot.firewall, ServiceState::Unknown);
        assert_eq!(snapshot.patch, PatchState::Unknown);
        assert!(snapshot.open_ports.is_none());
        assert_eq!(snapshot.known_signals(), 0);
    }

    #[test]
    fn test_disk_usage_clamped() {
        let snapshot = DomainSignalSnapshot::unknown().with_disk_usage(250);
        assert_eq!(snapshot.disk_usage_percent, Some(100));
        assert_eq!(snapshot.known_signals(), 1);
    }

    #[test]
    fn test_wire_format_uses_upper_case_states() {
        let snapshot = DomainSignalSnapshot::unknown()
            .with_firewall(ServiceState::Active)
            .with_patch(PatchState::UpToDate);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["firewall"], "ACTIVE");
        assert_eq!(json["antivirus"], "UNKNOWN");
        assert_eq!(json["patch"], "UP_TO_DATE");
        assert!(json["open_ports"].is_null());
    }
}

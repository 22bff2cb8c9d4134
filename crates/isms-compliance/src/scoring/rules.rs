//! Additive scoring rules
//!
//! Each domain starts from a base score and collects fixed adjustments for
//! the conditions that hold on the snapshot. Unknown signals never satisfy
//! a condition.

use super::domains::IsoDomain;
use crate::signals::{DomainSignalSnapshot, PatchState, ServiceState};
use isms_common::{IsmsError, IsmsResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A predicate over one signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "when", content = "limit", rename_all = "snake_case")]
pub enum Condition {
    FirewallActive,
    AntivirusActive,
    PatchUpToDate,
    OpenPortsBelow(u32),
    ConnectionsBelow(u32),
    DiskUsageBelow(u8),
    DiskUsageAtLeast(u8),
}

impl Condition {
    /// Whether the condition holds; unknown inputs yield false
    pub fn holds(&self, snapshot: &DomainSignalSnapshot) -> bool {
        match *self {
            Self::FirewallActive => snapshot.firewall == ServiceState::Active,
            Self::AntivirusActive => snapshot.antivirus == ServiceState::Active,
            Self::PatchUpToDate => snapshot.patch == PatchState::UpToDate,
            Self::OpenPortsBelow(limit) => snapshot.open_ports.is_some_and(|n| n < limit),
            Self::ConnectionsBelow(limit) => {
                snapshot.active_connections.is_some_and(|n| n < limit)
            }
            Self::DiskUsageBelow(limit) => snapshot.disk_usage_percent.is_some_and(|p| p < limit),
            Self::DiskUsageAtLeast(limit) => {
                snapshot.disk_usage_percent.is_some_and(|p| p >= limit)
            }
        }
    }
}

/// Signed score change applied when a condition holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    pub points: i32,
    pub condition: Condition,
}

impl Adjustment {
    pub const fn bonus(condition: Condition, points: i32) -> Self {
        Self { condition, points }
    }

    pub const fn penalty(condition: Condition, points: i32) -> Self {
        Self {
            condition,
            points: -points,
        }
    }
}

/// Rule for one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRule {
    pub domain: IsoDomain,
    pub base: i32,
    #[serde(default)]
    pub adjustments: Vec<Adjustment>,
}

impl DomainRule {
    pub fn new(domain: IsoDomain, base: i32, adjustments: Vec<Adjustment>) -> Self {
        Self {
            domain,
            base,
            adjustments,
        }
    }

    /// Base plus every applicable adjustment in order
    ///
    /// The running total is clamped to [0, 100] after each step, so a bonus
    /// past 100 is lost before a later penalty applies.
    pub fn evaluate(&self, snapshot: &DomainSignalSnapshot) -> u8 {
        let score = self
            .adjustments
            .iter()
            .filter(|adj| adj.condition.holds(snapshot))
            .fold(self.base.clamp(0, 100), |score, adj| {
                score.saturating_add(adj.points).clamp(0, 100)
            });
        score as u8
    }
}

/// One rule per domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    pub rules: Vec<DomainRule>,
}

impl ScoringRules {
    /// Rule for a domain, if present
    pub fn rule(&self, domain: IsoDomain) -> Option<&DomainRule> {
        self.rules.iter().find(|r| r.domain == domain)
    }

    /// Every domain exactly once, bases within [0, 100]
    pub fn validate(&self) -> IsmsResult<()> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.domain) {
                return Err(IsmsError::Config(format!(
                    "duplicate scoring rule for {}",
                    rule.domain.tag()
                )));
            }
            if !(0..=100).contains(&rule.base) {
                return Err(IsmsError::Config(format!(
                    "base score {} for {} outside [0, 100]",
                    rule.base,
                    rule.domain.tag()
                )));
            }
        }
        if let Some(missing) = IsoDomain::ALL.into_iter().find(|d| !seen.contains(d)) {
            return Err(IsmsError::Config(format!(
                "missing scoring rule for {}",
                missing.tag()
            )));
        }
        Ok(())
    }
}

impl Default for ScoringRules {
    fn default() -> Self {
        use Condition::*;
        use IsoDomain::*;

        let bonus = Adjustment::bonus;
        let penalty = Adjustment::penalty;

        Self {
            rules: vec![
                DomainRule::new(Policies, 65, vec![bonus(FirewallActive, 10), bonus(AntivirusActive, 10)]),
                DomainRule::new(Organisation, 65, vec![bonus(PatchUpToDate, 10), bonus(FirewallActive, 10)]),
                DomainRule::new(HumanResources, 65, vec![bonus(AntivirusActive, 10)]),
                DomainRule::new(
                    AssetManagement,
                    55,
                    vec![
                        bonus(DiskUsageBelow(80), 15),
                        bonus(PatchUpToDate, 15),
                        penalty(DiskUsageAtLeast(95), 15),
                    ],
                ),
                DomainRule::new(AccessControl, 60, vec![bonus(AntivirusActive, 20), bonus(FirewallActive, 15)]),
                DomainRule::new(Cryptography, 50, vec![bonus(FirewallActive, 20), bonus(OpenPortsBelow(20), 15)]),
                DomainRule::new(PhysicalSecurity, 65, Vec::new()),
                DomainRule::new(
                    OperationsSecurity,
                    50,
                    vec![bonus(PatchUpToDate, 25), bonus(OpenPortsBelow(20), 20)],
                ),
                DomainRule::new(
                    CommunicationsSecurity,
                    40,
                    vec![bonus(FirewallActive, 30), bonus(ConnectionsBelow(50), 25)],
                ),
                DomainRule::new(Development, 55, vec![bonus(PatchUpToDate, 20)]),
                DomainRule::new(SupplierRelationships, 60, vec![bonus(ConnectionsBelow(50), 15)]),
                DomainRule::new(
                    IncidentManagement,
                    55,
                    vec![bonus(AntivirusActive, 20), bonus(FirewallActive, 15)],
                ),
                DomainRule::new(
                    BusinessContinuity,
                    55,
                    vec![
                        bonus(DiskUsageBelow(80), 25),
                        bonus(PatchUpToDate, 10),
                        penalty(DiskUsageAtLeast(95), 15),
                    ],
                ),
                DomainRule::new(
                    Compliance,
                    60,
                    vec![
                        bonus(FirewallActive, 10),
                        bonus(AntivirusActive, 10),
                        bonus(PatchUpToDate, 10),
                    ],
                ),
            ],
        }
    }
}

//! Automated Signal Scorer

use super::domains::IsoDomain;
use super::rules::ScoringRules;
use crate::signals::DomainSignalSnapshot;
use chrono::{DateTime, Utc};
use isms_common::{round_to, IsmsResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Scores every ISO domain from a signal snapshot
#[derive(Debug, Clone)]
pub struct SignalScorer {
    rules: ScoringRules,
}

impl SignalScorer {
    pub fn new(rules: ScoringRules) -> IsmsResult<Self> {
        rules.validate()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// Score one domain, always within [0, 100]
    pub fn score_domain(&self, domain: IsoDomain, snapshot: &DomainSignalSnapshot) -> u8 {
        // validate() guarantees a rule per domain
        self.rules
            .rule(domain)
            .map(|rule| rule.evaluate(snapshot))
            .unwrap_or(0)
    }

    /// Score all 14 domains in canonical order
    pub fn score_all(&self, snapshot: &DomainSignalSnapshot) -> DomainScores {
        let scores: BTreeMap<IsoDomain, u8> = IsoDomain::ALL
            .into_iter()
            .map(|domain| (domain, self.score_domain(domain, snapshot)))
            .collect();

        debug!(
            known_signals = snapshot.known_signals(),
            domains = scores.len(),
            "Scored signal snapshot"
        );

        DomainScores {
            scores,
            collected_at: snapshot.collected_at,
            scored_at: Utc::now(),
            advisory: true,
        }
    }
}

impl Default for SignalScorer {
    fn default() -> Self {
        Self {
            rules: ScoringRules::default(),
        }
    }
}

/// Per-domain automated scores
///
/// Always advisory: these are proxies from telemetry, never a substitute for
/// a manual evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainScores {
    pub scores: BTreeMap<IsoDomain, u8>,
    pub collected_at: Option<DateTime<Utc>>,
    pub scored_at: DateTime<Utc>,
    pub advisory: bool,
}

impl DomainScores {
    pub fn get(&self, domain: IsoDomain) -> Option<u8> {
        self.scores.get(&domain).copied()
    }

    /// Mean of all domain scores, rounded to one decimal
    pub fn average(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        let sum: u32 = self.scores.values().map(|s| u32::from(*s)).sum();
        round_to(f64::from(sum) / self.scores.len() as f64, 1)
    }

    /// Domains in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (IsoDomain, u8)> + '_ {
        self.scores.iter().map(|(d, s)| (*d, *s))
    }

    /// Lowest scoring domains first
    pub fn weakest(&self, limit: usize) -> Vec<(IsoDomain, u8)> {
        let mut ranked: Vec<(IsoDomain, u8)> = self.iter().collect();
        ranked.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::rules::{Adjustment, Condition, DomainRule};
    use crate::signals::{PatchState, ServiceState};
    use proptest::prelude::*;

    fn hardened() -> DomainSignalSnapshot {
        DomainSignalSnapshot::unknown()
            .with_firewall(ServiceState::Active)
            .with_antivirus(ServiceState::Active)
            .with_patch(PatchState::UpToDate)
            .with_open_ports(4)
            .with_active_connections(12)
            .with_disk_usage(40)
    }

    #[test]
    fn test_access_control_reference_scores() {
        let scorer = SignalScorer::default();
        let protected = DomainSignalSnapshot::unknown()
            .with_firewall(ServiceState::Active)
            .with_antivirus(ServiceState::Active);
        assert_eq!(scorer.score_domain(IsoDomain::AccessControl, &protected), 95);

        let exposed = DomainSignalSnapshot::unknown()
            .with_firewall(ServiceState::Inactive)
            .with_antivirus(ServiceState::Inactive);
        assert_eq!(scorer.score_domain(IsoDomain::AccessControl, &exposed), 60);
        assert_eq!(
            scorer.score_domain(IsoDomain::AccessControl, &DomainSignalSnapshot::unknown()),
            60
        );
    }

    #[test]
    fn test_operations_and_communications_rules() {
        let scorer = SignalScorer::default();
        let snapshot = hardened();
        assert_eq!(scorer.score_domain(IsoDomain::OperationsSecurity, &snapshot), 95);
        assert_eq!(scorer.score_domain(IsoDomain::CommunicationsSecurity, &snapshot), 95);

        let busy = snapshot.with_open_ports(20).with_active_connections(50);
        assert_eq!(scorer.score_domain(IsoDomain::OperationsSecurity, &busy), 75);
        assert_eq!(scorer.score_domain(IsoDomain::CommunicationsSecurity, &busy), 70);
    }

    #[test]
    fn test_unknown_snapshot_yields_base_scores() {
        let scorer = SignalScorer::default();
        let result = scorer.score_all(&DomainSignalSnapshot::unknown());
        for rule in &scorer.rules().rules {
            assert_eq!(result.get(rule.domain), Some(rule.base as u8));
        }
        assert!(result.advisory);
    }

    #[test]
    fn test_score_all_covers_each_domain_once_in_order() {
        let result = SignalScorer::default().score_all(&hardened());
        let domains: Vec<IsoDomain> = result.iter().map(|(d, _)| d).collect();
        assert_eq!(domains, IsoDomain::ALL.to_vec());
    }

    #[test]
    fn test_disk_pressure_penalty() {
        let scorer = SignalScorer::default();
        let full = DomainSignalSnapshot::unknown().with_disk_usage(97);
        assert_eq!(scorer.score_domain(IsoDomain::BusinessContinuity, &full), 40);
        assert_eq!(scorer.score_domain(IsoDomain::AssetManagement, &full), 40);
    }

    #[test]
    fn test_clamped_when_every_bonus_applies() {
        let mut rules = ScoringRules::default();
        for rule in &mut rules.rules {
            rule.base = 100;
            rule.adjustments.push(Adjustment::bonus(Condition::FirewallActive, 50));
        }
        let scorer = SignalScorer::new(rules).unwrap();
        let result = scorer.score_all(&hardened());
        assert!(result.iter().all(|(_, score)| score == 100));
        assert_eq!(result.average(), 100.0);
    }

    #[test]
    fn test_new_rejects_incomplete_rules() {
        let rules = ScoringRules {
            rules: vec![DomainRule::new(IsoDomain::AccessControl, 60, Vec::new())],
        };
        assert!(SignalScorer::new(rules).is_err());
    }

    #[test]
    fn test_weakest_domains() {
        let result = SignalScorer::default().score_all(&DomainSignalSnapshot::unknown());
        let weakest = result.weakest(2);
        assert_eq!(weakest[0], (IsoDomain::CommunicationsSecurity, 40));
        assert_eq!(weakest[1], (IsoDomain::Cryptography, 50));
    }

    fn service_state() -> impl Strategy<Value = ServiceState> {
        prop_oneof![
            Just(ServiceState::Active),
            Just(ServiceState::Inactive),
            Just(ServiceState::Unknown)
        ]
    }

    fn patch_state() -> impl Strategy<Value = PatchState> {
        prop_oneof![
            Just(PatchState::UpToDate),
            Just(PatchState::Outdated),
            Just(PatchState::Unknown)
        ]
    }

    proptest! {
        #[test]
        fn test_scores_always_bounded(
            firewall in service_state(),
            antivirus in service_state(),
            patch in patch_state(),
            ports in proptest::option::of(0u32..500),
            connections in proptest::option::of(0u32..5000),
            disk in proptest::option::of(0u8..=100),
        ) {
            let snapshot = DomainSignalSnapshot {
                firewall,
                antivirus,
                patch,
                open_ports: ports,
                active_connections: connections,
                disk_usage_percent: disk,
                collected_at: None,
            };
            let result = SignalScorer::default().score_all(&snapshot);
            prop_assert_eq!(result.scores.len(), 14);
            for (_, score) in result.iter() {
                prop_assert!(score <= 100);
            }
        }
    }
}

//! Conformity Aggregation
//!
//! Turns a snapshot of evaluated controls into counts, a weighted headline
//! rate and a per-category breakdown. Everything here is a pure function of
//! its inputs.
//!
//! The two aggregations deliberately differ: the headline rate uses the
//! graduated weight table, the category breakdown uses a binary split at
//! "largely conforming or better".

use isms_common::{round_to, Category, ConformityStatus, Control, IsmsError, IsmsResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weight of each status in the headline rate, in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightTable {
    pub conforming: u8,
    pub largely_conforming: u8,
    pub partially_conforming: u8,
    pub weakly_conforming: u8,
    pub non_conforming: u8,
}

impl WeightTable {
    /// Weight for one status
    pub const fn weight(&self, status: ConformityStatus) -> u8 {
        match status {
            ConformityStatus::Conforming => self.conforming,
            ConformityStatus::LargelyConforming => self.largely_conforming,
            ConformityStatus::PartiallyConforming => self.partially_conforming,
            ConformityStatus::WeaklyConforming => self.weakly_conforming,
            ConformityStatus::NonConforming => self.non_conforming,
        }
    }

    /// Every weight must be a percentage
    pub fn validate(&self) -> IsmsResult<()> {
        for status in ConformityStatus::ALL {
            let weight = self.weight(status);
            if weight > 100 {
                return Err(IsmsError::Config(format!(
                    "weight for {} is {}, must be 0-100",
                    status.key(),
                    weight
                )));
            }
        }
        Ok(())
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            conforming: 100,
            largely_conforming: 80,
            partially_conforming: 50,
            weakly_conforming: 30,
            non_conforming: 0,
        }
    }
}

/// Per-status counts and the weighted headline rate
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConformityStats {
    pub conforming: usize,
    pub largely_conforming: usize,
    pub partially_conforming: usize,
    pub weakly_conforming: usize,
    pub non_conforming: usize,
    pub total: usize,
    /// Percentage in [0, 100], two decimals
    pub weighted_rate: f64,
}

impl ConformityStats {
    /// Count for one status
    pub const fn count(&self, status: ConformityStatus) -> usize {
        match status {
            ConformityStatus::Conforming => self.conforming,
            ConformityStatus::LargelyConforming => self.largely_conforming,
            ConformityStatus::PartiallyConforming => self.partially_conforming,
            ConformityStatus::WeaklyConforming => self.weakly_conforming,
            ConformityStatus::NonConforming => self.non_conforming,
        }
    }

    fn count_mut(&mut self, status: ConformityStatus) -> &mut usize {
        match status {
            ConformityStatus::Conforming => &mut self.conforming,
            ConformityStatus::LargelyConforming => &mut self.largely_conforming,
            ConformityStatus::PartiallyConforming => &mut self.partially_conforming,
            ConformityStatus::WeaklyConforming => &mut self.weakly_conforming,
            ConformityStatus::NonConforming => &mut self.non_conforming,
        }
    }

    /// Weakly plus non conforming
    pub const fn at_risk(&self) -> usize {
        self.weakly_conforming + self.non_conforming
    }

    /// Share of one status in percent, two decimals
    pub fn share(&self, status: ConformityStatus) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        round_to(self.count(status) as f64 * 100.0 / self.total as f64, 2)
    }
}

/// One category's binary conformity share
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    /// Controls largely conforming or better
    pub conforming: usize,
    pub total: usize,
    /// Percentage, one decimal; 0 for an empty category
    pub percentage: f64,
}

/// Category breakdown in Annex-A order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub categories: BTreeMap<Category, CategoryShare>,
}

impl CategoryBreakdown {
    /// Percentage only, keyed by category
    pub fn percentages(&self) -> BTreeMap<Category, f64> {
        self.categories
            .iter()
            .map(|(category, share)| (*category, share.percentage))
            .collect()
    }

    /// Share of a single category
    pub fn get(&self, category: Category) -> Option<&CategoryShare> {
        self.categories.get(&category)
    }
}

/// Compliance aggregator
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    weights: WeightTable,
}

impl Aggregator {
    /// Aggregator owning a validated weight table
    pub fn new(weights: WeightTable) -> IsmsResult<Self> {
        weights.validate()?;
        Ok(Self { weights })
    }

    /// Weight table in use
    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    /// Counts and weighted rate over a control snapshot
    pub fn compute_stats<'a>(&self, controls: impl IntoIterator<Item = &'a Control>) -> ConformityStats {
        self.stats_from_statuses(controls.into_iter().map(|c| c.status))
    }

    /// Counts and weighted rate over bare statuses
    pub fn stats_from_statuses(&self, statuses: impl IntoIterator<Item = ConformityStatus>) -> ConformityStats {
        let mut stats = ConformityStats::default();
        for status in statuses {
            *stats.count_mut(status) += 1;
            stats.total += 1;
        }

        stats.weighted_rate = if stats.total > 0 {
            let points: u64 = ConformityStatus::ALL
                .iter()
                .map(|s| stats.count(*s) as u64 * u64::from(self.weights.weight(*s)))
                .sum();
            round_to(points as f64 / stats.total as f64, 2)
        } else {
            0.0
        };

        stats
    }

    /// Binary conformity share for each requested category
    ///
    /// A requested category with no controls is reported at 0.
    pub fn category_breakdown<'a>(
        &self,
        controls: impl IntoIterator<Item = &'a Control>,
        categories: impl IntoIterator<Item = Category>,
    ) -> CategoryBreakdown {
        let mut tally: BTreeMap<Category, (usize, usize)> =
            categories.into_iter().map(|c| (c, (0, 0))).collect();

        for control in controls {
            if let Some((conforming, total)) = tally.get_mut(&control.category) {
                *total += 1;
                if control.status.counts_as_conforming() {
                    *conforming += 1;
                }
            }
        }

        let categories = tally
            .into_iter()
            .map(|(category, (conforming, total))| {
                let percentage = if total > 0 {
                    round_to(conforming as f64 * 100.0 / total as f64, 1)
                } else {
                    0.0
                };
                (category, CategoryShare { conforming, total, percentage })
            })
            .collect();

        CategoryBreakdown { categories }
    }
}

/// Rate thresholds used for coloring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandThresholds {
    pub satisfactory: f64,
    pub in_progress: f64,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            satisfactory: 80.0,
            in_progress: 50.0,
        }
    }
}

/// Threshold band of a percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateBand {
    Satisfactory,
    InProgress,
    Critical,
}

impl RateBand {
    /// Classify a percentage
    pub fn classify(rate: f64, thresholds: &BandThresholds) -> Self {
        if rate >= thresholds.satisfactory {
            Self::Satisfactory
        } else if rate >= thresholds.in_progress {
            Self::InProgress
        } else {
            Self::Critical
        }
    }

    /// User-facing label
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Satisfactory => "Conforme",
            Self::InProgress => "En progression",
            Self::Critical => "Non conforme",
        }
    }
}

/// At-risk count thresholds (strictly greater than)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub elevated: usize,
    pub high: usize,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self { elevated: 5, high: 10 }
    }
}

/// Exposure implied by the number of at-risk controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Elevated,
    High,
}

impl RiskLevel {
    /// Classify an at-risk count
    pub fn classify(at_risk: usize, thresholds: &RiskThresholds) -> Self {
        if at_risk > thresholds.high {
            Self::High
        } else if at_risk > thresholds.elevated {
            Self::Elevated
        } else {
            Self::Low
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Low => "Faible",
            Self::Elevated => "Élevé",
            Self::High => "Critique",
        }
    }
}

/// Direction between two successive scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

impl Trend {
    /// Compare two scores; moves within `tolerance` count as stable
    pub fn between(previous: f64, current: f64, tolerance: f64) -> Self {
        let delta = current - previous;
        if delta > tolerance {
            Self::Improving
        } else if delta < -tolerance {
            Self::Declining
        } else {
            Self::Stable
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Improving => "En amélioration",
            Self::Stable => "Stable",
            Self::Declining => "En baisse",
        }
    }
}

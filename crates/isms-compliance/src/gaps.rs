//! Gap analysis
//!
//! Every control below "largely conforming" is a gap with a remediation
//! priority and a target delay derived from its status.

use chrono::{DateTime, Duration, Utc};
use isms_common::{Category, ConformityStatus, Control};
use serde::{Deserialize, Serialize};

/// Remediation urgency, most urgent first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPriority {
    Immediate,
    High,
    Planned,
}

impl GapPriority {
    /// Priority for a status, `None` when the control is not a gap
    pub fn for_status(status: ConformityStatus) -> Option<Self> {
        match status {
            ConformityStatus::NonConforming => Some(Self::Immediate),
            ConformityStatus::WeaklyConforming => Some(Self::High),
            ConformityStatus::PartiallyConforming => Some(Self::Planned),
            ConformityStatus::LargelyConforming | ConformityStatus::Conforming => None,
        }
    }

    pub const fn target_days(&self) -> i64 {
        match self {
            Self::Immediate => 7,
            Self::High => 30,
            Self::Planned => 90,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Immediate => "Immédiate",
            Self::High => "Haute",
            Self::Planned => "Planifiée",
        }
    }
}

/// A control that still needs work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub code: String,
    pub title: String,
    pub category: Category,
    pub status: ConformityStatus,
    pub priority: GapPriority,
    pub target_days: i64,
    pub due: DateTime<Utc>,
}

/// Gaps ordered by priority, then natural code order
pub fn analyze<'a>(controls: impl IntoIterator<Item = &'a Control>, now: DateTime<Utc>) -> Vec<Gap> {
    let mut gaps: Vec<(&'a Control, GapPriority)> = controls
        .into_iter()
        .filter_map(|c| GapPriority::for_status(c.status).map(|p| (c, p)))
        .collect();
    gaps.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.code.cmp(&b.0.code)));

    gaps.into_iter()
        .map(|(control, priority)| Gap {
            code: control.code.to_string(),
            title: control.title.clone(),
            category: control.category,
            status: control.status,
            priority,
            target_days: priority.target_days(),
            due: now + Duration::days(priority.target_days()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use isms_common::{ControlCode, ControlId, NewControl};

    fn control(id: i64, code: &str, status: ConformityStatus) -> Control {
        let code = ControlCode::new(code).unwrap();
        let category = Category::for_code(&code).unwrap();
        NewControl::new(code, "test", category)
            .with_status(status)
            .into_control(ControlId::new(id), Utc::now())
    }

    #[test]
    fn test_gaps_exclude_largely_and_better() {
        let controls = vec![
            control(1, "5.1", ConformityStatus::Conforming),
            control(2, "5.2", ConformityStatus::LargelyConforming),
            control(3, "5.3", ConformityStatus::PartiallyConforming),
        ];
        let gaps = analyze(&controls, Utc::now());
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].priority, GapPriority::Planned);
        assert_eq!(gaps[0].target_days, 90);
    }

    #[test]
    fn test_gaps_ordered_by_priority_then_code() {
        let now = Utc::now();
        let controls = vec![
            control(1, "8.10", ConformityStatus::NonConforming),
            control(2, "5.4", ConformityStatus::PartiallyConforming),
            control(3, "8.9", ConformityStatus::NonConforming),
            control(4, "6.1", ConformityStatus::WeaklyConforming),
        ];
        let gaps = analyze(&controls, now);
        let order: Vec<&str> = gaps.iter().map(|g| g.code.as_str()).collect();
        assert_eq!(order, vec!["8.9", "8.10", "6.1", "5.4"]);
        assert_eq!(gaps[0].due, now + Duration::days(7));
        assert_eq!(gaps[2].priority, GapPriority::High);
    }
}

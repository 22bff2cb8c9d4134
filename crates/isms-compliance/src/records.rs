//! Audit, directive and document records
//!
//! Plain CRUD records kept next to the controls. The only derived value is
//! the audit history summary. Documents are revised in place: a revision
//! replaces content and version and refreshes `updated_at`.

use crate::stats::Trend;
use chrono::{DateTime, NaiveDate, Utc};
use isms_common::{round_to, IsmsError, IsmsResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of an audit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditState {
    Planned,
    InProgress,
    Completed,
    Postponed,
}

impl AuditState {
    pub const ALL: [AuditState; 4] = [
        Self::Planned,
        Self::InProgress,
        Self::Completed,
        Self::Postponed,
    ];

    pub const fn key(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Postponed => "postponed",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Planned => "Planifié",
            Self::InProgress => "En cours",
            Self::Completed => "Terminé",
            Self::Postponed => "Reporté",
        }
    }

    pub fn parse(value: &str) -> IsmsResult<Self> {
        parse_labelled(value, &Self::ALL, Self::key, Self::label)
            .ok_or_else(|| IsmsError::Config(format!("unknown audit state: {}", value)))
    }
}

impl fmt::Display for AuditState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Recorded audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: i64,
    pub title: String,
    pub audit_date: NaiveDate,
    pub auditor: String,
    pub state: AuditState,
    /// Overall result in percent, absent until the audit is scored
    pub score: Option<u8>,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Audit awaiting insertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAudit {
    pub title: String,
    pub audit_date: NaiveDate,
    pub auditor: String,
    pub state: AuditState,
    pub score: Option<u8>,
    pub comments: Option<String>,
}

impl NewAudit {
    pub fn new(title: impl Into<String>, audit_date: NaiveDate, auditor: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            audit_date,
            auditor: auditor.into(),
            state: AuditState::Planned,
            score: None,
            comments: None,
        }
    }

    pub fn with_state(mut self, state: AuditState) -> Self {
        self.state = state;
        self
    }

    pub fn with_score(mut self, score: u8) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_comments(mut self, comments: Option<String>) -> Self {
        self.comments = comments.filter(|c| !c.trim().is_empty());
        self
    }

    /// Title required, score within [0, 100]
    pub fn validate(&self) -> IsmsResult<()> {
        if self.title.trim().is_empty() {
            return Err(IsmsError::Config("audit title must not be empty".into()));
        }
        if let Some(score) = self.score {
            if score > 100 {
                return Err(IsmsError::OutOfRange(format!(
                    "audit score {} outside [0, 100]",
                    score
                )));
            }
        }
        Ok(())
    }

    pub fn into_record(self, id: i64, at: DateTime<Utc>) -> AuditRecord {
        AuditRecord {
            id,
            title: self.title,
            audit_date: self.audit_date,
            auditor: self.auditor,
            state: self.state,
            score: self.score,
            comments: self.comments,
            created_at: at,
        }
    }
}

/// Summary over the scored audits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditHistory {
    pub count: usize,
    pub average: f64,
    pub min: u8,
    pub max: u8,
    pub last: Option<u8>,
    pub trend: Trend,
}

impl AuditHistory {
    /// Summarise audits in any order; unscored audits are ignored
    pub fn from_audits(audits: &[AuditRecord], tolerance: f64) -> Self {
        let mut scored: Vec<(NaiveDate, i64, u8)> = audits
            .iter()
            .filter_map(|a| a.score.map(|s| (a.audit_date, a.id, s)))
            .collect();
        scored.sort();

        let scores: Vec<u8> = scored.into_iter().map(|(_, _, s)| s).collect();
        if scores.is_empty() {
            return Self {
                count: 0,
                average: 0.0,
                min: 0,
                max: 0,
                last: None,
                trend: Trend::Stable,
            };
        }

        let sum: u32 = scores.iter().map(|s| u32::from(*s)).sum();
        let trend = match scores.as_slice() {
            [.., previous, current] => Trend::between(f64::from(*previous), f64::from(*current), tolerance),
            _ => Trend::Stable,
        };

        Self {
            count: scores.len(),
            average: round_to(f64::from(sum) / scores.len() as f64, 1),
            min: scores.iter().copied().min().unwrap_or(0),
            max: scores.iter().copied().max().unwrap_or(0),
            last: scores.last().copied(),
            trend,
        }
    }
}

/// Nature of a directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveKind {
    Technical,
    Organisational,
    Procedural,
    Policy,
}

impl DirectiveKind {
    pub const ALL: [DirectiveKind; 4] = [
        Self::Technical,
        Self::Organisational,
        Self::Procedural,
        Self::Policy,
    ];

    pub const fn key(&self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Organisational => "organisational",
            Self::Procedural => "procedural",
            Self::Policy => "policy",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Technical => "Technique",
            Self::Organisational => "Organisationnelle",
            Self::Procedural => "Procédurale",
            Self::Policy => "Politique",
        }
    }

    pub fn parse(value: &str) -> IsmsResult<Self> {
        parse_labelled(value, &Self::ALL, Self::key, Self::label)
            .ok_or_else(|| IsmsError::Config(format!("unknown directive kind: {}", value)))
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Assessed effectiveness of a directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effectiveness {
    High,
    Medium,
    Low,
    NeedsImprovement,
}

impl Effectiveness {
    pub const ALL: [Effectiveness; 4] = [
        Self::High,
        Self::Medium,
        Self::Low,
        Self::NeedsImprovement,
    ];

    pub const fn key(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::NeedsImprovement => "needs_improvement",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::High => "Élevée",
            Self::Medium => "Moyenne",
            Self::Low => "Faible",
            Self::NeedsImprovement => "À améliorer",
        }
    }

    pub fn parse(value: &str) -> IsmsResult<Self> {
        parse_labelled(value, &Self::ALL, Self::key, Self::label)
            .ok_or_else(|| IsmsError::Config(format!("unknown effectiveness: {}", value)))
    }
}

impl fmt::Display for Effectiveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Security directive issued by the ISMS owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directive {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub kind: DirectiveKind,
    pub effectiveness: Effectiveness,
    pub owner: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Directive awaiting insertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDirective {
    pub title: String,
    pub description: String,
    pub kind: DirectiveKind,
    pub effectiveness: Effectiveness,
    pub owner: Option<String>,
}

impl NewDirective {
    pub fn new(title: impl Into<String>, kind: DirectiveKind) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            kind,
            effectiveness: Effectiveness::Medium,
            owner: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_effectiveness(mut self, effectiveness: Effectiveness) -> Self {
        self.effectiveness = effectiveness;
        self
    }

    pub fn with_owner(mut self, owner: Option<String>) -> Self {
        self.owner = owner.filter(|o| !o.trim().is_empty());
        self
    }

    pub fn validate(&self) -> IsmsResult<()> {
        if self.title.trim().is_empty() {
            return Err(IsmsError::Config("directive title must not be empty".into()));
        }
        Ok(())
    }

    pub fn into_directive(self, id: i64, at: DateTime<Utc>) -> Directive {
        Directive {
            id,
            title: self.title,
            description: self.description,
            kind: self.kind,
            effectiveness: self.effectiveness,
            owner: self.owner,
            created_at: at,
        }
    }
}

/// Versioned ISMS document, such as the security policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub title: String,
    /// Free-form register, e.g. `Politique`
    pub category: String,
    pub version: String,
    pub content: String,
    pub author: String,
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Document awaiting insertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDocument {
    pub title: String,
    pub category: String,
    pub version: String,
    pub content: String,
    pub author: String,
    pub file_path: Option<String>,
}

impl NewDocument {
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        version: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            version: version.into(),
            content: String::new(),
            author: author.into(),
            file_path: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_file_path(mut self, file_path: Option<String>) -> Self {
        self.file_path = file_path.filter(|p| !p.trim().is_empty());
        self
    }

    /// Title, category, version and author are required
    pub fn validate(&self) -> IsmsResult<()> {
        for (field, value) in [
            ("title", &self.title),
            ("category", &self.category),
            ("version", &self.version),
            ("author", &self.author),
        ] {
            if value.trim().is_empty() {
                return Err(IsmsError::Config(format!("document {} must not be empty", field)));
            }
        }
        Ok(())
    }

    pub fn into_document(self, id: i64, at: DateTime<Utc>) -> Document {
        Document {
            id,
            title: self.title,
            category: self.category,
            version: self.version,
            content: self.content,
            author: self.author,
            file_path: self.file_path,
            created_at: at,
            updated_at: at,
        }
    }
}

/// New content and version for an existing document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRevision {
    pub version: String,
    pub content: String,
}

impl DocumentRevision {
    pub fn new(version: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            content: content.into(),
        }
    }

    pub fn validate(&self) -> IsmsResult<()> {
        if self.version.trim().is_empty() {
            return Err(IsmsError::Config("document version must not be empty".into()));
        }
        Ok(())
    }
}

impl Document {
    /// Apply a revision in place
    pub fn revise(&mut self, revision: &DocumentRevision, at: DateTime<Utc>) {
        self.version = revision.version.clone();
        self.content = revision.content.clone();
        self.updated_at = at;
    }
}

fn parse_labelled<T: Copy>(
    value: &str,
    all: &[T],
    key: fn(&T) -> &'static str,
    label: fn(&T) -> &'static str,
) -> Option<T> {
    let needle = value.trim().to_lowercase();
    all.iter()
        .copied()
        .find(|v| key(v) == needle || label(v).to_lowercase() == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audit(id: i64, day: u32, score: Option<u8>) -> AuditRecord {
        let date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        let mut new = NewAudit::new(format!("Audit {}", id), date, "J. Martin");
        new.score = score;
        new.into_record(id, Utc::now())
    }

    #[test]
    fn test_history_over_scored_audits() {
        let audits = vec![audit(3, 20, Some(82)), audit(1, 1, Some(60)), audit(2, 10, Some(70)), audit(4, 25, None)];
        let history = AuditHistory::from_audits(&audits, 2.0);
        assert_eq!(history.count, 3);
        assert_eq!(history.average, 70.7);
        assert_eq!(history.min, 60);
        assert_eq!(history.max, 82);
        assert_eq!(history.last, Some(82));
        assert_eq!(history.trend, Trend::Improving);
    }

    #[test]
    fn test_history_declining_and_stable() {
        let audits = vec![audit(1, 1, Some(80)), audit(2, 2, Some(65))];
        assert_eq!(AuditHistory::from_audits(&audits, 2.0).trend, Trend::Declining);

        let audits = vec![audit(1, 1, Some(80)), audit(2, 2, Some(81))];
        assert_eq!(AuditHistory::from_audits(&audits, 2.0).trend, Trend::Stable);
    }

    #[test]
    fn test_empty_history() {
        let history = AuditHistory::from_audits(&[], 2.0);
        assert_eq!(history.count, 0);
        assert_eq!(history.average, 0.0);
        assert_eq!(history.trend, Trend::Stable);
    }

    #[test]
    fn test_audit_validation() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert!(NewAudit::new("Surveillance", date, "A").with_score(100).validate().is_ok());
        let err = NewAudit::new("Surveillance", date, "A").with_score(101).validate().unwrap_err();
        assert!(matches!(err, IsmsError::OutOfRange(_)));
        assert!(NewAudit::new("  ", date, "A").validate().is_err());
    }

    #[test]
    fn test_document_validation_and_revision() {
        let new = NewDocument::new("Politique de sécurité", "Politique", "1.0", "RSSI")
            .with_content("Objectifs et périmètre")
            .with_file_path(Some(" ".into()));
        new.validate().unwrap();
        assert!(new.file_path.is_none());
        assert!(NewDocument::new("PSSI", "Politique", "", "RSSI").validate().is_err());
        assert!(NewDocument::new("PSSI", "Politique", "1.0", " ").validate().is_err());

        let created = Utc::now();
        let mut document = new.into_document(1, created);
        assert_eq!(document.updated_at, created);

        let later = created + chrono::Duration::days(30);
        document.revise(&DocumentRevision::new("1.1", "Périmètre étendu au cloud"), later);
        assert_eq!(document.version, "1.1");
        assert_eq!(document.content, "Périmètre étendu au cloud");
        assert_eq!(document.created_at, created);
        assert_eq!(document.updated_at, later);
        assert!(DocumentRevision::new("  ", "x").validate().is_err());
    }

    #[test]
    fn test_labels_parse_both_forms() {
        assert_eq!(AuditState::parse("En cours").unwrap(), AuditState::InProgress);
        assert_eq!(AuditState::parse("completed").unwrap(), AuditState::Completed);
        assert_eq!(DirectiveKind::parse("procédurale").unwrap(), DirectiveKind::Procedural);
        assert_eq!(Effectiveness::parse("À AMÉLIORER").unwrap(), Effectiveness::NeedsImprovement);
        assert!(Effectiveness::parse("perfect").is_err());
    }
}

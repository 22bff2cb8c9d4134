//! Compliance Reporting
//!
//! A report is assembled once from an engine snapshot; rendering only
//! formats what is already computed.

use crate::gaps::Gap;
use crate::records::AuditHistory;
use crate::scoring::DomainScores;
use crate::stats::{CategoryBreakdown, ConformityStats, RateBand, RiskLevel};
use chrono::{DateTime, Utc};
use isms_common::{Control, IsmsError, IsmsResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const UTF8_BOM: &str = "\u{feff}";

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
}

impl FromStr for ExportFormat {
    type Err = IsmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(IsmsError::Config(format!("unknown export format: {}", other))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Headline figures shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub stats: ConformityStats,
    pub band: RateBand,
    pub risk: RiskLevel,
    pub breakdown: CategoryBreakdown,
}

/// Everything needed to render a compliance report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub generated_at: DateTime<Utc>,
    pub stats: ConformityStats,
    pub band: RateBand,
    pub risk: RiskLevel,
    pub breakdown: CategoryBreakdown,
    pub gaps: Vec<Gap>,
    pub domain_scores: Option<DomainScores>,
    pub audit_history: Option<AuditHistory>,
    pub controls: Vec<Control>,
}

/// Report generator
#[derive(Debug, Clone, Default)]
pub struct ReportGenerator {
    csv_bom: bool,
}

impl ReportGenerator {
    pub fn new(csv_bom: bool) -> Self {
        Self { csv_bom }
    }

    /// Assemble a report from already computed parts
    pub fn compose(
        &self,
        dashboard: Dashboard,
        gaps: Vec<Gap>,
        controls: Vec<Control>,
        domain_scores: Option<DomainScores>,
        audit_history: Option<AuditHistory>,
    ) -> ComplianceReport {
        ComplianceReport {
            generated_at: Utc::now(),
            stats: dashboard.stats,
            band: dashboard.band,
            risk: dashboard.risk,
            breakdown: dashboard.breakdown,
            gaps,
            domain_scores,
            audit_history,
            controls,
        }
    }

    pub fn render(&self, report: &ComplianceReport, format: ExportFormat) -> IsmsResult<String> {
        match format {
            ExportFormat::Json => serde_json::to_string_pretty(report)
                .map_err(|e| IsmsError::Serialization(e.to_string())),
            ExportFormat::Csv => Ok(self.to_csv(report)),
        }
    }

    fn to_csv(&self, report: &ComplianceReport) -> String {
        let mut csv = String::new();
        if self.csv_bom {
            csv.push_str(UTF8_BOM);
        }
        csv.push_str(&controls_csv(&report.controls));
        if let Some(scores) = &report.domain_scores {
            csv.push('\n');
            csv.push_str(&domain_scores_csv(scores));
        }
        csv
    }
}

/// Controls table with display labels
pub fn controls_csv(controls: &[Control]) -> String {
    let mut csv = csv_row(&[
        "Code",
        "Titre",
        "Catégorie",
        "Statut",
        "Commentaire",
        "Preuve",
        "Dernière mise à jour",
    ]);
    for c in controls {
        csv.push_str(&csv_row(&[
            c.code.as_str(),
            c.title.as_str(),
            c.category.label(),
            c.status.label(),
            c.comment.as_deref().unwrap_or(""),
            c.evidence_ref.as_deref().unwrap_or(""),
            c.last_updated.format("%Y-%m-%d %H:%M:%S").to_string().as_str(),
        ]));
    }
    csv
}

/// One row per domain in canonical order
pub fn domain_scores_csv(scores: &DomainScores) -> String {
    let mut csv = csv_row(&["Domaine", "Libellé", "Score"]);
    for (domain, score) in scores.iter() {
        csv.push_str(&csv_row(&[domain.tag(), domain.label(), score.to_string().as_str()]));
    }
    csv
}

/// One CSV record, quoting fields that need it
pub(crate) fn csv_row(fields: &[&str]) -> String {
    let mut row = fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",");
    row.push('\n');
    row
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

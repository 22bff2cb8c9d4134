//! ISMS Compliance Engine
//!
//! Conformity aggregation and automated signal scoring for ISO 27001.
//!
//! # Parts
//!
//! - **Compliance Aggregator**: turns the status of every Annex-A control
//!   into counts, a weighted conformity rate and per-category shares
//! - **Automated Signal Scorer**: turns a snapshot of host signals into an
//!   advisory 0..=100 score for each of the fourteen ISO 27001:2013 domains
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                        ComplianceEngine                            │
//! │                                                                    │
//! │  ┌─────────────┐   ┌─────────────┐   ┌──────────────────────────┐  │
//! │  │  Aggregator │   │   Scorer    │◄──│ SignalProbe (system/fixed)│  │
//! │  │ stats, bands│   │ 14 domains  │   └──────────────────────────┘  │
//! │  └──────▲──────┘   └──────┬──────┘                                 │
//! │         │                 │                                        │
//! │  ┌──────┴─────────────────▼──────┐   ┌──────────────────────────┐  │
//! │  │   Reports (JSON / CSV)        │   │ Journal (SHA-256 chain)  │  │
//! │  └───────────────────────────────┘   └────────────┬─────────────┘  │
//! │                                                   │                │
//! │  ┌────────────────────────────────────────────────▼─────────────┐  │
//! │  │        ComplianceStore (in-memory | SQLite)                  │  │
//! │  │        controls, audits, directives, documents, journal      │  │
//! │  └──────────────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]

pub mod catalog;
pub mod config;
pub mod filter;
pub mod gaps;
pub mod guidance;
pub mod journal;
pub mod probe;
pub mod records;
pub mod reporting;
pub mod scoring;
pub mod signals;
pub mod stats;
pub mod store;

use chrono::Utc;
use isms_common::{Category, ConformityStatus, Control, ControlCode, ControlId, Evaluation, IsmsResult};
use tracing::{debug, info};

pub use config::EngineConfig;
pub use filter::ControlFilter;
pub use gaps::{Gap, GapPriority};
pub use guidance::GuidanceCache;
pub use journal::{EvaluationEvent, IntegrityReport, JournalEntry};
pub use probe::{FixedProbe, ProbeConfig, SignalProbe, SystemProbe};
pub use records::{
    AuditHistory, AuditRecord, AuditState, Directive, DirectiveKind, Document, DocumentRevision,
    Effectiveness, NewAudit, NewDirective, NewDocument,
};
pub use reporting::{ComplianceReport, Dashboard, ExportFormat, ReportGenerator};
pub use scoring::{DomainScores, IsoDomain, ScoringRules, SignalScorer};
pub use signals::{DomainSignalSnapshot, PatchState, ServiceState};
pub use stats::{Aggregator, CategoryBreakdown, ConformityStats, RateBand, RiskLevel, Trend, WeightTable};
pub use store::{ComplianceStore, InMemoryStore, SqliteStore};

/// Main compliance engine
pub struct ComplianceEngine<S: ComplianceStore> {
    store: S,
    aggregator: Aggregator,
    scorer: SignalScorer,
    reports: ReportGenerator,
    guidance: GuidanceCache,
    config: EngineConfig,
}

impl<S: ComplianceStore> ComplianceEngine<S> {
    /// Create an engine over `store`, validating the configuration
    pub fn new(store: S, config: EngineConfig) -> IsmsResult<Self> {
        config.validate()?;
        let guidance = match &config.guidance_path {
            Some(path) => GuidanceCache::new(path),
            None => GuidanceCache::empty(),
        };
        Ok(Self {
            store,
            aggregator: Aggregator::new(config.weights)?,
            scorer: SignalScorer::new(config.scoring.clone())?,
            reports: ReportGenerator::new(config.csv_bom),
            guidance,
            config,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Load the Annex-A catalogue into an empty store
    ///
    /// Returns the number of controls inserted; a store that already holds
    /// controls is left untouched.
    pub fn seed_catalog(&self) -> IsmsResult<usize> {
        let existing = self.store.count_controls()?;
        if existing > 0 {
            debug!("Catalogue already present ({} controls)", existing);
            return Ok(0);
        }
        let controls = catalog::annex_a()?;
        let count = controls.len();
        for control in controls {
            self.store.insert_control(control)?;
        }
        info!("Seeded {} Annex-A controls", count);
        Ok(count)
    }

    pub fn list_controls(&self, filter: &ControlFilter) -> IsmsResult<Vec<Control>> {
        Ok(filter.apply(self.store.list_controls()?))
    }

    pub fn get_control(&self, id: ControlId) -> IsmsResult<Control> {
        self.store.get_control(id)
    }

    /// Record an evaluation and chain it into the journal
    ///
    /// `status` may be a key or a display label. An unknown status fails
    /// with `InvalidStatus` before anything is written. The status change
    /// and its journal entry are stored together or not at all.
    pub fn evaluate(
        &self,
        id: ControlId,
        status: &str,
        comment: Option<String>,
        evidence_ref: Option<String>,
        actor: &str,
    ) -> IsmsResult<Control> {
        let status = ConformityStatus::parse(status)?;
        let evaluation = Evaluation::new(status)
            .with_comment(comment)
            .with_evidence(evidence_ref);

        let (updated, entry) = self.store.record_evaluation(id, &evaluation, actor)?;

        info!(
            "Control {} evaluated by {}: {} -> {}",
            updated.code,
            actor,
            entry.previous_status.label(),
            entry.new_status.label()
        );
        Ok(updated)
    }

    pub fn stats(&self) -> IsmsResult<ConformityStats> {
        Ok(self.aggregator.compute_stats(&self.store.list_controls()?))
    }

    pub fn category_breakdown(&self) -> IsmsResult<CategoryBreakdown> {
        Ok(self
            .aggregator
            .category_breakdown(&self.store.list_controls()?, Category::ALL))
    }

    /// Headline figures computed from one snapshot of the controls
    pub fn dashboard(&self) -> IsmsResult<Dashboard> {
        let controls = self.store.list_controls()?;
        Ok(self.dashboard_from(&controls))
    }

    fn dashboard_from(&self, controls: &[Control]) -> Dashboard {
        let stats = self.aggregator.compute_stats(controls);
        Dashboard {
            band: RateBand::classify(stats.weighted_rate, &self.config.bands),
            risk: RiskLevel::classify(stats.at_risk(), &self.config.risk),
            breakdown: self.aggregator.category_breakdown(controls, Category::ALL),
            stats,
        }
    }

    pub fn gaps(&self) -> IsmsResult<Vec<Gap>> {
        Ok(gaps::analyze(&self.store.list_controls()?, Utc::now()))
    }

    /// Advisory domain scores for an already collected snapshot
    pub fn score_signals(&self, snapshot: &DomainSignalSnapshot) -> DomainScores {
        self.scorer.score_all(snapshot)
    }

    /// Collect signals through `probe` and score them
    pub async fn run_automated_scoring(&self, probe: &dyn SignalProbe) -> DomainScores {
        let snapshot = probe.collect().await;
        info!(
            "Collected {} of 6 signals, scoring {} domains",
            snapshot.known_signals(),
            IsoDomain::ALL.len()
        );
        self.scorer.score_all(&snapshot)
    }

    /// Assemble a full report; pass scores from a previous scan to include them
    pub fn report(&self, domain_scores: Option<DomainScores>) -> IsmsResult<ComplianceReport> {
        let controls = self.store.list_controls()?;
        let dashboard = self.dashboard_from(&controls);
        let gaps = gaps::analyze(&controls, Utc::now());
        let audits = self.store.list_audits()?;
        let history = (!audits.is_empty())
            .then(|| AuditHistory::from_audits(&audits, self.config.trend_tolerance));
        info!(
            "Report assembled: {} controls, rate {:.2}, {} gaps",
            controls.len(),
            dashboard.stats.weighted_rate,
            gaps.len()
        );
        Ok(self.reports.compose(dashboard, gaps, controls, domain_scores, history))
    }

    pub fn render_report(&self, report: &ComplianceReport, format: ExportFormat) -> IsmsResult<String> {
        self.reports.render(report, format)
    }

    pub fn add_audit(&self, audit: NewAudit) -> IsmsResult<AuditRecord> {
        let record = self.store.add_audit(audit)?;
        info!("Audit {} recorded: {}", record.id, record.title);
        Ok(record)
    }

    pub fn list_audits(&self) -> IsmsResult<Vec<AuditRecord>> {
        self.store.list_audits()
    }

    pub fn get_audit(&self, id: i64) -> IsmsResult<AuditRecord> {
        self.store.get_audit(id)
    }

    pub fn delete_audit(&self, id: i64) -> IsmsResult<()> {
        self.store.delete_audit(id)?;
        info!("Audit {} deleted", id);
        Ok(())
    }

    pub fn audit_history(&self) -> IsmsResult<AuditHistory> {
        Ok(AuditHistory::from_audits(
            &self.store.list_audits()?,
            self.config.trend_tolerance,
        ))
    }

    pub fn add_directive(&self, directive: NewDirective) -> IsmsResult<Directive> {
        let directive = self.store.add_directive(directive)?;
        info!("Directive {} recorded: {}", directive.id, directive.title);
        Ok(directive)
    }

    pub fn list_directives(&self) -> IsmsResult<Vec<Directive>> {
        self.store.list_directives()
    }

    pub fn delete_directive(&self, id: i64) -> IsmsResult<()> {
        self.store.delete_directive(id)?;
        info!("Directive {} deleted", id);
        Ok(())
    }

    pub fn add_document(&self, document: NewDocument) -> IsmsResult<Document> {
        let document = self.store.add_document(document)?;
        info!(
            "Document {} recorded: {} v{}",
            document.id, document.title, document.version
        );
        Ok(document)
    }

    pub fn list_documents(&self, category: Option<&str>) -> IsmsResult<Vec<Document>> {
        self.store.list_documents(category)
    }

    pub fn get_document(&self, id: i64) -> IsmsResult<Document> {
        self.store.get_document(id)
    }

    /// Replace a document's content under a new version
    pub fn revise_document(&self, id: i64, revision: DocumentRevision) -> IsmsResult<Document> {
        let document = self.store.update_document(id, &revision)?;
        info!("Document {} revised to v{}", document.id, document.version);
        Ok(document)
    }

    pub fn journal(&self) -> IsmsResult<Vec<JournalEntry>> {
        self.store.journal_entries()
    }

    pub fn verify_journal(&self) -> IsmsResult<IntegrityReport> {
        let report = journal::verify_integrity(&self.store.journal_entries()?);
        if !report.valid {
            tracing::warn!("Journal integrity check failed: {:?}", report.error);
        }
        Ok(report)
    }

    pub fn export_journal(&self, format: ExportFormat) -> IsmsResult<String> {
        journal::export(&self.store.journal_entries()?, format)
    }

    /// Guidance text for a control, accepting `A.`-prefixed codes
    pub fn guidance(&self, code: &str) -> Option<String> {
        match ControlCode::new(code) {
            Ok(code) => self.guidance.get(code.as_str()),
            Err(_) => self.guidance.get(code),
        }
    }
}

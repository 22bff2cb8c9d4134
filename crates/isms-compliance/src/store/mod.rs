//! Store boundary
//!
//! Persistence abstraction for controls, audits, directives, documents and
//! the evaluation journal. Mutations are all-or-nothing: a failed call
//! leaves the stored state untouched.

mod memory;
mod sqlite;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

use crate::journal::JournalEntry;
use crate::records::{
    AuditRecord, Directive, Document, DocumentRevision, NewAudit, NewDirective, NewDocument,
};
use isms_common::{Control, ControlId, Evaluation, IsmsResult, NewControl};

/// Compliance store
pub trait ComplianceStore: Send + Sync {
    /// Insert a control; fails with `DuplicateCode` if the code exists
    fn insert_control(&self, control: NewControl) -> IsmsResult<Control>;

    /// All controls in natural code order, read as one snapshot
    fn list_controls(&self) -> IsmsResult<Vec<Control>>;

    fn get_control(&self, id: ControlId) -> IsmsResult<Control>;

    /// Apply an evaluation and append its journal entry as one unit
    ///
    /// The entry is built with [`JournalEntry::for_transition`] against the
    /// current last entry. Either the status change and the entry are both
    /// stored or neither is.
    fn record_evaluation(
        &self,
        id: ControlId,
        evaluation: &Evaluation,
        actor: &str,
    ) -> IsmsResult<(Control, JournalEntry)>;

    fn count_controls(&self) -> IsmsResult<usize> {
        Ok(self.list_controls()?.len())
    }

    fn add_audit(&self, audit: NewAudit) -> IsmsResult<AuditRecord>;

    /// Most recent audit date first
    fn list_audits(&self) -> IsmsResult<Vec<AuditRecord>>;

    fn get_audit(&self, id: i64) -> IsmsResult<AuditRecord>;

    fn delete_audit(&self, id: i64) -> IsmsResult<()>;

    fn add_directive(&self, directive: NewDirective) -> IsmsResult<Directive>;

    /// Newest first
    fn list_directives(&self) -> IsmsResult<Vec<Directive>>;

    fn delete_directive(&self, id: i64) -> IsmsResult<()>;

    fn add_document(&self, document: NewDocument) -> IsmsResult<Document>;

    /// Newest first, optionally restricted to one category
    fn list_documents(&self, category: Option<&str>) -> IsmsResult<Vec<Document>>;

    fn get_document(&self, id: i64) -> IsmsResult<Document>;

    /// Replace content and version, refreshing `updated_at`
    fn update_document(&self, id: i64, revision: &DocumentRevision) -> IsmsResult<Document>;

    /// Insertion order
    fn journal_entries(&self) -> IsmsResult<Vec<JournalEntry>>;

    fn last_journal_entry(&self) -> IsmsResult<Option<JournalEntry>> {
        Ok(self.journal_entries()?.pop())
    }
}

#[cfg(test)]
pub(crate) mod contract {
    //! Behaviour every store implementation must share

    use super::*;
    use crate::journal::{verify_integrity, GENESIS_HASH};
    use crate::records::{AuditState, DirectiveKind};
    use chrono::NaiveDate;
    use isms_common::{Category, ConformityStatus, ControlCode, IsmsError};

    fn new_control(code: &str) -> NewControl {
        let code = ControlCode::new(code).unwrap();
        let category = Category::for_code(&code).unwrap();
        let title = format!("Control {}", code);
        NewControl::new(code, title, category)
    }

    pub fn controls_roundtrip(store: &dyn ComplianceStore) {
        for code in ["5.10", "8.1", "5.9", "6.3"] {
            store.insert_control(new_control(code)).unwrap();
        }
        let codes: Vec<String> = store
            .list_controls()
            .unwrap()
            .iter()
            .map(|c| c.code.to_string())
            .collect();
        assert_eq!(codes, vec!["5.9", "5.10", "6.3", "8.1"]);
        assert_eq!(store.count_controls().unwrap(), 4);

        let err = store.insert_control(new_control("5.9")).unwrap_err();
        assert!(matches!(err, IsmsError::DuplicateCode(_)));
        let err = store.insert_control(new_control("A.05.09")).unwrap_err();
        assert!(matches!(err, IsmsError::DuplicateCode(ref code) if code == "5.9"));
        assert_eq!(store.count_controls().unwrap(), 4);
    }

    pub fn record_evaluation(store: &dyn ComplianceStore) {
        let created = store.insert_control(new_control("8.7")).unwrap();
        assert_eq!(created.status, ConformityStatus::NonConforming);

        let evaluation = Evaluation::new(ConformityStatus::LargelyConforming)
            .with_comment(Some("EDR on 90% of endpoints".into()))
            .with_evidence(Some("DOC-12".into()));
        let (updated, entry) = store.record_evaluation(created.id, &evaluation, "auditor").unwrap();
        assert_eq!(updated.status, ConformityStatus::LargelyConforming);
        assert!(updated.last_updated >= created.last_updated);
        assert_eq!(entry.previous_status, ConformityStatus::NonConforming);
        assert_eq!(entry.new_status, ConformityStatus::LargelyConforming);
        assert_eq!(entry.prev_hash, GENESIS_HASH);

        let fetched = store.get_control(created.id).unwrap();
        assert_eq!(fetched.comment.as_deref(), Some("EDR on 90% of endpoints"));
        assert_eq!(fetched.evidence_ref.as_deref(), Some("DOC-12"));
        assert_eq!(store.last_journal_entry().unwrap(), Some(entry));

        let missing = ControlId::new(created.id.get() + 100);
        let err = store.record_evaluation(missing, &evaluation, "auditor").unwrap_err();
        assert!(err.is_not_found());
        assert!(store.get_control(missing).unwrap_err().is_not_found());
        assert_eq!(store.journal_entries().unwrap().len(), 1);
    }

    pub fn audits(store: &dyn ComplianceStore) {
        let day = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
        let first = store
            .add_audit(NewAudit::new("Interne", day(2), "Alice").with_score(70))
            .unwrap();
        let second = store
            .add_audit(
                NewAudit::new("Certification", day(20), "Bob")
                    .with_state(AuditState::Completed)
                    .with_score(85),
            )
            .unwrap();

        let listed = store.list_audits().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(store.get_audit(first.id).unwrap().score, Some(70));

        store.delete_audit(first.id).unwrap();
        assert!(store.delete_audit(first.id).unwrap_err().is_not_found());
        assert!(store.get_audit(first.id).unwrap_err().is_not_found());

        let invalid = NewAudit::new("Bad", day(1), "Eve").with_score(120);
        assert!(store.add_audit(invalid).is_err());
        assert_eq!(store.list_audits().unwrap().len(), 1);
    }

    pub fn directives(store: &dyn ComplianceStore) {
        let first = store
            .add_directive(NewDirective::new("MFA obligatoire", DirectiveKind::Technical))
            .unwrap();
        let second = store
            .add_directive(NewDirective::new("Charte", DirectiveKind::Policy))
            .unwrap();
        let listed = store.list_directives().unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);

        store.delete_directive(first.id).unwrap();
        assert!(store.delete_directive(first.id).unwrap_err().is_not_found());
        assert_eq!(store.list_directives().unwrap().len(), 1);
    }

    pub fn documents(store: &dyn ComplianceStore) {
        let policy = store
            .add_document(
                NewDocument::new("Politique de sécurité", "Politique", "1.0", "RSSI")
                    .with_content("Version initiale"),
            )
            .unwrap();
        let charter = store
            .add_document(NewDocument::new("Charte informatique", "Charte", "2.3", "DSI"))
            .unwrap();
        let policy_v2 = store
            .add_document(NewDocument::new("Politique de sécurité", "Politique", "2.0", "RSSI"))
            .unwrap();

        let all = store.list_documents(None).unwrap();
        let ids: Vec<i64> = all.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![policy_v2.id, charter.id, policy.id]);
        let policies = store.list_documents(Some("Politique")).unwrap();
        assert_eq!(policies.len(), 2);
        assert!(policies.iter().all(|d| d.category == "Politique"));
        assert!(store.list_documents(Some("Procédure")).unwrap().is_empty());

        let revised = store
            .update_document(policy.id, &DocumentRevision::new("1.1", "Ajout du télétravail"))
            .unwrap();
        assert_eq!(revised.version, "1.1");
        assert_eq!(revised.created_at, policy.created_at);
        assert!(revised.updated_at >= policy.updated_at);
        assert_eq!(store.get_document(policy.id).unwrap().content, "Ajout du télétravail");

        assert!(store
            .update_document(policy.id + 100, &DocumentRevision::new("9", ""))
            .unwrap_err()
            .is_not_found());
        assert!(store
            .update_document(policy.id, &DocumentRevision::new(" ", "vide"))
            .is_err());
        assert_eq!(store.get_document(policy.id).unwrap().version, "1.1");
        assert!(store
            .add_document(NewDocument::new("", "Politique", "1.0", "RSSI"))
            .is_err());
        assert_eq!(store.list_documents(None).unwrap().len(), 3);
    }

    pub fn journal(store: &dyn ComplianceStore) {
        assert!(store.last_journal_entry().unwrap().is_none());
        let mut ids = Vec::new();
        for code in ["5.1", "5.2", "5.3"] {
            ids.push(store.insert_control(new_control(code)).unwrap().id);
        }
        let partial = Evaluation::new(ConformityStatus::PartiallyConforming);
        for id in &ids {
            store.record_evaluation(*id, &partial, "auditor").unwrap();
        }
        store
            .record_evaluation(ids[0], &Evaluation::new(ConformityStatus::Conforming), "auditor")
            .unwrap();

        let entries = store.journal_entries().unwrap();
        let codes: Vec<&str> = entries.iter().map(|e| e.control_code.as_str()).collect();
        assert_eq!(codes, vec!["5.1", "5.2", "5.3", "5.1"]);
        assert_eq!(entries[3].previous_status, ConformityStatus::PartiallyConforming);
        assert!(verify_integrity(&entries).valid);
    }
}

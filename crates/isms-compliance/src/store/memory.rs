//! In-memory store (tests, demos, offline use)

use super::ComplianceStore;
use crate::journal::JournalEntry;
use crate::records::{
    AuditRecord, Directive, Document, DocumentRevision, NewAudit, NewDirective, NewDocument,
};
use chrono::Utc;
use isms_common::{
    Control, ControlId, Evaluation, IsmsError, IsmsResult, NewControl, RecordKind,
};
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Default)]
struct Tables {
    controls: BTreeMap<i64, Control>,
    audits: BTreeMap<i64, AuditRecord>,
    directives: BTreeMap<i64, Directive>,
    documents: BTreeMap<i64, Document>,
    journal: Vec<JournalEntry>,
    next_id: i64,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Store backed by process memory
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ComplianceStore for InMemoryStore {
    fn insert_control(&self, control: NewControl) -> IsmsResult<Control> {
        let mut tables = self.tables.write();
        if tables.controls.values().any(|c| c.code == control.code) {
            return Err(IsmsError::DuplicateCode(control.code.to_string()));
        }
        let id = tables.allocate_id();
        let control = control.into_control(ControlId::new(id), Utc::now());
        tables.controls.insert(id, control.clone());
        Ok(control)
    }

    fn list_controls(&self) -> IsmsResult<Vec<Control>> {
        let mut controls: Vec<Control> = self.tables.read().controls.values().cloned().collect();
        controls.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(controls)
    }

    fn get_control(&self, id: ControlId) -> IsmsResult<Control> {
        self.tables
            .read()
            .controls
            .get(&id.get())
            .cloned()
            .ok_or_else(|| IsmsError::not_found(RecordKind::Control, id.get()))
    }

    fn record_evaluation(
        &self,
        id: ControlId,
        evaluation: &Evaluation,
        actor: &str,
    ) -> IsmsResult<(Control, JournalEntry)> {
        let mut tables = self.tables.write();
        let previous = tables
            .controls
            .get(&id.get())
            .cloned()
            .ok_or_else(|| IsmsError::not_found(RecordKind::Control, id.get()))?;

        let mut updated = previous.clone();
        updated.apply_evaluation(evaluation, Utc::now());
        let entry = JournalEntry::for_transition(actor, &previous, &updated, tables.journal.last());

        // Both writes below are infallible
        tables.journal.push(entry.clone());
        tables.controls.insert(id.get(), updated.clone());
        Ok((updated, entry))
    }

    fn count_controls(&self) -> IsmsResult<usize> {
        Ok(self.tables.read().controls.len())
    }

    fn add_audit(&self, audit: NewAudit) -> IsmsResult<AuditRecord> {
        audit.validate()?;
        let mut tables = self.tables.write();
        let id = tables.allocate_id();
        let record = audit.into_record(id, Utc::now());
        tables.audits.insert(id, record.clone());
        Ok(record)
    }

    fn list_audits(&self) -> IsmsResult<Vec<AuditRecord>> {
        let mut audits: Vec<AuditRecord> = self.tables.read().audits.values().cloned().collect();
        audits.sort_by(|a, b| b.audit_date.cmp(&a.audit_date).then(b.id.cmp(&a.id)));
        Ok(audits)
    }

    fn get_audit(&self, id: i64) -> IsmsResult<AuditRecord> {
        self.tables
            .read()
            .audits
            .get(&id)
            .cloned()
            .ok_or_else(|| IsmsError::not_found(RecordKind::Audit, id))
    }

    fn delete_audit(&self, id: i64) -> IsmsResult<()> {
        self.tables
            .write()
            .audits
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| IsmsError::not_found(RecordKind::Audit, id))
    }

    fn add_directive(&self, directive: NewDirective) -> IsmsResult<Directive> {
        directive.validate()?;
        let mut tables = self.tables.write();
        let id = tables.allocate_id();
        let record = directive.into_directive(id, Utc::now());
        tables.directives.insert(id, record.clone());
        Ok(record)
    }

    fn list_directives(&self) -> IsmsResult<Vec<Directive>> {
        Ok(self.tables.read().directives.values().rev().cloned().collect())
    }

    fn delete_directive(&self, id: i64) -> IsmsResult<()> {
        self.tables
            .write()
            .directives
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| IsmsError::not_found(RecordKind::Directive, id))
    }

    fn add_document(&self, document: NewDocument) -> IsmsResult<Document> {
        document.validate()?;
        let mut tables = self.tables.write();
        let id = tables.allocate_id();
        let record = document.into_document(id, Utc::now());
        tables.documents.insert(id, record.clone());
        Ok(record)
    }

    fn list_documents(&self, category: Option<&str>) -> IsmsResult<Vec<Document>> {
        Ok(self
            .tables
            .read()
            .documents
            .values()
            .rev()
            .filter(|d| category.map_or(true, |c| d.category == c))
            .cloned()
            .collect())
    }

    fn get_document(&self, id: i64) -> IsmsResult<Document> {
        self.tables
            .read()
            .documents
            .get(&id)
            .cloned()
            .ok_or_else(|| IsmsError::not_found(RecordKind::Document, id))
    }

    fn update_document(&self, id: i64, revision: &DocumentRevision) -> IsmsResult<Document> {
        revision.validate()?;
        let mut tables = self.tables.write();
        let document = tables
            .documents
            .get_mut(&id)
            .ok_or_else(|| IsmsError::not_found(RecordKind::Document, id))?;
        document.revise(revision, Utc::now());
        Ok(document.clone())
    }

    fn journal_entries(&self) -> IsmsResult<Vec<JournalEntry>> {
        Ok(self.tables.read().journal.clone())
    }

    fn last_journal_entry(&self) -> IsmsResult<Option<JournalEntry>> {
        Ok(self.tables.read().journal.last().cloned())
    }
}

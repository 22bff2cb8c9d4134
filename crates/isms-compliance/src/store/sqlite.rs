//! SQLite store
//!
//! Enumerations are stored as their stable snake_case keys and timestamps
//! as RFC 3339 text. A row whose status text is not one of the five known
//! values is reported as `InvalidStatus` rather than coerced.

use super::ComplianceStore;
use crate::journal::JournalEntry;
use crate::records::{
    AuditRecord, AuditState, Directive, DirectiveKind, Document, DocumentRevision, Effectiveness,
    NewAudit, NewDirective, NewDocument,
};
use chrono::{DateTime, NaiveDate, Utc};
use isms_common::{
    Category, ConformityStatus, Control, ControlCode, ControlId, Evaluation, IsmsError,
    IsmsResult, NewControl, RecordKind,
};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use tracing::debug;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS controls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    category TEXT NOT NULL,
    status TEXT NOT NULL,
    comment TEXT,
    evidence_ref TEXT,
    last_updated TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS audits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    audit_date TEXT NOT NULL,
    auditor TEXT NOT NULL,
    state TEXT NOT NULL,
    score INTEGER,
    comments TEXT,
    created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS directives (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    kind TEXT NOT NULL,
    effectiveness TEXT NOT NULL,
    owner TEXT,
    created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    category TEXT NOT NULL,
    version TEXT NOT NULL,
    content TEXT NOT NULL,
    author TEXT NOT NULL,
    file_path TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS journal (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    timestamp TEXT NOT NULL,
    actor TEXT NOT NULL,
    control_code TEXT NOT NULL,
    previous_status TEXT NOT NULL,
    new_status TEXT NOT NULL,
    comment TEXT,
    prev_hash TEXT NOT NULL,
    hash TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_audits_date ON audits(audit_date);
CREATE INDEX IF NOT EXISTS idx_documents_category ON documents(category);
"#;

const CONTROL_COLUMNS: &str =
    "id, code, title, description, category, status, comment, evidence_ref, last_updated";
const AUDIT_COLUMNS: &str =
    "id, title, audit_date, auditor, state, score, comments, created_at";
const DIRECTIVE_COLUMNS: &str =
    "id, title, description, kind, effectiveness, owner, created_at";
const DOCUMENT_COLUMNS: &str =
    "id, title, category, version, content, author, file_path, created_at, updated_at";
const JOURNAL_COLUMNS: &str =
    "id, timestamp, actor, control_code, previous_status, new_status, comment, prev_hash, hash";

/// Store backed by a SQLite database file
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database and ensure the schema exists
    pub fn open(path: impl AsRef<Path>) -> IsmsResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path).map_err(storage)?;
        debug!(path = %path.display(), "Opened SQLite store");
        Self::with_connection(conn)
    }

    /// Private in-memory database
    pub fn in_memory() -> IsmsResult<Self> {
        Self::with_connection(Connection::open_in_memory().map_err(storage)?)
    }

    fn with_connection(conn: Connection) -> IsmsResult<Self> {
        conn.execute_batch(SCHEMA).map_err(storage)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn storage(e: rusqlite::Error) -> IsmsError {
    IsmsError::Storage(e.to_string())
}

fn parse_time(value: &str) -> IsmsResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| IsmsError::Storage(format!("bad timestamp {:?}: {}", value, e)))
}

fn parse_date(value: &str) -> IsmsResult<NaiveDate> {
    value
        .parse::<NaiveDate>()
        .map_err(|e| IsmsError::Storage(format!("bad date {:?}: {}", value, e)))
}

/// Control row before domain validation
struct ControlRow {
    id: i64,
    code: String,
    title: String,
    description: String,
    category: String,
    status: String,
    comment: Option<String>,
    evidence_ref: Option<String>,
    last_updated: String,
}

impl ControlRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            code: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            category: row.get(4)?,
            status: row.get(5)?,
            comment: row.get(6)?,
            evidence_ref: row.get(7)?,
            last_updated: row.get(8)?,
        })
    }

    fn into_control(self) -> IsmsResult<Control> {
        Ok(Control {
            id: ControlId::new(self.id),
            code: ControlCode::new(&self.code)?,
            title: self.title,
            description: self.description,
            category: Category::parse(&self.category)?,
            status: ConformityStatus::parse(&self.status)?,
            comment: self.comment,
            evidence_ref: self.evidence_ref,
            last_updated: parse_time(&self.last_updated)?,
        })
    }
}

struct AuditRow {
    id: i64,
    title: String,
    audit_date: String,
    auditor: String,
    state: String,
    score: Option<i64>,
    comments: Option<String>,
    created_at: String,
}

impl AuditRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            audit_date: row.get(2)?,
            auditor: row.get(3)?,
            state: row.get(4)?,
            score: row.get(5)?,
            comments: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn into_record(self) -> IsmsResult<AuditRecord> {
        let score = match self.score {
            Some(s) => Some(u8::try_from(s).map_err(|_| {
                IsmsError::OutOfRange(format!("stored audit score {}", s))
            })?),
            None => None,
        };
        Ok(AuditRecord {
            id: self.id,
            title: self.title,
            audit_date: parse_date(&self.audit_date)?,
            auditor: self.auditor,
            state: AuditState::parse(&self.state)?,
            score,
            comments: self.comments,
            created_at: parse_time(&self.created_at)?,
        })
    }
}

struct DirectiveRow {
    id: i64,
    title: String,
    description: String,
    kind: String,
    effectiveness: String,
    owner: Option<String>,
    created_at: String,
}

impl DirectiveRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            kind: row.get(3)?,
            effectiveness: row.get(4)?,
            owner: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn into_directive(self) -> IsmsResult<Directive> {
        Ok(Directive {
            id: self.id,
            title: self.title,
            description: self.description,
            kind: DirectiveKind::parse(&self.kind)?,
            effectiveness: Effectiveness::parse(&self.effectiveness)?,
            owner: self.owner,
            created_at: parse_time(&self.created_at)?,
        })
    }
}

struct DocumentRow {
    id: i64,
    title: String,
    category: String,
    version: String,
    content: String,
    author: String,
    file_path: Option<String>,
    created_at: String,
    updated_at: String,
}

impl DocumentRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            category: row.get(2)?,
            version: row.get(3)?,
            content: row.get(4)?,
            author: row.get(5)?,
            file_path: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    fn into_document(self) -> IsmsResult<Document> {
        Ok(Document {
            id: self.id,
            title: self.title,
            category: self.category,
            version: self.version,
            content: self.content,
            author: self.author,
            file_path: self.file_path,
            created_at: parse_time(&self.created_at)?,
            updated_at: parse_time(&self.updated_at)?,
        })
    }
}

struct JournalRow {
    id: String,
    timestamp: String,
    actor: String,
    control_code: String,
    previous_status: String,
    new_status: String,
    comment: Option<String>,
    prev_hash: String,
    hash: String,
}

impl JournalRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            timestamp: row.get(1)?,
            actor: row.get(2)?,
            control_code: row.get(3)?,
            previous_status: row.get(4)?,
            new_status: row.get(5)?,
            comment: row.get(6)?,
            prev_hash: row.get(7)?,
            hash: row.get(8)?,
        })
    }

    fn into_entry(self) -> IsmsResult<JournalEntry> {
        Ok(JournalEntry {
            id: self.id,
            timestamp: parse_time(&self.timestamp)?,
            actor: self.actor,
            control_code: self.control_code,
            previous_status: ConformityStatus::parse(&self.previous_status)?,
            new_status: ConformityStatus::parse(&self.new_status)?,
            comment: self.comment,
            prev_hash: self.prev_hash,
            hash: self.hash,
        })
    }
}

fn fetch_control(conn: &Connection, id: ControlId) -> IsmsResult<Control> {
    let sql = format!("SELECT {} FROM controls WHERE id = ?1", CONTROL_COLUMNS);
    conn.query_row(&sql, params![id.get()], ControlRow::from_row)
        .optional()
        .map_err(storage)?
        .ok_or_else(|| IsmsError::not_found(RecordKind::Control, id.get()))?
        .into_control()
}

fn fetch_document(conn: &Connection, id: i64) -> IsmsResult<Document> {
    let sql = format!("SELECT {} FROM documents WHERE id = ?1", DOCUMENT_COLUMNS);
    conn.query_row(&sql, params![id], DocumentRow::from_row)
        .optional()
        .map_err(storage)?
        .ok_or_else(|| IsmsError::not_found(RecordKind::Document, id))?
        .into_document()
}

fn fetch_last_entry(conn: &Connection) -> IsmsResult<Option<JournalEntry>> {
    let sql = format!(
        "SELECT {} FROM journal ORDER BY seq DESC LIMIT 1",
        JOURNAL_COLUMNS
    );
    conn.query_row(&sql, [], JournalRow::from_row)
        .optional()
        .map_err(storage)?
        .map(JournalRow::into_entry)
        .transpose()
}

fn insert_entry(conn: &Connection, entry: &JournalEntry) -> IsmsResult<()> {
    conn.execute(
        "INSERT INTO journal (id, timestamp, actor, control_code, previous_status, new_status, comment, prev_hash, hash) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            &entry.id,
            entry.timestamp.to_rfc3339(),
            &entry.actor,
            &entry.control_code,
            entry.previous_status.key(),
            entry.new_status.key(),
            entry.comment.as_deref(),
            &entry.prev_hash,
            &entry.hash,
        ],
    )
    .map_err(storage)?;
    Ok(())
}

impl ComplianceStore for SqliteStore {
    fn insert_control(&self, control: NewControl) -> IsmsResult<Control> {
        let conn = self.conn.lock();
        let exists: Option<i64> = conn
            .query_row(
                "SELECT id FROM controls WHERE code = ?1",
                params![control.code.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(storage)?;
        if exists.is_some() {
            return Err(IsmsError::DuplicateCode(control.code.to_string()));
        }

        conn.execute(
            "INSERT INTO controls (code, title, description, category, status, last_updated) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                control.code.as_str(),
                &control.title,
                &control.description,
                control.category.key(),
                control.status.key(),
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(storage)?;
        fetch_control(&conn, ControlId::new(conn.last_insert_rowid()))
    }

    fn list_controls(&self) -> IsmsResult<Vec<Control>> {
        let conn = self.conn.lock();
        let sql = format!("SELECT {} FROM controls", CONTROL_COLUMNS);
        let mut stmt = conn.prepare(&sql).map_err(storage)?;
        let rows = stmt
            .query_map([], ControlRow::from_row)
            .map_err(storage)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage)?;

        let mut controls = rows
            .into_iter()
            .map(ControlRow::into_control)
            .collect::<IsmsResult<Vec<_>>>()?;
        controls.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(controls)
    }

    fn get_control(&self, id: ControlId) -> IsmsResult<Control> {
        fetch_control(&self.conn.lock(), id)
    }

    fn record_evaluation(
        &self,
        id: ControlId,
        evaluation: &Evaluation,
        actor: &str,
    ) -> IsmsResult<(Control, JournalEntry)> {
        let mut conn = self.conn.lock();
        // Dropping the transaction on an early return rolls it back
        let tx = conn.transaction().map_err(storage)?;

        let previous = fetch_control(&tx, id)?;
        let last = fetch_last_entry(&tx)?;
        tx.execute(
            "UPDATE controls SET status = ?1, comment = ?2, evidence_ref = ?3, last_updated = ?4 WHERE id = ?5",
            params![
                evaluation.status.key(),
                evaluation.comment.as_deref(),
                evaluation.evidence_ref.as_deref(),
                Utc::now().to_rfc3339(),
                id.get(),
            ],
        )
        .map_err(storage)?;
        let updated = fetch_control(&tx, id)?;

        let entry = JournalEntry::for_transition(actor, &previous, &updated, last.as_ref());
        insert_entry(&tx, &entry)?;
        tx.commit().map_err(storage)?;
        Ok((updated, entry))
    }

    fn count_controls(&self) -> IsmsResult<usize> {
        let count: i64 = self
            .conn
            .lock()
            .query_row("SELECT COUNT(*) FROM controls", [], |row| row.get(0))
            .map_err(storage)?;
        Ok(count as usize)
    }

    fn add_audit(&self, audit: NewAudit) -> IsmsResult<AuditRecord> {
        audit.validate()?;
        let conn = self.conn.lock();
        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO audits (title, audit_date, auditor, state, score, comments, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &audit.title,
                audit.audit_date.to_string(),
                &audit.auditor,
                audit.state.key(),
                audit.score.map(i64::from),
                audit.comments.as_deref(),
                created_at.to_rfc3339(),
            ],
        )
        .map_err(storage)?;
        Ok(audit.into_record(conn.last_insert_rowid(), created_at))
    }

    fn list_audits(&self) -> IsmsResult<Vec<AuditRecord>> {
        let conn = self.conn.lock();
        let sql = format!(
            "SELECT {} FROM audits ORDER BY audit_date DESC, id DESC",
            AUDIT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql).map_err(storage)?;
        let rows = stmt
            .query_map([], AuditRow::from_row)
            .map_err(storage)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage)?;
        rows.into_iter().map(AuditRow::into_record).collect()
    }

    fn get_audit(&self, id: i64) -> IsmsResult<AuditRecord> {
        let conn = self.conn.lock();
        let sql = format!("SELECT {} FROM audits WHERE id = ?1", AUDIT_COLUMNS);
        conn.query_row(&sql, params![id], AuditRow::from_row)
            .optional()
            .map_err(storage)?
            .ok_or_else(|| IsmsError::not_found(RecordKind::Audit, id))?
            .into_record()
    }

    fn delete_audit(&self, id: i64) -> IsmsResult<()> {
        let removed = self
            .conn
            .lock()
            .execute("DELETE FROM audits WHERE id = ?1", params![id])
            .map_err(storage)?;
        if removed == 0 {
            return Err(IsmsError::not_found(RecordKind::Audit, id));
        }
        Ok(())
    }

    fn add_directive(&self, directive: NewDirective) -> IsmsResult<Directive> {
        directive.validate()?;
        let conn = self.conn.lock();
        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO directives (title, description, kind, effectiveness, owner, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &directive.title,
                &directive.description,
                directive.kind.key(),
                directive.effectiveness.key(),
                directive.owner.as_deref(),
                created_at.to_rfc3339(),
            ],
        )
        .map_err(storage)?;
        Ok(directive.into_directive(conn.last_insert_rowid(), created_at))
    }

    fn list_directives(&self) -> IsmsResult<Vec<Directive>> {
        let conn = self.conn.lock();
        let sql = format!(
            "SELECT {} FROM directives ORDER BY id DESC",
            DIRECTIVE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql).map_err(storage)?;
        let rows = stmt
            .query_map([], DirectiveRow::from_row)
            .map_err(storage)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage)?;
        rows.into_iter().map(DirectiveRow::into_directive).collect()
    }

    fn delete_directive(&self, id: i64) -> IsmsResult<()> {
        let removed = self
            .conn
            .lock()
            .execute("DELETE FROM directives WHERE id = ?1", params![id])
            .map_err(storage)?;
        if removed == 0 {
            return Err(IsmsError::not_found(RecordKind::Directive, id));
        }
        Ok(())
    }

    fn add_document(&self, document: NewDocument) -> IsmsResult<Document> {
        document.validate()?;
        let conn = self.conn.lock();
        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO documents (title, category, version, content, author, file_path, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                &document.title,
                &document.category,
                &document.version,
                &document.content,
                &document.author,
                document.file_path.as_deref(),
                created_at.to_rfc3339(),
            ],
        )
        .map_err(storage)?;
        Ok(document.into_document(conn.last_insert_rowid(), created_at))
    }

    fn list_documents(&self, category: Option<&str>) -> IsmsResult<Vec<Document>> {
        let conn = self.conn.lock();
        let sql = format!(
            "SELECT {} FROM documents WHERE ?1 IS NULL OR category = ?1 ORDER BY id DESC",
            DOCUMENT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql).map_err(storage)?;
        let rows = stmt
            .query_map(params![category], DocumentRow::from_row)
            .map_err(storage)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage)?;
        rows.into_iter().map(DocumentRow::into_document).collect()
    }

    fn get_document(&self, id: i64) -> IsmsResult<Document> {
        fetch_document(&self.conn.lock(), id)
    }

    fn update_document(&self, id: i64, revision: &DocumentRevision) -> IsmsResult<Document> {
        revision.validate()?;
        let conn = self.conn.lock();
        let changed = conn
            .execute(
                "UPDATE documents SET version = ?1, content = ?2, updated_at = ?3 WHERE id = ?4",
                params![
                    &revision.version,
                    &revision.content,
                    Utc::now().to_rfc3339(),
                    id,
                ],
            )
            .map_err(storage)?;
        if changed == 0 {
            return Err(IsmsError::not_found(RecordKind::Document, id));
        }
        fetch_document(&conn, id)
    }

    fn journal_entries(&self) -> IsmsResult<Vec<JournalEntry>> {
        let conn = self.conn.lock();
        let sql = format!("SELECT {} FROM journal ORDER BY seq", JOURNAL_COLUMNS);
        let mut stmt = conn.prepare(&sql).map_err(storage)?;
        let rows = stmt
            .query_map([], JournalRow::from_row)
            .map_err(storage)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage)?;
        rows.into_iter().map(JournalRow::into_entry).collect()
    }

    fn last_journal_entry(&self) -> IsmsResult<Option<JournalEntry>> {
        fetch_last_entry(&self.conn.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::verify_integrity;
    use crate::store::contract;
    use tempfile::TempDir;

    #[test]
    fn test_controls_roundtrip() {
        contract::controls_roundtrip(&SqliteStore::in_memory().unwrap());
    }

    #[test]
    fn test_record_evaluation() {
        contract::record_evaluation(&SqliteStore::in_memory().unwrap());
    }

    #[test]
    fn test_audits() {
        contract::audits(&SqliteStore::in_memory().unwrap());
    }

    #[test]
    fn test_directives() {
        contract::directives(&SqliteStore::in_memory().unwrap());
    }

    #[test]
    fn test_documents() {
        contract::documents(&SqliteStore::in_memory().unwrap());
    }

    #[test]
    fn test_journal() {
        contract::journal(&SqliteStore::in_memory().unwrap());
    }

    #[test]
    fn test_data_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("isms.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            contract::journal(&store);
            let code = ControlCode::new("A.8.24").unwrap();
            let created = store
                .insert_control(
                    NewControl::new(code, "Use of cryptography", Category::Technological)
                        .with_description("Rules for the effective use of cryptography"),
                )
                .unwrap();
            store
                .record_evaluation(created.id, &Evaluation::new(ConformityStatus::Conforming), "rssi")
                .unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        let controls = reopened.list_controls().unwrap();
        assert_eq!(controls.len(), 4);
        let crypto = &controls[3];
        assert_eq!(crypto.code.as_str(), "8.24");
        assert_eq!(crypto.status, ConformityStatus::Conforming);
        assert_eq!(crypto.description, "Rules for the effective use of cryptography");

        let journal = reopened.journal_entries().unwrap();
        assert_eq!(journal.len(), 5);
        assert_eq!(journal[4].control_code, "8.24");
        assert!(verify_integrity(&journal).valid);
    }

    #[test]
    fn test_failed_journal_write_rolls_back_status() {
        let store = SqliteStore::in_memory().unwrap();
        let code = ControlCode::new("5.15").unwrap();
        let control = store
            .insert_control(NewControl::new(code, "Access control", Category::Organisational))
            .unwrap();
        store
            .conn
            .lock()
            .execute_batch(
                "CREATE TRIGGER journal_full BEFORE INSERT ON journal BEGIN SELECT RAISE(ABORT, 'disk full'); END;",
            )
            .unwrap();

        let evaluation = Evaluation::new(ConformityStatus::Conforming).with_comment(Some("MFA".into()));
        let err = store.record_evaluation(control.id, &evaluation, "rssi").unwrap_err();
        assert!(matches!(err, IsmsError::Storage(ref msg) if msg.contains("disk full")));

        let unchanged = store.get_control(control.id).unwrap();
        assert_eq!(unchanged.status, ConformityStatus::NonConforming);
        assert!(unchanged.comment.is_none());
        assert_eq!(unchanged.last_updated, control.last_updated);
        assert!(store.journal_entries().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_status_text_is_invalid_status() {
        let store = SqliteStore::in_memory().unwrap();
        let code = ControlCode::new("5.1").unwrap();
        let control = store
            .insert_control(NewControl::new(code, "Policies", Category::Organisational))
            .unwrap();
        store
            .conn
            .lock()
            .execute(
                "UPDATE controls SET status = 'mostly' WHERE id = ?1",
                params![control.id.get()],
            )
            .unwrap();

        let err = store.get_control(control.id).unwrap_err();
        assert!(matches!(err, IsmsError::InvalidStatus(_)));
        assert!(matches!(store.list_controls(), Err(IsmsError::InvalidStatus(_))));
    }
}

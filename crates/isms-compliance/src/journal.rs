//! Evaluation Journal (Tamper-Evident)
//!
//! Every status evaluation is chained to the previous one with SHA-256.
//! Entries live in the store, so the chain outlives the process.

use crate::reporting::{csv_row, ExportFormat};
use chrono::{DateTime, Utc};
use isms_common::{ConformityStatus, Control, IsmsError, IsmsResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Hash preceding the first entry
pub const GENESIS_HASH: &str = "genesis";

/// One recorded evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub control_code: String,
    pub previous_status: ConformityStatus,
    pub new_status: ConformityStatus,
    pub comment: Option<String>,
    pub prev_hash: String,
    pub hash: String,
}

/// What happened, before it is chained
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationEvent {
    pub actor: String,
    pub control_code: String,
    pub previous_status: ConformityStatus,
    pub new_status: ConformityStatus,
    pub comment: Option<String>,
}

impl JournalEntry {
    /// Chain an event after `prev_hash`
    pub fn chained(event: EvaluationEvent, prev_hash: &str, at: DateTime<Utc>) -> Self {
        let mut entry = Self {
            id: Uuid::new_v4().to_string(),
            timestamp: at,
            actor: event.actor,
            control_code: event.control_code,
            previous_status: event.previous_status,
            new_status: event.new_status,
            comment: event.comment,
            prev_hash: prev_hash.to_string(),
            hash: String::new(),
        };
        entry.hash = entry.compute_hash(prev_hash);
        entry
    }

    /// Entry for `previous -> updated`, chained after `last`
    ///
    /// Stamped with the control's own `last_updated`.
    pub fn for_transition(
        actor: &str,
        previous: &Control,
        updated: &Control,
        last: Option<&JournalEntry>,
    ) -> Self {
        Self::chained(
            EvaluationEvent {
                actor: actor.to_string(),
                control_code: updated.code.to_string(),
                previous_status: previous.status,
                new_status: updated.status,
                comment: updated.comment.clone(),
            },
            next_prev_hash(last),
            updated.last_updated,
        )
    }

    pub fn compute_hash(&self, prev_hash: &str) -> String {
        let data = format!(
            "{}|{}|{}|{}|{}|{}|{}|{}",
            self.id,
            self.timestamp.to_rfc3339(),
            self.actor,
            self.control_code,
            self.previous_status.key(),
            self.new_status.key(),
            self.comment.as_deref().unwrap_or(""),
            prev_hash
        );
        hex::encode(Sha256::digest(data.as_bytes()))
    }
}

/// Hash the next entry must chain to
pub fn next_prev_hash(last: Option<&JournalEntry>) -> &str {
    last.map(|e| e.hash.as_str()).unwrap_or(GENESIS_HASH)
}

/// Result of re-walking the chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub valid: bool,
    pub checked_count: usize,
    pub broken_at: Option<String>,
    pub error: Option<String>,
}

/// Re-walk entries in insertion order and report the first broken link
pub fn verify_integrity(entries: &[JournalEntry]) -> IntegrityReport {
    let mut prev_hash = GENESIS_HASH.to_string();

    for (checked, entry) in entries.iter().enumerate() {
        if entry.prev_hash != prev_hash {
            return IntegrityReport {
                valid: false,
                checked_count: checked,
                broken_at: Some(entry.id.clone()),
                error: Some(format!("hash chain broken at entry {}", entry.id)),
            };
        }
        if entry.compute_hash(&prev_hash) != entry.hash {
            return IntegrityReport {
                valid: false,
                checked_count: checked,
                broken_at: Some(entry.id.clone()),
                error: Some(format!("entry {} hash mismatch", entry.id)),
            };
        }
        prev_hash = entry.hash.clone();
    }

    IntegrityReport {
        valid: true,
        checked_count: entries.len(),
        broken_at: None,
        error: None,
    }
}

/// Render entries as JSON or CSV
pub fn export(entries: &[JournalEntry], format: ExportFormat) -> IsmsResult<String> {
    match format {
        ExportFormat::Json => serde_json::to_string_pretty(entries)
            .map_err(|e| IsmsError::Serialization(e.to_string())),
        ExportFormat::Csv => {
            let mut csv = csv_row(&[
                "timestamp",
                "actor",
                "control",
                "previous_status",
                "new_status",
                "comment",
                "hash",
            ]);
            for e in entries {
                csv.push_str(&csv_row(&[
                    e.timestamp.to_rfc3339().as_str(),
                    e.actor.as_str(),
                    e.control_code.as_str(),
                    e.previous_status.label(),
                    e.new_status.label(),
                    e.comment.as_deref().unwrap_or(""),
                    e.hash.as_str(),
                ]));
            }
            Ok(csv)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(code: &str, from: ConformityStatus, to: ConformityStatus) -> EvaluationEvent {
        EvaluationEvent {
            actor: "rssi".into(),
            control_code: code.into(),
            previous_status: from,
            new_status: to,
            comment: Some("revue annuelle".into()),
        }
    }

    fn chain(len: usize) -> Vec<JournalEntry> {
        let mut entries: Vec<JournalEntry> = Vec::new();
        for i in 0..len {
            let prev = next_prev_hash(entries.last()).to_string();
            entries.push(JournalEntry::chained(
                event(&format!("5.{}", i + 1), ConformityStatus::NonConforming, ConformityStatus::Conforming),
                &prev,
                Utc::now(),
            ));
        }
        entries
    }

    #[test]
    fn test_intact_chain_verifies() {
        let entries = chain(4);
        assert_eq!(entries[0].prev_hash, GENESIS_HASH);
        let report = verify_integrity(&entries);
        assert!(report.valid);
        assert_eq!(report.checked_count, 4);
        assert!(verify_integrity(&[]).valid);
    }

    #[test]
    fn test_tampered_entry_detected() {
        let mut entries = chain(3);
        entries[1].new_status = ConformityStatus::WeaklyConforming;
        let report = verify_integrity(&entries);
        assert!(!report.valid);
        assert_eq!(report.checked_count, 1);
        assert_eq!(report.broken_at.as_deref(), Some(entries[1].id.as_str()));
    }

    #[test]
    fn test_removed_entry_detected() {
        let mut entries = chain(3);
        entries.remove(1);
        let report = verify_integrity(&entries);
        assert!(!report.valid);
        assert!(report.error.unwrap().contains("broken"));
    }

    #[test]
    fn test_transition_entry_chains_after_last() {
        use isms_common::{Category, ControlCode, ControlId, Evaluation, NewControl};

        let code = ControlCode::new("8.13").unwrap();
        let previous = NewControl::new(code, "Sauvegarde", Category::Technological)
            .into_control(ControlId::new(4), Utc::now());
        let mut updated = previous.clone();
        let evaluation = Evaluation::new(ConformityStatus::LargelyConforming)
            .with_comment(Some("tests de restauration trimestriels".into()));
        updated.apply_evaluation(&evaluation, Utc::now());

        let first = JournalEntry::for_transition("rssi", &previous, &updated, None);
        assert_eq!(first.prev_hash, GENESIS_HASH);
        assert_eq!(first.control_code, "8.13");
        assert_eq!(first.previous_status, ConformityStatus::NonConforming);
        assert_eq!(first.new_status, ConformityStatus::LargelyConforming);
        assert_eq!(first.timestamp, updated.last_updated);

        let second = JournalEntry::for_transition("rssi", &updated, &updated, Some(&first));
        assert_eq!(second.prev_hash, first.hash);
        assert!(verify_integrity(&[first, second]).valid);
    }

    #[test]
    fn test_export_formats() {
        let entries = chain(2);
        let csv = export(&entries, ExportFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("timestamp,actor,control,previous_status,new_status,comment,hash")
        );
        assert!(csv.contains("Non conforme,Conforme,revue annuelle"));
        assert_eq!(csv.lines().count(), 3);

        let json = export(&entries, ExportFormat::Json).unwrap();
        let back: Vec<JournalEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entries);
    }
}

//! Audit service layer - append-only log of loan lifecycle events

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::audit::{AuditEntryOptions, AuditEventType, AuditLogEntry, AuditLogFilter};
use crate::storage::{JsonCollection, KeyValueStore, StorageError, AUDIT_STORAGE_KEY};

/// Audit service owning the persisted audit collection
#[derive(Clone, Debug)]
pub struct AuditService {
    entries: JsonCollection<AuditLogEntry>,
}

impl AuditService {
    /// Create a new audit service over the given store
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            entries: JsonCollection::new(store, AUDIT_STORAGE_KEY),
        }
    }

    /// Load every entry in insertion order; corrupt data reads as empty
    pub fn load(&self) -> Vec<AuditLogEntry> {
        self.entries.load()
    }

    /// Replace the persisted log
    pub fn save(&self, entries: &[AuditLogEntry]) -> Result<(), StorageError> {
        self.entries.save(entries)
    }

    /// Remove all persisted audit data
    pub fn clear(&self) -> Result<(), StorageError> {
        tracing::info!("Clearing audit log");
        self.entries.clear()
    }

    /// Build a new entry stamped with a fresh id and the current instant.
    /// Nothing is persisted.
    pub fn make_entry(
        event_type: AuditEventType,
        loan_id: &str,
        applicant_name: &str,
        options: AuditEntryOptions,
    ) -> AuditLogEntry {
        AuditLogEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type,
            loan_id: loan_id.to_string(),
            applicant_name: applicant_name.to_string(),
            previous_status: options.previous_status,
            new_status: options.new_status,
            metadata: options.metadata,
        }
    }

    /// Append one entry to the end of the persisted log
    pub fn append(&self, entry: AuditLogEntry) -> Result<(), StorageError> {
        let mut entries = self.entries.load();

        tracing::debug!(
            entry_id = %entry.id,
            event_type = %entry.event_type,
            loan_id = %entry.loan_id,
            "Appending audit entry"
        );

        entries.push(entry);
        self.entries.save(&entries)
    }

    /// All entries recorded for one loan, in insertion order
    pub fn history(&self, loan_id: &str) -> Vec<AuditLogEntry> {
        self.entries
            .load()
            .into_iter()
            .filter(|entry| entry.loan_id == loan_id)
            .collect()
    }

    /// Entries matching every criterion in `filter`, in their original order
    pub fn filter(entries: &[AuditLogEntry], filter: &AuditLogFilter) -> Vec<AuditLogEntry> {
        let search = filter.normalized_search();

        entries
            .iter()
            .filter(|entry| filter.matches(entry, search.as_deref()))
            .cloned()
            .collect()
    }

    /// Keep at most `max_entries`, discarding the oldest.
    ///
    /// When entries are dropped the result is ordered most recent first;
    /// otherwise the original order is kept.
    pub fn prune(entries: &[AuditLogEntry], max_entries: usize) -> Vec<AuditLogEntry> {
        if entries.len() <= max_entries {
            return entries.to_vec();
        }

        let mut sorted = entries.to_vec();
        sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        sorted.truncate(max_entries);
        sorted
    }

    /// Load, prune and persist the log
    pub fn prune_and_save(&self, max_entries: usize) -> Result<usize, StorageError> {
        let entries = self.entries.load();
        let pruned = Self::prune(&entries, max_entries);
        let removed = entries.len() - pruned.len();

        tracing::debug!(
            kept = pruned.len(),
            removed,
            max_entries,
            "Pruning audit log"
        );

        self.entries.save(&pruned)?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn entry_at(id: &str, hour: u32) -> AuditLogEntry {
        AuditLogEntry {
            id: id.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
            event_type: AuditEventType::Created,
            loan_id: format!("loan-{}", id),
            applicant_name: "John Doe".to_string(),
            previous_status: None,
            new_status: None,
            metadata: None,
        }
    }

    #[test]
    fn test_make_entry_fields() {
        let before = Utc::now();
        let entry = AuditService::make_entry(
            AuditEventType::StatusUpdateManual,
            "loan-1",
            "Jane",
            AuditEntryOptions::transition("pending", "approved"),
        );

        assert!(!entry.id.is_empty());
        assert!(entry.timestamp >= before);
        assert_eq!(entry.previous_status.as_deref(), Some("pending"));
        assert_eq!(entry.new_status.as_deref(), Some("approved"));
        assert_eq!(entry.metadata, None);
    }

    #[test]
    fn test_make_entry_ids_unique() {
        let a = AuditService::make_entry(
            AuditEventType::Created,
            "loan-1",
            "Jane",
            AuditEntryOptions::default(),
        );
        let b = AuditService::make_entry(
            AuditEventType::Created,
            "loan-1",
            "Jane",
            AuditEntryOptions::default(),
        );
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_append_preserves_order() {
        let audit = AuditService::new(Arc::new(MemoryStore::new()));
        audit.append(entry_at("b", 5)).unwrap();
        audit.append(entry_at("a", 1)).unwrap();

        let ids: Vec<_> = audit.load().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_prune_keeps_most_recent() {
        let entries = vec![entry_at("1", 1), entry_at("3", 3), entry_at("2", 2)];

        let pruned = AuditService::prune(&entries, 2);
        let ids: Vec<_> = pruned.iter().map(|e| e.id.as_str()).collect();

        assert_eq!(ids, vec!["3", "2"]);
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn test_prune_under_limit_keeps_order() {
        let entries = vec![entry_at("2", 2), entry_at("1", 1)];
        assert_eq!(AuditService::prune(&entries, 2), entries);
        assert_eq!(AuditService::prune(&entries, 10), entries);
    }

    #[test]
    fn test_prune_ties_keep_insertion_order() {
        let entries = vec![entry_at("a", 4), entry_at("b", 4), entry_at("c", 1)];

        let pruned = AuditService::prune(&entries, 2);
        let ids: Vec<_> = pruned.iter().map(|e| e.id.as_str()).collect();

        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_prune_to_zero() {
        let entries = vec![entry_at("1", 1)];
        assert!(AuditService::prune(&entries, 0).is_empty());
    }
}

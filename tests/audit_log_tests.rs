//! Audit log tests: persistence, filtering and retention

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use tredgate_loans::audit::{
    parse_instant, AuditEntryOptions, AuditEventType, AuditLogEntry, AuditLogFilter, AuditService,
};
use tredgate_loans::storage::{FileStore, KeyValueStore, MemoryStore, AUDIT_STORAGE_KEY};

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
}

fn entry(
    id: &str,
    timestamp: DateTime<Utc>,
    event_type: AuditEventType,
    loan_id: &str,
    applicant_name: &str,
) -> AuditLogEntry {
    AuditLogEntry {
        id: id.to_string(),
        timestamp,
        event_type,
        loan_id: loan_id.to_string(),
        applicant_name: applicant_name.to_string(),
        previous_status: None,
        new_status: None,
        metadata: None,
    }
}

fn transition(mut e: AuditLogEntry, previous: &str, new: &str) -> AuditLogEntry {
    e.previous_status = Some(previous.to_string());
    e.new_status = Some(new.to_string());
    e
}

/// A small log covering every event type
fn sample_log() -> Vec<AuditLogEntry> {
    vec![
        entry("1", at(1, 9), AuditEventType::Created, "loan-abc", "Alice Smith"),
        entry("2", at(2, 9), AuditEventType::Created, "loan-def", "Bob Jones"),
        transition(
            entry("3", at(3, 9), AuditEventType::StatusUpdateManual, "loan-abc", "Alice Smith"),
            "pending",
            "approved",
        ),
        transition(
            entry("4", at(4, 9), AuditEventType::StatusUpdateAuto, "loan-def", "Bob Jones"),
            "pending",
            "rejected",
        ),
        entry("5", at(5, 9), AuditEventType::Deleted, "loan-xalicex", "Carol White"),
    ]
}

fn ids(entries: &[AuditLogEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.id.as_str()).collect()
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_load_empty_when_nothing_stored() {
    let audit = AuditService::new(Arc::new(MemoryStore::new()));
    assert!(audit.load().is_empty());
}

#[test]
fn test_load_stored_original_layout() {
    let store = Arc::new(MemoryStore::new());
    store
        .set(
            AUDIT_STORAGE_KEY,
            r#"[{"id":"1","timestamp":"2024-01-01T00:00:00.000Z","eventType":"created","loanId":"loan-1","applicantName":"John Doe"}]"#,
        )
        .unwrap();
    let audit = AuditService::new(store);

    let entries = audit.load();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].timestamp, at(1, 0));
    assert_eq!(entries[0].event_type, AuditEventType::Created);
    assert_eq!(entries[0].previous_status, None);
}

#[test]
fn test_load_empty_on_parse_error() {
    let store = Arc::new(MemoryStore::new());
    let audit = AuditService::new(store.clone());

    store.set(AUDIT_STORAGE_KEY, "invalid json").unwrap();
    assert!(audit.load().is_empty());

    store
        .set(
            AUDIT_STORAGE_KEY,
            r#"[{"id":"1","timestamp":"yesterday","eventType":"created","loanId":"l","applicantName":"J"}]"#,
        )
        .unwrap();
    assert!(audit.load().is_empty());
}

#[test]
fn test_save_load_round_trip() {
    let audit = AuditService::new(Arc::new(MemoryStore::new()));
    let mut log = sample_log();
    log[4].metadata = Some("removed by operator".to_string());

    audit.save(&log).unwrap();

    assert_eq!(audit.load(), log);
}

#[test]
fn test_clear_removes_everything() {
    let store = Arc::new(MemoryStore::new());
    let audit = AuditService::new(store.clone());
    audit.save(&sample_log()).unwrap();

    audit.clear().unwrap();

    assert!(audit.load().is_empty());
    assert_eq!(store.get(AUDIT_STORAGE_KEY).unwrap(), None);
    audit.clear().unwrap();
}

#[test]
fn test_append_to_existing_log() {
    let audit = AuditService::new(Arc::new(MemoryStore::new()));
    audit.save(&sample_log()).unwrap();

    let new_entry = AuditService::make_entry(
        AuditEventType::StatusUpdateManual,
        "loan-def",
        "Bob Jones",
        AuditEntryOptions::transition("rejected", "approved").with_metadata("appeal"),
    );
    audit.append(new_entry.clone()).unwrap();

    let entries = audit.load();
    assert_eq!(entries.len(), 6);
    assert_eq!(entries[5], new_entry);
    assert_eq!(ids(&entries[..5]), vec!["1", "2", "3", "4", "5"]);
}

#[test]
fn test_make_entry_does_not_persist() {
    let audit = AuditService::new(Arc::new(MemoryStore::new()));

    let entry = AuditService::make_entry(
        AuditEventType::Deleted,
        "loan-1",
        "Jane Doe",
        AuditEntryOptions::default(),
    );

    assert_eq!(entry.event_type, AuditEventType::Deleted);
    assert_eq!(entry.loan_id, "loan-1");
    assert_eq!(entry.applicant_name, "Jane Doe");
    assert!(audit.load().is_empty());
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn test_filter_empty_criteria_returns_all() {
    let log = sample_log();
    assert_eq!(AuditService::filter(&log, &AuditLogFilter::new()), log);
}

#[test]
fn test_filter_by_event_type() {
    let log = sample_log();
    let filter = AuditLogFilter::new().event_type(AuditEventType::Created);

    assert_eq!(ids(&AuditService::filter(&log, &filter)), vec!["1", "2"]);
}

#[test]
fn test_filter_by_status_matches_either_side() {
    let log = sample_log();

    let pending = AuditService::filter(&log, &AuditLogFilter::new().status("pending"));
    assert_eq!(ids(&pending), vec!["3", "4"]);

    let approved = AuditService::filter(&log, &AuditLogFilter::new().status("approved"));
    assert_eq!(ids(&approved), vec!["3"]);
}

#[test]
fn test_filter_by_date_range_inclusive() {
    let log = sample_log();
    let filter = AuditLogFilter::new()
        .start_date(at(2, 9))
        .end_date(at(4, 9));

    assert_eq!(ids(&AuditService::filter(&log, &filter)), vec!["2", "3", "4"]);
}

#[test]
fn test_filter_by_parsed_dates() {
    let log = sample_log();
    let filter = AuditLogFilter::new()
        .start_date(parse_instant("2024-01-03").unwrap())
        .end_date(parse_instant("2024-01-04T23:59:59.999Z").unwrap());

    assert_eq!(ids(&AuditService::filter(&log, &filter)), vec!["3", "4"]);
}

#[test]
fn test_filter_search_is_case_insensitive() {
    let log = sample_log();

    let by_name = AuditService::filter(&log, &AuditLogFilter::new().search("alice"));
    // Matches "Alice Smith" by name and "loan-xalicex" by loan id
    assert_eq!(ids(&by_name), vec!["1", "3", "5"]);

    let by_id = AuditService::filter(&log, &AuditLogFilter::new().search("  LOAN-DEF "));
    assert_eq!(ids(&by_id), vec!["2", "4"]);
}

#[test]
fn test_filter_blank_search_matches_everything() {
    let log = sample_log();

    assert_eq!(AuditService::filter(&log, &AuditLogFilter::new().search("")), log);
    assert_eq!(AuditService::filter(&log, &AuditLogFilter::new().search("   ")), log);
}

#[test]
fn test_filter_criteria_combine() {
    let log = sample_log();
    let filter = AuditLogFilter::new()
        .search("bob")
        .status("pending")
        .event_type(AuditEventType::StatusUpdateAuto);

    assert_eq!(ids(&AuditService::filter(&log, &filter)), vec!["4"]);

    let none = AuditLogFilter::new()
        .search("alice")
        .event_type(AuditEventType::StatusUpdateAuto);
    assert!(AuditService::filter(&log, &none).is_empty());
}

#[test]
fn test_filter_does_not_mutate_input() {
    let log = sample_log();
    let before = log.clone();

    let _ = AuditService::filter(&log, &AuditLogFilter::new().event_type(AuditEventType::Deleted));

    assert_eq!(log, before);
}

// ============================================================================
// Retention
// ============================================================================

#[test]
fn test_prune_under_limit_returns_all_in_order() {
    let log = sample_log();

    assert_eq!(AuditService::prune(&log, 5), log);
    assert_eq!(AuditService::prune(&log, 100), log);
}

#[test]
fn test_prune_keeps_most_recent_first() {
    let mut log = sample_log();
    log.swap(0, 3);
    let before = log.clone();

    let pruned = AuditService::prune(&log, 3);

    assert_eq!(ids(&pruned), vec!["5", "4", "3"]);
    assert_eq!(log, before);
}

#[test]
fn test_prune_and_save() {
    let audit = AuditService::new(Arc::new(MemoryStore::new()));
    audit.save(&sample_log()).unwrap();

    let removed = audit.prune_and_save(2).unwrap();

    assert_eq!(removed, 3);
    assert_eq!(ids(&audit.load()), vec!["5", "4"]);
}

#[test]
fn test_prune_and_save_on_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());
    let audit = AuditService::new(store);
    audit.save(&sample_log()).unwrap();

    assert_eq!(audit.prune_and_save(10).unwrap(), 0);
    assert_eq!(ids(&audit.load()), vec!["1", "2", "3", "4", "5"]);

    let reopened = AuditService::new(Arc::new(FileStore::open(dir.path()).unwrap()));
    reopened.prune_and_save(1).unwrap();
    assert_eq!(ids(&reopened.load()), vec!["5"]);
}

//! Audit log models

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle events recorded in the audit log
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    Created,
    StatusUpdateManual,
    StatusUpdateAuto,
    Deleted,
}

impl AuditEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventType::Created => "created",
            AuditEventType::StatusUpdateManual => "status_update_manual",
            AuditEventType::StatusUpdateAuto => "status_update_auto",
            AuditEventType::Deleted => "deleted",
        }
    }
}

impl fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable audit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: AuditEventType,
    pub loan_id: String,
    /// Copied from the loan so entries stay searchable after deletion
    pub applicant_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
}

/// Optional fields for a new entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditEntryOptions {
    pub previous_status: Option<String>,
    pub new_status: Option<String>,
    pub metadata: Option<String>,
}

impl AuditEntryOptions {
    /// Options for a status transition
    pub fn transition(previous: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            previous_status: Some(previous.into()),
            new_status: Some(new.into()),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }
}

/// Filter criteria for audit log queries.
///
/// Every criterion that is set must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditLogFilter {
    pub event_type: Option<AuditEventType>,
    /// Matches either the previous or the new status
    pub status: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Case-insensitive substring of applicant name or loan id
    pub search_term: Option<String>,
}

impl AuditLogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_type(mut self, event_type: AuditEventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn start_date(mut self, start: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self
    }

    pub fn end_date(mut self, end: DateTime<Utc>) -> Self {
        self.end_date = Some(end);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    /// Normalized search term, or `None` when it is blank
    pub(crate) fn normalized_search(&self) -> Option<String> {
        self.search_term
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }

    pub(crate) fn matches(&self, entry: &AuditLogEntry, search: Option<&str>) -> bool {
        if let Some(event_type) = self.event_type {
            if entry.event_type != event_type {
                return false;
            }
        }

        if let Some(status) = self.status.as_deref() {
            let hit = entry.previous_status.as_deref() == Some(status)
                || entry.new_status.as_deref() == Some(status);
            if !hit {
                return false;
            }
        }

        if let Some(start) = self.start_date {
            if entry.timestamp < start {
                return false;
            }
        }

        if let Some(end) = self.end_date {
            if entry.timestamp > end {
                return false;
            }
        }

        if let Some(term) = search {
            let hit = entry.applicant_name.to_lowercase().contains(term)
                || entry.loan_id.to_lowercase().contains(term);
            if !hit {
                return false;
            }
        }

        true
    }
}

/// Parse a date bound supplied as text.
///
/// Accepts RFC 3339 instants and bare `YYYY-MM-DD` dates, which resolve to
/// midnight UTC.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

//! Audit log for loan lifecycle events

mod model;
mod service;

pub use model::{parse_instant, AuditEntryOptions, AuditEventType, AuditLogEntry, AuditLogFilter};
pub use service::AuditService;

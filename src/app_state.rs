//! Application state shared by the callers of the ledger

use std::sync::Arc;

use crate::audit::AuditService;
use crate::loan_service::LoanService;
use crate::storage::{KeyValueStore, MemoryStore};

/// Shared application state
#[derive(Clone, Debug)]
pub struct AppState {
    pub loan_service: LoanService,
    pub audit_service: AuditService,
}

impl AppState {
    /// Wire both services over one store; the ledger writes to the audit log,
    /// never the reverse.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let audit_service = AuditService::new(store.clone());
        let loan_service = LoanService::new(store, audit_service.clone());

        Self {
            loan_service,
            audit_service,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }
}

//! Key-value persistence for the loan tracker
//!
//! Both the loan ledger and the audit log persist a whole collection under a
//! single key. The backing store is injected, so tests run against
//! [`MemoryStore`] while the binary uses a [`FileStore`] on disk.

mod collection;
mod file;
mod memory;

pub use collection::JsonCollection;
pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Storage key holding the serialized loan collection
pub const LOANS_STORAGE_KEY: &str = "tredgate_loans";

/// Storage key holding the serialized audit log
pub const AUDIT_STORAGE_KEY: &str = "tredgate_audit_logs";

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage lock poisoned: {0}")]
    Poisoned(String),
}

impl StorageError {
    /// Get the error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::Io(_) => "STORAGE_IO_ERROR",
            StorageError::Serialization(_) => "SERIALIZATION_ERROR",
            StorageError::Poisoned(_) => "STORAGE_POISONED",
        }
    }
}

/// Whole-value key-value store.
///
/// Every read returns the complete value for a key and every write replaces
/// it in one call. Removing a key that does not exist is not an error.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

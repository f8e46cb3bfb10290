//! Tredgate loan tracker library
//!
//! Loan applications are created, decided and deleted through
//! [`loan_service::LoanService`]; every lifecycle change is recorded in the
//! append-only [`audit::AuditService`]. Both persist whole collections into an
//! injected [`storage::KeyValueStore`].

pub mod app_state;
pub mod audit;
pub mod config;
pub mod error;
pub mod loan;
pub mod loan_service;
pub mod services;
pub mod storage;

pub use app_state::AppState;
pub use error::{LoanError, LoanResult, ValidationError};

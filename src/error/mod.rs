//! Centralized error handling for the loan tracker
//!
//! Ledger operations fail with [`LoanError`]. Creation input that breaks an
//! invariant is reported as a [`ValidationError`] naming the first field
//! that failed, checked in a fixed order.

use thiserror::Error;

use crate::storage::StorageError;

/// A creation invariant that the input did not satisfy
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Applicant name is required")]
    ApplicantNameRequired,

    #[error("Amount must be greater than 0")]
    AmountNotPositive,

    #[error("Term months must be greater than 0")]
    TermNotPositive,

    #[error("Interest rate cannot be negative")]
    NegativeInterestRate,
}

impl ValidationError {
    /// Name of the offending input field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::ApplicantNameRequired => "applicantName",
            ValidationError::AmountNotPositive => "amount",
            ValidationError::TermNotPositive => "termMonths",
            ValidationError::NegativeInterestRate => "interestRate",
        }
    }
}

/// Loan ledger error type
#[derive(Error, Debug)]
pub enum LoanError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Loan with id {0} not found")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl LoanError {
    /// Get the error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            LoanError::Validation(_) => "VALIDATION_ERROR",
            LoanError::NotFound(_) => "NOT_FOUND",
            LoanError::Storage(e) => e.error_code(),
        }
    }
}

/// Result type alias using LoanError
pub type LoanResult<T> = Result<T, LoanError>;

//! Loan models for the Tredgate loan tracker
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Largest amount the automatic decision will approve (inclusive)
pub const AUTO_APPROVE_MAX_AMOUNT: f64 = 100_000.0;

/// Longest term in months the automatic decision will approve (inclusive)
pub const AUTO_APPROVE_MAX_TERM_MONTHS: i64 = 60;

/// Loan status enum
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Pending,
    Approved,
    Rejected,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Approved => "approved",
            LoanStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loan application model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplication {
    pub id: String,
    pub applicant_name: String,
    pub amount: f64,
    pub term_months: i64,
    pub interest_rate: f64, // fractional, 0.05 = 5%
    pub status: LoanStatus,
    pub created_at: DateTime<Utc>,
}

impl LoanApplication {
    /// Flat monthly installment: `amount * (1 + rate) / term`
    pub fn monthly_payment(&self) -> f64 {
        let total = self.amount * (1.0 + self.interest_rate);
        total / self.term_months as f64
    }
}

/// Request to create a new loan application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoanInput {
    pub applicant_name: String,
    pub amount: f64,
    pub term_months: i64,
    pub interest_rate: f64,
}

impl CreateLoanInput {
    pub fn new(
        applicant_name: impl Into<String>,
        amount: f64,
        term_months: i64,
        interest_rate: f64,
    ) -> Self {
        Self {
            applicant_name: applicant_name.into(),
            amount,
            term_months,
            interest_rate,
        }
    }

    /// Validate request, reporting the first failed check.
    ///
    /// Checks run in order: name, amount, term, interest rate.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.applicant_name.trim().is_empty() {
            return Err(ValidationError::ApplicantNameRequired);
        }
        // NaN and infinities fail both numeric checks
        if !(self.amount.is_finite() && self.amount > 0.0) {
            return Err(ValidationError::AmountNotPositive);
        }
        if self.term_months <= 0 {
            return Err(ValidationError::TermNotPositive);
        }
        if !(self.interest_rate.is_finite() && self.interest_rate >= 0.0) {
            return Err(ValidationError::NegativeInterestRate);
        }
        Ok(())
    }
}

/// Fixed two-threshold policy used by automatic decisions
pub fn auto_decision(amount: f64, term_months: i64) -> LoanStatus {
    if amount <= AUTO_APPROVE_MAX_AMOUNT && term_months <= AUTO_APPROVE_MAX_TERM_MONTHS {
        LoanStatus::Approved
    } else {
        LoanStatus::Rejected
    }
}

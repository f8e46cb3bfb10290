//! Loan service layer - Business logic for the loan lifecycle

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::audit::{AuditEntryOptions, AuditEventType, AuditService};
use crate::error::{LoanError, LoanResult};
use crate::loan::{auto_decision, CreateLoanInput, LoanApplication, LoanStatus};
use crate::services::{AnalyticsService, LoanSummary};
use crate::storage::{JsonCollection, KeyValueStore, StorageError, LOANS_STORAGE_KEY};

/// Loan service for managing loan lifecycle.
///
/// Every mutation is a full read-modify-write of the loan collection
/// followed by exactly one audit entry.
#[derive(Clone, Debug)]
pub struct LoanService {
    loans: JsonCollection<LoanApplication>,
    audit: AuditService,
}

impl LoanService {
    /// Create a new loan service instance
    pub fn new(store: Arc<dyn KeyValueStore>, audit: AuditService) -> Self {
        Self {
            loans: JsonCollection::new(store, LOANS_STORAGE_KEY),
            audit,
        }
    }

    /// Load all loans; corrupt data reads as empty
    pub fn load(&self) -> Vec<LoanApplication> {
        self.loans.load()
    }

    /// Replace the persisted loan collection
    pub fn save(&self, loans: &[LoanApplication]) -> Result<(), StorageError> {
        self.loans.save(loans)
    }

    /// Get loan by ID
    pub fn get_loan(&self, id: &str) -> Option<LoanApplication> {
        self.loans.load().into_iter().find(|loan| loan.id == id)
    }

    /// Validate and store a new pending loan application
    pub fn create(&self, input: CreateLoanInput) -> LoanResult<LoanApplication> {
        if let Err(e) = input.validate() {
            tracing::debug!(field = e.field(), error = %e, "Loan application rejected");
            return Err(e.into());
        }

        let loan = LoanApplication {
            id: Uuid::new_v4().to_string(),
            applicant_name: input.applicant_name.trim().to_string(),
            amount: input.amount,
            term_months: input.term_months,
            interest_rate: input.interest_rate,
            status: LoanStatus::Pending,
            created_at: Utc::now(),
        };

        let mut loans = self.loans.load();
        loans.push(loan.clone());
        self.loans.save(&loans)?;

        tracing::info!(
            loan_id = %loan.id,
            amount = loan.amount,
            term_months = loan.term_months,
            "Loan application created"
        );

        self.record(AuditEventType::Created, &loan, AuditEntryOptions::default());

        Ok(loan)
    }

    /// Manually set the status of a loan. Any status may replace any other.
    pub fn set_status(&self, id: &str, status: LoanStatus) -> LoanResult<LoanApplication> {
        let mut loans = self.loans.load();
        let loan = loans
            .iter_mut()
            .find(|loan| loan.id == id)
            .ok_or_else(|| LoanError::NotFound(id.to_string()))?;

        let previous = loan.status;
        loan.status = status;
        let updated = loan.clone();

        self.loans.save(&loans)?;

        tracing::info!(
            loan_id = %updated.id,
            previous_status = %previous,
            status = %status,
            "Loan status updated manually"
        );

        self.record(
            AuditEventType::StatusUpdateManual,
            &updated,
            AuditEntryOptions::transition(previous.as_str(), status.as_str()),
        );

        Ok(updated)
    }

    /// Approve or reject a loan with the fixed amount/term policy
    pub fn auto_decide(&self, id: &str) -> LoanResult<LoanApplication> {
        let mut loans = self.loans.load();
        let loan = loans
            .iter_mut()
            .find(|loan| loan.id == id)
            .ok_or_else(|| LoanError::NotFound(id.to_string()))?;

        let previous = loan.status;
        loan.status = auto_decision(loan.amount, loan.term_months);
        let updated = loan.clone();

        self.loans.save(&loans)?;

        tracing::info!(
            loan_id = %updated.id,
            previous_status = %previous,
            status = %updated.status,
            "Loan status decided automatically"
        );

        let metadata = format!(
            "Auto-decision: amount={}, term={}",
            updated.amount, updated.term_months
        );
        self.record(
            AuditEventType::StatusUpdateAuto,
            &updated,
            AuditEntryOptions::transition(previous.as_str(), updated.status.as_str())
                .with_metadata(metadata),
        );

        Ok(updated)
    }

    /// Delete a loan. The audit entry is written before the removal.
    pub fn delete(&self, id: &str) -> LoanResult<LoanApplication> {
        let mut loans = self.loans.load();
        let index = loans
            .iter()
            .position(|loan| loan.id == id)
            .ok_or_else(|| LoanError::NotFound(id.to_string()))?;

        self.record(
            AuditEventType::Deleted,
            &loans[index],
            AuditEntryOptions::default(),
        );

        let removed = loans.remove(index);
        self.loans.save(&loans)?;

        tracing::info!(loan_id = %removed.id, "Loan application deleted");

        Ok(removed)
    }

    /// Monthly installment for a loan; no storage access
    pub fn monthly_payment(loan: &LoanApplication) -> f64 {
        loan.monthly_payment()
    }

    /// Counts by status and total approved amount
    pub fn summary(&self) -> LoanSummary {
        AnalyticsService::summarize(&self.loans.load())
    }

    /// Best-effort audit write; the loan change is already durable
    fn record(
        &self,
        event_type: AuditEventType,
        loan: &LoanApplication,
        options: AuditEntryOptions,
    ) {
        let entry = AuditService::make_entry(event_type, &loan.id, &loan.applicant_name, options);
        if let Err(e) = self.audit.append(entry) {
            tracing::error!(
                loan_id = %loan.id,
                event_type = %event_type,
                error = %e,
                "Failed to append audit entry"
            );
        }
    }
}

//! Aggregate statistics over the loan collection

use serde::{Deserialize, Serialize};

use crate::loan::{LoanApplication, LoanStatus};

/// Portfolio summary shown alongside the loan list
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSummary {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    /// Sum of `amount` over approved loans only
    pub total_approved_amount: f64,
}

pub struct AnalyticsService;

impl AnalyticsService {
    /// Count loans by status and total the approved amount
    pub fn summarize(loans: &[LoanApplication]) -> LoanSummary {
        loans
            .iter()
            .fold(LoanSummary::default(), |mut summary, loan| {
                summary.total += 1;
                match loan.status {
                    LoanStatus::Pending => summary.pending += 1,
                    LoanStatus::Approved => {
                        summary.approved += 1;
                        summary.total_approved_amount += loan.amount;
                    }
                    LoanStatus::Rejected => summary.rejected += 1,
                }
                summary
            })
    }
}

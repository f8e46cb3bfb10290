//! Business logic services for the loan tracker

mod analytics;

pub use analytics::{AnalyticsService, LoanSummary};

use chrono::NaiveDate;
use tracing::{info, warn};

use super::csv_export;
use crate::core::{AppError, Result};
use crate::modules::ledger::models::{OutstandingFilter, OutstandingStudent};
use crate::modules::ledger::repositories::{BalanceRow, LedgerStore};
use crate::modules::payments::repositories::PaymentStore;
use crate::modules::reports::models::{CohortMember, CohortStats};

/// Service for the finance dashboard statistics and CSV exports.
///
/// Fetches the payment window and the balance rows, then hands everything
/// to the pure aggregate — the service never does arithmetic of its own.
pub struct ReportService<L: LedgerStore, P: PaymentStore> {
    ledger: L,
    payments: P,
}

impl<L: LedgerStore, P: PaymentStore> ReportService<L, P> {
    pub fn new(ledger: L, payments: P) -> Self {
        Self { ledger, payments }
    }

    /// Cohort statistics over the payment window [start_date, end_date].
    ///
    /// # Errors
    /// Returns a `Validation` error when start_date > end_date, and
    /// `DataUnavailable` when a store cannot be reached.
    pub async fn financial_report(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<CohortStats> {
        if start_date > end_date {
            return Err(AppError::validation(format!(
                "start_date ({}) must be before or equal to end_date ({})",
                start_date, end_date
            )));
        }

        info!(%start_date, %end_date, "Generating financial report");

        let payments = self.payments.find_in_window(start_date, end_date).await?;
        let students = self.outstanding_snapshot(&OutstandingFilter::default()).await?;
        let members: Vec<CohortMember> = students.iter().map(CohortMember::from).collect();

        let stats = CohortStats::aggregate(&members, &payments);

        if stats.skipped_records > 0 {
            warn!(
                skipped = stats.skipped_records,
                "Excluded malformed payment records from report"
            );
        }

        info!(
            revenue = %stats.total_revenue,
            outstanding = %stats.total_outstanding,
            students = stats.student_count,
            "Financial report generated"
        );

        Ok(stats)
    }

    /// Recent payments serialized as CSV for download
    pub async fn payments_export(&self, limit: i64) -> Result<String> {
        let payments = self.payments.recent_with_students(limit).await?;
        Ok(csv_export::payments_csv(&payments))
    }

    /// Outstanding listing serialized as CSV for download
    pub async fn outstanding_export(&self, filter: &OutstandingFilter) -> Result<String> {
        let students = self.outstanding_snapshot(filter).await?;
        Ok(csv_export::outstanding_csv(&students))
    }

    async fn outstanding_snapshot(
        &self,
        filter: &OutstandingFilter,
    ) -> Result<Vec<OutstandingStudent>> {
        let rows = self.ledger.balance_rows().await?;
        Ok(rows
            .into_iter()
            .map(BalanceRow::into_outstanding)
            .filter(|s| filter.matches(s))
            .collect())
    }
}

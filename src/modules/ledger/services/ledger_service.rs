use tracing::info;

use super::balance_calculator::BalanceCalculator;
use crate::core::{AppError, Result};
use crate::modules::fees::repositories::FeePlanStore;
use crate::modules::fees::FeePlan;
use crate::modules::ledger::models::{OutstandingFilter, OutstandingStudent, StudentBalance};
use crate::modules::ledger::repositories::{BalanceRow, LedgerStore};
use crate::modules::payments::models::PaymentRecord;
use crate::modules::payments::repositories::PaymentStore;

/// The ledger accessor: per-student balances and the outstanding listing.
///
/// Pulls raw rows from the stores and runs every derivation through the
/// balance calculator. Upstream failures surface as `DataUnavailable`;
/// zero-valued results are never fabricated in their place.
pub struct LedgerService<L, F, P>
where
    L: LedgerStore,
    F: FeePlanStore,
    P: PaymentStore,
{
    ledger: L,
    fee_plans: F,
    payments: P,
}

/// A student's balance together with the inputs it was derived from
#[derive(Debug, Clone)]
pub struct StudentLedger {
    pub fee_plan: FeePlan,
    pub balance: StudentBalance,
    /// Payment history, most recent first
    pub payments: Vec<PaymentRecord>,
}

impl<L, F, P> LedgerService<L, F, P>
where
    L: LedgerStore,
    F: FeePlanStore,
    P: PaymentStore,
{
    pub fn new(ledger: L, fee_plans: F, payments: P) -> Self {
        Self {
            ledger,
            fee_plans,
            payments,
        }
    }

    /// A student's payment history, most recent first. An empty history is
    /// an ordinary result.
    pub async fn student_payments(&self, student_id: &str) -> Result<Vec<PaymentRecord>> {
        self.payments.find_by_student(student_id).await
    }

    /// Fee plan, recomputed balance, and payment history for one student.
    ///
    /// # Errors
    /// * `NotFound` - the student has no fee plan (unknown student or no
    ///   class/level assignment)
    /// * `DataUnavailable` - a store could not be reached
    pub async fn student_ledger(&self, student_id: &str) -> Result<StudentLedger> {
        let fee_plan = self
            .fee_plans
            .fee_plan_for_student(student_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("No fee plan for student '{}'", student_id))
            })?;

        let payments = self.payments.find_by_student(student_id).await?;
        let balance = BalanceCalculator::compute_balance(student_id, &fee_plan, &payments);

        Ok(StudentLedger {
            fee_plan,
            balance,
            payments,
        })
    }

    /// All students matching the filter, with balance fields attached.
    ///
    /// Returns every matching student including those fully paid up; the
    /// caller decides whether to show only positive outstanding amounts.
    pub async fn outstanding_students(
        &self,
        filter: &OutstandingFilter,
    ) -> Result<Vec<OutstandingStudent>> {
        let rows = self.ledger.balance_rows().await?;
        let total = rows.len();

        let students: Vec<OutstandingStudent> = rows
            .into_iter()
            .map(BalanceRow::into_outstanding)
            .filter(|s| filter.matches(s))
            .collect();

        info!(
            matched = students.len(),
            total, "Computed outstanding listing"
        );

        Ok(students)
    }
}

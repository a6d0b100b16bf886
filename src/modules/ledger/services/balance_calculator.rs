use rust_decimal::Decimal;

use crate::modules::fees::FeePlan;
use crate::modules::ledger::models::{StudentBalance, TuitionStatus};
use crate::modules::payments::models::PaymentRecord;

/// Pure derivation of a student's financial position.
///
/// This is the single place balances come from: the dashboard cards, the
/// outstanding list, the CSV exports and the cohort aggregates all go
/// through here rather than recomputing inline. The derivation is a pure
/// function of its inputs — no clock, no hidden state — so identical inputs
/// always produce identical output.
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Compute a student's balance from their fee plan and payment history.
    ///
    /// Only confirmed payments count toward the paid total: money is
    /// "received" once confirmed, so pending and cancelled records move
    /// nothing. Outstanding clamps at zero; an overpayment never produces a
    /// negative amount and the surplus is not tracked as credit.
    pub fn compute_balance(
        student_id: &str,
        plan: &FeePlan,
        payments: &[PaymentRecord],
    ) -> StudentBalance {
        let paid_amount: Decimal = payments
            .iter()
            .filter(|p| p.is_confirmed())
            .map(|p| p.amount)
            .sum();

        let (outstanding_amount, payment_status) =
            Self::derive_position(plan.annual_fee, paid_amount);

        StudentBalance {
            student_id: student_id.to_string(),
            total_fees: plan.annual_fee,
            paid_amount,
            outstanding_amount,
            payment_status,
        }
    }

    /// Derive outstanding amount and status from already-summed totals.
    ///
    /// Used directly by the accessor, whose queries return the confirmed
    /// paid sum per student; keeps the derivation out of SQL and UI code.
    ///
    /// Classification order matters: a settled balance is up to date no
    /// matter how it got there; with something still owed, "late" means no
    /// confirmed payment exists yet, otherwise the student is partial.
    pub fn derive_position(total_fees: Decimal, paid_amount: Decimal) -> (Decimal, TuitionStatus) {
        let outstanding = (total_fees - paid_amount).max(Decimal::ZERO);

        let status = if outstanding.is_zero() {
            TuitionStatus::UpToDate
        } else if paid_amount.is_zero() {
            TuitionStatus::Late
        } else {
            TuitionStatus::Partial
        };

        (outstanding, status)
    }
}

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::modules::ledger::models::OutstandingStudent;
use crate::modules::payments::models::{PaymentMethod, PaymentRecord, PaymentType};

/// One student's contribution to a cohort aggregate
#[derive(Debug, Clone)]
pub struct CohortMember {
    /// Level bucket, already falling back to the unassigned label
    pub level: String,
    pub outstanding_amount: Decimal,
}

impl From<&OutstandingStudent> for CohortMember {
    fn from(student: &OutstandingStudent) -> Self {
        Self {
            level: student.level_bucket().to_string(),
            outstanding_amount: student.balance.outstanding_amount,
        }
    }
}

/// Outstanding totals for one level
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LevelOutstanding {
    pub student_count: u64,
    pub total_outstanding: Decimal,
}

/// Cohort-wide financial statistics for the dashboard and exports.
///
/// A pure reduction over the rows handed in: the caller controls the payment
/// window ("this month" vs "all time") by pre-filtering the sequence, and
/// the student set by pre-filtering the members.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortStats {
    /// Sum of confirmed payment amounts in the window
    pub total_revenue: Decimal,

    /// Sum of outstanding amounts across the member set
    pub total_outstanding: Decimal,

    /// Fraction of students with nothing outstanding, in [0, 1].
    /// Zero students yields zero, not a division error.
    pub collection_rate: Decimal,

    /// Number of confirmed payments in the window
    pub transaction_count: u64,

    pub student_count: u64,
    pub students_up_to_date: u64,

    /// Confirmed amounts grouped by payment method. BTreeMap keeps the key
    /// order stable for deterministic serialization.
    pub payment_method_breakdown: BTreeMap<PaymentMethod, Decimal>,

    /// Confirmed amounts grouped by fee category
    pub payment_type_breakdown: BTreeMap<PaymentType, Decimal>,

    /// Per-level outstanding totals. Only students who still owe something
    /// appear here; fully-paid students count toward the collection rate
    /// but create no level entry.
    pub outstanding_by_level: BTreeMap<String, LevelOutstanding>,

    /// Malformed payment rows (non-positive amount) excluded from the sums.
    /// Reported, never fatal: this feeds a dashboard, not an audit ledger.
    pub skipped_records: u64,
}

impl CohortStats {
    /// Reduce a member set and a payment window into cohort statistics.
    pub fn aggregate(members: &[CohortMember], payments: &[PaymentRecord]) -> Self {
        let mut total_revenue = Decimal::ZERO;
        let mut transaction_count = 0u64;
        let mut skipped_records = 0u64;
        let mut payment_method_breakdown: BTreeMap<PaymentMethod, Decimal> = BTreeMap::new();
        let mut payment_type_breakdown: BTreeMap<PaymentType, Decimal> = BTreeMap::new();

        for payment in payments {
            if payment.amount <= Decimal::ZERO {
                skipped_records += 1;
                continue;
            }

            if !payment.is_confirmed() {
                continue;
            }

            total_revenue += payment.amount;
            transaction_count += 1;

            *payment_method_breakdown
                .entry(payment.method)
                .or_insert(Decimal::ZERO) += payment.amount;
            *payment_type_breakdown
                .entry(payment.payment_type)
                .or_insert(Decimal::ZERO) += payment.amount;
        }

        let mut total_outstanding = Decimal::ZERO;
        let mut students_up_to_date = 0u64;
        let mut outstanding_by_level: BTreeMap<String, LevelOutstanding> = BTreeMap::new();

        for member in members {
            if member.outstanding_amount <= Decimal::ZERO {
                students_up_to_date += 1;
                continue;
            }

            total_outstanding += member.outstanding_amount;
            let entry = outstanding_by_level.entry(member.level.clone()).or_default();
            entry.student_count += 1;
            entry.total_outstanding += member.outstanding_amount;
        }

        let student_count = members.len() as u64;
        let collection_rate = if student_count == 0 {
            Decimal::ZERO
        } else {
            Decimal::from(students_up_to_date) / Decimal::from(student_count)
        };

        Self {
            total_revenue,
            total_outstanding,
            collection_rate,
            transaction_count,
            student_count,
            students_up_to_date,
            payment_method_breakdown,
            payment_type_breakdown,
            outstanding_by_level,
            skipped_records,
        }
    }

    /// Students who still owe something
    pub fn outstanding_student_count(&self) -> u64 {
        self.outstanding_by_level
            .values()
            .map(|level| level.student_count)
            .sum()
    }

    /// Mean outstanding amount per student who still owes; zero when nobody
    /// does
    pub fn average_outstanding(&self) -> Decimal {
        let concerned = self.outstanding_student_count();
        if concerned == 0 {
            return Decimal::ZERO;
        }
        self.total_outstanding / Decimal::from(concerned)
    }
}

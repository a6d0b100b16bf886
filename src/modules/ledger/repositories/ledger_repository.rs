use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::core::{AppError, Result};
use crate::modules::ledger::models::{OutstandingStudent, StudentBalance};
use crate::modules::ledger::services::BalanceCalculator;

/// Per-student balance inputs as returned by the store: identity, class
/// assignment, the applicable annual fee, and the confirmed paid sum.
///
/// Outstanding amount and status are deliberately absent — the store hands
/// back raw sums and the calculator derives the rest, so there is exactly
/// one place the derivation lives.
#[derive(Debug, Clone)]
pub struct BalanceRow {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub class_name: Option<String>,
    pub level_name: Option<String>,
    /// Annual fee for the student's level; zero when unassigned
    pub annual_fee: Decimal,
    /// Sum of the student's confirmed payments
    pub confirmed_paid: Decimal,
}

impl BalanceRow {
    /// Attach the derived balance fields to the row
    pub fn into_outstanding(self) -> OutstandingStudent {
        let (outstanding_amount, payment_status) =
            BalanceCalculator::derive_position(self.annual_fee, self.confirmed_paid);

        OutstandingStudent {
            balance: StudentBalance {
                student_id: self.student_id.clone(),
                total_fees: self.annual_fee,
                paid_amount: self.confirmed_paid,
                outstanding_amount,
                payment_status,
            },
            student_id: self.student_id,
            first_name: self.first_name,
            last_name: self.last_name,
            class_name: self.class_name,
            level_name: self.level_name,
        }
    }
}

/// Read access to the per-student balance inputs
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// One row per enrolled student, with fee and confirmed-paid sums
    /// attached. No students is an empty vector, not an error.
    async fn balance_rows(&self) -> Result<Vec<BalanceRow>>;
}

pub struct PgLedgerRepository {
    pool: PgPool,
}

impl PgLedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct RawBalanceRow {
    student_id: String,
    first_name: String,
    last_name: String,
    class_name: Option<String>,
    level_name: Option<String>,
    annual_fee: Option<Decimal>,
    confirmed_paid: Option<Decimal>,
}

impl RawBalanceRow {
    /// Validate the upstream row before it enters the typed domain
    fn into_balance_row(self) -> Result<BalanceRow> {
        let annual_fee = self.annual_fee.unwrap_or(Decimal::ZERO);
        let confirmed_paid = self.confirmed_paid.unwrap_or(Decimal::ZERO);

        if annual_fee < Decimal::ZERO {
            return Err(AppError::data_unavailable(format!(
                "Malformed balance row for student '{}': negative annual fee",
                self.student_id
            )));
        }

        if confirmed_paid < Decimal::ZERO {
            return Err(AppError::data_unavailable(format!(
                "Malformed balance row for student '{}': negative paid sum",
                self.student_id
            )));
        }

        Ok(BalanceRow {
            student_id: self.student_id,
            first_name: self.first_name,
            last_name: self.last_name,
            class_name: self.class_name,
            level_name: self.level_name,
            annual_fee,
            confirmed_paid,
        })
    }
}

#[async_trait]
impl LedgerStore for PgLedgerRepository {
    async fn balance_rows(&self) -> Result<Vec<BalanceRow>> {
        let rows = sqlx::query_as::<_, RawBalanceRow>(
            r#"
            SELECT
                s.id AS student_id,
                s.first_name,
                s.last_name,
                c.name AS class_name,
                l.name AS level_name,
                l.annual_fee,
                p.confirmed_paid
            FROM students s
            LEFT JOIN classes c ON c.id = s.class_id
            LEFT JOIN levels l ON l.id = c.level_id
            LEFT JOIN (
                SELECT student_id, SUM(amount) AS confirmed_paid
                FROM payments
                WHERE status = 'Confirmé'
                GROUP BY student_id
            ) p ON p.student_id = s.id
            ORDER BY s.last_name, s.first_name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DataUnavailable(format!("Failed to fetch balance rows: {}", e)))?;

        rows.into_iter()
            .map(RawBalanceRow::into_balance_row)
            .collect()
    }
}

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::str::FromStr;

use super::super::models::{PaymentMethod, PaymentRecord, PaymentStatus, PaymentType, PaymentWithStudent};
use crate::core::{AppError, Result};

/// Persistence boundary for payment records.
///
/// Each call is a single awaitable operation with no implicit retry; failures
/// surface as `DataUnavailable` and the caller decides what to show. Empty
/// result sets are ordinary values, never errors.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Insert a new payment record
    async fn create(&self, payment: &PaymentRecord) -> Result<PaymentRecord>;

    /// Find a payment by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<PaymentRecord>>;

    /// All payments for a student, most recent first
    async fn find_by_student(&self, student_id: &str) -> Result<Vec<PaymentRecord>>;

    /// Latest payments across all students, joined with student identity
    async fn recent_with_students(&self, limit: i64) -> Result<Vec<PaymentWithStudent>>;

    /// Payments dated within [start, end], inclusive
    async fn find_in_window(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<PaymentRecord>>;

    /// Persist a status change
    async fn update_status(&self, id: &str, new_status: PaymentStatus) -> Result<()>;

    /// Hard delete, irreversible
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Forwarding impl so a shared handle (`Arc<S>`) satisfies the store bound,
/// letting callers keep their own reference to the backing store.
#[async_trait]
impl<S: PaymentStore + ?Sized> PaymentStore for std::sync::Arc<S> {
    async fn create(&self, payment: &PaymentRecord) -> Result<PaymentRecord> {
        (**self).create(payment).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PaymentRecord>> {
        (**self).find_by_id(id).await
    }

    async fn find_by_student(&self, student_id: &str) -> Result<Vec<PaymentRecord>> {
        (**self).find_by_student(student_id).await
    }

    async fn recent_with_students(&self, limit: i64) -> Result<Vec<PaymentWithStudent>> {
        (**self).recent_with_students(limit).await
    }

    async fn find_in_window(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<PaymentRecord>> {
        (**self).find_in_window(start, end).await
    }

    async fn update_status(&self, id: &str, new_status: PaymentStatus) -> Result<()> {
        (**self).update_status(id, new_status).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        (**self).delete(id).await
    }
}

pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw row shape for the payments table. Enum columns arrive as text and are
/// validated into the typed representation before leaving the repository.
#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: String,
    student_id: String,
    amount: Decimal,
    payment_method: String,
    payment_type: String,
    payment_date: NaiveDate,
    period_description: Option<String>,
    reference_number: Option<String>,
    status: String,
    mobile_number: Option<String>,
    bank_details: Option<String>,
    notes: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl PaymentRow {
    fn into_record(self) -> Result<PaymentRecord> {
        let method = PaymentMethod::from_str(&self.payment_method)
            .map_err(|e| AppError::data_unavailable(format!("Malformed payment row: {}", e)))?;
        let payment_type = PaymentType::from_str(&self.payment_type)
            .map_err(|e| AppError::data_unavailable(format!("Malformed payment row: {}", e)))?;
        let status = PaymentStatus::from_str(&self.status)
            .map_err(|e| AppError::data_unavailable(format!("Malformed payment row: {}", e)))?;

        Ok(PaymentRecord {
            id: self.id,
            student_id: self.student_id,
            amount: self.amount,
            method,
            payment_type,
            payment_date: self.payment_date,
            period_description: self.period_description,
            reference_number: self.reference_number,
            status,
            mobile_number: self.mobile_number,
            bank_details: self.bank_details,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Payment row joined with student identity
#[derive(sqlx::FromRow)]
struct PaymentStudentRow {
    #[sqlx(flatten)]
    payment: PaymentRow,
    first_name: Option<String>,
    last_name: Option<String>,
    class_name: Option<String>,
    level_name: Option<String>,
}

impl PaymentStudentRow {
    fn into_joined(self) -> Result<PaymentWithStudent> {
        let student_name = match (self.first_name, self.last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            _ => None,
        };

        Ok(PaymentWithStudent {
            payment: self.payment.into_record()?,
            student_name,
            class_name: self.class_name,
            level_name: self.level_name,
        })
    }
}

const PAYMENT_COLUMNS: &str = r#"
    id, student_id, amount, payment_method, payment_type, payment_date,
    period_description, reference_number, status, mobile_number,
    bank_details, notes, created_at, updated_at
"#;

#[async_trait]
impl PaymentStore for PgPaymentRepository {
    async fn create(&self, payment: &PaymentRecord) -> Result<PaymentRecord> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, student_id, amount, payment_method, payment_type,
                payment_date, period_description, reference_number, status,
                mobile_number, bank_details, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.student_id)
        .bind(payment.amount)
        .bind(payment.method.to_string())
        .bind(payment.payment_type.to_string())
        .bind(payment.payment_date)
        .bind(&payment.period_description)
        .bind(&payment.reference_number)
        .bind(payment.status.to_string())
        .bind(&payment.mobile_number)
        .bind(&payment.bank_details)
        .bind(&payment.notes)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DataUnavailable(format!("Failed to create payment: {}", e)))?;

        // Fetch and return the created record
        self.find_by_id(&payment.id)
            .await?
            .ok_or_else(|| AppError::Internal("Payment was created but not found".to_string()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PaymentRecord>> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {} FROM payments WHERE id = $1",
            PAYMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DataUnavailable(format!("Failed to fetch payment: {}", e)))?;

        row.map(PaymentRow::into_record).transpose()
    }

    async fn find_by_student(&self, student_id: &str) -> Result<Vec<PaymentRecord>> {
        let rows = sqlx::query_as::<_, PaymentRow>(&format!(
            r#"
            SELECT {}
            FROM payments
            WHERE student_id = $1
            ORDER BY payment_date DESC, created_at DESC
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DataUnavailable(format!("Failed to fetch student payments: {}", e))
        })?;

        rows.into_iter().map(PaymentRow::into_record).collect()
    }

    async fn recent_with_students(&self, limit: i64) -> Result<Vec<PaymentWithStudent>> {
        let rows = sqlx::query_as::<_, PaymentStudentRow>(
            r#"
            SELECT
                p.id, p.student_id, p.amount, p.payment_method, p.payment_type,
                p.payment_date, p.period_description, p.reference_number,
                p.status, p.mobile_number, p.bank_details, p.notes,
                p.created_at, p.updated_at,
                s.first_name, s.last_name,
                c.name AS class_name, l.name AS level_name
            FROM payments p
            LEFT JOIN students s ON s.id = p.student_id
            LEFT JOIN classes c ON c.id = s.class_id
            LEFT JOIN levels l ON l.id = c.level_id
            ORDER BY p.payment_date DESC, p.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DataUnavailable(format!("Failed to fetch payments: {}", e)))?;

        rows.into_iter().map(PaymentStudentRow::into_joined).collect()
    }

    async fn find_in_window(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<PaymentRecord>> {
        let rows = sqlx::query_as::<_, PaymentRow>(&format!(
            r#"
            SELECT {}
            FROM payments
            WHERE payment_date BETWEEN $1 AND $2
            ORDER BY payment_date DESC, created_at DESC
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DataUnavailable(format!("Failed to fetch payment window: {}", e)))?;

        rows.into_iter().map(PaymentRow::into_record).collect()
    }

    async fn update_status(&self, id: &str, new_status: PaymentStatus) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(new_status.to_string())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DataUnavailable(format!("Failed to update payment: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Payment with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DataUnavailable(format!("Failed to delete payment: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Payment with id '{}' not found",
                id
            )));
        }

        Ok(())
    }
}

use tracing::{info, warn};

use super::super::models::{NewPayment, PaymentRecord, PaymentStatus, PaymentWithStudent};
use super::super::repositories::PaymentStore;
use crate::core::Result;

/// Business logic for the payment submission flow and record lifecycle.
///
/// Submission is at-most-once: validation runs entirely locally, then a
/// single insert is attempted with no automatic retry on failure — an
/// ambiguous outcome must never risk charging a family twice. Callers
/// refresh balances only after the call resolves.
pub struct PaymentService<S: PaymentStore> {
    store: S,
}

impl<S: PaymentStore> PaymentService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record a new payment.
    ///
    /// # Arguments
    /// * `submission` - User-entered payment data
    ///
    /// # Errors
    /// * `Validation` - submission fails local precondition checks; nothing
    ///   is sent to the store
    /// * `DataUnavailable` - the store could not be reached
    pub async fn record_payment(&self, submission: NewPayment) -> Result<PaymentRecord> {
        let record = PaymentRecord::from_submission(submission)?;

        info!(
            payment_id = %record.id,
            student_id = %record.student_id,
            amount = %record.amount,
            method = %record.method,
            "Recording payment"
        );

        let saved = self.store.create(&record).await?;

        info!(payment_id = %saved.id, "Payment recorded");
        Ok(saved)
    }

    /// Confirm a pending payment
    pub async fn confirm(&self, id: &str) -> Result<PaymentRecord> {
        self.transition(id, PaymentStatus::Confirmed).await
    }

    /// Cancel a pending payment
    pub async fn cancel(&self, id: &str) -> Result<PaymentRecord> {
        self.transition(id, PaymentStatus::Cancelled).await
    }

    async fn transition(&self, id: &str, new_status: PaymentStatus) -> Result<PaymentRecord> {
        let mut record = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| crate::core::AppError::not_found(format!("Payment '{}'", id)))?;

        // Legality is enforced by the model: only Pending may move
        record.transition_to(new_status)?;
        self.store.update_status(id, new_status).await?;

        info!(payment_id = id, status = %new_status, "Payment status updated");
        Ok(record)
    }

    /// Hard delete a payment record. Irreversible.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.store.delete(id).await?;
        warn!(payment_id = id, "Payment deleted");
        Ok(())
    }

    /// All payments for one student, most recent first. An empty history is
    /// an ordinary result, not an error.
    pub async fn payments_for_student(&self, student_id: &str) -> Result<Vec<PaymentRecord>> {
        self.store.find_by_student(student_id).await
    }

    /// Latest payments across the school, joined with student identity
    pub async fn recent(&self, limit: i64) -> Result<Vec<PaymentWithStudent>> {
        self.store.recent_with_students(limit).await
    }
}

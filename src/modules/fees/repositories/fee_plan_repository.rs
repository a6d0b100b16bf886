use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::core::{AppError, Result};
use crate::modules::fees::models::FeePlan;

/// Read access to fee plans.
///
/// Fee plans are configured per level; students reach theirs through their
/// class. A missing plan is `Ok(None)`, not an error — only transport or
/// malformed-row failures surface `DataUnavailable`.
#[async_trait]
pub trait FeePlanStore: Send + Sync {
    /// Fee plan for a class, via the class -> level lookup
    async fn fee_plan_for_class(&self, class_id: &str) -> Result<Option<FeePlan>>;

    /// Fee plan for a student, via the student -> class -> level lookup
    async fn fee_plan_for_student(&self, student_id: &str) -> Result<Option<FeePlan>>;
}

pub struct PgFeePlanRepository {
    pool: PgPool,
}

impl PgFeePlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw row shape returned by the level-fee queries
#[derive(sqlx::FromRow)]
struct FeePlanRow {
    level_name: String,
    annual_fee: Decimal,
}

impl FeePlanRow {
    /// Validate the upstream row before it enters the typed domain
    fn into_fee_plan(self) -> Result<FeePlan> {
        FeePlan::new(self.level_name, self.annual_fee)
            .map_err(|e| AppError::data_unavailable(format!("Malformed fee plan row: {}", e)))
    }
}

#[async_trait]
impl FeePlanStore for PgFeePlanRepository {
    async fn fee_plan_for_class(&self, class_id: &str) -> Result<Option<FeePlan>> {
        let row = sqlx::query_as::<_, FeePlanRow>(
            r#"
            SELECT l.name AS level_name, l.annual_fee
            FROM classes c
            JOIN levels l ON l.id = c.level_id
            WHERE c.id = $1
            "#,
        )
        .bind(class_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DataUnavailable(format!("Failed to fetch fee plan: {}", e)))?;

        row.map(FeePlanRow::into_fee_plan).transpose()
    }

    async fn fee_plan_for_student(&self, student_id: &str) -> Result<Option<FeePlan>> {
        let row = sqlx::query_as::<_, FeePlanRow>(
            r#"
            SELECT l.name AS level_name, l.annual_fee
            FROM students s
            JOIN classes c ON c.id = s.class_id
            JOIN levels l ON l.id = c.level_id
            WHERE s.id = $1
            "#,
        )
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DataUnavailable(format!("Failed to fetch student fee plan: {}", e))
        })?;

        row.map(FeePlanRow::into_fee_plan).transpose()
    }
}

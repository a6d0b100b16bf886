use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::core::{locale, AppError, Result};
use crate::modules::fees::PgFeePlanRepository;
use crate::modules::ledger::models::{OutstandingFilter, OutstandingStudent, Priority, TuitionStatus};
use crate::modules::ledger::repositories::PgLedgerRepository;
use crate::modules::ledger::services::{LedgerService, StudentLedger};
use crate::modules::payments::controllers::payment_controller::PaymentResponse;
use crate::modules::payments::repositories::PgPaymentRepository;

/// Query parameters for the outstanding-students listing
#[derive(Debug, Deserialize)]
pub struct OutstandingQuery {
    /// Exact, case-sensitive level name
    #[serde(default)]
    pub level: Option<String>,
    /// Outstanding-amount bracket: "low", "medium" or "high"
    #[serde(default)]
    pub bracket: Option<String>,
}

/// Per-student balance response
#[derive(Debug, Serialize)]
pub struct StudentBalanceResponse {
    pub student_id: String,
    pub level_name: String,
    pub total_fees: String, // Decimal as string for JSON precision
    pub paid_amount: String,
    pub outstanding_amount: String,
    pub payment_status: TuitionStatus,
    pub paid_percent: String,
    pub payments: Vec<PaymentResponse>,
}

impl From<StudentLedger> for StudentBalanceResponse {
    fn from(ledger: StudentLedger) -> Self {
        let paid_percent = locale::format_percent_rounded(ledger.balance.paid_ratio());
        Self {
            student_id: ledger.balance.student_id.clone(),
            level_name: ledger.fee_plan.level_name,
            total_fees: ledger.balance.total_fees.to_string(),
            paid_amount: ledger.balance.paid_amount.to_string(),
            outstanding_amount: ledger.balance.outstanding_amount.to_string(),
            payment_status: ledger.balance.payment_status,
            paid_percent,
            payments: ledger
                .payments
                .into_iter()
                .map(PaymentResponse::from)
                .collect(),
        }
    }
}

/// Outstanding listing row response
#[derive(Debug, Serialize)]
pub struct OutstandingStudentResponse {
    pub student_id: String,
    pub student_name: String,
    pub class_name: Option<String>,
    pub level_name: Option<String>,
    pub total_fees: String,
    pub paid_amount: String,
    pub outstanding_amount: String,
    pub payment_status: TuitionStatus,
    pub priority: Priority,
    pub paid_percent: String,
}

impl From<OutstandingStudent> for OutstandingStudentResponse {
    fn from(student: OutstandingStudent) -> Self {
        Self {
            student_name: student.full_name(),
            priority: student.priority(),
            paid_percent: locale::format_percent_rounded(student.balance.paid_ratio()),
            student_id: student.student_id,
            class_name: student.class_name,
            level_name: student.level_name,
            total_fees: student.balance.total_fees.to_string(),
            paid_amount: student.balance.paid_amount.to_string(),
            outstanding_amount: student.balance.outstanding_amount.to_string(),
            payment_status: student.balance.payment_status,
        }
    }
}

fn service(
    pool: &web::Data<PgPool>,
) -> LedgerService<PgLedgerRepository, PgFeePlanRepository, PgPaymentRepository> {
    let pool = pool.get_ref().clone();
    LedgerService::new(
        PgLedgerRepository::new(pool.clone()),
        PgFeePlanRepository::new(pool.clone()),
        PgPaymentRepository::new(pool),
    )
}

/// Parse the optional bracket token from the query string
pub(crate) fn parse_filter(level: Option<String>, bracket: Option<String>) -> Result<OutstandingFilter> {
    let bracket = bracket
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(AppError::Validation)?;

    Ok(OutstandingFilter { level, bracket })
}

/// GET /students/{id}/balance
///
/// Fee plan, recomputed balance and payment history for one student.
pub async fn student_balance(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let ledger = service(&pool).student_ledger(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(StudentBalanceResponse::from(ledger)))
}

/// GET /students/outstanding
///
/// All students matching the filter with balance fields attached, including
/// those fully paid up (the collection rate needs them).
pub async fn outstanding_students(
    pool: web::Data<PgPool>,
    query: web::Query<OutstandingQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let filter = parse_filter(query.level, query.bracket)?;

    let students = service(&pool).outstanding_students(&filter).await?;
    let rows: Vec<OutstandingStudentResponse> = students
        .into_iter()
        .map(OutstandingStudentResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(rows))
}

/// Configure routes for the ledger module
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/students")
            .route("/outstanding", web::get().to(outstanding_students))
            .route("/{id}/balance", web::get().to(student_balance)),
    );
}

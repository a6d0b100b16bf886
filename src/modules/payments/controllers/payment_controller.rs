use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::error;

use crate::config::Config;
use crate::core::Result;
use crate::modules::payments::models::{
    NewPayment, PaymentMethod, PaymentRecord, PaymentStatus, PaymentType, PaymentWithStudent,
};
use crate::modules::payments::repositories::PgPaymentRepository;
use crate::modules::payments::services::PaymentService;

/// Query parameters for the payment listing endpoint
#[derive(Debug, Deserialize)]
pub struct PaymentListQuery {
    /// Restrict to one student's history
    #[serde(default)]
    pub student_id: Option<String>,
    /// Maximum number of rows for the school-wide listing
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Payment record response structure
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: String,
    pub student_id: String,
    pub amount: String, // Decimal as string for JSON precision
    pub method: PaymentMethod,
    pub payment_type: PaymentType,
    pub payment_date: String, // Format: YYYY-MM-DD
    pub period_description: Option<String>,
    pub reference_number: Option<String>,
    pub status: PaymentStatus,
    pub notes: Option<String>,
}

/// Payment listing row with the paying student's identity
#[derive(Debug, Serialize)]
pub struct PaymentListItemResponse {
    #[serde(flatten)]
    pub payment: PaymentResponse,
    pub student_name: Option<String>,
    pub class_name: Option<String>,
    pub level_name: Option<String>,
}

/// One fee category with its pre-filled amount, for the submission form
#[derive(Debug, Serialize)]
pub struct PaymentTypeResponse {
    pub payment_type: PaymentType,
    pub default_amount: String,
}

impl From<PaymentRecord> for PaymentResponse {
    fn from(record: PaymentRecord) -> Self {
        Self {
            id: record.id,
            student_id: record.student_id,
            amount: record.amount.to_string(),
            method: record.method,
            payment_type: record.payment_type,
            payment_date: record.payment_date.format("%Y-%m-%d").to_string(),
            period_description: record.period_description,
            reference_number: record.reference_number,
            status: record.status,
            notes: record.notes,
        }
    }
}

impl From<PaymentWithStudent> for PaymentListItemResponse {
    fn from(row: PaymentWithStudent) -> Self {
        Self {
            payment: PaymentResponse::from(row.payment),
            student_name: row.student_name,
            class_name: row.class_name,
            level_name: row.level_name,
        }
    }
}

fn service(pool: &web::Data<PgPool>) -> PaymentService<PgPaymentRepository> {
    PaymentService::new(PgPaymentRepository::new(pool.get_ref().clone()))
}

/// GET /payments
///
/// With `student_id`, the student's full history (most recent first);
/// otherwise the school-wide recent listing, capped at `limit`.
pub async fn list_payments(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    query: web::Query<PaymentListQuery>,
) -> Result<HttpResponse> {
    let service = service(&pool);

    let rows: Vec<PaymentListItemResponse> = match &query.student_id {
        Some(student_id) => service
            .payments_for_student(student_id)
            .await?
            .into_iter()
            .map(|p| PaymentListItemResponse {
                payment: PaymentResponse::from(p),
                student_name: None,
                class_name: None,
                level_name: None,
            })
            .collect(),
        None => {
            let limit = query.limit.unwrap_or(config.app.recent_payments_limit);
            service
                .recent(limit)
                .await?
                .into_iter()
                .map(PaymentListItemResponse::from)
                .collect()
        }
    };

    Ok(HttpResponse::Ok().json(rows))
}

/// POST /payments
///
/// Payment submission flow: local validation first, then a single insert.
pub async fn create_payment(
    pool: web::Data<PgPool>,
    body: web::Json<NewPayment>,
) -> Result<HttpResponse> {
    let record = service(&pool).record_payment(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(PaymentResponse::from(record)))
}

/// POST /payments/{id}/confirm
pub async fn confirm_payment(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let record = service(&pool).confirm(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PaymentResponse::from(record)))
}

/// POST /payments/{id}/cancel
pub async fn cancel_payment(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let record = service(&pool).cancel(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PaymentResponse::from(record)))
}

/// DELETE /payments/{id}
///
/// Hard delete after explicit administrative confirmation in the UI.
pub async fn delete_payment(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    if let Err(e) = service(&pool).delete(&id).await {
        error!(payment_id = %id, "Failed to delete payment: {}", e);
        return Err(e);
    }
    Ok(HttpResponse::NoContent().finish())
}

/// GET /payments/types
///
/// Fee categories with their pre-filled amounts for the submission form.
pub async fn payment_types() -> HttpResponse {
    let types: Vec<PaymentTypeResponse> = PaymentType::all()
        .into_iter()
        .map(|payment_type| PaymentTypeResponse {
            payment_type,
            default_amount: payment_type.default_amount().to_string(),
        })
        .collect();

    HttpResponse::Ok().json(types)
}

/// Configure routes for the payments module
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("", web::get().to(list_payments))
            .route("", web::post().to(create_payment))
            .route("/types", web::get().to(payment_types))
            .route("/{id}/confirm", web::post().to(confirm_payment))
            .route("/{id}/cancel", web::post().to(cancel_payment))
            .route("/{id}", web::delete().to(delete_payment)),
    );
}

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::BTreeMap;
use tracing::error;

use crate::config::Config;
use crate::core::{locale, Result};
use crate::modules::ledger::controllers::ledger_controller::parse_filter;
use crate::modules::ledger::repositories::PgLedgerRepository;
use crate::modules::payments::repositories::PgPaymentRepository;
use crate::modules::reports::models::CohortStats;
use crate::modules::reports::services::ReportService;

/// Query parameters for the financial report endpoint
#[derive(Debug, Deserialize)]
pub struct FinancialReportQuery {
    /// Start date of reporting period (inclusive, format: YYYY-MM-DD)
    pub start_date: String,
    /// End date of reporting period (inclusive, format: YYYY-MM-DD)
    pub end_date: String,
}

/// Query parameters for the payments CSV export
#[derive(Debug, Deserialize)]
pub struct PaymentsExportQuery {
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Query parameters for the outstanding CSV export
#[derive(Debug, Deserialize)]
pub struct OutstandingExportQuery {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub bracket: Option<String>,
}

/// Per-level outstanding response entry
#[derive(Debug, Serialize)]
pub struct LevelOutstandingResponse {
    pub student_count: u64,
    pub total_outstanding: String, // Decimal as string for JSON precision
}

/// Financial report response structure
#[derive(Debug, Serialize)]
pub struct CohortStatsResponse {
    pub start_date: String, // Format: YYYY-MM-DD
    pub end_date: String,
    pub total_revenue: String,
    pub total_outstanding: String,
    /// Collection rate as a fraction string, e.g. "0.25"
    pub collection_rate: String,
    /// Collection rate formatted for display, e.g. "25,0%"
    pub collection_rate_percent: String,
    pub transaction_count: u64,
    pub student_count: u64,
    pub students_up_to_date: u64,
    pub outstanding_student_count: u64,
    pub average_outstanding: String,
    pub payment_method_breakdown: BTreeMap<String, String>,
    pub payment_type_breakdown: BTreeMap<String, String>,
    pub outstanding_by_level: BTreeMap<String, LevelOutstandingResponse>,
    pub skipped_records: u64,
}

impl CohortStatsResponse {
    fn from_stats(stats: CohortStats, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date: start_date.format("%Y-%m-%d").to_string(),
            end_date: end_date.format("%Y-%m-%d").to_string(),
            total_revenue: stats.total_revenue.to_string(),
            total_outstanding: stats.total_outstanding.to_string(),
            collection_rate: stats.collection_rate.to_string(),
            collection_rate_percent: locale::format_percent_fr(stats.collection_rate),
            transaction_count: stats.transaction_count,
            student_count: stats.student_count,
            students_up_to_date: stats.students_up_to_date,
            outstanding_student_count: stats.outstanding_student_count(),
            average_outstanding: stats.average_outstanding().to_string(),
            payment_method_breakdown: stats
                .payment_method_breakdown
                .into_iter()
                .map(|(method, amount)| (method.to_string(), amount.to_string()))
                .collect(),
            payment_type_breakdown: stats
                .payment_type_breakdown
                .into_iter()
                .map(|(payment_type, amount)| (payment_type.to_string(), amount.to_string()))
                .collect(),
            outstanding_by_level: stats
                .outstanding_by_level
                .into_iter()
                .map(|(level, entry)| {
                    (
                        level,
                        LevelOutstandingResponse {
                            student_count: entry.student_count,
                            total_outstanding: entry.total_outstanding.to_string(),
                        },
                    )
                })
                .collect(),
            skipped_records: stats.skipped_records,
        }
    }
}

fn service(pool: &web::Data<PgPool>) -> ReportService<PgLedgerRepository, PgPaymentRepository> {
    let pool = pool.get_ref().clone();
    ReportService::new(
        PgLedgerRepository::new(pool.clone()),
        PgPaymentRepository::new(pool),
    )
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        crate::core::AppError::validation(format!(
            "Invalid {} format: '{}'. Expected YYYY-MM-DD",
            field, value
        ))
    })
}

/// GET /reports/financial
///
/// Cohort statistics over the requested payment window.
pub async fn get_financial_report(
    pool: web::Data<PgPool>,
    query: web::Query<FinancialReportQuery>,
) -> Result<HttpResponse> {
    let start_date = parse_date(&query.start_date, "start_date")?;
    let end_date = parse_date(&query.end_date, "end_date")?;

    let stats = match service(&pool).financial_report(start_date, end_date).await {
        Ok(stats) => stats,
        Err(e) => {
            error!("Failed to generate financial report: {}", e);
            return Err(e);
        }
    };

    Ok(HttpResponse::Ok().json(CohortStatsResponse::from_stats(stats, start_date, end_date)))
}

/// GET /reports/payments.csv
///
/// Recent payments as a CSV download.
pub async fn export_payments(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    query: web::Query<PaymentsExportQuery>,
) -> Result<HttpResponse> {
    let limit = query.limit.unwrap_or(config.app.recent_payments_limit);
    let csv = service(&pool).payments_export(limit).await?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .body(csv))
}

/// GET /reports/outstanding.csv
///
/// Outstanding listing as a CSV download.
pub async fn export_outstanding(
    pool: web::Data<PgPool>,
    query: web::Query<OutstandingExportQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let filter = parse_filter(query.level, query.bracket)?;
    let csv = service(&pool).outstanding_export(&filter).await?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .body(csv))
}

/// Configure routes for the reports module
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/financial", web::get().to(get_financial_report))
            .route("/payments.csv", web::get().to(export_payments))
            .route("/outstanding.csv", web::get().to(export_outstanding)),
    );
}

use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Liveness probe response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}

/// Readiness probe response
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub database: String,
}

/// GET /health
///
/// Liveness only: answers 200 whenever the process can serve a request.
/// Dependencies are deliberately not checked here — a dead database must not
/// make the orchestrator restart a healthy process.
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: "ecolage".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// GET /ready
///
/// Readiness: 200 only when the database answers a round trip, 503
/// otherwise. The ledger serves nothing useful without its store.
pub async fn readiness_check(pool: web::Data<PgPool>) -> impl Responder {
    match sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(ReadinessResponse {
            ready: true,
            database: "reachable".to_string(),
        }),
        Err(e) => {
            tracing::error!("Database readiness check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(ReadinessResponse {
                ready: false,
                database: "unreachable".to_string(),
            })
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/ready", web::get().to(readiness_check));
}

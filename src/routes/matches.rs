use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::MatchOrchestrator;
use crate::models::{CalculateMatchRequest, ErrorResponse, HealthResponse};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: MatchOrchestrator,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/calculate-match", web::post().to(calculate_match));
}

/// Health check endpoint
///
/// Reports `degraded` while the service runs without an embedding model.
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let embedding = state.matcher.engine().is_embedding_enabled();

    HttpResponse::Ok().json(HealthResponse {
        status: if embedding { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        similarity_mode: if embedding { "embedding" } else { "fallback" }.to_string(),
    })
}

/// Calculate match endpoint
///
/// POST /calculate-match
///
/// Request body:
/// ```json
/// {
///   "userData": {"selectedJobs": [...], "location": {...}, "availability": {...}},
///   "itemData": {"selectedJobs": [...], "location": {...}, "availability": {...}}
/// }
/// ```
async fn calculate_match(
    state: web::Data<AppState>,
    req: web::Json<CalculateMatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for calculate_match request: {}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    tracing::debug!(
        "Calculating match: {} candidate jobs vs {} posting jobs",
        req.user_data.selected_jobs.len(),
        req.item_data.selected_jobs.len()
    );

    match state.matcher.compute_match(&req.user_data, &req.item_data).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => {
            tracing::error!("Failed to calculate match: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to calculate match".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

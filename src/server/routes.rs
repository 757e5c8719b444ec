//! Analysis endpoints.

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use super::error::{json_error_handler, ApiError};
use super::{health, sse, AppState};
use crate::contract::AnalysisRequest;

/// Largest accepted request body.
pub const MAX_JSON_BODY_BYTES: usize = 512 * 1024;

/// `GET /`
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Welcome to the Credibility Analyzer API. Use /api/analyze to analyze content."
    }))
}

/// `POST /api/analyze`
pub async fn analyze(
    state: web::Data<AppState>,
    request: web::Json<AnalysisRequest>,
) -> Result<HttpResponse, ApiError> {
    let result = state.service.analyze(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// `GET /api/analyses/recent`
pub async fn recent_analyses(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let summaries = state.service.list_recent_analyses().await?;
    Ok(HttpResponse::Ok().json(summaries))
}

/// `GET /api/analyses/history`
pub async fn analysis_history(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let summaries = state.service.list_history().await?;
    Ok(HttpResponse::Ok().json(summaries))
}

/// `DELETE /api/analyses/history`
pub async fn clear_history(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    state.service.clear_history().await?;
    Ok(HttpResponse::NoContent().finish())
}

/// `GET /api/analyses/{id}`
pub async fn get_analysis(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    match state.service.get_analysis(&id).await? {
        Some(result) => Ok(HttpResponse::Ok().json(result)),
        None => Err(ApiError::NotFound(id)),
    }
}

/// Register every route of the service.
///
/// Fixed `/api/analyses/*` paths are registered before `{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(MAX_JSON_BODY_BYTES)
            .error_handler(json_error_handler),
    )
    .route("/", web::get().to(root))
    .route("/api/analyze", web::post().to(analyze))
    .route("/api/analyses/recent", web::get().to(recent_analyses))
    .service(
        web::resource("/api/analyses/history")
            .route(web::get().to(analysis_history))
            .route(web::delete().to(clear_history)),
    )
    .route("/api/analyses/events", web::get().to(sse::history_events))
    .route("/api/analyses/{id}", web::get().to(get_analysis))
    .configure(health::configure);
}

use actix_web::{web, HttpResponse};
use sorting_core::HealthStatus;

use crate::error::AppError;
use crate::state::AppState;

async fn health(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(HealthStatus {
        ok: true,
        version: state.version.to_string(),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}

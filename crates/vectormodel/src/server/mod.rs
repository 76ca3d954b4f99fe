//! HTTP façade over the vector model

pub mod handlers;

pub use handlers::{rank, recommend};

use crate::model::VectorModel;
use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    pub model: Arc<VectorModel>,
}

impl AppState {
    pub fn new(model: Arc<VectorModel>) -> Self {
        Self { model }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub items: usize,
    pub factors: usize,
}

async fn health(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: "vectormodel".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        items: state.model.n_items(),
        factors: state.model.n_factors(),
    })
}

/// Configure application routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health)).service(
        web::scope("/api/v1")
            .route("/recommend", web::post().to(handlers::recommend))
            .route("/rank", web::post().to(handlers::rank)),
    );
}

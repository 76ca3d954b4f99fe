//! Recommendation and ranking handlers

use super::AppState;
use crate::error::VectorModelError;
use crate::factors::ItemId;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 1000;

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RecommendRequest {
    /// Items the user has consumed
    pub seen: Vec<ItemId>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ScoredDocument {
    pub document_id: ItemId,
    pub score: f64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<ScoredDocument>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RankRequest {
    pub candidates: Vec<ItemId>,
    #[serde(default)]
    pub seen: Vec<ItemId>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RankResponse {
    /// Candidates reordered best first
    pub candidates: Vec<ItemId>,
    /// Scores parallel to `candidates`
    pub scores: Vec<f64>,
}

/// POST /api/v1/recommend
pub async fn recommend(
    state: web::Data<AppState>,
    body: web::Json<RecommendRequest>,
) -> Result<HttpResponse, VectorModelError> {
    let request = body.into_inner();
    if request.limit > MAX_LIMIT {
        return Err(VectorModelError::InvalidRequest(format!(
            "limit must not exceed {}",
            MAX_LIMIT
        )));
    }

    let seen: HashSet<ItemId> = request.seen.into_iter().collect();
    debug!(history = seen.len(), limit = request.limit, "Recommend request");

    let recommendations = state
        .model
        .recommend(&seen, request.limit)
        .inspect_err(log_failure)?;

    Ok(HttpResponse::Ok().json(RecommendResponse {
        recommendations: recommendations
            .into_iter()
            .map(|document| ScoredDocument {
                document_id: document.document_id,
                score: document.score(),
            })
            .collect(),
    }))
}

/// POST /api/v1/rank
pub async fn rank(
    state: web::Data<AppState>,
    body: web::Json<RankRequest>,
) -> Result<HttpResponse, VectorModelError> {
    let RankRequest {
        mut candidates,
        seen,
    } = body.into_inner();

    let seen: HashSet<ItemId> = seen.into_iter().collect();
    debug!(
        history = seen.len(),
        candidates = candidates.len(),
        "Rank request"
    );

    let scores = state
        .model
        .rank(&mut candidates, &seen)
        .inspect_err(log_failure)?;

    Ok(HttpResponse::Ok().json(RankResponse { candidates, scores }))
}

fn log_failure(err: &VectorModelError) {
    match err {
        VectorModelError::InsufficientHistory { .. } => debug!(error = %err, "No usable history"),
        _ => warn!(error = %err, "Scoring request failed"),
    }
}

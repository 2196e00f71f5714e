//! Prize HTTP Routes
//!
//! Prize configuration and per-prize draws.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::draw_routes::{error_reply, HandlerError};
use crate::controller::DrawService;
use crate::draw::{DrawError, DrawSession};
use crate::prize::{Prize, PrizeId, PrizeUpdate};

#[derive(Debug, Deserialize)]
pub struct CreatePrizeRequest {
    pub name: String,
    pub winner_count: usize,
    #[serde(default)]
    pub description: Option<String>,
}

/// A prize plus whether any draw in the history used it
#[derive(Debug, Serialize, Deserialize)]
pub struct PrizeResponse {
    #[serde(flatten)]
    pub prize: Prize,
    pub drawn: bool,
}

/// Create prize routes
pub fn prize_routes(state: Arc<DrawService>) -> Router {
    Router::new()
        .route("/prizes", get(list_prizes_handler).post(create_prize_handler))
        .route(
            "/prizes/:id",
            get(get_prize_handler)
                .patch(update_prize_handler)
                .delete(delete_prize_handler),
        )
        .route("/prizes/:id/draw", post(draw_prize_handler))
        .with_state(state)
}

async fn list_prizes_handler(
    State(state): State<Arc<DrawService>>,
) -> Result<Json<Vec<PrizeResponse>>, HandlerError> {
    let prizes = state
        .read(|d| {
            d.prizes()
                .prizes()
                .iter()
                .map(|p| PrizeResponse {
                    prize: p.clone(),
                    drawn: d.is_prize_drawn(p.id),
                })
                .collect()
        })
        .map_err(error_reply)?;
    Ok(Json(prizes))
}

async fn create_prize_handler(
    State(state): State<Arc<DrawService>>,
    Json(request): Json<CreatePrizeRequest>,
) -> Result<(StatusCode, Json<Prize>), HandlerError> {
    let prize = state
        .write(|d| {
            d.add_prize(
                &request.name,
                request.winner_count,
                request.description.as_deref(),
            )
        })
        .map_err(error_reply)?;
    Ok((StatusCode::CREATED, Json(prize)))
}

async fn get_prize_handler(
    State(state): State<Arc<DrawService>>,
    Path(id): Path<PrizeId>,
) -> Result<Json<PrizeResponse>, HandlerError> {
    let prize = state
        .read(|d| {
            d.prizes()
                .get(id)
                .map(|p| PrizeResponse {
                    prize: p.clone(),
                    drawn: d.is_prize_drawn(id),
                })
                .ok_or_else(|| DrawError::not_found(format!("Prize {}", id)))
        })
        .and_then(|r| r)
        .map_err(error_reply)?;
    Ok(Json(prize))
}

async fn update_prize_handler(
    State(state): State<Arc<DrawService>>,
    Path(id): Path<PrizeId>,
    Json(update): Json<PrizeUpdate>,
) -> Result<Json<Prize>, HandlerError> {
    let prize = state
        .write(|d| d.update_prize(id, update))
        .map_err(error_reply)?;
    Ok(Json(prize))
}

async fn delete_prize_handler(
    State(state): State<Arc<DrawService>>,
    Path(id): Path<PrizeId>,
) -> Result<StatusCode, HandlerError> {
    state.write(|d| d.remove_prize(id)).map_err(error_reply)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn draw_prize_handler(
    State(state): State<Arc<DrawService>>,
    Path(id): Path<PrizeId>,
) -> Result<(StatusCode, Json<DrawSession>), HandlerError> {
    let session = state.write(|d| d.draw_prize(id)).map_err(error_reply)?;
    Ok((StatusCode::CREATED, Json(session)))
}

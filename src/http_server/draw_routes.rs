//! Draw HTTP Routes
//!
//! Endpoints for the candidate pool, draws, forfeits, redraws and exports.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::consolidation::ConsolidatedSummary;
use crate::controller::{DrawService, LuckyDraw};
use crate::draw::{DrawError, DrawResult, DrawSession, RedrawBatch, SessionId, Winner, WinnerId};
use crate::export::{self, ExportFormat};
use crate::pool::PoolStatus;

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct CandidatesRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub csv: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DrawRequest {
    pub count: usize,
    #[serde(default)]
    pub prize_label: String,
}

#[derive(Debug, Deserialize)]
pub struct ForfeitRequest {
    pub winner_ids: Vec<WinnerId>,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RedrawRequest {
    #[serde(default)]
    pub winner_ids: Option<Vec<WinnerId>>,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: Option<ExportFormat>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConsolidatedResponse {
    pub draw_id: SessionId,
    pub prize_label: String,
    pub winners: Vec<Winner>,
    pub summary: ConsolidatedSummary,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<&DrawError> for ErrorResponse {
    fn from(err: &DrawError) -> Self {
        Self {
            error: err.to_string(),
            code: err.code().to_string(),
        }
    }
}

pub(crate) type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Map a draw error to its status and JSON body
pub(crate) fn error_reply(err: DrawError) -> HandlerError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(&err)))
}

// ==================
// Draw Routes
// ==================

/// Create pool and draw routes
pub fn draw_routes(state: Arc<DrawService>) -> Router {
    Router::new()
        // Pool
        .route("/candidates", post(load_candidates_handler))
        .route("/pool", get(pool_status_handler).delete(clear_pool_handler))
        .route("/pool/reset", post(reset_pool_handler))
        // Draws
        .route(
            "/draws",
            get(list_draws_handler)
                .post(draw_handler)
                .delete(clear_history_handler),
        )
        .route("/draws/undo", post(undo_draw_handler))
        .route("/draws/:id", get(get_draw_handler))
        .route("/draws/:id/winners", get(consolidated_handler))
        .route("/draws/:id/forfeits", post(forfeit_handler))
        .route("/draws/:id/redraw", post(redraw_handler))
        .route("/draws/:id/redraw/undo", post(undo_redraw_handler))
        // Exports
        .route("/draws/:id/export", get(export_draw_handler))
        .route("/history/export", get(export_history_handler))
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

/// Every id must belong to the draw addressed by the path
fn require_members(draw: &LuckyDraw, id: SessionId, winner_ids: &[WinnerId]) -> DrawResult<()> {
    let session = draw.require_session(id)?;
    match winner_ids.iter().find(|w| !session.contains(**w)) {
        Some(stray) => Err(DrawError::not_found(format!(
            "Winner {} in draw {}",
            stray, id
        ))),
        None => Ok(()),
    }
}

fn export_reply(content: String, format: ExportFormat, stem: &str) -> Response {
    let disposition = format!("attachment; filename=\"{}.{}\"", stem, format.extension());
    (
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        content,
    )
        .into_response()
}

// ==================
// Pool Handlers
// ==================

async fn load_candidates_handler(
    State(state): State<Arc<DrawService>>,
    Json(request): Json<CandidatesRequest>,
) -> Result<(StatusCode, Json<PoolStatus>), HandlerError> {
    let status = state
        .write(|d| match (request.text, request.csv) {
            (Some(text), None) => d.load_candidates(&text),
            (None, Some(csv)) => d.load_candidates_csv(&csv),
            _ => Err(DrawError::validation("Provide exactly one of text or csv")),
        })
        .map_err(error_reply)?;
    Ok((StatusCode::CREATED, Json(status)))
}

async fn pool_status_handler(
    State(state): State<Arc<DrawService>>,
) -> Result<Json<PoolStatus>, HandlerError> {
    let status = state.read(|d| d.pool_status()).map_err(error_reply)?;
    Ok(Json(status))
}

async fn reset_pool_handler(
    State(state): State<Arc<DrawService>>,
) -> Result<Json<PoolStatus>, HandlerError> {
    let status = state.write(|d| Ok(d.reset_pool())).map_err(error_reply)?;
    Ok(Json(status))
}

async fn clear_pool_handler(
    State(state): State<Arc<DrawService>>,
) -> Result<StatusCode, HandlerError> {
    state
        .write(|d| {
            d.clear_pool();
            Ok(())
        })
        .map_err(error_reply)?;
    Ok(StatusCode::NO_CONTENT)
}

// ==================
// Draw Handlers
// ==================

async fn draw_handler(
    State(state): State<Arc<DrawService>>,
    Json(request): Json<DrawRequest>,
) -> Result<(StatusCode, Json<DrawSession>), HandlerError> {
    let session = state
        .write(|d| d.draw(request.count, &request.prize_label))
        .map_err(error_reply)?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn list_draws_handler(
    State(state): State<Arc<DrawService>>,
) -> Result<Json<Vec<DrawSession>>, HandlerError> {
    let sessions = state.read(|d| d.sessions().to_vec()).map_err(error_reply)?;
    Ok(Json(sessions))
}

async fn get_draw_handler(
    State(state): State<Arc<DrawService>>,
    Path(id): Path<SessionId>,
) -> Result<Json<DrawSession>, HandlerError> {
    let session = state
        .read(|d| d.require_session(id).cloned())
        .and_then(|r| r)
        .map_err(error_reply)?;
    Ok(Json(session))
}

async fn consolidated_handler(
    State(state): State<Arc<DrawService>>,
    Path(id): Path<SessionId>,
) -> Result<Json<ConsolidatedResponse>, HandlerError> {
    let response = state
        .read(|d| {
            let session = d.require_session(id)?;
            Ok::<_, DrawError>(ConsolidatedResponse {
                draw_id: id,
                prize_label: session.prize_label().to_string(),
                winners: d.consolidated_winners(id)?,
                summary: d.consolidated_summary(id)?,
            })
        })
        .and_then(|r| r)
        .map_err(error_reply)?;
    Ok(Json(response))
}

async fn undo_draw_handler(
    State(state): State<Arc<DrawService>>,
) -> Result<Json<DrawSession>, HandlerError> {
    let session = state.write(|d| d.undo_last_draw()).map_err(error_reply)?;
    Ok(Json(session))
}

async fn clear_history_handler(
    State(state): State<Arc<DrawService>>,
) -> Result<StatusCode, HandlerError> {
    state
        .write(|d| {
            d.clear_history();
            Ok(())
        })
        .map_err(error_reply)?;
    Ok(StatusCode::NO_CONTENT)
}

// ==================
// Forfeit & Redraw Handlers
// ==================

async fn forfeit_handler(
    State(state): State<Arc<DrawService>>,
    Path(id): Path<SessionId>,
    Json(request): Json<ForfeitRequest>,
) -> Result<Json<DrawSession>, HandlerError> {
    let session = state
        .write(|d| {
            require_members(d, id, &request.winner_ids)?;
            d.mark_forfeited(&request.winner_ids, &request.reason)?;
            d.require_session(id).cloned()
        })
        .map_err(error_reply)?;
    Ok(Json(session))
}

async fn redraw_handler(
    State(state): State<Arc<DrawService>>,
    Path(id): Path<SessionId>,
    request: Option<Json<RedrawRequest>>,
) -> Result<(StatusCode, Json<Vec<Winner>>), HandlerError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let replacements = state
        .write(|d| match request.winner_ids {
            Some(ids) => {
                require_members(d, id, &ids)?;
                d.redraw(&ids)
            }
            None => d.redraw_pending(id),
        })
        .map_err(error_reply)?;
    Ok((StatusCode::CREATED, Json(replacements)))
}

async fn undo_redraw_handler(
    State(state): State<Arc<DrawService>>,
    Path(id): Path<SessionId>,
) -> Result<Json<RedrawBatch>, HandlerError> {
    let batch = state
        .write(|d| d.undo_last_redraw(id))
        .map_err(error_reply)?;
    Ok(Json(batch))
}

// ==================
// Export Handlers
// ==================

async fn export_draw_handler(
    State(state): State<Arc<DrawService>>,
    Path(id): Path<SessionId>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, HandlerError> {
    let format = query.format.unwrap_or(ExportFormat::Csv);
    let (content, number) = state
        .read(|d| {
            d.require_session(id)
                .map(|s| (export::export_session(s, format), s.draw_number()))
        })
        .and_then(|r| r)
        .map_err(error_reply)?;
    Ok(export_reply(content, format, &format!("draw-{}", number)))
}

async fn export_history_handler(
    State(state): State<Arc<DrawService>>,
) -> Result<Response, HandlerError> {
    let content = state
        .read(|d| export::history_to_csv(d.sessions()))
        .map_err(error_reply)?;
    Ok(export_reply(content, ExportFormat::Csv, "draw-history"))
}

//! API request types
//!
//! JSON request parsing for all supported operations. Every request is an
//! object with an `op` field; the remaining fields depend on the op.

use serde::{Deserialize, Serialize};

use crate::draw::{SessionId, WinnerId};
use crate::export::ExportFormat;
use crate::prize::{PrizeId, PrizeUpdate};

use super::errors::{ApiError, ApiResult};

/// Draw request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRequest {
    pub count: usize,
    #[serde(default)]
    pub prize_label: String,
}

/// Forfeit request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForfeitRequest {
    pub winner_ids: Vec<WinnerId>,
    #[serde(default)]
    pub reason: String,
}

/// New prize
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeRequest {
    pub name: String,
    pub winner_count: usize,
    #[serde(default)]
    pub description: Option<String>,
}

/// Export request; without a draw id the whole history is exported as CSV
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub draw_id: Option<SessionId>,
    pub format: ExportFormat,
}

/// Unified request envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    LoadCandidates(String),
    LoadCsv(String),
    ResetPool,
    ClearPool,
    PoolStatus,
    Draw(DrawRequest),
    DrawPrize(PrizeId),
    MarkForfeited(ForfeitRequest),
    Redraw(Vec<WinnerId>),
    RedrawPending(SessionId),
    ConsolidatedWinners(SessionId),
    History,
    UndoLastDraw,
    UndoLastRedraw(SessionId),
    ClearHistory,
    AddPrize(PrizeRequest),
    UpdatePrize(PrizeId, PrizeUpdate),
    RemovePrize(PrizeId),
    ListPrizes,
    Export(ExportRequest),
    Metrics,
}

/// Raw request for parsing
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawRequest {
    op: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    csv: Option<String>,
    #[serde(default)]
    count: Option<usize>,
    #[serde(default)]
    prize_label: Option<String>,
    #[serde(default)]
    winner_ids: Option<Vec<WinnerId>>,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    draw_id: Option<SessionId>,
    #[serde(default)]
    prize_id: Option<PrizeId>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    winner_count: Option<usize>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    format: Option<ExportFormat>,
}

impl RawRequest {
    fn draw_id(&mut self) -> ApiResult<SessionId> {
        self.draw_id
            .take()
            .ok_or_else(|| ApiError::invalid_request("Missing draw_id"))
    }

    fn prize_id(&mut self) -> ApiResult<PrizeId> {
        self.prize_id
            .take()
            .ok_or_else(|| ApiError::invalid_request("Missing prize_id"))
    }

    fn winner_ids(&mut self) -> ApiResult<Vec<WinnerId>> {
        self.winner_ids
            .take()
            .ok_or_else(|| ApiError::invalid_request("Missing winner_ids"))
    }
}

impl Request {
    /// Parse a request from JSON string
    pub fn parse(json: &str) -> ApiResult<Self> {
        let mut raw: RawRequest = serde_json::from_str(json)
            .map_err(|e| ApiError::invalid_request(format!("Invalid JSON: {}", e)))?;

        match raw.op.as_str() {
            "load_candidates" => {
                let text = raw
                    .text
                    .ok_or_else(|| ApiError::invalid_request("Missing text"))?;
                Ok(Request::LoadCandidates(text))
            }
            "load_csv" => {
                let csv = raw
                    .csv
                    .ok_or_else(|| ApiError::invalid_request("Missing csv"))?;
                Ok(Request::LoadCsv(csv))
            }
            "reset_pool" => Ok(Request::ResetPool),
            "clear_pool" => Ok(Request::ClearPool),
            "pool_status" => Ok(Request::PoolStatus),
            "draw" => {
                let count = raw
                    .count
                    .ok_or_else(|| ApiError::invalid_request("Missing count"))?;
                Ok(Request::Draw(DrawRequest {
                    count,
                    prize_label: raw.prize_label.unwrap_or_default(),
                }))
            }
            "draw_prize" => Ok(Request::DrawPrize(raw.prize_id()?)),
            "mark_forfeited" => Ok(Request::MarkForfeited(ForfeitRequest {
                winner_ids: raw.winner_ids()?,
                reason: raw.reason.unwrap_or_default(),
            })),
            "redraw" => Ok(Request::Redraw(raw.winner_ids()?)),
            "redraw_pending" => Ok(Request::RedrawPending(raw.draw_id()?)),
            "consolidated_winners" => Ok(Request::ConsolidatedWinners(raw.draw_id()?)),
            "history" => Ok(Request::History),
            "undo_last_draw" => Ok(Request::UndoLastDraw),
            "undo_last_redraw" => Ok(Request::UndoLastRedraw(raw.draw_id()?)),
            "clear_history" => Ok(Request::ClearHistory),
            "add_prize" => {
                let name = raw
                    .name
                    .ok_or_else(|| ApiError::invalid_request("Missing name"))?;
                let winner_count = raw
                    .winner_count
                    .ok_or_else(|| ApiError::invalid_request("Missing winner_count"))?;
                Ok(Request::AddPrize(PrizeRequest {
                    name,
                    winner_count,
                    description: raw.description,
                }))
            }
            "update_prize" => {
                let id = raw.prize_id()?;
                Ok(Request::UpdatePrize(
                    id,
                    PrizeUpdate {
                        name: raw.name,
                        winner_count: raw.winner_count,
                        description: raw.description,
                    },
                ))
            }
            "remove_prize" => Ok(Request::RemovePrize(raw.prize_id()?)),
            "list_prizes" => Ok(Request::ListPrizes),
            "export" => Ok(Request::Export(ExportRequest {
                draw_id: raw.draw_id,
                format: raw.format.unwrap_or(ExportFormat::Csv),
            })),
            "metrics" => Ok(Request::Metrics),
            other => Err(ApiError::unknown_operation(other)),
        }
    }
}

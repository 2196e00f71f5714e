//! JSON request API
//!
//! Line-oriented JSON operations over the shared draw service, used by the
//! `run` command. Every request carries an `op` field.
//!
//! # Supported Operations
//!
//! - load_candidates, load_csv, reset_pool, clear_pool, pool_status
//! - draw, draw_prize
//! - mark_forfeited, redraw, redraw_pending, undo_last_redraw
//! - consolidated_winners, history, undo_last_draw, clear_history
//! - add_prize, update_prize, remove_prize, list_prizes
//! - export, metrics

mod errors;
mod handler;
mod request;
mod response;

pub use errors::{ApiError, ApiErrorCode, ApiResult};
pub use handler::ApiHandler;
pub use request::{DrawRequest, ExportRequest, ForfeitRequest, PrizeRequest, Request};
pub use response::{ErrorResponse, Response, SuccessResponse};

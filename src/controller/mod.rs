//! Session controller
//!
//! Owns the candidate pool, the draw history and the prize list, and is
//! the only place the draw, forfeit and redraw components are wired
//! together. [`DrawService`] adds single-writer locking and snapshot
//! persistence for concurrent hosts.

mod lucky_draw;
mod service;
mod state;

pub use lucky_draw::{LuckyDraw, DEFAULT_MAX_CANDIDATES};
pub use service::DrawService;
pub use state::DrawState;

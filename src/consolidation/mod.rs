//! Consolidated winner view
//!
//! The authoritative current result of a draw session: valid originals plus
//! every replacement, ordered by slot, with forfeited winners hidden. This
//! is a pure projection over the session's history.

mod view;

pub use view::{ConsolidatedSummary, ConsolidationView};

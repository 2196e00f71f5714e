//! luckydraw - random winner selection with forfeits and redraws
//!
//! Candidates are drawn without replacement from a pool. Winners who
//! cannot claim a prize are forfeited and replaced by redraws from the
//! same pool, and the consolidated view shows the final winner list.

pub mod api;
pub mod cli;
pub mod consolidation;
pub mod controller;
pub mod draw;
pub mod export;
pub mod forfeit;
pub mod http_server;
pub mod observability;
pub mod pool;
pub mod prize;
pub mod redraw;
pub mod store;

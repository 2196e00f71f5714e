//! Redraw coordination
//!
//! Fills forfeited slots with replacements drawn from what is left of the
//! pool, exactly one replacement per forfeited winner.

mod coordinator;

pub use coordinator::RedrawCoordinator;

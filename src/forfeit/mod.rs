//! Forfeit tracking
//!
//! Marks winners ineligible after selection. A forfeited winner stays in
//! its session's history and its candidate stays consumed: a person who
//! already appeared in a draw is never drawn again in the same pool
//! lifecycle.

mod tracker;

pub use tracker::ForfeitTracker;

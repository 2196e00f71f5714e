//! Metrics registry
//!
//! Counters only, monotonic, reset on process start.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for the draw engine
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    candidates_loaded: AtomicU64,
    draws_completed: AtomicU64,
    winners_drawn: AtomicU64,
    winners_forfeited: AtomicU64,
    redraws_completed: AtomicU64,
    replacements_drawn: AtomicU64,
    undos: AtomicU64,
    operations_rejected: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_candidates_loaded(&self, count: u64) {
        self.candidates_loaded.fetch_add(count, Ordering::Relaxed);
    }

    /// Record a completed draw of `winners` winners
    pub fn record_draw(&self, winners: u64) {
        self.draws_completed.fetch_add(1, Ordering::Relaxed);
        self.winners_drawn.fetch_add(winners, Ordering::Relaxed);
    }

    pub fn add_forfeits(&self, count: u64) {
        self.winners_forfeited.fetch_add(count, Ordering::Relaxed);
    }

    /// Record a completed redraw of `replacements` replacements
    pub fn record_redraw(&self, replacements: u64) {
        self.redraws_completed.fetch_add(1, Ordering::Relaxed);
        self.replacements_drawn.fetch_add(replacements, Ordering::Relaxed);
    }

    pub fn increment_undos(&self) {
        self.undos.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rejected(&self) {
        self.operations_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            candidates_loaded: self.candidates_loaded.load(Ordering::Relaxed),
            draws_completed: self.draws_completed.load(Ordering::Relaxed),
            winners_drawn: self.winners_drawn.load(Ordering::Relaxed),
            winners_forfeited: self.winners_forfeited.load(Ordering::Relaxed),
            redraws_completed: self.redraws_completed.load(Ordering::Relaxed),
            replacements_drawn: self.replacements_drawn.load(Ordering::Relaxed),
            undos: self.undos.load(Ordering::Relaxed),
            operations_rejected: self.operations_rejected.load(Ordering::Relaxed),
        }
    }

    /// Current values as a JSON object
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).expect("MetricsSnapshot serialization cannot fail")
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub candidates_loaded: u64,
    pub draws_completed: u64,
    pub winners_drawn: u64,
    pub winners_forfeited: u64,
    pub redraws_completed: u64,
    pub replacements_drawn: u64,
    pub undos: u64,
    pub operations_rejected: u64,
}

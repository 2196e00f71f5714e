//! Consolidated winner view

use serde::{Deserialize, Serialize};

use crate::draw::{DrawSession, Winner};

/// Counts describing a consolidated session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatedSummary {
    /// Originally requested winner count
    pub requested: usize,
    /// Winners currently shown
    pub visible: usize,
    /// Visible winners that replaced a forfeited one
    pub replacements: usize,
    /// Forfeited winners hidden from the view
    pub forfeited: usize,
    /// Forfeited winners still waiting for a replacement
    pub pending_redraws: usize,
}

impl ConsolidatedSummary {
    /// Every slot is filled
    pub fn is_complete(&self) -> bool {
        self.pending_redraws == 0 && self.visible == self.requested
    }
}

/// Read-only projection over a draw session
pub struct ConsolidationView;

impl ConsolidationView {
    /// Visible winners in position order.
    ///
    /// Original winners that were never forfeited and replacement winners
    /// are shown; any winner with status `forfeited` is excluded.
    pub fn render(session: &DrawSession) -> Vec<&Winner> {
        let mut visible: Vec<&Winner> = session.winners().iter().filter(|w| w.is_won()).collect();
        visible.sort_by_key(|w| w.position);
        visible
    }

    /// Owned copy of [`ConsolidationView::render`]
    pub fn render_owned(session: &DrawSession) -> Vec<Winner> {
        Self::render(session).into_iter().cloned().collect()
    }

    pub fn summarize(session: &DrawSession) -> ConsolidatedSummary {
        let visible = Self::render(session);
        ConsolidatedSummary {
            requested: session.requested(),
            visible: visible.len(),
            replacements: visible.iter().filter(|w| w.is_replacement()).count(),
            forfeited: session.forfeited_count(),
            pending_redraws: session.pending_redraws().len(),
        }
    }
}

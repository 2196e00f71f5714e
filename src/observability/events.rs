//! Observable events
//!
//! Every mutating draw operation emits exactly one event, success or
//! rejection.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    BootStart,
    BootComplete,
    ConfigLoaded,
    Serving,
    ShutdownComplete,

    // Pool
    CandidatesLoaded,
    LoadRejected,
    PoolReset,
    PoolCleared,

    // Draw
    DrawComplete,
    DrawRejected,
    DrawUndone,
    HistoryCleared,

    // Forfeit & redraw
    WinnersForfeited,
    ForfeitRejected,
    RedrawComplete,
    RedrawRejected,
    RedrawUndone,

    // Prizes
    PrizeChanged,

    // Persistence
    SnapshotLoaded,
    SnapshotSaved,
    SnapshotFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "LUCKYDRAW_STARTUP_BEGIN",
            Event::BootComplete => "LUCKYDRAW_STARTUP_COMPLETE",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::Serving => "LUCKYDRAW_SERVING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::CandidatesLoaded => "CANDIDATES_LOADED",
            Event::LoadRejected => "LOAD_REJECTED",
            Event::PoolReset => "POOL_RESET",
            Event::PoolCleared => "POOL_CLEARED",

            Event::DrawComplete => "DRAW_COMPLETE",
            Event::DrawRejected => "DRAW_REJECTED",
            Event::DrawUndone => "DRAW_UNDONE",
            Event::HistoryCleared => "HISTORY_CLEARED",

            Event::WinnersForfeited => "WINNERS_FORFEITED",
            Event::ForfeitRejected => "FORFEIT_REJECTED",
            Event::RedrawComplete => "REDRAW_COMPLETE",
            Event::RedrawRejected => "REDRAW_REJECTED",
            Event::RedrawUndone => "REDRAW_UNDONE",

            Event::PrizeChanged => "PRIZE_CHANGED",

            Event::SnapshotLoaded => "SNAPSHOT_LOADED",
            Event::SnapshotSaved => "SNAPSHOT_SAVED",
            Event::SnapshotFailed => "SNAPSHOT_FAILED",
        }
    }

    /// Rejections and failures log at WARN/ERROR rather than INFO
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Event::LoadRejected
                | Event::DrawRejected
                | Event::ForfeitRejected
                | Event::RedrawRejected
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Event::SnapshotFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_strings_are_screaming_snake() {
        let events = [
            Event::BootStart,
            Event::CandidatesLoaded,
            Event::LoadRejected,
            Event::DrawComplete,
            Event::WinnersForfeited,
            Event::RedrawComplete,
            Event::RedrawUndone,
            Event::SnapshotSaved,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_rejection_classification() {
        assert!(Event::DrawRejected.is_rejection());
        assert!(Event::LoadRejected.is_rejection());
        assert!(!Event::CandidatesLoaded.is_rejection());
        assert!(!Event::DrawComplete.is_rejection());
        assert!(Event::SnapshotFailed.is_failure());
    }
}

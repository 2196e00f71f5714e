//! Forfeit tracking
//!
//! Moves `won` winners to `forfeited`. The pool is never touched: a
//! forfeited candidate stays consumed for the rest of the lifecycle.

use std::collections::HashSet;

use chrono::Utc;

use crate::draw::{DrawError, DrawResult, DrawSession, WinnerId, WinnerStatus};

/// Applies `won -> forfeited` transitions
pub struct ForfeitTracker;

impl ForfeitTracker {
    /// Forfeit every target winner in `session`.
    ///
    /// All targets are validated first; if any target is unknown, repeated
    /// or not currently `won`, nothing is changed. Blank reasons are stored
    /// as absent.
    pub fn mark_forfeited(
        session: &mut DrawSession,
        winner_ids: &[WinnerId],
        reason: &str,
    ) -> DrawResult<()> {
        if winner_ids.is_empty() {
            return Err(DrawError::validation(
                "Select at least one winner to forfeit",
            ));
        }

        let mut seen = HashSet::new();
        for id in winner_ids {
            if !seen.insert(*id) {
                return Err(DrawError::validation(format!(
                    "Winner {} listed more than once",
                    id
                )));
            }
            let winner = session
                .winner(*id)
                .ok_or_else(|| DrawError::not_found(format!("Winner {} in draw {}", id, session.id())))?;
            if !winner.is_won() {
                return Err(DrawError::invalid_state(format!(
                    "Winner {} ({}) is already {}",
                    winner.name,
                    id,
                    winner.status.as_str()
                )));
            }
        }

        let reason = Some(reason.trim())
            .filter(|r| !r.is_empty())
            .map(str::to_string);
        let now = Utc::now();

        for id in winner_ids {
            if let Some(winner) = session.winner_mut(*id) {
                winner.status = WinnerStatus::Forfeited;
                winner.forfeit_reason = reason.clone();
                winner.forfeited_at = Some(now);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawEngine;
    use crate::pool::{CandidatePool, RngSampler};

    fn drawn_session(pool: &mut CandidatePool, count: usize) -> DrawSession {
        let mut sampler = RngSampler::seeded(21);
        DrawEngine::draw(pool, count, "Prize", &mut sampler).unwrap()
    }

    #[test]
    fn test_forfeit_marks_status_and_reason() {
        let mut pool = CandidatePool::from_text("A\nB\nC").unwrap();
        let mut session = drawn_session(&mut pool, 2);
        let target = session.winners()[0].id;

        ForfeitTracker::mark_forfeited(&mut session, &[target], " Absent ").unwrap();

        let w = session.winner(target).unwrap();
        assert_eq!(w.status, WinnerStatus::Forfeited);
        assert_eq!(w.forfeit_reason.as_deref(), Some("Absent"));
        assert!(w.forfeited_at.is_some());
        assert!(w.is_pending_redraw());
    }

    #[test]
    fn test_forfeit_does_not_return_candidate() {
        let mut pool = CandidatePool::from_text("A\nB\nC").unwrap();
        let mut session = drawn_session(&mut pool, 2);
        let target = session.winners()[0].id;

        ForfeitTracker::mark_forfeited(&mut session, &[target], "").unwrap();

        assert_eq!(pool.drawn_count(), 2);
        assert_eq!(pool.available_count(), 1);
        assert!(session.winner(target).unwrap().forfeit_reason.is_none());
    }

    #[test]
    fn test_double_forfeit_rejected() {
        let mut pool = CandidatePool::from_text("A\nB\nC").unwrap();
        let mut session = drawn_session(&mut pool, 2);
        let target = session.winners()[0].id;

        ForfeitTracker::mark_forfeited(&mut session, &[target], "").unwrap();
        let err = ForfeitTracker::mark_forfeited(&mut session, &[target], "").unwrap_err();
        assert!(matches!(err, DrawError::InvalidState(_)));
    }

    #[test]
    fn test_partial_failure_changes_nothing() {
        let mut pool = CandidatePool::from_text("A\nB\nC").unwrap();
        let mut session = drawn_session(&mut pool, 2);
        let first = session.winners()[0].id;
        let second = session.winners()[1].id;
        ForfeitTracker::mark_forfeited(&mut session, &[second], "").unwrap();

        let err = ForfeitTracker::mark_forfeited(&mut session, &[first, second], "").unwrap_err();
        assert!(matches!(err, DrawError::InvalidState(_)));
        assert!(session.winner(first).unwrap().is_won());
    }

    #[test]
    fn test_unknown_and_empty_targets() {
        let mut pool = CandidatePool::from_text("A\nB").unwrap();
        let mut session = drawn_session(&mut pool, 1);

        let err = ForfeitTracker::mark_forfeited(&mut session, &[], "").unwrap_err();
        assert!(matches!(err, DrawError::Validation(_)));

        let err = ForfeitTracker::mark_forfeited(&mut session, &[WinnerId::new()], "").unwrap_err();
        assert!(matches!(err, DrawError::NotFound(_)));
    }

    #[test]
    fn test_repeated_target_rejected() {
        let mut pool = CandidatePool::from_text("A\nB").unwrap();
        let mut session = drawn_session(&mut pool, 1);
        let id = session.winners()[0].id;

        let err = ForfeitTracker::mark_forfeited(&mut session, &[id, id], "").unwrap_err();
        assert!(matches!(err, DrawError::Validation(_)));
        assert!(session.winner(id).unwrap().is_won());
    }
}

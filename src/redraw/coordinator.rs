//! Redraw coordination
//!
//! Fills forfeited slots with fresh candidates and rolls back the most
//! recent redraw batch of a draw.

use std::collections::HashSet;

use chrono::Utc;

use crate::draw::{
    DrawError, DrawResult, DrawSession, RedrawBatch, RedrawRecord, Winner, WinnerId,
};
use crate::pool::{CandidatePool, Sampler};

/// Draws replacements for forfeited winners
pub struct RedrawCoordinator;

impl RedrawCoordinator {
    /// Draw one replacement for each forfeited winner in `forfeited`.
    ///
    /// Exactly `forfeited.len()` candidates are taken from the pool. Each
    /// replacement takes the position of the winner it replaces. Every
    /// target must be forfeited and not yet replaced; on any failure,
    /// including an exhausted pool, neither the pool nor the session changes.
    pub fn redraw(
        pool: &mut CandidatePool,
        session: &mut DrawSession,
        forfeited: &[WinnerId],
        sampler: &mut dyn Sampler,
    ) -> DrawResult<Vec<Winner>> {
        if forfeited.is_empty() {
            return Err(DrawError::validation("No forfeited winners to redraw"));
        }

        let mut seen = HashSet::new();
        for id in forfeited {
            if !seen.insert(*id) {
                return Err(DrawError::validation(format!(
                    "Winner {} listed more than once",
                    id
                )));
            }
            let winner = session
                .winner(*id)
                .ok_or_else(|| DrawError::not_found(format!("Winner {} in draw {}", id, session.id())))?;
            if !winner.is_forfeited() {
                return Err(DrawError::invalid_state(format!(
                    "Winner {} ({}) has not been forfeited",
                    winner.name, id
                )));
            }
            if let Some(replacement) = winner.replaced_by {
                return Err(DrawError::invalid_state(format!(
                    "Winner {} ({}) was already replaced by {}",
                    winner.name, id, replacement
                )));
            }
        }

        let selected = pool.draw_without_replacement(forfeited.len(), sampler)?;

        let mut replacements = Vec::with_capacity(selected.len());
        let mut records = Vec::with_capacity(selected.len());

        for (forfeited_id, candidate) in forfeited.iter().zip(selected.iter()) {
            let Some(original) = session.winner_mut(*forfeited_id) else {
                continue;
            };
            let replacement = Winner::replacement(candidate, original);
            original.replaced_by = Some(replacement.id);

            records.push(RedrawRecord {
                forfeited: original.id,
                forfeited_name: original.name.clone(),
                replacement: replacement.id,
                replacement_name: replacement.name.clone(),
                reason: original.forfeit_reason.clone(),
            });
            replacements.push(replacement);
        }

        for replacement in &replacements {
            session.push_winner(replacement.clone());
        }
        session.push_redraw(RedrawBatch {
            records,
            created_at: Utc::now(),
            pool_epoch: pool.epoch(),
        });

        Ok(replacements)
    }

    /// Redraw every forfeited winner of `session` that has no replacement yet
    pub fn redraw_pending(
        pool: &mut CandidatePool,
        session: &mut DrawSession,
        sampler: &mut dyn Sampler,
    ) -> DrawResult<Vec<Winner>> {
        let pending: Vec<WinnerId> = session.pending_redraws().iter().map(|w| w.id).collect();
        Self::redraw(pool, session, &pending, sampler)
    }

    /// Roll back the most recent redraw batch of `session`.
    ///
    /// Replacement winners are removed and their candidates go back to the
    /// pool. The forfeited winners stay forfeited and become eligible for a
    /// new redraw. Fails if a replacement has itself been forfeited since,
    /// or if the batch was drawn before the pool was reset or reloaded.
    pub fn undo_last(pool: &mut CandidatePool, session: &mut DrawSession) -> DrawResult<RedrawBatch> {
        let batch = session
            .redraws()
            .last()
            .cloned()
            .ok_or_else(|| DrawError::invalid_state("No redraws to undo"))?;

        if batch.pool_epoch != pool.epoch() {
            return Err(DrawError::invalid_state(
                "Last redraw belongs to an earlier pool lifecycle",
            ));
        }

        for record in &batch.records {
            let replacement = session.winner(record.replacement).ok_or_else(|| {
                DrawError::Internal(format!("Replacement {} missing", record.replacement))
            })?;
            if !replacement.is_won() {
                return Err(DrawError::invalid_state(format!(
                    "Replacement {} ({}) was forfeited after the redraw",
                    replacement.name, replacement.id
                )));
            }
        }

        for record in &batch.records {
            if let Some(replacement) = session.remove_winner(record.replacement) {
                pool.release([&replacement.candidate_id]);
            }
            if let Some(original) = session.winner_mut(record.forfeited) {
                original.replaced_by = None;
            }
        }
        session.pop_redraw();

        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{DrawEngine, WinnerStatus};
    use crate::forfeit::ForfeitTracker;
    use crate::pool::RngSampler;

    fn setup(total: usize, count: usize) -> (CandidatePool, DrawSession, RngSampler) {
        let mut pool = CandidatePool::load((1..=total).map(|i| format!("P{}", i))).unwrap();
        let mut sampler = RngSampler::seeded(99);
        let session = DrawEngine::draw(&mut pool, count, "Prize", &mut sampler).unwrap();
        (pool, session, sampler)
    }

    #[test]
    fn test_redraw_fills_forfeited_slots() {
        let (mut pool, mut session, mut sampler) = setup(8, 6);
        let targets = vec![session.winners()[1].id, session.winners()[4].id];
        ForfeitTracker::mark_forfeited(&mut session, &targets, "Absent").unwrap();

        let replacements =
            RedrawCoordinator::redraw(&mut pool, &mut session, &targets, &mut sampler).unwrap();

        assert_eq!(replacements.len(), 2);
        assert_eq!(pool.available_count(), 0);
        assert_eq!(pool.drawn_count(), 8);
        assert_eq!(replacements[0].position, 2);
        assert_eq!(replacements[1].position, 5);
        for (target, replacement) in targets.iter().zip(&replacements) {
            assert_eq!(replacement.replaces, Some(*target));
            assert_eq!(replacement.status, WinnerStatus::Won);
            assert_eq!(session.winner(*target).unwrap().replaced_by, Some(replacement.id));
        }
        assert_eq!(session.redraws().len(), 1);
        assert_eq!(session.redraws()[0].records[0].reason.as_deref(), Some("Absent"));
    }

    #[test]
    fn test_double_redraw_rejected() {
        let (mut pool, mut session, mut sampler) = setup(8, 6);
        let targets = vec![session.winners()[0].id];
        ForfeitTracker::mark_forfeited(&mut session, &targets, "").unwrap();
        RedrawCoordinator::redraw(&mut pool, &mut session, &targets, &mut sampler).unwrap();

        let err = RedrawCoordinator::redraw(&mut pool, &mut session, &targets, &mut sampler)
            .unwrap_err();
        assert!(matches!(err, DrawError::InvalidState(_)));
        assert_eq!(pool.drawn_count(), 7);
    }

    #[test]
    fn test_redraw_of_active_winner_rejected() {
        let (mut pool, mut session, mut sampler) = setup(8, 6);
        let target = session.winners()[0].id;
        let err = RedrawCoordinator::redraw(&mut pool, &mut session, &[target], &mut sampler)
            .unwrap_err();
        assert!(matches!(err, DrawError::InvalidState(_)));
    }

    #[test]
    fn test_redraw_insufficient_leaves_state() {
        let (mut pool, mut session, mut sampler) = setup(7, 6);
        let targets: Vec<_> = session.winners()[..2].iter().map(|w| w.id).collect();
        ForfeitTracker::mark_forfeited(&mut session, &targets, "").unwrap();

        let err = RedrawCoordinator::redraw(&mut pool, &mut session, &targets, &mut sampler)
            .unwrap_err();
        assert_eq!(
            err,
            DrawError::InsufficientCandidates {
                requested: 2,
                available: 1
            }
        );
        assert_eq!(pool.drawn_count(), 6);
        assert_eq!(session.winners().len(), 6);
        assert!(session.redraws().is_empty());
        for id in &targets {
            assert!(session.winner(*id).unwrap().is_pending_redraw());
        }
    }

    #[test]
    fn test_redraw_pending() {
        let (mut pool, mut session, mut sampler) = setup(10, 5);
        let targets: Vec<_> = session.winners()[2..].iter().map(|w| w.id).collect();
        ForfeitTracker::mark_forfeited(&mut session, &targets, "").unwrap();

        let replacements =
            RedrawCoordinator::redraw_pending(&mut pool, &mut session, &mut sampler).unwrap();
        assert_eq!(replacements.len(), 3);
        assert!(session.pending_redraws().is_empty());

        let err = RedrawCoordinator::redraw_pending(&mut pool, &mut session, &mut sampler)
            .unwrap_err();
        assert!(matches!(err, DrawError::Validation(_)));
    }

    #[test]
    fn test_undo_last_redraw() {
        let (mut pool, mut session, mut sampler) = setup(8, 6);
        let targets = vec![session.winners()[0].id];
        ForfeitTracker::mark_forfeited(&mut session, &targets, "").unwrap();
        let replacements =
            RedrawCoordinator::redraw(&mut pool, &mut session, &targets, &mut sampler).unwrap();

        let batch = RedrawCoordinator::undo_last(&mut pool, &mut session).unwrap();

        assert_eq!(batch.records[0].replacement, replacements[0].id);
        assert_eq!(pool.drawn_count(), 6);
        assert_eq!(session.winners().len(), 6);
        assert!(session.winner(targets[0]).unwrap().is_pending_redraw());
        assert!(RedrawCoordinator::undo_last(&mut pool, &mut session).is_err());
    }

    #[test]
    fn test_undo_blocked_by_forfeited_replacement() {
        let (mut pool, mut session, mut sampler) = setup(8, 6);
        let targets = vec![session.winners()[0].id];
        ForfeitTracker::mark_forfeited(&mut session, &targets, "").unwrap();
        let replacements =
            RedrawCoordinator::redraw(&mut pool, &mut session, &targets, &mut sampler).unwrap();
        ForfeitTracker::mark_forfeited(&mut session, &[replacements[0].id], "").unwrap();

        let err = RedrawCoordinator::undo_last(&mut pool, &mut session).unwrap_err();
        assert!(matches!(err, DrawError::InvalidState(_)));
        assert_eq!(pool.drawn_count(), 7);
    }

    #[test]
    fn test_undo_rejected_after_pool_reset() {
        let (mut pool, mut session, mut sampler) = setup(8, 6);
        let targets = vec![session.winners()[0].id];
        ForfeitTracker::mark_forfeited(&mut session, &targets, "").unwrap();
        RedrawCoordinator::redraw(&mut pool, &mut session, &targets, &mut sampler).unwrap();
        assert_eq!(session.redraws()[0].pool_epoch, pool.epoch());

        pool.reset();
        pool.draw_without_replacement(8, &mut sampler).unwrap();

        let err = RedrawCoordinator::undo_last(&mut pool, &mut session).unwrap_err();
        assert!(matches!(err, DrawError::InvalidState(_)));
        assert_eq!(pool.drawn_count(), 8);
        assert_eq!(session.winners().len(), 7);
        assert_eq!(session.redraws().len(), 1);
    }
}

//! Draw engine
//!
//! Turns a pool selection into a [`DrawSession`] of `won` winners at
//! positions `1..=count`, in random draw order.

use super::errors::{DrawError, DrawResult};
use super::session::{DrawSession, SessionId};
use super::winner::Winner;
use crate::pool::{CandidatePool, Sampler};

/// Random draw without replacement
pub struct DrawEngine;

impl DrawEngine {
    /// Draw `count` winners for `prize_label`.
    ///
    /// Availability is checked before the pool is touched; a failed draw
    /// leaves no trace.
    pub fn draw(
        pool: &mut CandidatePool,
        count: usize,
        prize_label: &str,
        sampler: &mut dyn Sampler,
    ) -> DrawResult<DrawSession> {
        if count == 0 {
            return Err(DrawError::validation("Winner count must be at least 1"));
        }
        if pool.available_count() == 0 {
            return Err(DrawError::InsufficientCandidates {
                requested: count,
                available: 0,
            });
        }

        let selected = pool.draw_without_replacement(count, sampler)?;

        let mut session =
            DrawSession::new(SessionId::new(), prize_label.trim(), count, pool.epoch());
        for (index, candidate) in selected.iter().enumerate() {
            let winner = Winner::new(candidate, session.id(), index as u32 + 1);
            session.push_winner(winner);
        }

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::WinnerStatus;
    use crate::pool::RngSampler;
    use std::collections::HashSet;

    #[test]
    fn test_draw_creates_sequential_positions() {
        let mut pool = CandidatePool::from_text("A\nB\nC\nD\nE").unwrap();
        let mut sampler = RngSampler::seeded(11);
        let session = DrawEngine::draw(&mut pool, 3, " Grand Prize ", &mut sampler).unwrap();

        let positions: Vec<u32> = session.winners().iter().map(|w| w.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
        assert!(session.winners().iter().all(|w| w.status == WinnerStatus::Won));
        assert!(session.winners().iter().all(|w| w.session_id == session.id()));
        assert_eq!(session.prize_label(), "Grand Prize");
        assert_eq!(session.requested(), 3);
        assert_eq!(pool.drawn_count(), 3);
    }

    #[test]
    fn test_draw_no_duplicates() {
        let mut pool = CandidatePool::load((0..50).map(|i| i.to_string())).unwrap();
        let mut sampler = RngSampler::seeded(4);
        let session = DrawEngine::draw(&mut pool, 50, "All", &mut sampler).unwrap();

        let unique: HashSet<_> = session.winners().iter().map(|w| &w.candidate_id).collect();
        assert_eq!(unique.len(), 50);
    }

    #[test]
    fn test_draw_zero_rejected() {
        let mut pool = CandidatePool::from_text("A\nB").unwrap();
        let mut sampler = RngSampler::seeded(1);
        let err = DrawEngine::draw(&mut pool, 0, "x", &mut sampler).unwrap_err();
        assert!(matches!(err, DrawError::Validation(_)));
    }

    #[test]
    fn test_draw_insufficient_no_mutation() {
        let mut pool = CandidatePool::from_text("A\nB\nC").unwrap();
        let mut sampler = RngSampler::seeded(1);
        let err = DrawEngine::draw(&mut pool, 4, "x", &mut sampler).unwrap_err();

        assert_eq!(
            err,
            DrawError::InsufficientCandidates {
                requested: 4,
                available: 3
            }
        );
        assert_eq!(pool.drawn_count(), 0);
    }

    #[test]
    fn test_draw_from_exhausted_pool() {
        let mut pool = CandidatePool::from_text("A").unwrap();
        let mut sampler = RngSampler::seeded(1);
        DrawEngine::draw(&mut pool, 1, "x", &mut sampler).unwrap();
        let err = DrawEngine::draw(&mut pool, 1, "x", &mut sampler).unwrap_err();
        assert!(matches!(err, DrawError::InsufficientCandidates { available: 0, .. }));
    }
}

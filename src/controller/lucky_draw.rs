//! The lucky draw controller

use std::sync::Arc;

use crate::consolidation::{ConsolidatedSummary, ConsolidationView};
use crate::draw::{
    DrawEngine, DrawError, DrawResult, DrawSession, RedrawBatch, SessionId, Winner, WinnerId,
};
use crate::forfeit::ForfeitTracker;
use crate::observability::{log_event, log_event_with_fields, Event, MetricsRegistry};
use crate::pool::{parser, CandidatePool, PoolStatus, RngSampler, Sampler};
use crate::prize::{Prize, PrizeBook, PrizeId, PrizeUpdate};
use crate::redraw::RedrawCoordinator;

use super::state::DrawState;

/// Default upper bound on loaded candidates
pub const DEFAULT_MAX_CANDIDATES: usize = 100_000;

/// Record a rejected operation and hand the error back
fn reject(metrics: &MetricsRegistry, event: Event, err: DrawError) -> DrawError {
    metrics.increment_rejected();
    let reason = err.to_string();
    log_event_with_fields(event, &[("code", err.code()), ("reason", &reason)]);
    err
}

/// Single-session controller over one candidate pool
pub struct LuckyDraw {
    state: DrawState,
    sampler: Box<dyn Sampler>,
    metrics: Arc<MetricsRegistry>,
    max_candidates: usize,
}

impl LuckyDraw {
    /// Controller drawing with OS entropy
    pub fn new() -> Self {
        Self::with_sampler(Box::new(RngSampler::from_entropy()))
    }

    /// Controller drawing with the given sampler
    pub fn with_sampler(sampler: Box<dyn Sampler>) -> Self {
        Self {
            state: DrawState::default(),
            sampler,
            metrics: Arc::new(MetricsRegistry::new()),
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    // ==================
    // Pool
    // ==================

    /// Replace the pool with candidates parsed from manual text.
    ///
    /// Loading a new pool starts a new pool lifecycle: the draw history is
    /// kept, the drawn set starts empty.
    pub fn load_candidates(&mut self, text: &str) -> DrawResult<PoolStatus> {
        self.load_entries(parser::parse_manual(text))
    }

    /// Replace the pool with the first column of CSV content
    pub fn load_candidates_csv(&mut self, content: &str) -> DrawResult<PoolStatus> {
        let entries = parser::parse_csv(content)
            .map_err(|e| reject(&self.metrics, Event::LoadRejected, e))?;
        self.load_entries(entries)
    }

    /// Replace the pool with raw entries
    pub fn load_entries<I, S>(&mut self, entries: I) -> DrawResult<PoolStatus>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pool = CandidatePool::load(entries)
            .and_then(|pool| {
                if pool.total() > self.max_candidates {
                    Err(DrawError::validation(format!(
                        "{} candidates exceed the limit of {}",
                        pool.total(),
                        self.max_candidates
                    )))
                } else {
                    Ok(pool)
                }
            })
            .map_err(|e| reject(&self.metrics, Event::LoadRejected, e))?;

        self.state.pool.replace(pool);
        let status = self.state.pool.status();
        self.metrics.add_candidates_loaded(status.total as u64);
        log_event_with_fields(
            Event::CandidatesLoaded,
            &[
                ("epoch", &self.state.pool.epoch().to_string()),
                ("total", &status.total.to_string()),
            ],
        );
        Ok(status)
    }

    /// Return every drawn candidate to the available set
    pub fn reset_pool(&mut self) -> PoolStatus {
        self.state.pool.reset();
        log_event(Event::PoolReset);
        self.state.pool.status()
    }

    /// Empty the pool and the draw history. Prizes are kept.
    pub fn clear_pool(&mut self) {
        self.state.pool.clear();
        self.state.sessions.clear();
        log_event(Event::PoolCleared);
    }

    pub fn pool(&self) -> &CandidatePool {
        &self.state.pool
    }

    pub fn pool_status(&self) -> PoolStatus {
        self.state.pool.status()
    }

    // ==================
    // Draw
    // ==================

    /// Draw `count` winners for `prize_label`
    pub fn draw(&mut self, count: usize, prize_label: &str) -> DrawResult<DrawSession> {
        self.draw_session(count, prize_label, None)
    }

    /// Draw the configured winner count of a prize, labelled with its name
    pub fn draw_prize(&mut self, prize_id: PrizeId) -> DrawResult<DrawSession> {
        let prize = self
            .state
            .prizes
            .get(prize_id)
            .cloned()
            .ok_or_else(|| DrawError::not_found(format!("Prize {}", prize_id)))
            .map_err(|e| reject(&self.metrics, Event::DrawRejected, e))?;

        self.draw_session(prize.winner_count, &prize.name, Some(prize.id))
    }

    fn draw_session(
        &mut self,
        count: usize,
        prize_label: &str,
        prize_id: Option<PrizeId>,
    ) -> DrawResult<DrawSession> {
        let mut session =
            DrawEngine::draw(&mut self.state.pool, count, prize_label, self.sampler.as_mut())
                .map_err(|e| reject(&self.metrics, Event::DrawRejected, e))?;

        session.set_draw_number(self.state.sessions.len() as u32 + 1);
        if let Some(prize_id) = prize_id {
            session.set_prize_id(prize_id);
        }
        self.state.sessions.push(session.clone());

        self.metrics.record_draw(count as u64);
        log_event_with_fields(
            Event::DrawComplete,
            &[
                ("available", &self.state.pool.available_count().to_string()),
                ("draw", &session.id().to_string()),
                ("prize", session.prize_label()),
                ("winners", &count.to_string()),
            ],
        );
        Ok(session)
    }

    // ==================
    // Forfeit & redraw
    // ==================

    /// Forfeit winners. All ids must belong to the same draw.
    pub fn mark_forfeited(&mut self, winner_ids: &[WinnerId], reason: &str) -> DrawResult<SessionId> {
        let index = self
            .session_index_for(winner_ids)
            .map_err(|e| reject(&self.metrics, Event::ForfeitRejected, e))?;
        let session = &mut self.state.sessions[index];

        ForfeitTracker::mark_forfeited(session, winner_ids, reason)
            .map_err(|e| reject(&self.metrics, Event::ForfeitRejected, e))?;

        self.metrics.add_forfeits(winner_ids.len() as u64);
        log_event_with_fields(
            Event::WinnersForfeited,
            &[
                ("count", &winner_ids.len().to_string()),
                ("draw", &session.id().to_string()),
                ("reason", reason.trim()),
            ],
        );
        Ok(session.id())
    }

    /// Draw one replacement per listed forfeited winner
    pub fn redraw(&mut self, forfeited_ids: &[WinnerId]) -> DrawResult<Vec<Winner>> {
        let index = self
            .session_index_for(forfeited_ids)
            .map_err(|e| reject(&self.metrics, Event::RedrawRejected, e))?;

        let session = &mut self.state.sessions[index];
        let replacements = RedrawCoordinator::redraw(
            &mut self.state.pool,
            session,
            forfeited_ids,
            self.sampler.as_mut(),
        )
        .map_err(|e| reject(&self.metrics, Event::RedrawRejected, e))?;

        self.redraw_complete(index, &replacements);
        Ok(replacements)
    }

    /// Redraw every forfeited winner of a draw that has no replacement yet
    pub fn redraw_pending(&mut self, session_id: SessionId) -> DrawResult<Vec<Winner>> {
        let index = self
            .session_index(session_id)
            .map_err(|e| reject(&self.metrics, Event::RedrawRejected, e))?;

        let session = &mut self.state.sessions[index];
        let replacements =
            RedrawCoordinator::redraw_pending(&mut self.state.pool, session, self.sampler.as_mut())
                .map_err(|e| reject(&self.metrics, Event::RedrawRejected, e))?;

        self.redraw_complete(index, &replacements);
        Ok(replacements)
    }

    fn redraw_complete(&self, index: usize, replacements: &[Winner]) {
        self.metrics.record_redraw(replacements.len() as u64);
        log_event_with_fields(
            Event::RedrawComplete,
            &[
                ("available", &self.state.pool.available_count().to_string()),
                ("draw", &self.state.sessions[index].id().to_string()),
                ("replacements", &replacements.len().to_string()),
            ],
        );
    }

    // ==================
    // Views
    // ==================

    /// Visible winners of a draw: valid originals plus replacements
    pub fn consolidated_winners(&self, session_id: SessionId) -> DrawResult<Vec<Winner>> {
        let session = self.require_session(session_id)?;
        Ok(ConsolidationView::render_owned(session))
    }

    pub fn consolidated_summary(&self, session_id: SessionId) -> DrawResult<ConsolidatedSummary> {
        let session = self.require_session(session_id)?;
        Ok(ConsolidationView::summarize(session))
    }

    pub fn session(&self, session_id: SessionId) -> Option<&DrawSession> {
        self.state.sessions.iter().find(|s| s.id() == session_id)
    }

    pub fn require_session(&self, session_id: SessionId) -> DrawResult<&DrawSession> {
        self.session(session_id)
            .ok_or_else(|| DrawError::not_found(format!("Draw {}", session_id)))
    }

    /// Draw history, oldest first
    pub fn sessions(&self) -> &[DrawSession] {
        &self.state.sessions
    }

    pub fn latest_session(&self) -> Option<&DrawSession> {
        self.state.sessions.last()
    }

    // ==================
    // History
    // ==================

    /// Remove the most recent draw and return all of its candidates,
    /// forfeited and replacement ones included, to the pool.
    ///
    /// A draw made before the pool was last reset or reloaded cannot be
    /// undone: its candidates may already belong to newer winners.
    pub fn undo_last_draw(&mut self) -> DrawResult<DrawSession> {
        let epoch = self.state.pool.epoch();
        let last = self
            .state
            .sessions
            .last()
            .ok_or_else(|| DrawError::invalid_state("No draws to undo"))
            .map_err(|e| reject(&self.metrics, Event::DrawRejected, e))?;
        if last.pool_epoch() != epoch {
            return Err(reject(
                &self.metrics,
                Event::DrawRejected,
                DrawError::invalid_state("Last draw belongs to an earlier pool lifecycle"),
            ));
        }
        let session = self
            .state
            .sessions
            .pop()
            .ok_or_else(|| DrawError::invalid_state("No draws to undo"))?;

        self.state
            .pool
            .release(session.winners().iter().map(|w| &w.candidate_id));

        self.metrics.increment_undos();
        log_event_with_fields(
            Event::DrawUndone,
            &[
                ("available", &self.state.pool.available_count().to_string()),
                ("draw", &session.id().to_string()),
            ],
        );
        Ok(session)
    }

    /// Roll back the most recent redraw of a draw
    pub fn undo_last_redraw(&mut self, session_id: SessionId) -> DrawResult<RedrawBatch> {
        let index = self
            .session_index(session_id)
            .map_err(|e| reject(&self.metrics, Event::RedrawRejected, e))?;
        let session = &mut self.state.sessions[index];

        let batch = RedrawCoordinator::undo_last(&mut self.state.pool, session)
            .map_err(|e| reject(&self.metrics, Event::RedrawRejected, e))?;

        self.metrics.increment_undos();
        log_event_with_fields(
            Event::RedrawUndone,
            &[
                ("draw", &session_id.to_string()),
                ("replacements", &batch.records.len().to_string()),
            ],
        );
        Ok(batch)
    }

    /// Forget the draw history. The pool keeps its drawn set.
    pub fn clear_history(&mut self) {
        self.state.sessions.clear();
        log_event(Event::HistoryCleared);
    }

    // ==================
    // Prizes
    // ==================

    pub fn prizes(&self) -> &PrizeBook {
        &self.state.prizes
    }

    pub fn add_prize(
        &mut self,
        name: &str,
        winner_count: usize,
        description: Option<&str>,
    ) -> DrawResult<Prize> {
        let prize = self.state.prizes.add(name, winner_count, description)?;
        log_event_with_fields(Event::PrizeChanged, &[("prize", &prize.id.to_string())]);
        Ok(prize)
    }

    pub fn update_prize(&mut self, id: PrizeId, update: PrizeUpdate) -> DrawResult<Prize> {
        let prize = self.state.prizes.update(id, update)?;
        log_event_with_fields(Event::PrizeChanged, &[("prize", &id.to_string())]);
        Ok(prize)
    }

    pub fn remove_prize(&mut self, id: PrizeId) -> DrawResult<Prize> {
        let prize = self.state.prizes.remove(id)?;
        log_event_with_fields(Event::PrizeChanged, &[("prize", &id.to_string())]);
        Ok(prize)
    }

    /// A prize counts as drawn once any draw in the history used it
    pub fn is_prize_drawn(&self, id: PrizeId) -> bool {
        self.state.sessions.iter().any(|s| s.prize_id() == Some(id))
    }

    // ==================
    // Snapshot
    // ==================

    pub fn snapshot(&self) -> DrawState {
        self.state.clone()
    }

    pub fn restore(&mut self, state: DrawState) {
        self.state = state;
    }

    // ==================
    // Lookup helpers
    // ==================

    fn session_index(&self, session_id: SessionId) -> DrawResult<usize> {
        self.state
            .sessions
            .iter()
            .position(|s| s.id() == session_id)
            .ok_or_else(|| DrawError::not_found(format!("Draw {}", session_id)))
    }

    /// Index of the draw holding every listed winner
    fn session_index_for(&self, winner_ids: &[WinnerId]) -> DrawResult<usize> {
        let first = winner_ids
            .first()
            .ok_or_else(|| DrawError::validation("No winners given"))?;

        let index = self
            .state
            .sessions
            .iter()
            .position(|s| s.contains(*first))
            .ok_or_else(|| DrawError::not_found(format!("Winner {}", first)))?;

        let session = &self.state.sessions[index];
        if let Some(stray) = winner_ids.iter().find(|id| !session.contains(**id)) {
            if self.state.sessions.iter().any(|s| s.contains(*stray)) {
                return Err(DrawError::validation(
                    "Winners must all belong to the same draw",
                ));
            }
            return Err(DrawError::not_found(format!("Winner {}", stray)));
        }

        Ok(index)
    }
}

impl Default for LuckyDraw {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> LuckyDraw {
        LuckyDraw::with_sampler(Box::new(RngSampler::seeded(2024)))
    }

    #[test]
    fn test_load_and_draw() {
        let mut ld = seeded();
        let status = ld.load_candidates("A\nB\nC\nD").unwrap();
        assert_eq!(status.total, 4);

        let session = ld.draw(2, "Prize").unwrap();
        assert_eq!(session.draw_number(), 1);
        assert_eq!(ld.pool_status().available, 2);
        assert_eq!(ld.metrics().snapshot().winners_drawn, 2);
    }

    #[test]
    fn test_load_limit() {
        let mut ld = seeded().with_max_candidates(2);
        let err = ld.load_candidates("A\nB\nC").unwrap_err();
        assert!(matches!(err, DrawError::Validation(_)));
        assert_eq!(ld.metrics().snapshot().operations_rejected, 1);
    }

    #[test]
    fn test_forfeit_across_draws_rejected() {
        let mut ld = seeded();
        ld.load_candidates("A\nB\nC\nD").unwrap();
        let first = ld.draw(1, "One").unwrap();
        let second = ld.draw(1, "Two").unwrap();

        let ids = [first.winners()[0].id, second.winners()[0].id];
        let err = ld.mark_forfeited(&ids, "").unwrap_err();
        assert!(matches!(err, DrawError::Validation(_)));
    }

    #[test]
    fn test_forfeit_unknown_winner() {
        let mut ld = seeded();
        ld.load_candidates("A\nB").unwrap();
        ld.draw(1, "One").unwrap();
        let err = ld.mark_forfeited(&[WinnerId::new()], "").unwrap_err();
        assert!(matches!(err, DrawError::NotFound(_)));
    }

    #[test]
    fn test_undo_last_draw_restores_pool() {
        let mut ld = seeded();
        ld.load_candidates("A\nB\nC\nD").unwrap();
        let session = ld.draw(3, "Prize").unwrap();
        let target = session.winners()[0].id;
        ld.mark_forfeited(&[target], "").unwrap();
        ld.redraw(&[target]).unwrap();
        assert_eq!(ld.pool_status().available, 0);

        let undone = ld.undo_last_draw().unwrap();
        assert_eq!(undone.id(), session.id());
        assert_eq!(ld.pool_status().available, 4);
        assert!(ld.sessions().is_empty());
        assert!(matches!(ld.undo_last_draw(), Err(DrawError::InvalidState(_))));
    }

    #[test]
    fn test_undo_last_draw_rejected_after_reset() {
        let mut ld = seeded();
        ld.load_candidates("A\nB\nC").unwrap();
        let session = ld.draw(2, "Prize").unwrap();
        ld.reset_pool();
        ld.draw(3, "Again").unwrap();
        ld.undo_last_draw().unwrap();
        assert_eq!(ld.pool_status().drawn, 0);

        let err = ld.undo_last_draw().unwrap_err();
        assert!(matches!(err, DrawError::InvalidState(_)));
        assert_eq!(ld.latest_session().unwrap().id(), session.id());
        assert_eq!(ld.pool_status().drawn, 0);
    }

    #[test]
    fn test_reload_starts_new_lifecycle() {
        let mut ld = seeded();
        ld.load_candidates("A\nB").unwrap();
        let before = ld.pool().epoch();
        ld.draw(1, "Prize").unwrap();

        ld.load_candidates("A\nB\nC").unwrap();
        assert_eq!(ld.pool().epoch(), before + 1);
        assert!(matches!(ld.undo_last_draw(), Err(DrawError::InvalidState(_))));
        assert_eq!(ld.sessions().len(), 1);
    }

    #[test]
    fn test_rejected_csv_load_counts_as_rejection() {
        let mut ld = seeded();
        ld.load_candidates("A\nB").unwrap();
        let err = ld.load_candidates_csv("\"Alice\nBob").unwrap_err();
        assert!(matches!(err, DrawError::Validation(_)));
        assert_eq!(ld.metrics().snapshot().operations_rejected, 1);
        assert_eq!(ld.pool_status().total, 2);
    }

    #[test]
    fn test_draw_prize() {
        let mut ld = seeded();
        ld.load_candidates("A\nB\nC").unwrap();
        let prize = ld.add_prize("Laptop", 2, None).unwrap();
        assert!(!ld.is_prize_drawn(prize.id));

        let session = ld.draw_prize(prize.id).unwrap();
        assert_eq!(session.prize_label(), "Laptop");
        assert_eq!(session.requested(), 2);
        assert_eq!(session.prize_id(), Some(prize.id));
        assert!(ld.is_prize_drawn(prize.id));
    }

    #[test]
    fn test_clear_history_keeps_pool() {
        let mut ld = seeded();
        ld.load_candidates("A\nB\nC").unwrap();
        ld.draw(2, "Prize").unwrap();
        ld.clear_history();

        assert!(ld.sessions().is_empty());
        assert_eq!(ld.pool_status().drawn, 2);
    }

    #[test]
    fn test_clear_pool_drops_everything_but_prizes() {
        let mut ld = seeded();
        ld.load_candidates("A\nB\nC").unwrap();
        ld.add_prize("Laptop", 1, None).unwrap();
        ld.draw(2, "Prize").unwrap();
        ld.clear_pool();

        assert_eq!(ld.pool_status().total, 0);
        assert!(ld.sessions().is_empty());
        assert_eq!(ld.prizes().len(), 1);
    }

    #[test]
    fn test_draw_numbers_follow_history() {
        let mut ld = seeded();
        ld.load_candidates("A\nB\nC\nD").unwrap();
        ld.draw(1, "One").unwrap();
        ld.draw(1, "Two").unwrap();
        ld.undo_last_draw().unwrap();
        let third = ld.draw(1, "Three").unwrap();
        assert_eq!(third.draw_number(), 2);
    }
}

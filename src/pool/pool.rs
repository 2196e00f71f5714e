//! Candidate pool
//!
//! Holds every loaded entrant plus the set of identifiers already drawn.
//! `available = all - drawn` at every observation point.
//!
//! Every reset, clear or reload starts a new pool lifecycle, numbered by
//! the pool epoch. Sessions and redraw batches record the epoch they drew
//! in so undo never releases a candidate drawn in an earlier lifecycle.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::candidate::{Candidate, CandidateId};
use super::parser;
use super::sampler::Sampler;
use crate::draw::{DrawError, DrawResult};

/// Pool accounting snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatus {
    pub total: usize,
    pub available: usize,
    pub drawn: usize,
}

/// The full set of entrants for one draw lifecycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePool {
    /// All candidates in insertion order
    all: Vec<Candidate>,
    /// Identifiers consumed by a draw or redraw
    drawn: BTreeSet<CandidateId>,
    /// Lifecycle counter, bumped by reset, clear and reload
    #[serde(default)]
    epoch: u64,
}

impl CandidatePool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a pool from raw entries.
    ///
    /// Entries are trimmed, blanks dropped and duplicates collapsed. A load
    /// that yields no candidate at all is rejected.
    pub fn load<I, S>(entries: I) -> DrawResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = parser::normalize(entries);
        if names.is_empty() {
            return Err(DrawError::validation("No candidates provided"));
        }

        Ok(Self {
            all: names.into_iter().map(Candidate::new).collect(),
            drawn: BTreeSet::new(),
            epoch: 0,
        })
    }

    /// Load from manual text input
    pub fn from_text(text: &str) -> DrawResult<Self> {
        Self::load(parser::parse_manual(text))
    }

    /// Load from CSV content
    pub fn from_csv(content: &str) -> DrawResult<Self> {
        Self::load(parser::parse_csv(content)?)
    }

    /// All candidates in insertion order
    pub fn candidates(&self) -> &[Candidate] {
        &self.all
    }

    /// Candidates not yet drawn, in insertion order
    pub fn available(&self) -> impl Iterator<Item = &Candidate> {
        self.all.iter().filter(move |c| !self.drawn.contains(c.id()))
    }

    /// Current pool lifecycle
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Replace the candidates with `next`, starting a new lifecycle
    pub(crate) fn replace(&mut self, next: CandidatePool) {
        let epoch = self.epoch + 1;
        *self = next;
        self.epoch = epoch;
    }

    /// Identifiers already drawn
    pub fn drawn(&self) -> &BTreeSet<CandidateId> {
        &self.drawn
    }

    pub fn total(&self) -> usize {
        self.all.len()
    }

    pub fn available_count(&self) -> usize {
        self.all.len() - self.drawn.len()
    }

    pub fn drawn_count(&self) -> usize {
        self.drawn.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn contains(&self, id: &CandidateId) -> bool {
        self.all.iter().any(|c| c.id() == id)
    }

    pub fn is_drawn(&self, id: &CandidateId) -> bool {
        self.drawn.contains(id)
    }

    pub fn status(&self) -> PoolStatus {
        PoolStatus {
            total: self.total(),
            available: self.available_count(),
            drawn: self.drawn_count(),
        }
    }

    /// Draw `count` candidates uniformly at random from the available set.
    ///
    /// The selection is returned in draw order. On failure `drawn` is left
    /// untouched.
    pub fn draw_without_replacement(
        &mut self,
        count: usize,
        sampler: &mut dyn Sampler,
    ) -> DrawResult<Vec<Candidate>> {
        let available: Vec<&Candidate> = self.available().collect();
        if count > available.len() {
            return Err(DrawError::InsufficientCandidates {
                requested: count,
                available: available.len(),
            });
        }

        let selected: Vec<Candidate> = sampler
            .sample_indices(available.len(), count)
            .into_iter()
            .map(|i| available[i].clone())
            .collect();

        // Validate the sampler output before touching `drawn`
        let unique: BTreeSet<&CandidateId> = selected.iter().map(|c| c.id()).collect();
        if unique.len() != count {
            return Err(DrawError::Internal(
                "Sampler returned duplicate indices".to_string(),
            ));
        }

        self.drawn.extend(selected.iter().map(|c| c.id().clone()));
        Ok(selected)
    }

    /// Return previously drawn candidates to the available set.
    ///
    /// Identifiers that are unknown or not drawn are ignored.
    pub(crate) fn release<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a CandidateId>,
    {
        for id in ids {
            self.drawn.remove(id);
        }
    }

    /// Clear the drawn set, keeping every candidate
    pub fn reset(&mut self) {
        self.drawn.clear();
        self.epoch += 1;
    }

    /// Empty the pool entirely
    pub fn clear(&mut self) {
        self.all.clear();
        self.drawn.clear();
        self.epoch += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::RngSampler;

    fn pool_of(n: usize) -> CandidatePool {
        CandidatePool::load((1..=n).map(|i| format!("C{}", i))).unwrap()
    }

    #[test]
    fn test_load_normalizes() {
        let pool = CandidatePool::load(vec!["  A ", "", "B", "A"]).unwrap();
        assert_eq!(pool.total(), 2);
        assert_eq!(pool.candidates()[0].name(), "A");
        assert_eq!(pool.candidates()[1].name(), "B");
    }

    #[test]
    fn test_load_empty_rejected() {
        let err = CandidatePool::load(vec!["  ", ""]).unwrap_err();
        assert!(matches!(err, DrawError::Validation(_)));
    }

    #[test]
    fn test_draw_moves_to_drawn() {
        let mut pool = pool_of(8);
        let mut sampler = RngSampler::seeded(1);
        let picked = pool.draw_without_replacement(6, &mut sampler).unwrap();

        assert_eq!(picked.len(), 6);
        assert_eq!(pool.drawn_count(), 6);
        assert_eq!(pool.available_count(), 2);
        for c in &picked {
            assert!(pool.is_drawn(c.id()));
        }
        assert!(pool.available().all(|c| !picked.contains(c)));
    }

    #[test]
    fn test_draw_too_many_leaves_pool_untouched() {
        let mut pool = pool_of(3);
        let mut sampler = RngSampler::seeded(1);
        let err = pool.draw_without_replacement(4, &mut sampler).unwrap_err();

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
    fn test_never_redraws_drawn() {
        let mut pool = pool_of(5);
        let mut sampler = RngSampler::seeded(9);
        let first = pool.draw_without_replacement(3, &mut sampler).unwrap();
        let second = pool.draw_without_replacement(2, &mut sampler).unwrap();

        for c in &second {
            assert!(!first.contains(c));
        }
        assert_eq!(pool.available_count(), 0);
    }

    #[test]
    fn test_reset_keeps_candidates() {
        let mut pool = pool_of(4);
        let mut sampler = RngSampler::seeded(2);
        pool.draw_without_replacement(4, &mut sampler).unwrap();
        pool.reset();

        assert_eq!(pool.total(), 4);
        assert_eq!(pool.available_count(), 4);
    }

    #[test]
    fn test_clear_empties_pool() {
        let mut pool = pool_of(4);
        let mut sampler = RngSampler::seeded(2);
        pool.draw_without_replacement(1, &mut sampler).unwrap();
        pool.clear();

        assert!(pool.is_empty());
        assert_eq!(pool.status(), PoolStatus { total: 0, available: 0, drawn: 0 });
    }

    #[test]
    fn test_release_returns_candidates() {
        let mut pool = pool_of(4);
        let mut sampler = RngSampler::seeded(5);
        let picked = pool.draw_without_replacement(2, &mut sampler).unwrap();
        pool.release(picked.iter().map(|c| c.id()));

        assert_eq!(pool.available_count(), 4);
    }

    #[test]
    fn test_lifecycle_epoch() {
        let mut pool = pool_of(3);
        assert_eq!(pool.epoch(), 0);

        pool.reset();
        assert_eq!(pool.epoch(), 1);

        pool.replace(pool_of(2));
        assert_eq!(pool.epoch(), 2);
        assert_eq!(pool.total(), 2);

        pool.clear();
        assert_eq!(pool.epoch(), 3);
    }

    #[test]
    fn test_failed_draw_keeps_epoch() {
        let mut pool = pool_of(2);
        let mut sampler = RngSampler::seeded(4);
        assert!(pool.draw_without_replacement(3, &mut sampler).is_err());
        assert_eq!(pool.epoch(), 0);
    }

    #[test]
    fn test_from_text_and_csv() {
        assert_eq!(CandidatePool::from_text("a,b,c").unwrap().total(), 3);
        assert_eq!(CandidatePool::from_csv("a,1\nb,2").unwrap().total(), 2);
    }
}

//! Draw sessions
//!
//! A session groups the winners of one prize draw. Replacement winners from
//! later redraws join the session they fill slots for, and every redraw
//! invocation is recorded as a [`RedrawBatch`].
//!
//! Both carry the pool epoch they drew in.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::winner::{Winner, WinnerId};
use crate::prize::PrizeId;

/// Unique draw session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// One forfeit -> replacement mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedrawRecord {
    pub forfeited: WinnerId,
    pub forfeited_name: String,
    pub replacement: WinnerId,
    pub replacement_name: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Winners produced by one redraw invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedrawBatch {
    pub records: Vec<RedrawRecord>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub pool_epoch: u64,
}

/// Winners of one prize draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawSession {
    id: SessionId,
    draw_number: u32,
    prize_label: String,
    #[serde(default)]
    prize_id: Option<PrizeId>,
    requested: usize,
    created_at: DateTime<Utc>,
    #[serde(default)]
    pool_epoch: u64,
    winners: Vec<Winner>,
    #[serde(default)]
    redraws: Vec<RedrawBatch>,
}

impl DrawSession {
    pub(crate) fn new(
        id: SessionId,
        prize_label: impl Into<String>,
        requested: usize,
        pool_epoch: u64,
    ) -> Self {
        Self {
            id,
            draw_number: 0,
            prize_label: prize_label.into(),
            prize_id: None,
            requested,
            created_at: Utc::now(),
            pool_epoch,
            winners: Vec::with_capacity(requested),
            redraws: Vec::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// 1-based position in the draw history
    pub fn draw_number(&self) -> u32 {
        self.draw_number
    }

    pub fn prize_label(&self) -> &str {
        &self.prize_label
    }

    pub fn prize_id(&self) -> Option<PrizeId> {
        self.prize_id
    }

    /// Count originally requested for this prize
    pub fn requested(&self) -> usize {
        self.requested
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Pool lifecycle the original winners were drawn in
    pub fn pool_epoch(&self) -> u64 {
        self.pool_epoch
    }

    /// Every winner ever created in this session, forfeited ones included
    pub fn winners(&self) -> &[Winner] {
        &self.winners
    }

    pub fn redraws(&self) -> &[RedrawBatch] {
        &self.redraws
    }

    pub fn winner(&self, id: WinnerId) -> Option<&Winner> {
        self.winners.iter().find(|w| w.id == id)
    }

    pub fn contains(&self, id: WinnerId) -> bool {
        self.winner(id).is_some()
    }

    /// Forfeited winners still waiting for a replacement, in position order
    pub fn pending_redraws(&self) -> Vec<&Winner> {
        let mut pending: Vec<&Winner> =
            self.winners.iter().filter(|w| w.is_pending_redraw()).collect();
        pending.sort_by_key(|w| w.position);
        pending
    }

    pub fn forfeited_count(&self) -> usize {
        self.winners.iter().filter(|w| w.is_forfeited()).count()
    }

    pub(crate) fn set_draw_number(&mut self, draw_number: u32) {
        self.draw_number = draw_number;
    }

    pub(crate) fn set_prize_id(&mut self, prize_id: PrizeId) {
        self.prize_id = Some(prize_id);
    }

    pub(crate) fn winner_mut(&mut self, id: WinnerId) -> Option<&mut Winner> {
        self.winners.iter_mut().find(|w| w.id == id)
    }

    pub(crate) fn push_winner(&mut self, winner: Winner) {
        self.winners.push(winner);
    }

    pub(crate) fn push_redraw(&mut self, batch: RedrawBatch) {
        self.redraws.push(batch);
    }

    pub(crate) fn pop_redraw(&mut self) -> Option<RedrawBatch> {
        self.redraws.pop()
    }

    pub(crate) fn remove_winner(&mut self, id: WinnerId) -> Option<Winner> {
        let index = self.winners.iter().position(|w| w.id == id)?;
        Some(self.winners.remove(index))
    }
}

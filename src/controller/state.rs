//! Serializable controller state

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::draw::DrawSession;
use crate::pool::CandidatePool;
use crate::prize::PrizeBook;

/// Everything a lucky draw run needs to resume
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawState {
    pub pool: CandidatePool,
    #[serde(default)]
    pub sessions: Vec<DrawSession>,
    #[serde(default)]
    pub prizes: PrizeBook,
}

impl DrawState {
    /// Check pool accounting and winner links
    pub fn validate(&self) -> Result<(), String> {
        for id in self.pool.drawn() {
            if !self.pool.contains(id) {
                return Err(format!("drawn candidate '{}' is not in the pool", id));
            }
        }

        let mut session_ids = HashSet::new();
        for session in &self.sessions {
            if !session_ids.insert(session.id()) {
                return Err(format!("draw {} appears twice", session.id()));
            }

            let newest = session
                .redraws()
                .iter()
                .map(|b| b.pool_epoch)
                .chain(std::iter::once(session.pool_epoch()))
                .max()
                .unwrap_or_default();
            if newest > self.pool.epoch() {
                return Err(format!(
                    "draw {} was made in pool lifecycle {} but the pool is at {}",
                    session.id(),
                    newest,
                    self.pool.epoch()
                ));
            }

            for winner in session.winners() {
                if winner.session_id != session.id() {
                    return Err(format!(
                        "winner {} belongs to draw {} but is stored in draw {}",
                        winner.id,
                        winner.session_id,
                        session.id()
                    ));
                }

                if let Some(original_id) = winner.replaces {
                    let original = session.winner(original_id).ok_or_else(|| {
                        format!("winner {} replaces unknown winner {}", winner.id, original_id)
                    })?;
                    if !original.is_forfeited() || original.replaced_by != Some(winner.id) {
                        return Err(format!(
                            "winner {} and replaced winner {} are not linked",
                            winner.id, original_id
                        ));
                    }
                }

                if let Some(replacement_id) = winner.replaced_by {
                    if !winner.is_forfeited() {
                        return Err(format!("winner {} is replaced but not forfeited", winner.id));
                    }
                    if !session.contains(replacement_id) {
                        return Err(format!(
                            "winner {} is replaced by unknown winner {}",
                            winner.id, replacement_id
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}

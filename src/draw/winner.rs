//! Winner records
//!
//! A winner is created by the draw engine or the redraw coordinator and is
//! never deleted. The only status transition is `Won -> Forfeited`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::session::SessionId;
use crate::pool::{Candidate, CandidateId};

/// Unique winner identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WinnerId(Uuid);

impl WinnerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for WinnerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WinnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for WinnerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Winner status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinnerStatus {
    Won,
    Forfeited,
}

impl WinnerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WinnerStatus::Won => "won",
            WinnerStatus::Forfeited => "forfeited",
        }
    }
}

/// A selected candidate within a draw session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    pub id: WinnerId,
    pub candidate_id: CandidateId,
    pub name: String,
    pub session_id: SessionId,
    /// 1-based rank within the draw batch; replacements inherit the slot
    pub position: u32,
    pub status: WinnerStatus,
    #[serde(default)]
    pub forfeit_reason: Option<String>,
    #[serde(default)]
    pub forfeited_at: Option<DateTime<Utc>>,
    /// Forfeited winner this one replaces
    #[serde(default)]
    pub replaces: Option<WinnerId>,
    /// Replacement that superseded this forfeited winner
    #[serde(default)]
    pub replaced_by: Option<WinnerId>,
    pub created_at: DateTime<Utc>,
}

impl Winner {
    /// New winner with status `won`
    pub(crate) fn new(candidate: &Candidate, session_id: SessionId, position: u32) -> Self {
        Self {
            id: WinnerId::new(),
            candidate_id: candidate.id().clone(),
            name: candidate.name().to_string(),
            session_id,
            position,
            status: WinnerStatus::Won,
            forfeit_reason: None,
            forfeited_at: None,
            replaces: None,
            replaced_by: None,
            created_at: Utc::now(),
        }
    }

    /// New replacement winner occupying the slot of `forfeited`
    pub(crate) fn replacement(candidate: &Candidate, forfeited: &Winner) -> Self {
        Self {
            replaces: Some(forfeited.id),
            ..Self::new(candidate, forfeited.session_id, forfeited.position)
        }
    }

    pub fn is_won(&self) -> bool {
        self.status == WinnerStatus::Won
    }

    pub fn is_forfeited(&self) -> bool {
        self.status == WinnerStatus::Forfeited
    }

    pub fn is_replacement(&self) -> bool {
        self.replaces.is_some()
    }

    /// Forfeited and not yet superseded by a replacement
    pub fn is_pending_redraw(&self) -> bool {
        self.is_forfeited() && self.replaced_by.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_winner_is_won() {
        let w = Winner::new(&Candidate::new("Alice"), SessionId::new(), 1);
        assert!(w.is_won());
        assert!(!w.is_replacement());
        assert!(!w.is_pending_redraw());
        assert_eq!(w.name, "Alice");
    }

    #[test]
    fn test_replacement_inherits_slot() {
        let session = SessionId::new();
        let original = Winner::new(&Candidate::new("Alice"), session, 3);
        let replacement = Winner::replacement(&Candidate::new("Bob"), &original);

        assert_eq!(replacement.position, 3);
        assert_eq!(replacement.session_id, session);
        assert_eq!(replacement.replaces, Some(original.id));
        assert_ne!(replacement.id, original.id);
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&WinnerStatus::Forfeited).unwrap(), "\"forfeited\"");
    }

    #[test]
    fn test_winner_id_parse() {
        let id = WinnerId::new();
        let parsed: WinnerId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}

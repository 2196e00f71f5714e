//! Candidate types
//!
//! A candidate is identified by its normalized display line. Two entries
//! that trim to the same text are the same candidate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique candidate identifier within a pool
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(String);

impl CandidateId {
    /// Create an identifier from an already normalized entry
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A loaded entrant. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    id: CandidateId,
    name: String,
}

impl Candidate {
    /// Build a candidate from a normalized entry
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: CandidateId::new(name.clone()),
            name,
        }
    }

    pub fn id(&self) -> &CandidateId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

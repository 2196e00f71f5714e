//! Prize book
//!
//! Prizes with a name and a winner count. A prize draw uses the name as its
//! label and the count as the number of winners.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::draw::{DrawError, DrawResult};

/// Unique prize identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrizeId(Uuid);

impl PrizeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PrizeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PrizeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PrizeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A configured prize
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prize {
    pub id: PrizeId,
    pub name: String,
    pub winner_count: usize,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial prize update; absent fields are left as they are
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub winner_count: Option<usize>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Ordered prize list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeBook {
    prizes: Vec<Prize>,
}

impl PrizeBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prizes(&self) -> &[Prize] {
        &self.prizes
    }

    pub fn get(&self, id: PrizeId) -> Option<&Prize> {
        self.prizes.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.prizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prizes.is_empty()
    }

    /// Add a prize after validating its name and winner count
    pub fn add(
        &mut self,
        name: &str,
        winner_count: usize,
        description: Option<&str>,
    ) -> DrawResult<Prize> {
        let prize = Prize {
            id: PrizeId::new(),
            name: validate_name(name)?,
            winner_count: validate_count(winner_count)?,
            description: clean_description(description),
        };
        self.prizes.push(prize.clone());
        Ok(prize)
    }

    /// Apply a partial update. Nothing changes if any field is invalid.
    pub fn update(&mut self, id: PrizeId, update: PrizeUpdate) -> DrawResult<Prize> {
        let name = update.name.as_deref().map(validate_name).transpose()?;
        let winner_count = update.winner_count.map(validate_count).transpose()?;

        let prize = self
            .prizes
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DrawError::not_found(format!("Prize {}", id)))?;

        if let Some(name) = name {
            prize.name = name;
        }
        if let Some(winner_count) = winner_count {
            prize.winner_count = winner_count;
        }
        if let Some(description) = update.description {
            prize.description = clean_description(Some(&description));
        }

        Ok(prize.clone())
    }

    pub fn remove(&mut self, id: PrizeId) -> DrawResult<Prize> {
        let index = self
            .prizes
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| DrawError::not_found(format!("Prize {}", id)))?;
        Ok(self.prizes.remove(index))
    }
}

fn validate_name(name: &str) -> DrawResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DrawError::validation("Prize name cannot be empty"));
    }
    Ok(name.to_string())
}

fn validate_count(count: usize) -> DrawResult<usize> {
    if count < 1 {
        return Err(DrawError::validation("Winner count must be at least 1"));
    }
    Ok(count)
}

fn clean_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

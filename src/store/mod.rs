//! Snapshot persistence
//!
//! The whole controller state is written as one JSON document. Writes go to
//! a sibling temporary file that is then renamed over the snapshot, so a
//! crash mid-write leaves the previous snapshot intact.

mod errors;

pub use errors::{StoreError, StoreResult};

use std::fs;
use std::path::{Path, PathBuf};

use crate::controller::DrawState;

/// JSON snapshot file
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    /// Load the snapshot; `None` if no snapshot has been written yet
    pub fn load(&self) -> StoreResult<Option<DrawState>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.display_path(),
            source,
        })?;
        let state: DrawState =
            serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: self.display_path(),
                source,
            })?;

        state
            .validate()
            .map_err(|reason| StoreError::Inconsistent {
                path: self.display_path(),
                reason,
            })?;

        Ok(Some(state))
    }

    /// Write the snapshot, replacing any previous one
    pub fn save(&self, state: &DrawState) -> StoreResult<()> {
        let io_err = |source| StoreError::Io {
            path: self.display_path(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let json = serde_json::to_vec_pretty(state).map_err(|source| StoreError::Corrupt {
            path: self.display_path(),
            source,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;

        Ok(())
    }
}

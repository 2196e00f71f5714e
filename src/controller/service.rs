//! Shared controller handle
//!
//! Wraps a `LuckyDraw` behind a `RwLock` so the HTTP routes and the JSON
//! request loop share one state. Every successful write is followed by a
//! snapshot save when a store is configured.

use std::sync::{Arc, RwLock};

use crate::draw::{DrawError, DrawResult};
use crate::observability::{log_event, log_event_with_fields, Event, MetricsRegistry};
use crate::store::{SnapshotStore, StoreResult};

use super::lucky_draw::LuckyDraw;

/// Lock-guarded controller plus optional persistence
pub struct DrawService {
    draw: RwLock<LuckyDraw>,
    store: Option<SnapshotStore>,
    metrics: Arc<MetricsRegistry>,
}

impl DrawService {
    /// In-memory service
    pub fn new(draw: LuckyDraw) -> Self {
        let metrics = draw.metrics().clone();
        Self {
            draw: RwLock::new(draw),
            store: None,
            metrics,
        }
    }

    /// Service backed by a snapshot file. An existing snapshot replaces the
    /// controller state; a missing one starts empty.
    pub fn boot(mut draw: LuckyDraw, store: SnapshotStore) -> StoreResult<Self> {
        if let Some(state) = store.load()? {
            let sessions = state.sessions.len().to_string();
            let candidates = state.pool.total().to_string();
            draw.restore(state);
            log_event_with_fields(
                Event::SnapshotLoaded,
                &[("candidates", &candidates), ("draws", &sessions)],
            );
        }

        let mut service = Self::new(draw);
        service.store = Some(store);
        Ok(service)
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    pub fn store(&self) -> Option<&SnapshotStore> {
        self.store.as_ref()
    }

    /// Run a read-only operation
    pub fn read<T>(&self, f: impl FnOnce(&LuckyDraw) -> T) -> DrawResult<T> {
        let draw = self
            .draw
            .read()
            .map_err(|_| DrawError::Internal("Draw state lock poisoned".to_string()))?;
        Ok(f(&*draw))
    }

    /// Run a mutating operation, then persist on success.
    ///
    /// A failed save is logged and does not fail the operation; the
    /// in-memory state stays authoritative.
    pub fn write<T>(&self, f: impl FnOnce(&mut LuckyDraw) -> DrawResult<T>) -> DrawResult<T> {
        let mut draw = self
            .draw
            .write()
            .map_err(|_| DrawError::Internal("Draw state lock poisoned".to_string()))?;

        let value = f(&mut *draw)?;

        if let Some(store) = &self.store {
            match store.save(&draw.snapshot()) {
                Ok(()) => log_event(Event::SnapshotSaved),
                Err(e) => {
                    let reason = e.to_string();
                    log_event_with_fields(
                        Event::SnapshotFailed,
                        &[("code", e.code()), ("reason", &reason)],
                    );
                }
            }
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::RngSampler;
    use tempfile::TempDir;

    fn controller() -> LuckyDraw {
        LuckyDraw::with_sampler(Box::new(RngSampler::seeded(5)))
    }

    #[test]
    fn test_write_then_read() {
        let service = DrawService::new(controller());
        service
            .write(|d| d.load_candidates("A\nB\nC"))
            .unwrap();
        let total = service.read(|d| d.pool_status().total).unwrap();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_failed_write_is_returned() {
        let service = DrawService::new(controller());
        let err = service.write(|d| d.draw(1, "Prize")).unwrap_err();
        assert!(matches!(err, DrawError::InsufficientCandidates { .. }));
        assert_eq!(service.metrics().snapshot().operations_rejected, 1);
    }

    #[test]
    fn test_boot_restores_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        let service = DrawService::boot(controller(), SnapshotStore::new(&path)).unwrap();
        let session = service
            .write(|d| {
                d.load_candidates("A\nB\nC\nD")?;
                d.draw(2, "Prize")
            })
            .unwrap();
        drop(service);

        let rebooted = DrawService::boot(controller(), SnapshotStore::new(&path)).unwrap();
        let status = rebooted.read(|d| d.pool_status()).unwrap();
        assert_eq!(status.drawn, 2);
        let restored = rebooted
            .read(|d| d.session(session.id()).cloned())
            .unwrap();
        assert_eq!(restored, Some(session));
    }

    #[test]
    fn test_boot_rejects_corrupt_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "[]").unwrap();

        let result = DrawService::boot(controller(), SnapshotStore::new(&path));
        assert!(result.is_err());
    }
}

//! Owner of the live player index.
//!
//! Readers take an `Arc` to the current snapshot and never block. A reload
//! builds a complete new index off to the side and publishes it with one
//! atomic store; a failed reload leaves the previous snapshot serving.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use serde::Serialize;

use crate::data::{load_roster, LoadedRoster, RosterError};
use crate::index::{PlayerIndex, QueryError};
use crate::parallel::WorkerPool;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub players: usize,
    pub dropped_lines: usize,
    pub source: String,
    pub loaded_at: String,
    pub elapsed_ms: u64,
}

impl IndexStats {
    fn from_load(loaded: &LoadedRoster) -> Self {
        Self {
            players: loaded.roster.players.len(),
            dropped_lines: loaded.roster.dropped,
            source: loaded.source.display().to_string(),
            loaded_at: chrono::Utc::now().to_rfc3339(),
            elapsed_ms: u64::try_from(loaded.elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// One fully built, immutable generation of the index.
#[derive(Debug)]
pub struct Snapshot {
    pub index: PlayerIndex,
    pub stats: IndexStats,
}

#[derive(Debug)]
pub struct RosterStore {
    current: ArcSwapOption<Snapshot>,
    source: PathBuf,
    pool: WorkerPool,
    reloading: AtomicBool,
}

impl RosterStore {
    /// Empty store; queries fail with [`QueryError::IndexNotReady`] until the
    /// first successful [`reload`](Self::reload) or [`install`](Self::install).
    pub fn new(source: impl Into<PathBuf>, pool: WorkerPool) -> Self {
        Self {
            current: ArcSwapOption::empty(),
            source: source.into(),
            pool,
            reloading: AtomicBool::new(false),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn is_ready(&self) -> bool {
        self.current.load().is_some()
    }

    pub fn snapshot(&self) -> Result<Arc<Snapshot>, QueryError> {
        self.current.load_full().ok_or(QueryError::IndexNotReady)
    }

    /// Publish an index built elsewhere.
    pub fn install(&self, index: PlayerIndex, stats: IndexStats) -> Arc<Snapshot> {
        let snapshot = Arc::new(Snapshot { index, stats });
        self.current.store(Some(Arc::clone(&snapshot)));
        snapshot
    }

    /// Claim the reload slot; `None` while another reload holds it.
    pub(crate) fn begin_reload(&self) -> Option<ReloadGuard<'_>> {
        ReloadGuard::acquire(&self.reloading)
    }

    /// Re-read the roster file and swap in the new index. Concurrent calls are
    /// rejected with [`RosterError::ReloadInProgress`] instead of queueing.
    pub fn reload(&self) -> Result<Arc<Snapshot>, RosterError> {
        let _guard = self.begin_reload().ok_or(RosterError::ReloadInProgress)?;

        let loaded = match load_roster(&self.source, &self.pool) {
            Ok(loaded) => loaded,
            Err(err) => {
                tracing::warn!(
                    source = %self.source.display(),
                    %err,
                    serving_previous = self.is_ready(),
                    "roster reload failed"
                );
                return Err(err);
            }
        };

        let stats = IndexStats::from_load(&loaded);
        let snapshot = self.install(PlayerIndex::build(loaded.roster.players), stats);
        tracing::info!(players = snapshot.index.len(), "player index published");
        Ok(snapshot)
    }
}

pub(crate) struct ReloadGuard<'a>(&'a AtomicBool);

impl<'a> ReloadGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ReloadGuard(flag))
    }
}

impl Drop for ReloadGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

//! Snapshot persistence and backup for the ledger
//!
//! The ledger lives in memory; this module gives it a durable form:
//! 1. JSON snapshots written atomically (temp file + rename)
//! 2. Verbatim-copy backup of the stored snapshot
//! 3. A background autosave service that snapshots on an interval

use crate::ledger::VoteLedger;
use crate::types::{Team, VoterRecord};
use crate::{Result, storage_error};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Snapshot format version, bumped on incompatible layout changes
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Point-in-time copy of the full ledger state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    pub teams: Vec<Team>,
    pub voters: Vec<VoterRecord>,
}

impl Snapshot {
    /// Create a snapshot stamped with the current time
    pub fn new(teams: Vec<Team>, voters: Vec<VoterRecord>) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            created_at: Utc::now(),
            teams,
            voters,
        }
    }
}

/// File-backed snapshot store
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Create a store writing to the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the stored snapshot
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a snapshot to disk
    ///
    /// Writes to a sibling temp file and renames over the target, so a crash
    /// mid-write never leaves a truncated snapshot at the store path.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let json = serde_json::to_string_pretty(snapshot)?;

        let mut tmp_path = self.path.clone();
        tmp_path.set_extension("json.tmp");

        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)?;

        tracing::info!(
            "💾 Snapshot saved: {} teams, {} voters -> {}",
            snapshot.teams.len(),
            snapshot.voters.len(),
            self.path.display()
        );

        Ok(())
    }

    /// Load the stored snapshot, or `None` if no snapshot exists yet
    pub fn load(&self) -> Result<Option<Snapshot>> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let snapshot: Snapshot = serde_json::from_str(&json)?;
        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(storage_error!(
                "Unsupported snapshot format version {} (expected {})",
                snapshot.format_version,
                SNAPSHOT_FORMAT_VERSION
            ));
        }

        Ok(Some(snapshot))
    }

    /// Copy the stored snapshot verbatim to `dest`
    ///
    /// This is the backup/download primitive: a raw byte-for-byte copy of the
    /// persisted store, not a re-serialization of live state.
    pub fn backup(&self, dest: impl AsRef<Path>) -> Result<u64> {
        let dest = dest.as_ref();
        let bytes = std::fs::copy(&self.path, dest)?;

        tracing::info!(
            "📦 Snapshot backup: {} -> {} ({} bytes)",
            self.path.display(),
            dest.display(),
            bytes
        );

        Ok(bytes)
    }
}

/// Background service that snapshots the ledger on an interval
///
/// Save failures are logged and retried on the next tick; they never take the
/// serving process down.
pub struct AutosaveService {
    ledger: Arc<VoteLedger>,
    store: SnapshotStore,
    interval_seconds: u64,
    stop_signal: tokio::sync::mpsc::Receiver<()>,
}

impl AutosaveService {
    /// Create a new autosave service
    pub fn new(
        ledger: Arc<VoteLedger>,
        store: SnapshotStore,
        interval_seconds: u64,
        stop_signal: tokio::sync::mpsc::Receiver<()>,
    ) -> Self {
        Self {
            ledger,
            store,
            interval_seconds,
            stop_signal,
        }
    }

    /// Run the autosave loop until the stop signal fires
    pub async fn run(mut self) {
        let mut interval =
            tokio::time::interval(tokio::time::Duration::from_secs(self.interval_seconds));
        // The first tick completes immediately; skip it so startup state
        // doesn't overwrite a snapshot the caller has not restored yet.
        interval.tick().await;

        tracing::info!(
            "🔄 Autosave service started (interval: {}s, path: {})",
            self.interval_seconds,
            self.store.path().display()
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.save_once() {
                        tracing::error!("❌ Autosave failed: {}", e);
                    }
                }
                _ = self.stop_signal.recv() => {
                    tracing::info!("🛑 Autosave service stopping");
                    // Final save so a clean shutdown loses nothing
                    if let Err(e) = self.save_once() {
                        tracing::error!("❌ Final autosave failed: {}", e);
                    }
                    break;
                }
            }
        }

        tracing::info!("✅ Autosave service stopped");
    }

    fn save_once(&self) -> Result<()> {
        let snapshot = self.ledger.snapshot()?;
        self.store.save(&snapshot)
    }
}

//! Port interfaces for provisioning persistence and randomness

use std::path::PathBuf;

use async_trait::async_trait;
use dashops_domain::{ActionBatch, DemoState, Result};
use rand::seq::SliceRandom;

/// Whole-file persistence of the demo state.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// `None` when no state file exists yet.
    async fn load(&self) -> Result<Option<DemoState>>;

    /// Replace the stored state atomically.
    async fn save(&self, state: &DemoState) -> Result<()>;

    /// Remove the state file; a missing file is not an error.
    async fn remove(&self) -> Result<()>;
}

/// Local copies of submitted batch payloads and downloaded snapshots.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Write `batch` as JSON under `file_name`.
    async fn write_batch(&self, file_name: &str, batch: &ActionBatch) -> Result<PathBuf>;

    /// Delete every demo artifact, returning what was removed.
    async fn remove_all(&self) -> Result<Vec<PathBuf>>;
}

/// Source of the random choices made while building actions.
pub trait TagPicker: Send + Sync {
    /// Up to `count` distinct entries of `pool`.
    fn pick_tags(&self, pool: &[String], count: usize) -> Vec<String>;

    /// One of `candidates`, or `None` when empty.
    fn pick_vlan(&self, candidates: &[u32]) -> Option<u32>;
}

/// [`TagPicker`] backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTagPicker;

impl TagPicker for RandomTagPicker {
    fn pick_tags(&self, pool: &[String], count: usize) -> Vec<String> {
        pool.choose_multiple(&mut rand::thread_rng(), count).cloned().collect()
    }

    fn pick_vlan(&self, candidates: &[u32]) -> Option<u32> {
        candidates.choose(&mut rand::thread_rng()).copied()
    }
}

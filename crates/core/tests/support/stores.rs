//! In-memory state, artifact and scan log stores plus a deterministic picker.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use dashops_core::{ArtifactStore, ScanLogReader, StateStore, TagPicker};
use dashops_domain::{ActionBatch, DemoState, Result};

#[derive(Default)]
pub struct MemoryStateStore {
    state: Mutex<Option<DemoState>>,
    saves: Mutex<usize>,
}

impl MemoryStateStore {
    pub fn with_state(state: DemoState) -> Self {
        Self { state: Mutex::new(Some(state)), saves: Mutex::new(0) }
    }

    pub fn current(&self) -> Option<DemoState> {
        self.state.lock().unwrap().clone()
    }

    pub fn saves(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load(&self) -> Result<Option<DemoState>> {
        Ok(self.current())
    }

    async fn save(&self, state: &DemoState) -> Result<()> {
        *self.state.lock().unwrap() = Some(state.clone());
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        *self.state.lock().unwrap() = None;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryArtifacts {
    files: Mutex<BTreeMap<String, ActionBatch>>,
}

impl MemoryArtifacts {
    pub fn names(&self) -> Vec<String> {
        self.files.lock().unwrap().keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Option<ActionBatch> {
        self.files.lock().unwrap().get(name).cloned()
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifacts {
    async fn write_batch(&self, file_name: &str, batch: &ActionBatch) -> Result<PathBuf> {
        self.files.lock().unwrap().insert(file_name.to_string(), batch.clone());
        Ok(PathBuf::from(file_name))
    }

    async fn remove_all(&self) -> Result<Vec<PathBuf>> {
        let mut files = self.files.lock().unwrap();
        let removed = files.keys().map(PathBuf::from).collect();
        files.clear();
        Ok(removed)
    }
}

/// Takes the first `count` tags and the first VLAN candidate.
pub struct FixedPicker;

impl TagPicker for FixedPicker {
    fn pick_tags(&self, pool: &[String], count: usize) -> Vec<String> {
        pool.iter().take(count).cloned().collect()
    }

    fn pick_vlan(&self, candidates: &[u32]) -> Option<u32> {
        candidates.first().copied()
    }
}

#[derive(Default)]
pub struct MemoryScanLogs {
    pub macs: HashSet<String>,
}

#[async_trait]
impl ScanLogReader for MemoryScanLogs {
    async fn recent_client_macs(&self, _window: Duration) -> Result<HashSet<String>> {
        Ok(self.macs.clone())
    }
}

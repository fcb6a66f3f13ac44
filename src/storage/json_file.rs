//! JSON file store
//!
//! Keeps the full state in memory behind one async mutex and rewrites the
//! snapshot file after every mutation (write to a sibling temp file, then
//! rename over the live file). A mutation is applied to a copy and only
//! becomes visible once that copy is on disk.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{ModerationError, Result};
use crate::traits::{OffenseStore, SettingsStore};
use crate::types::{
    CommunityConfig, CommunityId, OffenseEntry, OffenseKey, OffenseRecord, UserId,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    configs: BTreeMap<CommunityId, CommunityConfig>,
    #[serde(default)]
    offenses: BTreeMap<CommunityId, BTreeMap<UserId, OffenseRecord>>,
}

/// File-backed settings and offense store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: Mutex<Snapshot>,
}

impl JsonFileStore {
    /// Open `path`, starting empty if it does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ModerationError::StorageError(format!(
                    "corrupt store file {}: {e}",
                    path.display()
                ))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Snapshot::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `mutate` to a copy of the state and swap it in after the write
    /// succeeds. `mutate` returns whether anything changed; unchanged state is
    /// not rewritten.
    async fn commit<T>(&self, mutate: impl FnOnce(&mut Snapshot) -> (T, bool)) -> Result<T> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let (out, changed) = mutate(&mut next);
        if changed {
            self.persist(&next).await?;
            *state = next;
        }
        Ok(out)
    }

    async fn persist(&self, snapshot: &Snapshot) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "store snapshot written");
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for JsonFileStore {
    async fn load_config(&self, community: CommunityId) -> Result<Option<CommunityConfig>> {
        Ok(self.state.lock().await.configs.get(&community).cloned())
    }

    async fn save_config(&self, community: CommunityId, config: &CommunityConfig) -> Result<()> {
        self.commit(|state| {
            state.configs.insert(community, config.clone());
            ((), true)
        })
        .await
    }

    async fn remove_config(&self, community: CommunityId) -> Result<()> {
        self.commit(|state| ((), state.configs.remove(&community).is_some()))
            .await
    }
}

#[async_trait]
impl OffenseStore for JsonFileStore {
    async fn load_record(&self, key: OffenseKey) -> Result<Option<OffenseRecord>> {
        let state = self.state.lock().await;
        Ok(state
            .offenses
            .get(&key.community)
            .and_then(|users| users.get(&key.user))
            .cloned())
    }

    async fn save_record(&self, key: OffenseKey, record: &OffenseRecord) -> Result<()> {
        self.commit(|state| {
            state
                .offenses
                .entry(key.community)
                .or_default()
                .insert(key.user, record.clone());
            ((), true)
        })
        .await
    }

    async fn clear_community(&self, community: CommunityId) -> Result<usize> {
        self.commit(|state| {
            let removed = state
                .offenses
                .remove(&community)
                .map(|users| users.len())
                .unwrap_or(0);
            (removed, removed > 0)
        })
        .await
    }

    async fn append_offense(&self, key: OffenseKey, entry: OffenseEntry) -> Result<u64> {
        self.commit(|state| {
            let count = state
                .offenses
                .entry(key.community)
                .or_default()
                .entry(key.user)
                .or_default()
                .push(entry);
            (count, true)
        })
        .await
    }
}

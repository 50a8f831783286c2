//! Startup-loaded data cache (DataRegistry) for the server and CLI.
//! Load once, share via Arc; handlers await [RegistryHandle::ready] before reading it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::data::character::{CharacterCatalog, CHARACTERS_STEM};
use crate::data::effect::{EffectCatalog, EFFECTS_STEM};
use crate::data::error::{error_chain, DataError, Result};
use crate::data::loader::find_catalog_file;

/// Read-only registry of static game data.
#[derive(Debug)]
pub struct DataRegistry {
    pub effects: EffectCatalog,
    pub characters: CharacterCatalog,
    pub data_dir: PathBuf,
    pub loaded_at: DateTime<Utc>,
}

impl DataRegistry {
    /// Load both catalogs from `data_dir`. Either catalog missing or malformed is an error.
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Arc<DataRegistry>> {
        let data_dir = data_dir.as_ref();
        let effects_path = find_catalog_file(data_dir, EFFECTS_STEM)?;
        let characters_path = find_catalog_file(data_dir, CHARACTERS_STEM)?;

        let effects = EffectCatalog::load(&effects_path)?;
        let characters = CharacterCatalog::load(&characters_path)?;
        tracing::info!(
            data_dir = %data_dir.display(),
            effects = effects.len(),
            characters = characters.len(),
            "data registry loaded"
        );

        Ok(Arc::new(Self::from_catalogs(data_dir, effects, characters)))
    }

    pub fn from_catalogs(
        data_dir: impl Into<PathBuf>,
        effects: EffectCatalog,
        characters: CharacterCatalog,
    ) -> Self {
        Self {
            effects,
            characters,
            data_dir: data_dir.into(),
            loaded_at: Utc::now(),
        }
    }

    pub fn loaded_at_rfc3339(&self) -> String {
        self.loaded_at.to_rfc3339()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryStatus {
    Loading,
    Ready,
    Failed,
}

impl RegistryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone)]
enum LoadState {
    Loading,
    Ready(Arc<DataRegistry>),
    Failed(String),
}

/// Cloneable handle to a registry that may still be loading.
#[derive(Debug, Clone)]
pub struct RegistryHandle {
    state: watch::Receiver<LoadState>,
}

impl RegistryHandle {
    /// Handle over an already-loaded registry.
    pub fn ready_with(registry: Arc<DataRegistry>) -> Self {
        let (_tx, state) = watch::channel(LoadState::Ready(registry));
        Self { state }
    }

    /// Start loading `data_dir` on a blocking worker and return immediately.
    /// Must be called from within a tokio runtime.
    pub fn spawn_load(data_dir: PathBuf) -> Self {
        let (tx, state) = watch::channel(LoadState::Loading);
        tokio::spawn(async move {
            let loaded = tokio::task::spawn_blocking(move || DataRegistry::load(&data_dir)).await;
            let next = match loaded {
                Ok(Ok(registry)) => LoadState::Ready(registry),
                Ok(Err(err)) => {
                    tracing::error!(error = %err, "data registry load failed");
                    LoadState::Failed(error_chain(&err))
                }
                Err(join_err) => {
                    tracing::error!(error = %join_err, "data registry loader panicked");
                    LoadState::Failed(join_err.to_string())
                }
            };
            let _ = tx.send(next);
        });
        Self { state }
    }

    /// Wait until loading has finished.
    pub async fn ready(&self) -> Result<Arc<DataRegistry>> {
        let mut state = self.state.clone();
        let settled = state
            .wait_for(|s| !matches!(s, LoadState::Loading))
            .await
            .map_err(|_| DataError::LoadFailed("loader stopped before finishing".to_string()))?;
        match &*settled {
            LoadState::Ready(registry) => Ok(Arc::clone(registry)),
            LoadState::Failed(message) => Err(DataError::LoadFailed(message.clone())),
            LoadState::Loading => Err(DataError::LoadFailed("still loading".to_string())),
        }
    }

    pub fn status(&self) -> RegistryStatus {
        match &*self.state.borrow() {
            LoadState::Loading => RegistryStatus::Loading,
            LoadState::Ready(_) => RegistryStatus::Ready,
            LoadState::Failed(_) => RegistryStatus::Failed,
        }
    }

    /// The registry if it has finished loading, without waiting.
    pub fn try_get(&self) -> Option<Arc<DataRegistry>> {
        match &*self.state.borrow() {
            LoadState::Ready(registry) => Some(Arc::clone(registry)),
            _ => None,
        }
    }
}

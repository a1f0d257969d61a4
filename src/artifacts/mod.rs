//! Lazy, process-wide store for the model and encoder artifacts.
//!
//! Both artifacts are produced by an offline training run and may not exist
//! yet when the service starts. The store re-checks the configured paths on
//! every `ensure_loaded` call until a load succeeds, then holds the artifact
//! for the rest of the process lifetime. A missing file is not an error; a
//! file that exists but fails to deserialize is, and that error propagates.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::Config;
use crate::encoding::EncoderSet;
use crate::error::ArtifactError;
use crate::model::RandomForest;

/// Shared store for the two disk-resident artifacts.
#[derive(Debug)]
pub struct ArtifactStore {
    model_path: PathBuf,
    encoders_path: PathBuf,
    model: RwLock<Option<Arc<RandomForest>>>,
    encoders: RwLock<Option<Arc<EncoderSet>>>,
}

impl ArtifactStore {
    /// Create a store over the configured artifact paths. Nothing is loaded
    /// until the first `ensure_loaded` call.
    pub fn new(config: &Config) -> Self {
        Self {
            model_path: config.model_path.clone(),
            encoders_path: config.encoders_path.clone(),
            model: RwLock::new(None),
            encoders: RwLock::new(None),
        }
    }

    /// Store with explicit paths, for tests and diagnostics.
    pub fn with_paths(model_path: impl Into<PathBuf>, encoders_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            encoders_path: encoders_path.into(),
            model: RwLock::new(None),
            encoders: RwLock::new(None),
        }
    }

    /// Idempotently load whichever artifacts exist on disk and are not yet
    /// held in memory. Concurrent callers racing on first load serialize on
    /// the slot's write lock, so each artifact deserializes at most once.
    pub async fn ensure_loaded(&self) -> Result<(), ArtifactError> {
        ensure_slot(&self.model, &self.model_path, "model").await?;
        ensure_slot(&self.encoders, &self.encoders_path, "encoders").await?;
        Ok(())
    }

    /// The loaded model, if any.
    pub async fn model(&self) -> Option<Arc<RandomForest>> {
        self.model.read().await.clone()
    }

    /// The loaded encoder set, if any.
    pub async fn encoders(&self) -> Option<Arc<EncoderSet>> {
        self.encoders.read().await.clone()
    }

    /// Whether the model artifact is held in memory.
    pub async fn model_loaded(&self) -> bool {
        self.model.read().await.is_some()
    }

    /// Whether the encoder artifact is held in memory.
    pub async fn encoders_loaded(&self) -> bool {
        self.encoders.read().await.is_some()
    }
}

/// Check-then-load one artifact slot under its write lock.
async fn ensure_slot<T>(
    slot: &RwLock<Option<Arc<T>>>,
    path: &Path,
    name: &str,
) -> Result<(), ArtifactError>
where
    T: DeserializeOwned,
{
    // Fast path: already loaded.
    if slot.read().await.is_some() {
        return Ok(());
    }

    let mut guard = slot.write().await;
    if guard.is_some() {
        return Ok(());
    }

    if !path.exists() {
        debug!(artifact = name, path = %path.display(), "artifact file absent");
        return Ok(());
    }

    let artifact = load_json(path)?;
    info!(artifact = name, path = %path.display(), "artifact loaded");
    *guard = Some(Arc::new(artifact));

    Ok(())
}

/// Read and deserialize one JSON artifact file.
fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = std::fs::read(path).map_err(|source| ArtifactError::Read {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Malformed {
        path: path.display().to_string(),
        source,
    })
}

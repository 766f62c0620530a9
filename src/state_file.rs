//! State file handling for saving and loading retention records.
//!
//! Stands in for the repository's storage layer: both records live in one
//! pretty-printed JSON document, with durations written in humantime form
//! ("2days", "24h").

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::apply::{ApplyOutcome, RetentionStore, apply_retention};
use crate::request::RetentionRequest;
use crate::storage::{BlobRetentionConfig, MaintenanceParams};

/// Retention records of a repository as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionState {
    /// Object-lock settings of the blob store
    #[serde(default)]
    pub blob: BlobRetentionConfig,

    /// Maintenance settings
    #[serde(default)]
    pub maintenance: MaintenanceParams,
}

impl RetentionState {
    /// Create a state with retention disabled and default maintenance
    pub fn new() -> Self {
        Self::default()
    }

    /// Save state to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize retention state to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write retention state to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load state from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read retention state from {:?}", path.as_ref()))?;

        let state: Self =
            serde_json::from_str(&content).context("Failed to parse retention state JSON")?;

        Ok(state)
    }
}

/// [`RetentionStore`] backed by a single JSON state file.
///
/// Single-record saves re-read the file and rewrite it whole, so the other
/// record keeps whatever is currently on disk. Saving both records is one
/// write.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write a fresh state file, replacing any existing one
    pub fn create(path: impl Into<PathBuf>, state: &RetentionState) -> Result<Self> {
        let store = Self::new(path);
        state.save_to_file(&store.path)?;
        Ok(store)
    }

    /// Create a state file with retention disabled and `request` applied.
    ///
    /// The request is reconciled in memory first; the file is only written
    /// once the result is valid.
    pub fn initialize(
        path: impl Into<PathBuf>,
        request: &RetentionRequest,
    ) -> Result<(Self, ApplyOutcome)> {
        let mut state = RetentionState::new();
        let outcome = apply_retention(&mut state, request)?;
        let store = Self::create(path, &state)?;
        Ok((store, outcome))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update(&self, apply: impl FnOnce(&mut RetentionState)) -> Result<()> {
        let mut state = RetentionState::load_from_file(&self.path)?;
        apply(&mut state);
        state.save_to_file(&self.path)
    }
}

impl RetentionStore for JsonStateStore {
    fn load(&self) -> Result<(BlobRetentionConfig, MaintenanceParams)> {
        let state = RetentionState::load_from_file(&self.path)?;
        Ok((state.blob, state.maintenance))
    }

    fn save_blob(&mut self, blob: &BlobRetentionConfig) -> Result<()> {
        debug!(path = ?self.path, "writing blob storage config");
        self.update(|state| state.blob = blob.clone())
    }

    fn save_params(&mut self, params: &MaintenanceParams) -> Result<()> {
        debug!(path = ?self.path, "writing maintenance params");
        self.update(|state| state.maintenance = params.clone())
    }

    fn save(&mut self, blob: &BlobRetentionConfig, params: &MaintenanceParams) -> Result<()> {
        debug!(path = ?self.path, "writing retention state");
        let state = RetentionState {
            blob: blob.clone(),
            maintenance: params.clone(),
        };
        state.save_to_file(&self.path)
    }
}

impl RetentionStore for RetentionState {
    fn load(&self) -> Result<(BlobRetentionConfig, MaintenanceParams)> {
        Ok((self.blob.clone(), self.maintenance.clone()))
    }

    fn save_blob(&mut self, blob: &BlobRetentionConfig) -> Result<()> {
        self.blob = blob.clone();
        Ok(())
    }

    fn save_params(&mut self, params: &MaintenanceParams) -> Result<()> {
        self.maintenance = params.clone();
        Ok(())
    }
}

//! Load, reconcile and persist retention settings
//!
//! [`RetentionStore`] is the seam to whatever owns the two records. The
//! functions here only read and write through it, and only write a record
//! when the reconciler reports that it changed.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::error::RetentionError;
use crate::reconciler::RetentionReconciler;
use crate::request::RetentionRequest;
use crate::storage::{BlobRetentionConfig, MaintenanceParams};
use crate::types::RetentionMode;

/// Access to the persisted retention records of one repository
pub trait RetentionStore {
    /// Read the current blob storage config and maintenance params
    fn load(&self) -> Result<(BlobRetentionConfig, MaintenanceParams)>;

    /// Persist a new blob storage config
    fn save_blob(&mut self, blob: &BlobRetentionConfig) -> Result<()>;

    /// Persist new maintenance params
    fn save_params(&mut self, params: &MaintenanceParams) -> Result<()>;

    /// Persist both records as one update: either both land or neither does.
    ///
    /// The default writes the params, then the blob config, and puts the
    /// previous params back if the blob write fails. Stores that can write
    /// both records at once should override it.
    fn save(&mut self, blob: &BlobRetentionConfig, params: &MaintenanceParams) -> Result<()> {
        let (_, previous) = self.load()?;
        self.save_params(params)?;

        if let Err(err) = self.save_blob(blob) {
            if let Err(restore_err) = self.save_params(&previous) {
                warn!(error = %restore_err, "failed to restore maintenance params");
                return Err(err.context(format!(
                    "maintenance params left updated after failed restore: {restore_err:#}"
                )));
            }
            return Err(err);
        }

        Ok(())
    }
}

/// What [`apply_retention`] wrote back to the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub blob_written: bool,
    pub params_written: bool,
}

impl ApplyOutcome {
    /// Returns true if the store was not touched
    pub fn is_unchanged(&self) -> bool {
        !self.blob_written && !self.params_written
    }
}

/// Apply `request` to the records held by `store`.
///
/// An empty request returns without reading the store. Only changed records
/// are written; when both changed they go through [`RetentionStore::save`] so
/// a failed write never leaves one record updated without the other.
pub fn apply_retention<S: RetentionStore + ?Sized>(
    store: &mut S,
    request: &RetentionRequest,
) -> Result<ApplyOutcome> {
    if request.is_empty() {
        return Ok(ApplyOutcome::default());
    }

    // Caught here for a clearer message than the consistency check would give
    if request.mode == Some(RetentionMode::NoRetention) {
        if let Some(duration) = request.duration.filter(|d| !d.is_zero()) {
            return Err(RetentionError::DurationWithoutRetention { duration }.into());
        }
    }

    let (blob, params) = store.load().context("loading retention configuration")?;

    let mut reconciler = RetentionReconciler::from_configs(blob, params);
    reconciler
        .set(request)
        .context("setting retention configuration")?;

    if !reconciler.blob_changed() && !reconciler.params_changed() {
        info!("retention configuration already up to date");
        return Ok(ApplyOutcome::default());
    }

    let (blob, params) = reconciler
        .as_configs()
        .context("invalid retention configuration")?;

    let outcome = ApplyOutcome {
        blob_written: reconciler.blob_changed(),
        params_written: reconciler.params_changed(),
    };

    match (outcome.blob_written, outcome.params_written) {
        (true, true) => store
            .save(&blob, &params)
            .context("persisting retention configuration")?,
        (true, false) => store
            .save_blob(&blob)
            .context("persisting blob storage config")?,
        (false, true) => store
            .save_params(&params)
            .context("persisting maintenance params")?,
        (false, false) => {}
    }

    info!(
        mode = %blob.mode,
        period = %humantime::format_duration(blob.period),
        extend_object_locks = params.extend_object_locks,
        blob_written = outcome.blob_written,
        params_written = outcome.params_written,
        "retention configuration updated"
    );

    Ok(outcome)
}

/// Check that the records held by `store` are mutually consistent
pub fn verify_store<S: RetentionStore + ?Sized>(store: &S) -> Result<()> {
    let (blob, params) = store.load().context("loading retention configuration")?;

    if let Err(err) = RetentionReconciler::from_configs(blob, params).verify() {
        debug!(error = %err, "retention configuration is inconsistent");
        return Err(err.into());
    }

    Ok(())
}

//! Retention Reconciler
//!
//! Merges a partial [`RetentionRequest`] into a snapshot of the repository's
//! blob storage config and maintenance params, and reports which of the two
//! records actually changed so the persistence layer can skip redundant
//! writes.
//!
//! # Rules
//!
//! - **Absence is not erasure**: fields missing from the request are untouched
//! - **Atomic failure**: an invalid mode is rejected before anything is written
//! - **Disabling is authoritative**: turning retention off also clears the period
//! - **Per-call flags**: `blob_changed`/`params_changed` describe the most
//!   recent successful `set`, not an accumulation across calls
//!
//! The reconciler does no I/O and holds no locks; share it across threads
//! only behind external synchronization.

use std::time::Duration;

use tracing::debug;

use crate::error::{Result, RetentionError};
use crate::request::RetentionRequest;
use crate::storage::{
    BlobRetentionConfig, MaintenanceParams, check_extend_retention, is_valid_backend_mode,
};
use crate::types::RetentionMode;

/// In-memory reconciliation state for one repository.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use repo_retention::{
///     BlobRetentionConfig, MaintenanceParams, RetentionMode, RetentionReconciler,
///     RetentionRequest,
/// };
///
/// let mut rec = RetentionReconciler::from_configs(
///     BlobRetentionConfig::disabled(),
///     MaintenanceParams::default(),
/// );
///
/// rec.set(
///     &RetentionRequest::new()
///         .with_mode(RetentionMode::GovernanceRetention)
///         .with_duration(Duration::from_secs(48 * 3600))
///         .with_extend(true),
/// )
/// .unwrap();
///
/// assert!(rec.blob_changed());
/// assert!(rec.params_changed());
///
/// let (blob, params) = rec.as_configs().unwrap();
/// assert_eq!(blob.mode, "GOVERNANCE");
/// assert!(params.extend_object_locks);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionReconciler {
    blob: BlobRetentionConfig,
    params: MaintenanceParams,
    blob_changed: bool,
    params_changed: bool,
}

/// Outcome of resolving the mode field before anything is written
enum ModeChange {
    Keep,
    Disable,
    Enable(&'static str),
}

impl RetentionReconciler {
    /// Build a reconciler from the currently persisted records
    pub fn from_configs(blob: BlobRetentionConfig, params: MaintenanceParams) -> Self {
        Self {
            blob,
            params,
            blob_changed: false,
            params_changed: false,
        }
    }

    /// Apply `request` to the held records.
    ///
    /// On error nothing is modified, including the change flags left by the
    /// previous call.
    pub fn set(&mut self, request: &RetentionRequest) -> Result<()> {
        let mode_change = self.resolve_mode(request.mode)?;

        let blob_before = self.blob.clone();
        let params_before = self.params.clone();

        match mode_change {
            ModeChange::Keep => {}
            ModeChange::Disable => {
                self.blob.mode.clear();
                self.blob.period = Duration::ZERO;
            }
            ModeChange::Enable(token) => self.blob.mode = token.to_string(),
        }

        if let Some(duration) = request.duration {
            self.blob.period = duration;
        }
        if let Some(extend) = request.extend {
            self.params.extend_object_locks = extend;
        }

        self.blob_changed = self.blob != blob_before;
        self.params_changed = self.params != params_before;

        if self.blob_changed {
            debug!(
                from_mode = %blob_before.mode,
                to_mode = %self.blob.mode,
                from_period = ?blob_before.period,
                to_period = ?self.blob.period,
                "blob retention config changed"
            );
        }
        if self.params_changed {
            debug!(
                extend_object_locks = self.params.extend_object_locks,
                "maintenance params changed"
            );
        }

        Ok(())
    }

    /// Work out what the mode field asks for without touching any state.
    fn resolve_mode(&self, mode: Option<RetentionMode>) -> Result<ModeChange> {
        let Some(mode) = mode else {
            return Ok(ModeChange::Keep);
        };

        let token = mode
            .backend_token()
            .ok_or_else(|| RetentionError::invalid_mode(mode))?;

        if token.is_empty() {
            if !self.blob.is_retention_enabled() {
                return Ok(ModeChange::Keep);
            }
            return Ok(ModeChange::Disable);
        }

        if !is_valid_backend_mode(token) {
            return Err(RetentionError::invalid_backend_mode(token));
        }

        Ok(ModeChange::Enable(token))
    }

    /// True if the last successful `set` changed the blob storage config
    pub fn blob_changed(&self) -> bool {
        self.blob_changed
    }

    /// True if the last successful `set` changed the maintenance params
    pub fn params_changed(&self) -> bool {
        self.params_changed
    }

    /// Current records, checked for backend validity before handing them out.
    ///
    /// The check runs even when nothing was changed, so a record that was
    /// already invalid when loaded is caught here.
    pub fn as_configs(&self) -> Result<(BlobRetentionConfig, MaintenanceParams)> {
        self.blob.validate()?;
        check_extend_retention(&self.blob, &self.params)?;

        Ok((self.blob.clone(), self.params.clone()))
    }

    /// Check that the two records agree: either retention is fully on (with
    /// lock extension) or fully off.
    pub fn verify(&self) -> Result<()> {
        if !self.blob.is_retention_enabled() {
            if !self.blob.period.is_zero() {
                return Err(RetentionError::PeriodWithoutRetention {
                    period: self.blob.period,
                });
            }
            if self.params.extend_object_locks {
                return Err(RetentionError::ExtendWithoutRetention);
            }
            return Ok(());
        }

        self.blob.validate()?;

        if !self.params.extend_object_locks {
            return Err(RetentionError::LocksNotExtended);
        }

        check_extend_retention(&self.blob, &self.params)
    }
}

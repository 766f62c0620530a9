//! Records owned by the storage layer
//!
//! `BlobRetentionConfig` mirrors the blob-store configuration blob (object-lock
//! mode token and minimum lock period) and `MaintenanceParams` the repository
//! maintenance settings. The rules the backend itself enforces on these
//! records also live here, so the reconciler and the verifier share them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RetentionError};

/// Backend object-lock token for governance retention
pub const GOVERNANCE_MODE: &str = "GOVERNANCE";

/// Backend object-lock token for compliance retention
pub const COMPLIANCE_MODE: &str = "COMPLIANCE";

/// Shortest lock period the backend accepts
pub const MIN_RETENTION_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// Headroom required between a full maintenance pass and lock expiry
pub const MIN_MAINTENANCE_GAP: Duration = Duration::from_secs(24 * 60 * 60);

/// Default interval between full maintenance passes
pub const DEFAULT_FULL_CYCLE_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Returns true if `token` is an object-lock mode the backend understands
pub fn is_valid_backend_mode(token: &str) -> bool {
    matches!(token, GOVERNANCE_MODE | COMPLIANCE_MODE)
}

/// Object-lock settings of the blob store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobRetentionConfig {
    /// Backend mode token, empty when retention is disabled
    #[serde(default)]
    pub mode: String,

    /// Minimum time every blob stays locked
    #[serde(default, with = "humantime_serde")]
    pub period: Duration,
}

impl BlobRetentionConfig {
    /// Config with retention disabled
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Config with the given backend token and period
    pub fn new(mode: impl Into<String>, period: Duration) -> Self {
        Self {
            mode: mode.into(),
            period,
        }
    }

    /// Returns true if object locking is turned on
    #[inline]
    pub fn is_retention_enabled(&self) -> bool {
        !self.mode.is_empty()
    }

    /// Check the record on its own, the way the backend would on write.
    pub fn validate(&self) -> Result<()> {
        if !self.is_retention_enabled() {
            if !self.period.is_zero() {
                return Err(RetentionError::PeriodWithoutRetention {
                    period: self.period,
                });
            }
            return Ok(());
        }

        if !is_valid_backend_mode(&self.mode) {
            return Err(RetentionError::invalid_backend_mode(self.mode.as_str()));
        }
        if self.period.is_zero() {
            return Err(RetentionError::MissingPeriod {
                mode: self.mode.clone(),
            });
        }
        if self.period < MIN_RETENTION_PERIOD {
            return Err(RetentionError::PeriodTooShort {
                period: self.period,
                minimum: MIN_RETENTION_PERIOD,
            });
        }

        Ok(())
    }
}

/// Repository maintenance settings that interact with retention
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceParams {
    /// Whether full maintenance extends object locks on live blobs
    #[serde(default)]
    pub extend_object_locks: bool,

    /// Interval between full maintenance passes
    #[serde(default = "default_full_cycle_interval", with = "humantime_serde")]
    pub full_cycle_interval: Duration,
}

fn default_full_cycle_interval() -> Duration {
    DEFAULT_FULL_CYCLE_INTERVAL
}

impl Default for MaintenanceParams {
    fn default() -> Self {
        Self {
            extend_object_locks: false,
            full_cycle_interval: DEFAULT_FULL_CYCLE_INTERVAL,
        }
    }
}

impl MaintenanceParams {
    /// Params with the given extend flag and the default cycle interval
    pub fn with_extend(extend_object_locks: bool) -> Self {
        Self {
            extend_object_locks,
            ..Self::default()
        }
    }
}

/// Check that maintenance can keep extending locks before they expire.
///
/// Only meaningful when both retention and lock extension are on; any other
/// combination passes.
pub fn check_extend_retention(blob: &BlobRetentionConfig, params: &MaintenanceParams) -> Result<()> {
    if !blob.is_retention_enabled() || !params.extend_object_locks {
        return Ok(());
    }

    let required = params.full_cycle_interval.saturating_add(MIN_MAINTENANCE_GAP);
    if required > blob.period {
        return Err(RetentionError::MaintenanceIntervalTooLong {
            period: blob.period,
            interval: params.full_cycle_interval,
            gap: MIN_MAINTENANCE_GAP,
        });
    }

    Ok(())
}

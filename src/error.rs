//! Error handling module for repository retention
//!
//! Provides the domain error type using thiserror. Everything the reconciler,
//! the validity checks and the apply flow can reject is a variant here; I/O
//! and CLI glue wrap these with anyhow context instead.

use std::time::Duration;

use humantime::{FormattedDuration, format_duration};
use thiserror::Error;

/// Main error type for retention reconciliation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetentionError {
    /// A requested retention mode that can never be a target state
    #[error("invalid retention mode: {mode}")]
    InvalidMode { mode: String },

    /// A numeric retention mode code outside the known range
    #[error("invalid retention mode code: {0}")]
    InvalidModeCode(u8),

    /// The backend rejected the object-lock mode token
    #[error("invalid backend retention mode: {token:?}")]
    InvalidBackendMode { token: String },

    /// Retention is disabled but a lock period is still recorded
    #[error("retention period {} is set but retention is disabled", human(.period))]
    PeriodWithoutRetention { period: Duration },

    /// Retention is enabled without a lock period
    #[error("retention mode {mode} is set but the retention period is zero")]
    MissingPeriod { mode: String },

    /// Lock period below what the backend accepts
    #[error("retention period {} is below the minimum of {}", human(.period), human(.minimum))]
    PeriodTooShort { period: Duration, minimum: Duration },

    /// Maintenance would extend locks on a repository without retention
    #[error("object lock extension is enabled but retention is disabled")]
    ExtendWithoutRetention,

    /// Retention is enabled but maintenance never extends the locks
    #[error("retention is enabled but object lock extension is disabled")]
    LocksNotExtended,

    /// Full maintenance cannot run often enough to keep locks alive
    #[error(
        "retention period {} must be longer than the full maintenance interval {} plus {}",
        human(.period),
        human(.interval),
        human(.gap)
    )]
    MaintenanceIntervalTooLong {
        period: Duration,
        interval: Duration,
        gap: Duration,
    },

    /// Disabling retention while also asking for a lock period
    #[error("duration must be 0 when retention is disabled (got {})", human(.duration))]
    DurationWithoutRetention { duration: Duration },
}

fn human(d: &Duration) -> FormattedDuration {
    format_duration(*d)
}

/// Result type alias for retention operations
pub type Result<T> = std::result::Result<T, RetentionError>;

impl RetentionError {
    /// Create an invalid mode error from anything displayable
    pub fn invalid_mode(mode: impl ToString) -> Self {
        Self::InvalidMode {
            mode: mode.to_string(),
        }
    }

    /// Create an invalid backend token error
    pub fn invalid_backend_mode(token: impl Into<String>) -> Self {
        Self::InvalidBackendMode {
            token: token.into(),
        }
    }

    /// True for the errors a change request itself can trigger.
    ///
    /// These are the only failures `RetentionReconciler::set` returns; the
    /// rest come from consistency checks on the resulting configuration.
    pub fn is_invalid_mode(&self) -> bool {
        matches!(
            self,
            Self::InvalidMode { .. } | Self::InvalidModeCode(_) | Self::InvalidBackendMode { .. }
        )
    }
}

//! Partial retention change requests
//!
//! Every field is optional: `None` leaves the stored setting alone. A present
//! zero duration is a real value and is not the same as "no change".

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::RetentionMode;

/// Caller-supplied retention change with PATCH semantics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionRequest {
    /// Desired immutability level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<RetentionMode>,

    /// Desired minimum lock period
    #[serde(default, skip_serializing_if = "Option::is_none", with = "humantime_serde")]
    pub duration: Option<Duration>,

    /// Whether maintenance should extend object locks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extend: Option<bool>,
}

impl RetentionRequest {
    /// Request that changes nothing
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: RetentionMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_extend(mut self, extend: bool) -> Self {
        self.extend = Some(extend);
        self
    }

    /// Returns true if no field is present
    pub fn is_empty(&self) -> bool {
        self.mode.is_none() && self.duration.is_none() && self.extend.is_none()
    }
}

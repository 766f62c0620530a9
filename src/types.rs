//! Type-safe retention mode
//!
//! The user-facing immutability level is a closed enum rather than a raw
//! backend string, so every mapping to the backend token is an exhaustive
//! match and nothing indexes into a lookup table.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::RetentionError;
use crate::storage::{COMPLIANCE_MODE, GOVERNANCE_MODE};

/// Immutability level requested for a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum RetentionMode {
    /// Uninitialized or unrecognized input; never a valid target
    #[default]
    #[strum(serialize = "unknown")]
    Unknown = 0,
    /// Object locking disabled
    #[serde(rename = "none")]
    #[strum(serialize = "none")]
    NoRetention = 1,
    /// Locks that privileged roles can still override
    #[serde(rename = "governance")]
    #[strum(serialize = "governance")]
    GovernanceRetention = 2,
    /// Locks nobody can override until they expire
    #[serde(rename = "compliance")]
    #[strum(serialize = "compliance")]
    ComplianceRetention = 3,
}

impl RetentionMode {
    /// Numeric code of this mode
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Backend object-lock token for this mode.
    ///
    /// `Some("")` means "retention disabled"; `None` means the mode has no
    /// backend representation at all and must be rejected.
    pub const fn backend_token(self) -> Option<&'static str> {
        match self {
            Self::NoRetention => Some(""),
            Self::GovernanceRetention => Some(GOVERNANCE_MODE),
            Self::ComplianceRetention => Some(COMPLIANCE_MODE),
            Self::Unknown => None,
        }
    }
}

impl TryFrom<u8> for RetentionMode {
    type Error = RetentionError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Unknown),
            1 => Ok(Self::NoRetention),
            2 => Ok(Self::GovernanceRetention),
            3 => Ok(Self::ComplianceRetention),
            other => Err(RetentionError::InvalidModeCode(other)),
        }
    }
}

//! Repository Retention Library
//!
//! Computes and validates the desired object-lock (WORM) configuration of a
//! content-addressed backup repository. Enforcement against the blob store
//! belongs to the storage layer; this crate only decides what that layer
//! should be told.

pub mod apply;
pub mod cli;
pub mod error;
pub mod reconciler;
pub mod request;
pub mod state_file;
pub mod storage;
pub mod types;

// Re-export main types for convenience
pub use apply::{ApplyOutcome, RetentionStore, apply_retention, verify_store};
pub use error::RetentionError;
pub use reconciler::RetentionReconciler;
pub use request::RetentionRequest;
pub use state_file::{JsonStateStore, RetentionState};
pub use storage::{
    BlobRetentionConfig, COMPLIANCE_MODE, GOVERNANCE_MODE, MaintenanceParams,
    is_valid_backend_mode,
};
pub use types::RetentionMode;

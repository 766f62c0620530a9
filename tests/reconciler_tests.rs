//! Tests for the Retention Reconciler
//!
//! These tests verify:
//! - PATCH semantics (absent fields are left alone)
//! - Disabling retention clears the lock period
//! - Invalid modes fail without touching any state
//! - Change flags track each record independently

use repo_retention::{
    BlobRetentionConfig, GOVERNANCE_MODE, MaintenanceParams, RetentionError, RetentionMode,
    RetentionReconciler, RetentionRequest,
};
use std::time::Duration;

const HOUR: Duration = Duration::from_secs(60 * 60);

fn reconciler(mode: &str, period: Duration, extend: bool) -> RetentionReconciler {
    RetentionReconciler::from_configs(
        BlobRetentionConfig::new(mode, period),
        MaintenanceParams::with_extend(extend),
    )
}

// =============================================================================
// Worked Example
// =============================================================================

#[test]
fn test_enable_everything_from_scratch() {
    let mut rec = reconciler("", Duration::ZERO, false);

    rec.set(
        &RetentionRequest::new()
            .with_mode(RetentionMode::GovernanceRetention)
            .with_duration(48 * HOUR)
            .with_extend(true),
    )
    .expect("valid request");

    let (blob, params) = rec.as_configs().expect("valid result");
    assert_eq!(blob.mode, "GOVERNANCE");
    assert_eq!(blob.period, 48 * HOUR);
    assert!(params.extend_object_locks);
    assert!(rec.blob_changed());
    assert!(rec.params_changed());
}

// =============================================================================
// Mode Transitions
// =============================================================================

#[test]
fn test_disable_clears_mode_and_period() {
    for mode in ["GOVERNANCE", "COMPLIANCE"] {
        let mut rec = reconciler(mode, 96 * HOUR, false);
        rec.set(&RetentionRequest::new().with_mode(RetentionMode::NoRetention))
            .unwrap();

        let (blob, _) = rec.as_configs().unwrap();
        assert_eq!(blob, BlobRetentionConfig::disabled(), "starting from {mode}");
        assert!(rec.blob_changed());
    }
}

#[test]
fn test_disable_already_disabled_is_noop() {
    let mut rec = reconciler("", Duration::ZERO, false);
    rec.set(&RetentionRequest::new().with_mode(RetentionMode::NoRetention))
        .unwrap();

    assert!(!rec.blob_changed());
    assert!(!rec.params_changed());
}

#[test]
fn test_unknown_mode_leaves_configs_untouched() {
    let mut rec = reconciler(GOVERNANCE_MODE, 48 * HOUR, true);
    let before = rec.as_configs().unwrap();

    let err = rec
        .set(
            &RetentionRequest::new()
                .with_mode(RetentionMode::Unknown)
                .with_duration(100 * HOUR)
                .with_extend(false),
        )
        .unwrap_err();

    assert!(err.is_invalid_mode());
    assert!(err.to_string().contains("unknown"));
    assert_eq!(rec.as_configs().unwrap(), before);
    assert!(!rec.blob_changed());
    assert!(!rec.params_changed());
}

#[test]
fn test_out_of_range_code_never_reaches_reconciler() {
    assert_eq!(
        RetentionMode::try_from(42),
        Err(RetentionError::InvalidModeCode(42))
    );
}

// =============================================================================
// Partial Updates
// =============================================================================

#[test]
fn test_duration_only_keeps_mode() {
    let mut rec = reconciler(GOVERNANCE_MODE, 48 * HOUR, true);
    rec.set(&RetentionRequest::new().with_duration(72 * HOUR))
        .unwrap();

    let (blob, params) = rec.as_configs().unwrap();
    assert_eq!(blob.mode, GOVERNANCE_MODE);
    assert_eq!(blob.period, 72 * HOUR);
    assert!(params.extend_object_locks);
    assert!(rec.blob_changed());
    assert!(!rec.params_changed());
}

#[test]
fn test_extend_only_never_touches_blob_flag() {
    let mut rec = reconciler(GOVERNANCE_MODE, 48 * HOUR, false);
    rec.set(&RetentionRequest::new().with_extend(true)).unwrap();
    assert!(!rec.blob_changed());
    assert!(rec.params_changed());
}

#[test]
fn test_mode_only_never_touches_params_flag() {
    let mut rec = reconciler(GOVERNANCE_MODE, 48 * HOUR, true);
    rec.set(&RetentionRequest::new().with_mode(RetentionMode::ComplianceRetention))
        .unwrap();
    assert!(rec.blob_changed());
    assert!(!rec.params_changed());
}

#[test]
fn test_empty_request_is_noop() {
    let mut rec = reconciler(GOVERNANCE_MODE, 48 * HOUR, true);
    let before = rec.clone();
    rec.set(&RetentionRequest::new()).unwrap();
    assert_eq!(rec, before);
}

// =============================================================================
// Round Trip and Validity
// =============================================================================

#[test]
fn test_round_trip_without_set() {
    let blob = BlobRetentionConfig::new("COMPLIANCE", 30 * 24 * HOUR);
    let params = MaintenanceParams::with_extend(true);
    let rec = RetentionReconciler::from_configs(blob.clone(), params.clone());

    assert_eq!(rec.as_configs().unwrap(), (blob, params));
}

#[test]
fn test_as_configs_rejects_enabled_mode_without_period() {
    let mut rec = reconciler("", Duration::ZERO, false);
    rec.set(&RetentionRequest::new().with_mode(RetentionMode::GovernanceRetention))
        .unwrap();

    assert!(matches!(
        rec.as_configs(),
        Err(RetentionError::MissingPeriod { .. })
    ));
}

#[test]
fn test_as_configs_rejects_invalid_loaded_token() {
    let rec = reconciler("LEGAL_HOLD", 48 * HOUR, true);
    assert_eq!(
        rec.as_configs(),
        Err(RetentionError::invalid_backend_mode("LEGAL_HOLD"))
    );
}

//! Prometheus metrics for submission monitoring
//!
//! Counters only; exposing them over HTTP is the host process's concern.

use lazy_static::lazy_static;
use prometheus::{register_counter_vec, CounterVec};

lazy_static! {
    pub static ref ESTIMATIONS: CounterVec = register_counter_vec!(
        "txpad_estimations_total",
        "Total successful gas estimations",
        &["operation"]
    )
    .unwrap();

    pub static ref SUBMISSIONS: CounterVec = register_counter_vec!(
        "txpad_submissions_total",
        "Total transactions submitted",
        &["operation"]
    )
    .unwrap();

    pub static ref FAILURES: CounterVec = register_counter_vec!(
        "txpad_failures_total",
        "Total submission pipeline failures by kind",
        &["operation", "kind"]
    )
    .unwrap();
}

// Helper functions to record metrics

pub fn record_estimation(operation: &str) {
    ESTIMATIONS.with_label_values(&[operation]).inc();
}

pub fn record_submission(operation: &str) {
    SUBMISSIONS.with_label_values(&[operation]).inc();
}

pub fn record_failure(operation: &str, kind: &str) {
    FAILURES.with_label_values(&[operation, kind]).inc();
}

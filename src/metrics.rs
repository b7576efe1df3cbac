// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the route53-sync controller.
//!
//! All metrics use the namespace prefix `route53_sync_`.
//!
//! # Metrics Categories
//!
//! - **Iteration Metrics** - Reconciliation passes and their duration
//! - **Service Metrics** - Services discovered and skipped
//! - **Record Metrics** - Alias upserts by outcome
//! - **Error Metrics** - Per-domain failures by error type
//! - **Credential Metrics** - Forced credential refreshes
//!
//! # Example
//!
//! ```rust,no_run
//! use route53_sync::metrics::record_iteration;
//!
//! record_iteration("success", std::time::Duration::from_secs(1));
//! ```

use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, IntCounter, Opts, Registry,
    TextEncoder,
};
use std::sync::LazyLock;
use std::time::Duration;

// ============================================================================
// Metric Name Constants
// ============================================================================

/// Namespace prefix for all route53-sync metrics
const METRICS_NAMESPACE: &str = "route53_sync";

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
///
/// All metrics are registered in this registry and exposed via `/metrics` endpoint.
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Iteration Metrics
// ============================================================================

/// Total number of reconciliation passes by status
///
/// Labels:
/// - `status`: Outcome (`success`, `partial_failure`, `fatal`)
pub static ITERATIONS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_iterations_total"),
        "Total number of reconciliation passes by status",
    );
    let counter = CounterVec::new(opts, &["status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of reconciliation passes in seconds
///
/// Labels:
/// - `status`: Outcome (`success`, `partial_failure`, `fatal`)
pub static ITERATION_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_iteration_duration_seconds"),
        "Duration of reconciliation passes in seconds",
    )
    .buckets(vec![0.01, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]);
    let histogram = HistogramVec::new(opts, &["status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

// ============================================================================
// Service Metrics
// ============================================================================

/// Number of services matched by the selector in the last pass
pub static SERVICES_DISCOVERED: LazyLock<Gauge> = LazyLock::new(|| {
    let gauge = Gauge::new(
        format!("{METRICS_NAMESPACE}_services_discovered"),
        "Number of services matched by the selector in the last pass",
    )
    .unwrap();
    METRICS_REGISTRY.register(Box::new(gauge.clone())).unwrap();
    gauge
});

/// Total number of services skipped
///
/// Labels:
/// - `reason`: Skip reason (`no_ingress`, `multiple_ingress`, `missing_hostname`, `missing_annotation`, `empty_domain_list`)
pub static SERVICES_SKIPPED_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_services_skipped_total"),
        "Total number of services skipped by reason",
    );
    let counter = CounterVec::new(opts, &["reason"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Record Metrics
// ============================================================================

/// Total number of alias upserts
///
/// Labels:
/// - `outcome`: `submitted` or `dry_run`
pub static RECORD_UPSERTS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_record_upserts_total"),
        "Total number of alias record upserts by outcome",
    );
    let counter = CounterVec::new(opts, &["outcome"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Error Metrics
// ============================================================================

/// Total number of per-domain errors
///
/// Labels:
/// - `error_type`: Error category (e.g., `ZoneMismatch`, `DNSUpdateFailed`)
pub static ERRORS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_errors_total"),
        "Total number of per-domain errors by type",
    );
    let counter = CounterVec::new(opts, &["error_type"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Credential Metrics
// ============================================================================

/// Total number of forced cloud credential refreshes
pub static CREDENTIAL_REFRESHES_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    let counter = IntCounter::new(
        format!("{METRICS_NAMESPACE}_credential_refreshes_total"),
        "Total number of forced cloud credential refreshes",
    )
    .unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record a completed reconciliation pass
///
/// # Arguments
/// * `status` - Outcome of the pass
/// * `duration` - Time taken by the pass
pub fn record_iteration(status: &str, duration: Duration) {
    ITERATIONS_TOTAL.with_label_values(&[status]).inc();
    ITERATION_DURATION_SECONDS
        .with_label_values(&[status])
        .observe(duration.as_secs_f64());
}

/// Record how many services the selector matched
#[allow(clippy::cast_precision_loss)]
pub fn set_services_discovered(count: usize) {
    SERVICES_DISCOVERED.set(count as f64);
}

/// Record a skipped service
///
/// # Arguments
/// * `reason` - Why the service was skipped
pub fn record_service_skipped(reason: &str) {
    SERVICES_SKIPPED_TOTAL.with_label_values(&[reason]).inc();
}

/// Record an alias upsert
///
/// # Arguments
/// * `outcome` - `submitted` or `dry_run`
pub fn record_upsert(outcome: &str) {
    RECORD_UPSERTS_TOTAL.with_label_values(&[outcome]).inc();
}

/// Record a per-domain error
///
/// # Arguments
/// * `error_type` - Category of error
pub fn record_error(error_type: &str) {
    ERRORS_TOTAL.with_label_values(&[error_type]).inc();
}

/// Record a forced credential refresh
pub fn record_credential_refresh() {
    CREDENTIAL_REFRESHES_TOTAL.inc();
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}

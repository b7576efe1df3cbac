// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the route53-sync controller.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Reconciliation Loop Constants
// ============================================================================

/// Default polling interval between reconciliation passes (30 seconds)
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Page size used when listing Kubernetes services
pub const KUBE_LIST_PAGE_SIZE: u32 = 100;

// ============================================================================
// Route53 Constants
// ============================================================================

/// Record type written for every alias record
pub const ALIAS_RECORD_TYPE: &str = "A";

/// Comment attached to every submitted change batch
pub const CHANGE_BATCH_COMMENT: &str = "Kubernetes Update to Service";

/// Upper bound on `ListHostedZonesByName` pages fetched for a single domain
pub const MAX_ZONE_PAGES: usize = 10;

// ============================================================================
// Load Balancer Constants
// ============================================================================

/// Leading hostname segment AWS uses for internally-scoped load balancers
pub const INTERNAL_LB_PREFIX: &str = "internal";

/// Separator between the load balancer name and its generated suffix
pub const LB_HOSTNAME_SEPARATOR: char = '-';

// ============================================================================
// Environment Constants
// ============================================================================

/// Environment variable whose non-empty presence enables dry-run mode
pub const DRY_RUN_ENV: &str = "DRY_RUN";

/// Environment variable selecting log output format (`text` or `json`)
pub const LOG_FORMAT_ENV: &str = "RUST_LOG_FORMAT";

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 2;

/// Thread name for Tokio runtime workers
pub const TOKIO_THREAD_NAME: &str = "route53-sync";

// ============================================================================
// Metrics Server Constants
// ============================================================================

/// Port for Prometheus metrics HTTP server
pub const METRICS_SERVER_PORT: u16 = 8080;

/// Path for Prometheus metrics endpoint
pub const METRICS_SERVER_PATH: &str = "/metrics";

/// Bind address for metrics HTTP server
pub const METRICS_SERVER_BIND_ADDRESS: &str = "0.0.0.0";

// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Runtime configuration.
//!
//! Every setting is a command-line flag with an environment variable fallback.
//! [`Cli`] is converted into a plain [`SyncConfig`] before it reaches the
//! reconciliation loop, so the loop never depends on clap.

use crate::constants::{
    DEFAULT_POLL_INTERVAL_SECS, DRY_RUN_ENV, METRICS_SERVER_BIND_ADDRESS, METRICS_SERVER_PORT,
};
use crate::labels::{default_selector, DOMAIN_NAME_ANNOTATION};
use clap::Parser;
use std::time::Duration;

/// Command-line interface for the route53-sync controller.
#[derive(Parser, Debug, Clone)]
#[command(name = "route53-sync")]
#[command(about = "Keeps Route53 alias records pointed at Kubernetes LoadBalancer services")]
#[command(version)]
pub struct Cli {
    /// Label selector for services managed by this controller
    #[arg(long, env = "SERVICE_SELECTOR", default_value_t = default_selector())]
    pub selector: String,

    /// Service annotation holding the comma-separated domain list
    #[arg(long, env = "DOMAIN_ANNOTATION", default_value = DOMAIN_NAME_ANNOTATION)]
    pub domain_annotation: String,

    /// Seconds between reconciliation passes
    #[arg(
        long,
        env = "POLL_INTERVAL_SECS",
        default_value_t = DEFAULT_POLL_INTERVAL_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub poll_interval_secs: u64,

    /// AWS region; discovered from EC2 instance metadata when unset
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Log intended Route53 changes instead of submitting them (any non-empty value enables)
    #[arg(
        long,
        env = DRY_RUN_ENV,
        num_args = 0..=1,
        default_missing_value = "true",
        hide_env_values = true
    )]
    pub dry_run: Option<String>,

    /// Address the Prometheus metrics server listens on
    #[arg(long, env = "METRICS_BIND_ADDRESS", default_value_t = default_metrics_address())]
    pub metrics_address: String,
}

fn default_metrics_address() -> String {
    format!("{METRICS_SERVER_BIND_ADDRESS}:{METRICS_SERVER_PORT}")
}

/// Whether a dry-run setting enables dry-run mode: present and non-empty.
#[must_use]
pub fn dry_run_enabled(value: Option<&str>) -> bool {
    value.is_some_and(|value| !value.is_empty())
}

impl Cli {
    /// Build the reconciliation loop configuration.
    #[must_use]
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            selector: self.selector.clone(),
            domain_annotation: self.domain_annotation.clone(),
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            dry_run: dry_run_enabled(self.dry_run.as_deref()),
        }
    }
}

/// Configuration consumed by the reconciliation loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncConfig {
    /// Label selector for services
    pub selector: String,
    /// Annotation holding the domain list
    pub domain_annotation: String,
    /// Time between passes
    pub poll_interval: Duration,
    /// Log changes instead of submitting them
    pub dry_run: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            selector: default_selector(),
            domain_annotation: DOMAIN_NAME_ANNOTATION.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            dry_run: false,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;

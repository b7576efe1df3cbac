// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Fixed-interval polling loop.
//!
//! Runs one reconciliation pass per tick until `shutdown` resolves. Passes
//! never overlap: a pass that outlasts the interval delays the next tick
//! instead of queueing a burst of catch-up passes.

use crate::cloud::CloudSession;
use crate::reconcilers::service_sync::ServiceSyncer;
use crate::services::ServiceSource;
use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// Run passes of `syncer` every `interval` until `shutdown` completes.
///
/// The first pass runs immediately. Shutdown is only observed between passes;
/// a pass in flight is allowed to finish.
///
/// # Errors
///
/// Returns an error when services cannot be listed. Per-domain failures are
/// handled inside the pass and never end the loop.
pub async fn run_sync_loop<S, C, F>(
    syncer: &mut ServiceSyncer<S, C>,
    interval: Duration,
    shutdown: F,
) -> Result<()>
where
    S: ServiceSource,
    C: CloudSession,
    F: Future<Output = ()>,
{
    info!(
        interval_secs = interval.as_secs(),
        dry_run = syncer.config().dry_run,
        "Starting Service Polling every {}s",
        interval.as_secs()
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            () = &mut shutdown => {
                info!("Shutdown requested, stopping service polling");
                return Ok(());
            }
            _ = ticker.tick() => {
                if let Err(e) = syncer.run_iteration().await {
                    error!("CRITICAL: {}", e);
                    return Err(e.into());
                }
            }
        }
    }
}

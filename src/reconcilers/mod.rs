// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reconciliation of DNS-managed services against Route53.
//!
//! # Reconciliation Architecture
//!
//! Unlike a watch-driven controller, route53-sync polls:
//!
//! 1. **List** - Fetch every service matching the label selector
//! 2. **Resolve** - Map each service's ingress hostname to its load balancer
//! 3. **Match** - Find the most specific hosted zone for each requested domain
//! 4. **Upsert** - Point an alias record at the load balancer
//!
//! Passes run on a fixed interval. A failed cloud call in one pass forces a
//! credential refresh at the start of the next.
//!
//! # Example
//!
//! ```rust,no_run
//! use route53_sync::aws::AwsSession;
//! use route53_sync::config::SyncConfig;
//! use route53_sync::reconcilers::{run_sync_loop, ServiceSyncer};
//! use route53_sync::services::KubeServiceSource;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = kube::Client::try_default().await?;
//! let cloud = AwsSession::connect(Some("us-east-1".to_string())).await?;
//! let config = SyncConfig::default();
//! let interval = config.poll_interval;
//!
//! let mut syncer = ServiceSyncer::new(KubeServiceSource::new(client), cloud, config);
//! run_sync_loop(&mut syncer, interval, async {
//!     let _ = tokio::signal::ctrl_c().await;
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod pagination;
pub mod scheduler;
pub mod service_sync;

pub use scheduler::run_sync_loop;
pub use service_sync::{sync_domain, sync_services, DomainOutcome, IterationReport, ServiceSyncer};

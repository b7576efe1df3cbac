// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! One reconciliation pass over the DNS-managed services.
//!
//! For every service matched by the selector, every requested domain is
//! pointed at the service's load balancer with an alias `UPSERT`:
//!
//! 1. Resolve the load balancer from the ingress hostname
//! 2. Find the most specific hosted zone for the domain
//! 3. Submit (or, in dry-run mode, log) the alias change
//!
//! Failures are isolated: a broken service or domain is logged and the pass
//! moves on. Any failed cloud call marks the pass so that the next pass
//! refreshes the cloud credentials before doing anything else.

use crate::cloud::CloudSession;
use crate::config::SyncConfig;
use crate::dns_errors::{ClusterError, DomainError, ServiceError};
use crate::load_balancer::resolve_load_balancer;
use crate::metrics;
use crate::services::{service_key, service_target, ServiceSource, ServiceTarget};
use crate::upsert::{upsert_alias_record, AliasChange, UpsertOutcome};
use crate::zones::find_destination_zone;
use k8s_openapi::api::core::v1::Service;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Result of reconciling one domain of one service.
#[derive(Debug)]
pub struct DomainOutcome {
    /// `namespace/name` of the owning service
    pub service: String,
    /// Domain as written in the annotation
    pub domain: String,
    /// What happened to the alias record
    pub result: Result<UpsertOutcome, DomainError>,
}

/// Summary of one reconciliation pass.
#[derive(Debug, Default)]
pub struct IterationReport {
    /// Services returned by the selector
    pub services_found: usize,
    /// Services skipped before any cloud call was made
    pub skipped: Vec<ServiceError>,
    /// Per-domain results, in service then annotation order
    pub domains: Vec<DomainOutcome>,
    /// Whether any cloud call failed during the pass
    pub cloud_call_failed: bool,
}

impl IterationReport {
    /// Number of domains whose alias record was submitted or logged.
    #[must_use]
    pub fn upserted(&self) -> usize {
        self.domains.iter().filter(|d| d.result.is_ok()).count()
    }

    /// Number of domains that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.domains.iter().filter(|d| d.result.is_err()).count()
    }

    /// Metrics label for the pass.
    #[must_use]
    pub fn status(&self) -> &'static str {
        if self.cloud_call_failed {
            "partial_failure"
        } else {
            "success"
        }
    }
}

/// Reconcile `services` against the cloud once.
///
/// Never fails as a whole: every problem is recorded in the returned report.
pub async fn sync_services<C>(cloud: &C, services: &[Service], config: &SyncConfig) -> IterationReport
where
    C: CloudSession + ?Sized,
{
    let mut report = IterationReport {
        services_found: services.len(),
        ..IterationReport::default()
    };

    for service in services {
        let target = match service_target(service, &config.domain_annotation) {
            Ok(target) => target,
            Err(e) => {
                warn!(service = %service_key(service), reason = e.skip_reason(), "warning! {}", e);
                metrics::record_service_skipped(e.skip_reason());
                report.skipped.push(e);
                continue;
            }
        };

        for domain in &target.domains {
            info!(
                service = %target.service,
                hostname = %target.hostname,
                domain = %domain,
                "Creating DNS for {} service: {} -> {}",
                target.service,
                target.hostname,
                domain
            );

            let result = sync_domain(cloud, &target, domain, config.dry_run).await;
            match &result {
                Ok(outcome) => {
                    metrics::record_upsert(outcome.as_str());
                }
                Err(e) => {
                    warn!(
                        service = %target.service,
                        domain = %domain,
                        hostname = %target.hostname,
                        error_type = e.error_type(),
                        "warning! {}",
                        e
                    );
                    metrics::record_error(e.error_type());
                    report.cloud_call_failed = true;
                }
            }

            report.domains.push(DomainOutcome {
                service: target.service.clone(),
                domain: domain.clone(),
                result,
            });
        }
    }

    report
}

/// Point one domain of `target` at its load balancer.
///
/// # Errors
///
/// Returns the first failing step: load balancer lookup, zone lookup, or upsert.
pub async fn sync_domain<C>(
    cloud: &C,
    target: &ServiceTarget,
    domain: &str,
    dry_run: bool,
) -> Result<UpsertOutcome, DomainError>
where
    C: CloudSession + ?Sized,
{
    let load_balancer = resolve_load_balancer(cloud, &target.hostname).await?;
    debug!(
        load_balancer = %load_balancer.name,
        hosted_zone_id = %load_balancer.hosted_zone_id,
        "Resolved load balancer"
    );

    let zone = find_destination_zone(cloud, domain).await?;
    debug!(zone = %zone.name, zone_id = %zone.id, "Found destination zone");

    let change = AliasChange::new(
        target.hostname.as_str(),
        load_balancer.hosted_zone_id,
        domain,
        zone.short_id(),
    );
    let outcome = upsert_alias_record(cloud, &change, dry_run).await?;

    info!(
        domain = %domain,
        zone_id = %change.zone_id,
        outcome = outcome.as_str(),
        "Created dns record set: domain={}, zoneID={}",
        domain,
        change.zone_id
    );
    Ok(outcome)
}

/// Drives reconciliation passes and carries the credential refresh flag
/// between them.
pub struct ServiceSyncer<S, C> {
    services: S,
    cloud: C,
    config: SyncConfig,
    refresh_credentials: bool,
}

impl<S, C> ServiceSyncer<S, C>
where
    S: ServiceSource,
    C: CloudSession,
{
    /// Create a syncer. The first pass never refreshes credentials.
    pub fn new(services: S, cloud: C, config: SyncConfig) -> Self {
        Self {
            services,
            cloud,
            config,
            refresh_credentials: false,
        }
    }

    /// Configuration of this syncer.
    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// The service source.
    #[must_use]
    pub fn services(&self) -> &S {
        &self.services
    }

    /// The cloud session.
    #[must_use]
    pub fn cloud(&self) -> &C {
        &self.cloud
    }

    /// Whether the next pass will refresh credentials first.
    #[must_use]
    pub fn refresh_pending(&self) -> bool {
        self.refresh_credentials
    }

    /// Run one reconciliation pass.
    ///
    /// If the previous pass had a failed cloud call, credentials are refreshed
    /// before anything else. The outcome of this pass decides whether the next
    /// one refreshes.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::ServiceListFailed`] if services cannot be listed.
    /// The loop cannot make progress without the cluster, so this is fatal.
    pub async fn run_iteration(&mut self) -> Result<IterationReport, ClusterError> {
        let start = Instant::now();

        if self.refresh_credentials {
            info!(
                region = %self.cloud.region(),
                "Noticed failed calls to AWS services, refreshing creds"
            );
            self.cloud.refresh_credentials().await;
            metrics::record_credential_refresh();
            self.refresh_credentials = false;
        }

        let services = match self.services.list_services(&self.config.selector).await {
            Ok(services) => services,
            Err(source) => {
                metrics::record_iteration("fatal", start.elapsed());
                return Err(ClusterError::ServiceListFailed {
                    selector: self.config.selector.clone(),
                    source,
                });
            }
        };

        info!(
            count = services.len(),
            selector = %self.config.selector,
            "Found {} DNS services in all namespaces with selector {:?}",
            services.len(),
            self.config.selector
        );
        metrics::set_services_discovered(services.len());

        let report = sync_services(&self.cloud, &services, &self.config).await;
        self.refresh_credentials = report.cloud_call_failed;

        info!(
            services = report.services_found,
            skipped = report.skipped.len(),
            upserted = report.upserted(),
            failed = report.failed(),
            dry_run = self.config.dry_run,
            "Reconciliation pass complete"
        );
        metrics::record_iteration(report.status(), start.elapsed());

        Ok(report)
    }
}

#[cfg(test)]
#[path = "service_sync_tests.rs"]
mod service_sync_tests;

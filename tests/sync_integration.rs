// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reconciliation loop tests against in-memory fakes.
//!
//! These cover the pass end to end (service listing through alias upsert),
//! the credential refresh policy across passes, and the polling schedule.
//!
//! Run with: cargo test --test sync_integration

mod common;

use common::{dns_service, FakeCloud, FakeServices};
use route53_sync::config::SyncConfig;
use route53_sync::dns_errors::{ClusterError, DomainError, ServiceError};
use route53_sync::reconcilers::{run_sync_loop, ServiceSyncer};
use route53_sync::upsert::UpsertOutcome;
use std::sync::atomic::Ordering;
use std::time::Duration;

const ELB_HOSTNAME: &str = "myelb-1234567890.us-east-1.elb.amazonaws.com";
const ELB_ZONE_ID: &str = "Z35SXDOTRQ7X7K";

fn example_cloud() -> FakeCloud {
    FakeCloud::new()
        .with_load_balancer("myelb", ELB_HOSTNAME, ELB_ZONE_ID)
        .with_zone("/hostedzone/ZEXAMPLE", "example.com.")
        .with_zone("/hostedzone/ZSTAGING", "staging.example.com.")
}

#[tokio::test]
async fn test_pass_upserts_alias_for_each_domain() {
    let services = FakeServices::new(vec![dns_service(
        "default",
        "web",
        &[ELB_HOSTNAME],
        Some("app.example.com, api.staging.example.com"),
    )]);
    let mut syncer = ServiceSyncer::new(services, example_cloud(), SyncConfig::default());

    let report = syncer.run_iteration().await.expect("pass should complete");

    assert_eq!(report.services_found, 1);
    assert_eq!(report.upserted(), 2);
    assert!(!report.cloud_call_failed);

    let cloud = syncer.cloud();
    let app = cloud
        .record("ZEXAMPLE", "app.example.com")
        .expect("app.example.com should be upserted into the apex zone");
    assert_eq!(app.alias_dns_name, ELB_HOSTNAME);
    assert_eq!(app.alias_hosted_zone_id, ELB_ZONE_ID);

    assert!(
        cloud.record("ZSTAGING", "api.staging.example.com").is_some(),
        "the most specific zone should win"
    );
    assert!(cloud.record("ZEXAMPLE", "api.staging.example.com").is_none());
}

#[tokio::test]
async fn test_repeated_passes_are_idempotent() {
    let services = FakeServices::new(vec![dns_service(
        "default",
        "web",
        &[ELB_HOSTNAME],
        Some("app.example.com"),
    )]);
    let mut syncer = ServiceSyncer::new(services, example_cloud(), SyncConfig::default());

    syncer.run_iteration().await.expect("first pass");
    syncer.run_iteration().await.expect("second pass");

    let cloud = syncer.cloud();
    assert_eq!(cloud.submitted().len(), 2, "UPSERT is resubmitted every pass");
    assert_eq!(cloud.state.lock().unwrap().records.len(), 1);
}

#[tokio::test]
async fn test_internal_load_balancer_resolves_second_segment() {
    let services = FakeServices::new(vec![dns_service(
        "default",
        "internal-web",
        &["internal-myelb-1234567890.us-east-1.elb.amazonaws.com"],
        Some("app.example.com"),
    )]);
    let mut syncer = ServiceSyncer::new(services, example_cloud(), SyncConfig::default());

    let report = syncer.run_iteration().await.expect("pass should complete");

    assert_eq!(report.upserted(), 1);
    assert_eq!(
        syncer.cloud().state.lock().unwrap().described,
        vec!["myelb".to_string()]
    );
}

#[tokio::test]
async fn test_misconfigured_services_do_not_block_others() {
    let services = FakeServices::new(vec![
        dns_service("default", "pending", &[], Some("pending.example.com")),
        dns_service(
            "default",
            "dual",
            &[ELB_HOSTNAME, "other-1.us-east-1.elb.amazonaws.com"],
            Some("dual.example.com"),
        ),
        dns_service("default", "web", &[ELB_HOSTNAME], Some("app.example.com")),
    ]);
    let mut syncer = ServiceSyncer::new(services, example_cloud(), SyncConfig::default());

    let report = syncer.run_iteration().await.expect("pass should complete");

    assert_eq!(report.skipped.len(), 2);
    assert!(matches!(report.skipped[0], ServiceError::NoIngress { .. }));
    assert!(matches!(report.skipped[1], ServiceError::MultipleIngress { .. }));
    assert_eq!(report.upserted(), 1);
    assert!(!report.cloud_call_failed);
    assert!(!syncer.refresh_pending());
}

#[tokio::test]
async fn test_domain_failure_does_not_stop_remaining_domains() {
    let services = FakeServices::new(vec![dns_service(
        "default",
        "web",
        &[ELB_HOSTNAME],
        Some("example.com,app.example.org,app.example.com"),
    )]);
    let mut syncer = ServiceSyncer::new(services, example_cloud(), SyncConfig::default());

    let report = syncer.run_iteration().await.expect("pass should complete");

    assert_eq!(report.domains.len(), 3);
    assert!(matches!(
        report.domains[0].result,
        Err(DomainError::InvalidDomain { .. })
    ));
    assert!(report.domains[1].result.is_err(), "no example.org zone exists");
    assert!(matches!(
        report.domains[2].result,
        Ok(UpsertOutcome::Submitted)
    ));
    assert!(report.cloud_call_failed);
    assert!(syncer.refresh_pending());
}

#[tokio::test]
async fn test_dry_run_never_submits() {
    let services = FakeServices::new(vec![dns_service(
        "default",
        "web",
        &[ELB_HOSTNAME],
        Some("app.example.com"),
    )]);
    let config = SyncConfig {
        dry_run: true,
        ..SyncConfig::default()
    };
    let mut syncer = ServiceSyncer::new(services, example_cloud(), config);

    let report = syncer.run_iteration().await.expect("pass should complete");

    assert!(matches!(report.domains[0].result, Ok(UpsertOutcome::DryRun)));
    assert!(syncer.cloud().submitted().is_empty());
}

#[tokio::test]
async fn test_failed_pass_refreshes_credentials_once() {
    let services = FakeServices::new(vec![dns_service(
        "default",
        "web",
        &[ELB_HOSTNAME],
        Some("app.example.com"),
    )]);
    let mut syncer = ServiceSyncer::new(services, example_cloud().expired(), SyncConfig::default());

    let first = syncer.run_iteration().await.expect("first pass");
    assert!(first.cloud_call_failed);
    assert_eq!(syncer.cloud().refreshes(), 0, "the failing pass itself never refreshes");

    let second = syncer.run_iteration().await.expect("second pass");
    assert_eq!(syncer.cloud().refreshes(), 1);
    assert!(!second.cloud_call_failed);
    assert_eq!(second.upserted(), 1);

    syncer.run_iteration().await.expect("third pass");
    assert_eq!(syncer.cloud().refreshes(), 1, "a clean pass clears the refresh");
}

#[tokio::test]
async fn test_service_listing_failure_is_fatal() {
    let mut syncer = ServiceSyncer::new(
        FakeServices::failing(),
        example_cloud(),
        SyncConfig::default(),
    );

    let err = syncer
        .run_iteration()
        .await
        .expect_err("listing failure should end the pass");

    assert!(matches!(err, ClusterError::ServiceListFailed { .. }));
    assert!(err.to_string().contains("dns=route53"));
}

#[tokio::test(start_paused = true)]
async fn test_loop_runs_one_pass_per_interval_until_shutdown() {
    let services = FakeServices::new(vec![dns_service(
        "default",
        "web",
        &[ELB_HOSTNAME],
        Some("app.example.com"),
    )]);
    let mut syncer = ServiceSyncer::new(services, example_cloud(), SyncConfig::default());

    run_sync_loop(
        &mut syncer,
        Duration::from_secs(30),
        tokio::time::sleep(Duration::from_secs(65)),
    )
    .await
    .expect("loop should stop cleanly on shutdown");

    // Passes at 0s, 30s and 60s
    assert_eq!(syncer.cloud().submitted().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_loop_stops_on_listing_failure() {
    let mut syncer = ServiceSyncer::new(
        FakeServices::failing(),
        example_cloud(),
        SyncConfig::default(),
    );

    let result = run_sync_loop(
        &mut syncer,
        Duration::from_secs(30),
        tokio::time::sleep(Duration::from_secs(3600)),
    )
    .await;

    assert!(result.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_loop_lists_services_each_pass() {
    let mut syncer = ServiceSyncer::new(FakeServices::default(), FakeCloud::new(), SyncConfig::default());

    run_sync_loop(
        &mut syncer,
        Duration::from_secs(10),
        tokio::time::sleep(Duration::from_secs(25)),
    )
    .await
    .expect("loop should stop cleanly on shutdown");

    assert_eq!(syncer.services().list_calls.load(Ordering::SeqCst), 3);
}

// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

// Common test utilities for integration tests

#![allow(dead_code)]

use anyhow::anyhow;
use k8s_openapi::api::core::v1::{
    LoadBalancerIngress, LoadBalancerStatus, Service, ServiceStatus,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::client::Client;
use route53_sync::cloud::{
    CloudSession, HostedZoneApi, HostedZonePage, LoadBalancerApi, LoadBalancerDescription,
    ZonePageToken,
};
use route53_sync::dns_errors::CloudApiError;
use route53_sync::services::ServiceSource;
use route53_sync::upsert::AliasChange;
use route53_sync::zones::HostedZone;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Get a Kubernetes client or skip the test if not in a cluster
pub async fn get_kube_client_or_skip() -> Option<Client> {
    match Client::try_default().await {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("Skipping integration test: not running in Kubernetes cluster: {e}");
            None
        }
    }
}

/// Build a service with the given ingress hostnames and domain annotation
pub fn dns_service(namespace: &str, name: &str, hostnames: &[&str], domains: Option<&str>) -> Service {
    let mut labels = BTreeMap::new();
    labels.insert("dns".to_string(), "route53".to_string());

    let annotations = domains.map(|domains| {
        let mut annotations = BTreeMap::new();
        annotations.insert("domainName".to_string(), domains.to_string());
        annotations
    });

    let ingress = hostnames
        .iter()
        .map(|hostname| LoadBalancerIngress {
            hostname: Some((*hostname).to_string()),
            ..Default::default()
        })
        .collect();

    Service {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(labels),
            annotations,
            ..Default::default()
        },
        status: Some(ServiceStatus {
            load_balancer: Some(LoadBalancerStatus {
                ingress: Some(ingress),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

// ============================================================================
// Fake service source
// ============================================================================

/// In-memory service listing that can be switched into a failing state
#[derive(Default)]
pub struct FakeServices {
    pub services: Vec<Service>,
    pub failing: AtomicBool,
    pub list_calls: AtomicUsize,
}

impl FakeServices {
    pub fn new(services: Vec<Service>) -> Self {
        Self {
            services,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        let source = Self::default();
        source.failing.store(true, Ordering::SeqCst);
        source
    }
}

#[async_trait::async_trait]
impl ServiceSource for FakeServices {
    async fn list_services(&self, _selector: &str) -> anyhow::Result<Vec<Service>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow!("connection refused"));
        }
        Ok(self.services.clone())
    }
}

// ============================================================================
// Fake cloud
// ============================================================================

/// Mutable state recorded by [`FakeCloud`]
#[derive(Default)]
pub struct FakeCloudState {
    /// Current alias records keyed by (zone id, record name)
    pub records: BTreeMap<(String, String), AliasChange>,
    /// Every change submitted, in order
    pub submitted: Vec<AliasChange>,
    /// Load balancer names looked up, in order
    pub described: Vec<String>,
    /// Number of credential refreshes
    pub refreshes: usize,
    /// While set, every call fails as if credentials had expired
    pub expired: bool,
}

/// In-memory cloud with classic load balancers and hosted zones
#[derive(Default)]
pub struct FakeCloud {
    pub load_balancers: BTreeMap<String, Vec<LoadBalancerDescription>>,
    pub zones: Vec<HostedZone>,
    pub state: Mutex<FakeCloudState>,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a load balancer by logical name
    pub fn with_load_balancer(mut self, name: &str, dns_name: &str, hosted_zone_id: &str) -> Self {
        self.load_balancers
            .entry(name.to_string())
            .or_default()
            .push(LoadBalancerDescription {
                name: name.to_string(),
                dns_name: Some(dns_name.to_string()),
                canonical_hosted_zone_id: Some(hosted_zone_id.to_string()),
            });
        self
    }

    /// Register a hosted zone
    pub fn with_zone(mut self, id: &str, name: &str) -> Self {
        self.zones.push(HostedZone::new(id, name));
        self.zones.sort_by(|a, b| a.name.cmp(&b.name));
        self
    }

    /// Start with expired credentials
    pub fn expired(self) -> Self {
        self.state.lock().unwrap().expired = true;
        self
    }

    pub fn refreshes(&self) -> usize {
        self.state.lock().unwrap().refreshes
    }

    pub fn submitted(&self) -> Vec<AliasChange> {
        self.state.lock().unwrap().submitted.clone()
    }

    pub fn record(&self, zone_id: &str, name: &str) -> Option<AliasChange> {
        self.state
            .lock()
            .unwrap()
            .records
            .get(&(zone_id.to_string(), name.to_string()))
            .cloned()
    }

    pub fn set_expired(&self, expired: bool) {
        self.state.lock().unwrap().expired = expired;
    }

    fn check_credentials(&self, operation: &'static str) -> Result<(), CloudApiError> {
        if self.state.lock().unwrap().expired {
            return Err(CloudApiError::new(
                operation,
                "ExpiredToken: The security token included in the request is expired",
            ));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl LoadBalancerApi for FakeCloud {
    async fn describe_load_balancers(
        &self,
        name: &str,
    ) -> Result<Vec<LoadBalancerDescription>, CloudApiError> {
        self.state.lock().unwrap().described.push(name.to_string());
        self.check_credentials("DescribeLoadBalancers")?;
        Ok(self.load_balancers.get(name).cloned().unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl HostedZoneApi for FakeCloud {
    async fn list_hosted_zones_by_name(
        &self,
        dns_name: &str,
        _page: Option<&ZonePageToken>,
    ) -> Result<HostedZonePage, CloudApiError> {
        self.check_credentials("ListHostedZonesByName")?;
        let start = format!("{dns_name}.");
        Ok(HostedZonePage {
            zones: self
                .zones
                .iter()
                .filter(|zone| zone.name >= start)
                .cloned()
                .collect(),
            next: None,
        })
    }

    async fn upsert_alias(&self, change: &AliasChange) -> Result<(), CloudApiError> {
        self.check_credentials("ChangeResourceRecordSets")?;
        let mut state = self.state.lock().unwrap();
        state.submitted.push(change.clone());
        state.records.insert(
            (change.zone_id.clone(), change.record_name.clone()),
            change.clone(),
        );
        Ok(())
    }
}

#[async_trait::async_trait]
impl CloudSession for FakeCloud {
    fn region(&self) -> &str {
        "us-east-1"
    }

    async fn refresh_credentials(&mut self) {
        let state = self.state.get_mut().unwrap();
        state.refreshes += 1;
        state.expired = false;
    }
}

// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Service discovery.
//!
//! Lists the Kubernetes services tagged for DNS management and extracts the
//! two things the reconciliation loop needs from each: its single load
//! balancer ingress hostname and the domains requested in its annotation.

use crate::dns_errors::ServiceError;
use crate::domain::parse_domain_list;
use crate::reconcilers::pagination::list_all_paginated;
use anyhow::Result;
use k8s_openapi::api::core::v1::Service;
use kube::api::ListParams;
use kube::{Api, Client, ResourceExt};
use tracing::debug;

/// Lists services by label selector.
#[async_trait::async_trait]
pub trait ServiceSource: Send + Sync {
    /// List services in all namespaces matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cluster API cannot be queried.
    async fn list_services(&self, selector: &str) -> Result<Vec<Service>>;
}

/// [`ServiceSource`] backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeServiceSource {
    client: Client,
}

impl KubeServiceSource {
    /// Create a source using `client`.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ServiceSource for KubeServiceSource {
    async fn list_services(&self, selector: &str) -> Result<Vec<Service>> {
        let api: Api<Service> = Api::all(self.client.clone());
        debug!(selector = %selector, "Listing services in all namespaces");
        list_all_paginated(&api, ListParams::default().labels(selector)).await
    }
}

/// Everything the loop needs from a service to manage its DNS.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceTarget {
    /// `namespace/name` of the service
    pub service: String,
    /// The single ingress hostname of the service's load balancer
    pub hostname: String,
    /// Requested domains, in annotation order
    pub domains: Vec<String>,
}

/// `namespace/name` of a service, used in logs and errors.
#[must_use]
pub fn service_key(service: &Service) -> String {
    format!(
        "{}/{}",
        service.namespace().unwrap_or_default(),
        service.name_any()
    )
}

/// Return the service's single load balancer ingress hostname.
///
/// # Errors
///
/// - [`ServiceError::NoIngress`] if there is no ingress entry
/// - [`ServiceError::MultipleIngress`] if there is more than one
/// - [`ServiceError::MissingHostname`] if the entry has no hostname
pub fn service_hostname(service: &Service) -> Result<String, ServiceError> {
    let ingress = service
        .status
        .as_ref()
        .and_then(|status| status.load_balancer.as_ref())
        .and_then(|lb| lb.ingress.as_deref())
        .unwrap_or_default();

    match ingress {
        [] => Err(ServiceError::NoIngress {
            service: service_key(service),
        }),
        [single] => single
            .hostname
            .clone()
            .filter(|hostname| !hostname.is_empty())
            .ok_or_else(|| ServiceError::MissingHostname {
                service: service_key(service),
            }),
        many => Err(ServiceError::MultipleIngress {
            service: service_key(service),
            count: many.len(),
        }),
    }
}

/// Extract the hostname and requested domains from `service`.
///
/// # Errors
///
/// Returns the errors of [`service_hostname`],
/// [`ServiceError::MissingDomainAnnotation`] if `annotation` is not set, or
/// [`ServiceError::EmptyDomainList`] if it names no domains.
pub fn service_target(service: &Service, annotation: &str) -> Result<ServiceTarget, ServiceError> {
    let hostname = service_hostname(service)?;
    let domains = service
        .annotations()
        .get(annotation)
        .map(|value| parse_domain_list(value))
        .ok_or_else(|| ServiceError::MissingDomainAnnotation {
            service: service_key(service),
            annotation: annotation.to_string(),
        })?;
    if domains.is_empty() {
        return Err(ServiceError::EmptyDomainList {
            service: service_key(service),
            annotation: annotation.to_string(),
        });
    }

    Ok(ServiceTarget {
        service: service_key(service),
        hostname,
        domains,
    })
}

#[cfg(test)]
#[path = "services_tests.rs"]
mod services_tests;

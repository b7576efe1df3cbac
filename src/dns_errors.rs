// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for service discovery and Route53 alias synchronization.
//!
//! This module provides specialized error types for:
//! - Raw AWS API failures (load balancer and Route53 calls)
//! - Per-domain failures while resolving a load balancer, matching a hosted
//!   zone, or upserting an alias record
//! - Per-service skips caused by service misconfiguration
//! - Fatal cluster errors that stop the reconciliation loop
//!
//! Per-domain and per-service errors are recovered inside a reconciliation
//! pass. Only [`ClusterError`] escapes the loop.

use thiserror::Error;

/// A failed call to an AWS API.
///
/// Carries the operation name and the flattened SDK error message so that the
/// per-domain errors can wrap it without depending on SDK types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{operation} failed: {message}")]
pub struct CloudApiError {
    /// AWS operation that failed (e.g., `DescribeLoadBalancers`)
    pub operation: &'static str,
    /// Error message reported by the SDK
    pub message: String,
}

impl CloudApiError {
    /// Create a new API error for the given operation.
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// Errors that can occur while synchronizing a single (service, domain) pair.
///
/// Every variant is recovered locally by the reconciliation loop: the error is
/// logged, the pass moves on to the next domain, and the next pass refreshes
/// cloud credentials before doing anything else.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Domain does not have at least one label beyond a two-label root
    #[error(
        "Domain {domain} is invalid - it should be a fully qualified domain name and subdomain (i.e. test.example.com)"
    )]
    InvalidDomain {
        /// The domain as written in the service annotation
        domain: String,
    },

    /// The hosted zone listing returned no zones at all
    #[error("No zone found for {domain}")]
    NoZoneFound {
        /// The dot-terminated domain that was being matched
        domain: String,
    },

    /// Zones were returned but none of them is a suffix of the domain
    #[error("Zone found {zone} does not match domain given {domain}")]
    ZoneMismatch {
        /// Name of the first zone returned, for diagnostics
        zone: String,
        /// The dot-terminated domain that was being matched
        domain: String,
    },

    /// The hosted zone listing call itself failed
    #[error("No zone found for {tld}: {source}")]
    ZoneLookupFailed {
        /// The two-label root used as the listing query
        tld: String,
        /// Underlying API failure
        source: CloudApiError,
    },

    /// Ingress hostname does not look like an ELB hostname
    #[error("{hostname} is not a valid ELB hostname")]
    InvalidHostname {
        /// The ingress hostname
        hostname: String,
    },

    /// `DescribeLoadBalancers` failed or returned an unusable description
    #[error("Could not describe load balancer {name}: {source}")]
    LoadBalancerLookupFailed {
        /// Logical load balancer name derived from the hostname
        name: String,
        /// Underlying API failure
        source: CloudApiError,
    },

    /// `DescribeLoadBalancers` returned no descriptions
    #[error("No lb found for name {name}")]
    LoadBalancerNotFound {
        /// Logical load balancer name derived from the hostname
        name: String,
    },

    /// `DescribeLoadBalancers` returned more than one description
    #[error("Multiple lbs found for name {name} ({count} descriptions)")]
    AmbiguousLoadBalancer {
        /// Logical load balancer name derived from the hostname
        name: String,
        /// Number of descriptions returned
        count: usize,
    },

    /// `ChangeResourceRecordSets` failed
    #[error("Failed to update record set {domain} in zone {zone_id}: {source}")]
    DnsUpdateFailed {
        /// Record name being upserted
        domain: String,
        /// Destination hosted zone id
        zone_id: String,
        /// Underlying API failure
        source: CloudApiError,
    },
}

impl DomainError {
    /// Returns a stable error type label used for metrics and log fields.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidDomain { .. } => "InvalidDomain",
            Self::NoZoneFound { .. } => "NoZoneFound",
            Self::ZoneMismatch { .. } => "ZoneMismatch",
            Self::ZoneLookupFailed { .. } => "ZoneLookupFailed",
            Self::InvalidHostname { .. } => "InvalidHostname",
            Self::LoadBalancerLookupFailed { .. } => "LoadBalancerLookupFailed",
            Self::LoadBalancerNotFound { .. } => "LoadBalancerNotFound",
            Self::AmbiguousLoadBalancer { .. } => "AmbiguousLoadBalancer",
            Self::DnsUpdateFailed { .. } => "DNSUpdateFailed",
        }
    }
}

/// Reasons a service is skipped before any of its domains are processed.
///
/// These are service misconfigurations, not AWS or cluster outages, so they
/// never trigger a credential refresh.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The service has no load balancer ingress yet
    #[error("No ingress defined for ELB on service {service}")]
    NoIngress {
        /// `namespace/name` of the service
        service: String,
    },

    /// The service has more than one load balancer ingress
    #[error("Multiple ingress points found for ELB on service {service} ({count}), not supported")]
    MultipleIngress {
        /// `namespace/name` of the service
        service: String,
        /// Number of ingress entries
        count: usize,
    },

    /// The single ingress entry carries an IP but no hostname
    #[error("Ingress for service {service} has no hostname")]
    MissingHostname {
        /// `namespace/name` of the service
        service: String,
    },

    /// The domain list annotation is not set
    #[error("Domain name not set for service {service} (annotation '{annotation}')")]
    MissingDomainAnnotation {
        /// `namespace/name` of the service
        service: String,
        /// The annotation key that was expected
        annotation: String,
    },

    /// The domain list annotation is set but names no domains
    #[error("Domain list for service {service} is empty (annotation '{annotation}')")]
    EmptyDomainList {
        /// `namespace/name` of the service
        service: String,
        /// The annotation key that was read
        annotation: String,
    },
}

impl ServiceError {
    /// Returns a stable skip reason label used for metrics and log fields.
    #[must_use]
    pub fn skip_reason(&self) -> &'static str {
        match self {
            Self::NoIngress { .. } => "no_ingress",
            Self::MultipleIngress { .. } => "multiple_ingress",
            Self::MissingHostname { .. } => "missing_hostname",
            Self::MissingDomainAnnotation { .. } => "missing_annotation",
            Self::EmptyDomainList { .. } => "empty_domain_list",
        }
    }
}

/// Fatal errors that terminate the reconciliation loop.
#[derive(Error, Debug)]
pub enum ClusterError {
    /// Listing services from the Kubernetes API failed
    #[error("Failed to list services with selector '{selector}': {source}")]
    ServiceListFailed {
        /// The label selector used for the listing
        selector: String,
        /// Underlying Kubernetes client error
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(test)]
#[path = "dns_errors_tests.rs"]
mod dns_errors_tests;

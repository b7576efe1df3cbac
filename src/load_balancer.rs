// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Load balancer resolution.
//!
//! A classic ELB hostname embeds the load balancer name before a generated
//! suffix (`myelb-1234567.us-east-1.elb.amazonaws.com`). Internal load
//! balancers carry an extra leading `internal-` segment. The logical name is
//! looked up through [`LoadBalancerApi`] to find the hosted zone id that alias
//! records must reference.

use crate::cloud::LoadBalancerApi;
use crate::constants::{INTERNAL_LB_PREFIX, LB_HOSTNAME_SEPARATOR};
use crate::dns_errors::{CloudApiError, DomainError};
use tracing::debug;

/// A resolved load balancer: where an alias record should point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadBalancerTarget {
    /// Logical load balancer name
    pub name: String,
    /// Canonical hosted zone id of the load balancer
    pub hosted_zone_id: String,
    /// DNS name reported by the load balancer API, if any
    pub dns_name: Option<String>,
}

/// Derive the logical load balancer name from its public hostname.
///
/// # Example
///
/// ```rust
/// use route53_sync::load_balancer::load_balancer_name_from_hostname;
///
/// let name = load_balancer_name_from_hostname("internal-myelb-1234567.us-east-1.elb.amazonaws.com");
/// assert_eq!(name.unwrap(), "myelb");
/// ```
///
/// # Errors
///
/// Returns [`DomainError::InvalidHostname`] if the hostname has no `-` separator.
pub fn load_balancer_name_from_hostname(hostname: &str) -> Result<String, DomainError> {
    let segments: Vec<&str> = hostname.split(LB_HOSTNAME_SEPARATOR).collect();
    if segments.len() < 2 {
        return Err(DomainError::InvalidHostname {
            hostname: hostname.to_string(),
        });
    }

    let name = if segments[0] == INTERNAL_LB_PREFIX {
        segments[1]
    } else {
        segments[0]
    };
    Ok(name.to_string())
}

/// Resolve the load balancer behind `hostname`.
///
/// Exactly one description must match the derived name.
///
/// # Errors
///
/// - [`DomainError::InvalidHostname`] if no name can be derived
/// - [`DomainError::LoadBalancerLookupFailed`] if the API call fails or the
///   description has no canonical hosted zone id
/// - [`DomainError::LoadBalancerNotFound`] if nothing matches
/// - [`DomainError::AmbiguousLoadBalancer`] if more than one description matches
pub async fn resolve_load_balancer<A>(
    api: &A,
    hostname: &str,
) -> Result<LoadBalancerTarget, DomainError>
where
    A: LoadBalancerApi + ?Sized,
{
    let name = load_balancer_name_from_hostname(hostname)?;
    debug!(hostname = %hostname, load_balancer = %name, "Describing load balancer");

    let mut descriptions = api
        .describe_load_balancers(&name)
        .await
        .map_err(|source| DomainError::LoadBalancerLookupFailed {
            name: name.clone(),
            source,
        })?;

    match descriptions.len() {
        0 => Err(DomainError::LoadBalancerNotFound { name }),
        1 => {
            let description = descriptions.remove(0);
            let Some(hosted_zone_id) = description.canonical_hosted_zone_id else {
                return Err(DomainError::LoadBalancerLookupFailed {
                    source: CloudApiError::new(
                        "DescribeLoadBalancers",
                        "description has no canonical hosted zone id",
                    ),
                    name,
                });
            };
            Ok(LoadBalancerTarget {
                name,
                hosted_zone_id,
                dns_name: description.dns_name,
            })
        }
        count => Err(DomainError::AmbiguousLoadBalancer { name, count }),
    }
}

#[cfg(test)]
#[path = "load_balancer_tests.rs"]
mod load_balancer_tests;

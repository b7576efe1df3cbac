// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Narrow cloud capabilities consumed by the reconciliation loop.
//!
//! The loop never talks to an SDK directly. It is written against three small
//! traits so that tests can substitute in-memory fakes:
//!
//! - [`LoadBalancerApi`] - look up load balancers by logical name
//! - [`HostedZoneApi`] - list hosted zones and submit record changes
//! - [`CloudSession`] - region and credential lifecycle for the two above
//!
//! The AWS SDK implementation lives in [`crate::aws`].

use crate::dns_errors::CloudApiError;
use crate::upsert::AliasChange;
use crate::zones::HostedZone;

/// A load balancer description as returned by the load balancer API.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadBalancerDescription {
    /// Logical load balancer name
    pub name: String,
    /// Public DNS name of the load balancer
    pub dns_name: Option<String>,
    /// Hosted zone id that alias records must reference
    pub canonical_hosted_zone_id: Option<String>,
}

/// Continuation marker for the next page of a hosted zone listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZonePageToken {
    /// DNS name to resume listing from
    pub dns_name: String,
    /// Hosted zone id to resume listing from
    pub hosted_zone_id: String,
}

/// One page of a `ListHostedZonesByName` response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostedZonePage {
    /// Zones in this page, in provider order
    pub zones: Vec<HostedZone>,
    /// Present when the listing was truncated
    pub next: Option<ZonePageToken>,
}

/// Describes load balancers by logical name.
#[async_trait::async_trait]
pub trait LoadBalancerApi: Send + Sync {
    /// Return every description matching `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    async fn describe_load_balancers(
        &self,
        name: &str,
    ) -> Result<Vec<LoadBalancerDescription>, CloudApiError>;
}

/// Lists hosted zones and submits record changes.
#[async_trait::async_trait]
pub trait HostedZoneApi: Send + Sync {
    /// List hosted zones ordered by name, starting at `dns_name`.
    ///
    /// `page` continues a previous truncated listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    async fn list_hosted_zones_by_name(
        &self,
        dns_name: &str,
        page: Option<&ZonePageToken>,
    ) -> Result<HostedZonePage, CloudApiError>;

    /// Submit a single-change batch upserting `change`.
    ///
    /// # Errors
    ///
    /// Returns an error if the change batch cannot be built or the API call fails.
    async fn upsert_alias(&self, change: &AliasChange) -> Result<(), CloudApiError>;
}

/// A cloud session: both APIs plus region and credential lifecycle.
#[async_trait::async_trait]
pub trait CloudSession: LoadBalancerApi + HostedZoneApi {
    /// Region the session's clients are bound to.
    fn region(&self) -> &str;

    /// Drop any cached credentials so the next call resolves them again.
    async fn refresh_credentials(&mut self);
}

// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Hosted zone selection.
//!
//! Route53 zones are hierarchical and `ListHostedZonesByName` returns every
//! zone near the queried root. The destination for a record is always the
//! deepest zone whose name is a suffix of the full domain, so a record never
//! lands in a parent zone when a more specific delegated zone exists.

use crate::cloud::{HostedZoneApi, ZonePageToken};
use crate::constants::MAX_ZONE_PAGES;
use crate::dns_errors::DomainError;
use crate::domain::{extract_tld, with_trailing_dot};
use tracing::{debug, warn};

/// A Route53 hosted zone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostedZone {
    /// Provider id, possibly prefixed with `/hostedzone/`
    pub id: String,
    /// Zone name, always dot-terminated
    pub name: String,
}

impl HostedZone {
    /// Create a zone from its id and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// The bare zone id, with any `/hostedzone/` style prefix removed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use route53_sync::zones::HostedZone;
    ///
    /// let zone = HostedZone::new("/hostedzone/Z123", "example.com.");
    /// assert_eq!(zone.short_id(), "Z123");
    /// ```
    #[must_use]
    pub fn short_id(&self) -> &str {
        self.id.rsplit('/').next().unwrap_or(&self.id)
    }
}

/// Pick the zone whose name is the longest suffix of `domain`.
///
/// The domain is dot-terminated for comparison only. When two candidates share
/// the best length the first one in iteration order wins.
///
/// # Errors
///
/// - [`DomainError::NoZoneFound`] if `zones` is empty
/// - [`DomainError::ZoneMismatch`] if no zone name is a suffix of the domain,
///   reported against the first candidate
pub fn find_most_specific_zone<'a>(
    domain: &str,
    zones: &'a [HostedZone],
) -> Result<&'a HostedZone, DomainError> {
    let domain = with_trailing_dot(domain);
    let Some(first) = zones.first() else {
        return Err(DomainError::NoZoneFound { domain });
    };

    let mut most_specific: Option<&HostedZone> = None;
    for zone in zones {
        let longer = most_specific.map_or(true, |best| zone.name.len() > best.name.len());
        if domain.ends_with(&zone.name) && longer {
            most_specific = Some(zone);
        }
    }

    most_specific.ok_or_else(|| DomainError::ZoneMismatch {
        zone: first.name.clone(),
        domain,
    })
}

/// Whether `zone_name` lies at or below the two-label root `tld`.
fn is_within_root(zone_name: &str, tld: &str) -> bool {
    let zone_name = zone_name.trim_end_matches('.');
    let tld = tld.trim_end_matches('.');
    zone_name == tld || zone_name.ends_with(&format!(".{tld}"))
}

/// Find the destination hosted zone for `domain`.
///
/// Lists zones by the domain's two-label root and picks the most specific
/// match. Truncated listings are followed while the last zone of the page is
/// still under the root (Route53 orders zones by reversed labels, so the zones
/// under one root are contiguous), up to [`MAX_ZONE_PAGES`] pages.
///
/// # Errors
///
/// Returns [`DomainError::InvalidDomain`] for domains without a subdomain,
/// [`DomainError::ZoneLookupFailed`] if a listing call fails, and the errors of
/// [`find_most_specific_zone`].
pub async fn find_destination_zone<A>(api: &A, domain: &str) -> Result<HostedZone, DomainError>
where
    A: HostedZoneApi + ?Sized,
{
    let tld = extract_tld(domain)?;

    let mut zones = Vec::new();
    let mut token: Option<ZonePageToken> = None;
    for page_number in 1..=MAX_ZONE_PAGES {
        let page = api
            .list_hosted_zones_by_name(&tld, token.as_ref())
            .await
            .map_err(|source| DomainError::ZoneLookupFailed {
                tld: tld.clone(),
                source,
            })?;

        let leaves_root = page
            .zones
            .last()
            .map_or(true, |zone| !is_within_root(&zone.name, &tld));
        debug!(
            tld = %tld,
            page = page_number,
            zones_in_page = page.zones.len(),
            truncated = page.next.is_some(),
            "Fetched hosted zone page"
        );
        zones.extend(page.zones);

        match page.next {
            Some(next) if !leaves_root => {
                if page_number == MAX_ZONE_PAGES {
                    warn!(
                        tld = %tld,
                        pages = MAX_ZONE_PAGES,
                        "Hosted zone listing still truncated, matching against zones fetched so far"
                    );
                }
                token = Some(next);
            }
            _ => break,
        }
    }

    find_most_specific_zone(domain, &zones).cloned()
}

#[cfg(test)]
#[path = "zones_tests.rs"]
mod zones_tests;

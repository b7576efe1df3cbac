// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Alias record upserts.
//!
//! Every change is a single-change batch performing an `UPSERT` of an `A`
//! alias record with target health evaluation disabled. `UPSERT` makes the
//! submission idempotent: submitting the same change twice leaves the same
//! record behind.

use crate::cloud::HostedZoneApi;
use crate::constants::{ALIAS_RECORD_TYPE, CHANGE_BATCH_COMMENT};
use crate::dns_errors::{CloudApiError, DomainError};
use crate::domain::record_name;
use serde::Serialize;
use tracing::info;

/// An upsert-only alias record change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasChange {
    /// Record name, leading dots already stripped
    pub record_name: String,
    /// Destination hosted zone id (bare, no `/hostedzone/` prefix)
    pub zone_id: String,
    /// Alias target DNS name (the load balancer hostname)
    pub alias_dns_name: String,
    /// Hosted zone id of the alias target
    pub alias_hosted_zone_id: String,
}

impl AliasChange {
    /// Build a change for `domain` in `zone_id` pointing at the load balancer.
    ///
    /// Leading dots are stripped from `domain` to form the record name.
    pub fn new(
        hostname: impl Into<String>,
        alias_hosted_zone_id: impl Into<String>,
        domain: &str,
        zone_id: impl Into<String>,
    ) -> Self {
        Self {
            record_name: record_name(domain).to_string(),
            zone_id: zone_id.into(),
            alias_dns_name: hostname.into(),
            alias_hosted_zone_id: alias_hosted_zone_id.into(),
        }
    }

    /// Record type written by this change.
    #[must_use]
    pub fn record_type(&self) -> &'static str {
        ALIAS_RECORD_TYPE
    }

    /// Comment attached to the submitted change batch.
    #[must_use]
    pub fn comment(&self) -> &'static str {
        CHANGE_BATCH_COMMENT
    }

    /// Alias records track load balancer liveness through the provider, not probes.
    #[must_use]
    pub fn evaluate_target_health(&self) -> bool {
        false
    }

    /// Check that every field Route53 requires is present.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first empty field.
    pub fn validate(&self) -> Result<(), CloudApiError> {
        let fields = [
            ("record name", &self.record_name),
            ("hosted zone id", &self.zone_id),
            ("alias DNS name", &self.alias_dns_name),
            ("alias hosted zone id", &self.alias_hosted_zone_id),
        ];
        match fields.iter().find(|(_, value)| value.is_empty()) {
            Some((field, _)) => Err(CloudApiError::new(
                "ChangeResourceRecordSets",
                format!("change is missing the {field}"),
            )),
            None => Ok(()),
        }
    }
}

/// What happened to an alias change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The change batch was accepted by Route53
    Submitted,
    /// Dry-run mode: the change was only logged
    DryRun,
}

impl UpsertOutcome {
    /// Stable label used for metrics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::DryRun => "dry_run",
        }
    }
}

/// Submit `change`, or only log it when `dry_run` is set.
///
/// The change is validated the same way in both modes.
///
/// # Errors
///
/// Returns [`DomainError::DnsUpdateFailed`] if the change is incomplete or
/// Route53 rejects it.
pub async fn upsert_alias_record<A>(
    api: &A,
    change: &AliasChange,
    dry_run: bool,
) -> Result<UpsertOutcome, DomainError>
where
    A: HostedZoneApi + ?Sized,
{
    let update_failed = |source| DomainError::DnsUpdateFailed {
        domain: change.record_name.clone(),
        zone_id: change.zone_id.clone(),
        source,
    };
    change.validate().map_err(update_failed)?;

    if dry_run {
        info!(
            record = %change.record_name,
            zone_id = %change.zone_id,
            alias_target = %change.alias_dns_name,
            alias_zone_id = %change.alias_hosted_zone_id,
            change = %serde_json::to_string(change).unwrap_or_default(),
            "DRY RUN: We normally would have updated {} to point to {} ({})",
            change.zone_id,
            change.alias_hosted_zone_id,
            change.alias_dns_name
        );
        return Ok(UpsertOutcome::DryRun);
    }

    api.upsert_alias(change).await.map_err(update_failed)?;
    Ok(UpsertOutcome::Submitted)
}

#[cfg(test)]
#[path = "upsert_tests.rs"]
mod upsert_tests;

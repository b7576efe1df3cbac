// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! AWS SDK implementation of the cloud capabilities.
//!
//! Credentials come from a fixed provider chain: environment variables, then
//! the shared credentials/config files, then the EC2 instance role. The region
//! is taken from configuration or discovered from EC2 instance metadata.
//!
//! The SDK caches resolved credentials inside each loaded configuration.
//! [`AwsSession::refresh_credentials`] rebuilds the configuration and both
//! clients, which discards that cache and forces the chain to run again.

use crate::cloud::{
    CloudSession, HostedZoneApi, HostedZonePage, LoadBalancerApi, LoadBalancerDescription,
    ZonePageToken,
};
use crate::dns_errors::CloudApiError;
use crate::upsert::AliasChange;
use crate::zones::HostedZone;
use anyhow::{anyhow, Result};
use aws_config::environment::EnvironmentVariableCredentialsProvider;
use aws_config::imds::credentials::ImdsCredentialsProvider;
use aws_config::imds::region::ImdsRegionProvider;
use aws_config::meta::credentials::CredentialsProviderChain;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_route53::config::Region;
use aws_sdk_route53::error::{BuildError, DisplayErrorContext};
use aws_sdk_route53::types::{
    AliasTarget, Change, ChangeAction, ChangeBatch, ResourceRecordSet, RrType,
};
use tracing::{debug, info};

/// Build the credential chain: environment, shared profile, instance role.
fn credentials_chain() -> CredentialsProviderChain {
    CredentialsProviderChain::first_try("Environment", EnvironmentVariableCredentialsProvider::new())
        .or_else("Profile", ProfileFileCredentialsProvider::builder().build())
        .or_else("Ec2InstanceMetadata", ImdsCredentialsProvider::builder().build())
}

/// Discover the region of the EC2 instance this process runs on.
///
/// # Errors
///
/// Returns an error if instance metadata does not report a region.
pub async fn discover_region() -> Result<String> {
    ImdsRegionProvider::builder()
        .build()
        .region()
        .await
        .map(|region| region.to_string())
        .ok_or_else(|| anyhow!("Unable to retrieve the region from the EC2 instance metadata"))
}

async fn load_sdk_config(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .credentials_provider(credentials_chain())
        .load()
        .await
}

/// Route53 and classic ELB clients sharing one credential chain.
#[derive(Clone, Debug)]
pub struct AwsSession {
    region: String,
    route53: aws_sdk_route53::Client,
    elb: aws_sdk_elasticloadbalancing::Client,
}

impl AwsSession {
    /// Connect to AWS in `region`, or the instance's region when `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if no region is configured and none can be discovered.
    pub async fn connect(region: Option<String>) -> Result<Self> {
        let region = match region {
            Some(region) => region,
            None => discover_region().await?,
        };
        info!(region = %region, "Connecting to AWS");

        let config = load_sdk_config(&region).await;
        Ok(Self::from_config(region, &config))
    }

    fn from_config(region: String, config: &SdkConfig) -> Self {
        Self {
            region,
            route53: aws_sdk_route53::Client::new(config),
            elb: aws_sdk_elasticloadbalancing::Client::new(config),
        }
    }
}

#[async_trait::async_trait]
impl LoadBalancerApi for AwsSession {
    async fn describe_load_balancers(
        &self,
        name: &str,
    ) -> Result<Vec<LoadBalancerDescription>, CloudApiError> {
        let output = self
            .elb
            .describe_load_balancers()
            .load_balancer_names(name)
            .send()
            .await
            .map_err(|e| {
                CloudApiError::new("DescribeLoadBalancers", DisplayErrorContext(&e).to_string())
            })?;

        Ok(output
            .load_balancer_descriptions()
            .iter()
            .map(|description| LoadBalancerDescription {
                name: description.load_balancer_name().unwrap_or_default().to_string(),
                dns_name: description.dns_name().map(ToString::to_string),
                canonical_hosted_zone_id: description
                    .canonical_hosted_zone_name_id()
                    .map(ToString::to_string),
            })
            .collect())
    }
}

pub(crate) fn change_batch(change: &AliasChange) -> Result<ChangeBatch, CloudApiError> {
    let build_failed = |e: BuildError| CloudApiError::new("ChangeResourceRecordSets", e.to_string());

    let alias_target = AliasTarget::builder()
        .dns_name(&change.alias_dns_name)
        .hosted_zone_id(&change.alias_hosted_zone_id)
        .evaluate_target_health(change.evaluate_target_health())
        .build()
        .map_err(build_failed)?;

    let record_set = ResourceRecordSet::builder()
        .name(&change.record_name)
        .r#type(RrType::from(change.record_type()))
        .alias_target(alias_target)
        .build()
        .map_err(build_failed)?;

    let upsert = Change::builder()
        .action(ChangeAction::Upsert)
        .resource_record_set(record_set)
        .build()
        .map_err(build_failed)?;

    ChangeBatch::builder()
        .changes(upsert)
        .comment(change.comment())
        .build()
        .map_err(build_failed)
}

#[async_trait::async_trait]
impl HostedZoneApi for AwsSession {
    async fn list_hosted_zones_by_name(
        &self,
        dns_name: &str,
        page: Option<&ZonePageToken>,
    ) -> Result<HostedZonePage, CloudApiError> {
        let request = match page {
            Some(token) => self
                .route53
                .list_hosted_zones_by_name()
                .dns_name(&token.dns_name)
                .hosted_zone_id(&token.hosted_zone_id),
            None => self.route53.list_hosted_zones_by_name().dns_name(dns_name),
        };
        let output = request.send().await.map_err(|e| {
            CloudApiError::new("ListHostedZonesByName", DisplayErrorContext(&e).to_string())
        })?;

        let zones = output
            .hosted_zones()
            .iter()
            .map(|zone| HostedZone::new(zone.id(), zone.name()))
            .collect();

        let next = match (
            output.is_truncated(),
            output.next_dns_name(),
            output.next_hosted_zone_id(),
        ) {
            (true, Some(dns_name), Some(hosted_zone_id)) => Some(ZonePageToken {
                dns_name: dns_name.to_string(),
                hosted_zone_id: hosted_zone_id.to_string(),
            }),
            _ => None,
        };

        Ok(HostedZonePage { zones, next })
    }

    async fn upsert_alias(&self, change: &AliasChange) -> Result<(), CloudApiError> {
        let batch = change_batch(change)?;

        let output = self
            .route53
            .change_resource_record_sets()
            .hosted_zone_id(&change.zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| {
                CloudApiError::new(
                    "ChangeResourceRecordSets",
                    DisplayErrorContext(&e).to_string(),
                )
            })?;

        debug!(
            record = %change.record_name,
            zone_id = %change.zone_id,
            change_info = ?output.change_info(),
            "Route53 accepted change batch"
        );
        Ok(())
    }
}

#[async_trait::async_trait]
impl CloudSession for AwsSession {
    fn region(&self) -> &str {
        &self.region
    }

    async fn refresh_credentials(&mut self) {
        let config = load_sdk_config(&self.region).await;
        *self = Self::from_config(self.region.clone(), &config);
    }
}

#[cfg(test)]
#[path = "aws_tests.rs"]
mod aws_tests;

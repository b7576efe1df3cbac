// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Paged listing of label-selected Services across all namespaces.
//!
//! Every polling pass lists the DNS-managed Services of the whole cluster.
//! Fetching them [`KUBE_LIST_PAGE_SIZE`] at a time keeps a large cluster from
//! turning each pass into one huge response.

use crate::constants::KUBE_LIST_PAGE_SIZE;
use anyhow::Result;
use kube::{api::ListParams, Api, Resource};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tracing::debug;

/// List every object matching `list_params`, following continue tokens.
///
/// The page size is forced to [`KUBE_LIST_PAGE_SIZE`]; labels and fields in
/// `list_params` are kept for every page. Used with `Api::all` to collect the
/// Services carrying the DNS label in every namespace.
///
/// # Example
///
/// ```no_run
/// use k8s_openapi::api::core::v1::Service;
/// use kube::{Api, Client, api::ListParams};
/// use route53_sync::reconcilers::pagination::list_all_paginated;
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = Client::try_default().await?;
/// let api: Api<Service> = Api::all(client);
///
/// let services = list_all_paginated(&api, ListParams::default().labels("dns=route53")).await?;
/// println!("Found {} services", services.len());
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if any page cannot be fetched. Partial results are dropped.
pub async fn list_all_paginated<K>(api: &Api<K>, mut list_params: ListParams) -> Result<Vec<K>>
where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug,
{
    list_params.limit = Some(KUBE_LIST_PAGE_SIZE);

    let mut objects = Vec::new();
    let mut pages = 0;

    loop {
        pages += 1;
        let page = api.list(&list_params).await?;
        let in_page = page.items.len();
        objects.extend(page.items);

        debug!(
            page = pages,
            in_page,
            total = objects.len(),
            selector = list_params.label_selector.as_deref().unwrap_or_default(),
            "Fetched list page"
        );

        match page.metadata.continue_ {
            Some(token) if !token.is_empty() => list_params.continue_token = Some(token),
            _ => break,
        }
    }

    debug!(pages, total = objects.len(), "Listing complete");
    Ok(objects)
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod pagination_tests;

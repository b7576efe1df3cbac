// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Domain name helpers.
//!
//! Pure functions over the domain strings found in service annotations: the
//! two-label root used to query Route53, trailing-dot normalization for
//! suffix comparison, and the record name actually written.

use crate::dns_errors::DomainError;

/// Split a comma-separated annotation value into individual domains.
///
/// Order is preserved. Surrounding whitespace is trimmed and empty entries
/// (e.g. from a trailing comma) are dropped.
///
/// # Example
///
/// ```rust
/// use route53_sync::domain::parse_domain_list;
///
/// let domains = parse_domain_list("app.example.com, api.example.com,");
/// assert_eq!(domains, vec!["app.example.com", "api.example.com"]);
/// ```
#[must_use]
pub fn parse_domain_list(annotation: &str) -> Vec<String> {
    annotation
        .split(',')
        .map(str::trim)
        .filter(|domain| !domain.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Derive the two-label root used as the `ListHostedZonesByName` query.
///
/// The domain must contain at least one label beyond the root, so
/// `sub.example.com` yields `example.com` while `example.com` is rejected.
///
/// # Errors
///
/// Returns [`DomainError::InvalidDomain`] if the domain has fewer than three labels.
pub fn extract_tld(domain: &str) -> Result<String, DomainError> {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 3 {
        return Err(DomainError::InvalidDomain {
            domain: domain.to_string(),
        });
    }
    Ok(labels[labels.len() - 2..].join("."))
}

/// Append a trailing dot unless one is already present.
///
/// Route53 zone names are always dot-terminated; this is only used to compare
/// against them, never to build the submitted record name.
#[must_use]
pub fn with_trailing_dot(domain: &str) -> String {
    if domain.ends_with('.') {
        domain.to_string()
    } else {
        format!("{domain}.")
    }
}

/// The record name submitted to Route53: the domain with leading dots removed.
#[must_use]
pub fn record_name(domain: &str) -> &str {
    domain.trim_start_matches('.')
}

#[cfg(test)]
#[path = "domain_tests.rs"]
mod domain_tests;

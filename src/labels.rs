// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Label and annotation constants for services managed by route53-sync.
//!
//! Services opt in to DNS management with a label, and declare the domains
//! they want with an annotation.

// ============================================================================
// Service Selection
// ============================================================================

/// Label key that tags a service for DNS management
pub const DNS_LABEL_KEY: &str = "dns";

/// Label value that tags a service for Route53 management
pub const DNS_LABEL_VALUE: &str = "route53";

// ============================================================================
// Service Annotations
// ============================================================================

/// Annotation holding a comma-separated list of fully-qualified domain names
pub const DOMAIN_NAME_ANNOTATION: &str = "domainName";

/// Build the default `key=value` label selector used to list services.
///
/// # Example
///
/// ```rust
/// use route53_sync::labels::default_selector;
///
/// assert_eq!(default_selector(), "dns=route53");
/// ```
#[must_use]
pub fn default_selector() -> String {
    format!("{DNS_LABEL_KEY}={DNS_LABEL_VALUE}")
}

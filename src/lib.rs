// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # route53-sync - Route53 alias records for Kubernetes LoadBalancer services
//!
//! route53-sync is a small polling controller that keeps Route53 alias records
//! pointed at the AWS load balancers fronting Kubernetes services.
//!
//! ## Overview
//!
//! Services opt in with the `dns=route53` label and list the domains they want
//! in the `domainName` annotation. On every pass the controller:
//!
//! - Lists the opted-in services in all namespaces
//! - Derives each service's classic ELB name from its ingress hostname
//! - Finds the most specific hosted zone for every requested domain
//! - Upserts an `A` alias record pointing the domain at the ELB
//!
//! ## Modules
//!
//! - [`domain`] - Domain list parsing and root-domain extraction
//! - [`zones`] - Hosted zone matching and paginated zone lookup
//! - [`load_balancer`] - Load balancer name derivation and resolution
//! - [`upsert`] - Alias record changes and dry-run handling
//! - [`services`] - Service discovery and ingress extraction
//! - [`reconcilers`] - The reconciliation pass and polling loop
//! - [`cloud`] - Cloud capability traits
//! - [`aws`] - AWS SDK implementation of the cloud capabilities
//! - [`config`] - Command-line and environment configuration
//! - [`metrics`] - Prometheus metrics
//!
//! ## Example
//!
//! ```rust
//! use route53_sync::domain::extract_tld;
//! use route53_sync::load_balancer::load_balancer_name_from_hostname;
//!
//! let root = extract_tld("app.example.com").unwrap();
//! assert_eq!(root, "example.com");
//!
//! let name = load_balancer_name_from_hostname(
//!     "internal-myelb-123.us-east-1.elb.amazonaws.com",
//! )
//! .unwrap();
//! assert_eq!(name, "myelb");
//! ```

pub mod aws;
pub mod cloud;
pub mod config;
pub mod constants;
pub mod dns_errors;
pub mod domain;
pub mod labels;
pub mod load_balancer;
pub mod metrics;
pub mod reconcilers;
pub mod services;
pub mod upsert;
pub mod zones;

// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use clap::Parser;
use kube::Client;
use route53_sync::{
    aws::AwsSession,
    config::Cli,
    constants::{LOG_FORMAT_ENV, METRICS_SERVER_PATH, TOKIO_THREAD_NAME, TOKIO_WORKER_THREADS},
    metrics,
    reconcilers::{run_sync_loop, ServiceSyncer},
    services::KubeServiceSource,
};
use tracing::{debug, error, info};

fn main() -> Result<()> {
    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name(TOKIO_THREAD_NAME)
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

/// Initialize logging.
///
/// Respects `RUST_LOG` (default `info`) and `RUST_LOG_FORMAT` (`json` or text).
fn init_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn async_main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = cli.sync_config();

    info!("Route53 Update Service");
    debug!(?config, "Configuration loaded");
    if config.dry_run {
        info!("Dry-run mode enabled, Route53 changes will only be logged");
    }

    debug!("Initializing Kubernetes client");
    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;
    debug!("Kubernetes client initialized successfully");

    let cloud = AwsSession::connect(cli.region.clone())
        .await
        .context("Failed to create AWS session")?;

    let listener = tokio::net::TcpListener::bind(&cli.metrics_address)
        .await
        .with_context(|| format!("Failed to bind metrics server to {}", cli.metrics_address))?;
    info!(address = %cli.metrics_address, path = METRICS_SERVER_PATH, "Serving metrics");
    tokio::spawn(async move {
        let app = Router::new().route(METRICS_SERVER_PATH, get(metrics_handler));
        if let Err(e) = axum::serve(listener, app).await {
            error!("Metrics server exited: {}", e);
        }
    });

    let interval = config.poll_interval;
    let mut syncer = ServiceSyncer::new(KubeServiceSource::new(client), cloud, config);

    run_sync_loop(&mut syncer, interval, shutdown_signal()).await
}

/// Serve the Prometheus text exposition.
async fn metrics_handler() -> impl IntoResponse {
    match metrics::gather_metrics() {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to gather metrics: {e}"),
        ),
    }
}

/// Resolve on SIGINT or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT"),
        () = terminate => info!("Received SIGTERM"),
    }
}

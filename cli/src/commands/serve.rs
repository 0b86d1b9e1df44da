// Copyright (c) 2026 Explore Service Contributors
// SPDX-License-Identifier: AGPL-3.0

//! `explore serve`: run the gRPC service until Ctrl+C or SIGTERM

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use explore_core::application::ledger::StandardLedgerService;
use explore_core::application::repository_factory::create_decision_repository;
use explore_core::domain::config::LedgerConfig;
use explore_core::presentation::grpc::server::start_grpc_server;

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = LedgerConfig::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    let addr: SocketAddr = config
        .server
        .listen_address()
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.server.listen_address()))?;

    info!(
        "Explore service starting (backend: {:?}, request timeout: {:?})",
        config.storage.backend,
        config.server.request_timeout()
    );

    let repository = create_decision_repository(&config.storage_backend())
        .await
        .context("Failed to initialize decision storage")?;

    let ledger = Arc::new(StandardLedgerService::new(
        repository,
        config.server.request_timeout(),
    ));

    start_grpc_server(addr, ledger, config.server.request_timeout(), shutdown_signal())
        .await
        .context("gRPC server failed")?;

    info!("Explore service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plusnet_exporter::{
    Collector, Config, HubClient, InfluxClient, Result, start_collection_loop,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap reads environment fallbacks
    dotenvy::dotenv().ok();

    // Missing required flags exit here, before any network traffic
    let config = Config::parse();

    setup_tracing(config.verbose);

    config.validate().map_err(|e| {
        tracing::error!("{}", e);
        e
    })?;

    let hub = HubClient::from_config(&config)?;
    let influx = InfluxClient::from_config(&config)?;

    // Installed before the startup requests so a signal there still exits cleanly
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        wait_for_signal().await;
        let _ = shutdown_tx.send(true);
    });

    // Not required, the first cycle logs in anyway; this reports bad credentials early
    let session = match hub.login().await {
        Ok(session) => {
            tracing::info!(
                "Authorized for router at {}, with password {}",
                config.router_ip,
                config.masked_password()
            );
            Some(session)
        }
        Err(e) => {
            tracing::warn!(
                "Initial login to router at {} failed, retrying every cycle: {}",
                config.router_ip,
                e
            );
            None
        }
    };

    match influx.ping().await {
        Ok(()) => tracing::info!(
            "Connected to InfluxDB at {} (database '{}')",
            influx.base_url(),
            influx.database()
        ),
        Err(e) => tracing::warn!("InfluxDB at {} is not answering: {}", influx.base_url(), e),
    }

    let mut collector = Collector::new(hub, influx, config.interval());
    if let Some(session) = session {
        collector = collector.with_session(session);
    }

    let health = start_collection_loop(shutdown_rx, collector).await?;
    tracing::info!(
        "Exiting after {} cycles ({} exported, {} failed)",
        health.cycles,
        health.successes,
        health.failures
    );

    Ok(())
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Shutdown signal received (Ctrl+C)"),
        _ = terminate => tracing::info!("Shutdown signal received (SIGTERM)"),
    }
}

fn setup_tracing(verbosity: u8) {
    // RUST_LOG wins; otherwise -v/-vv raise the level from warnings only
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match verbosity {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        tracing_subscriber::EnvFilter::new(level)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

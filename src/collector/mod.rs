// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Metrics collection orchestration module
//!
//! Runs login, scrape and export in sequence on a fixed interval. The router
//! session lives in the [`Collector`] and is handed from cycle to cycle.

mod outcome;


use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{AppError, AuthError, ExportError, ScrapeError};
use crate::hub::{HubClient, Session};
use crate::influx::InfluxClient;
use crate::metrics::StatsSnapshot;

pub use outcome::{CollectorHealth, CycleOutcome};

/// Where snapshots come from
pub trait StatsSource: Send + Sync {
    /// Login state kept between cycles
    type Session: Send + Sync;

    fn authenticate(&self) -> impl Future<Output = Result<Self::Session, AuthError>> + Send;

    fn scrape(
        &self,
        session: &Self::Session,
    ) -> impl Future<Output = Result<StatsSnapshot, ScrapeError>> + Send;
}

/// Where snapshots go
pub trait SnapshotSink: Send + Sync {
    fn write(
        &self,
        snapshot: &StatsSnapshot,
    ) -> impl Future<Output = Result<(), ExportError>> + Send;
}

impl StatsSource for HubClient {
    type Session = Session;

    async fn authenticate(&self) -> Result<Session, AuthError> {
        self.login().await
    }

    async fn scrape(&self, session: &Session) -> Result<StatsSnapshot, ScrapeError> {
        self.fetch_stats(session).await
    }
}

impl SnapshotSink for InfluxClient {
    async fn write(&self, snapshot: &StatsSnapshot) -> Result<(), ExportError> {
        self.write_snapshot(snapshot).await
    }
}

/// Periodic login, scrape and export
pub struct Collector<S: StatsSource, K: SnapshotSink> {
    source: S,
    sink: K,
    interval: Duration,
    session: Option<S::Session>,
    health: CollectorHealth,
}

impl<S: StatsSource, K: SnapshotSink> Collector<S, K> {
    #[must_use]
    pub fn new(source: S, sink: K, interval: Duration) -> Self {
        Self {
            source,
            sink,
            interval,
            session: None,
            health: CollectorHealth::default(),
        }
    }

    /// Starts with an already established session
    #[must_use]
    pub fn with_session(mut self, session: S::Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn health(&self) -> &CollectorHealth {
        &self.health
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs one login/scrape/export cycle
    ///
    /// Never fails: stage errors are logged and returned in the outcome.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let cycle = self.health.cycles + 1;
        let start = tokio::time::Instant::now();
        tracing::trace!("Starting collection cycle {}", cycle);

        let result = self.collect_and_export().await;
        let elapsed = start.elapsed();

        let outcome = match result {
            Ok(fields) => {
                tracing::info!(
                    "Took {:.4} seconds to collect stats ({} fields)",
                    elapsed.as_secs_f64(),
                    fields
                );
                CycleOutcome::Exported {
                    cycle,
                    fields,
                    elapsed,
                }
            }
            Err(error) => {
                tracing::warn!(
                    "Collection cycle {} failed after {:.4}s: {}",
                    cycle,
                    elapsed.as_secs_f64(),
                    error
                );
                tracing::debug!("Error details for cycle {}: {:?}", cycle, error);
                CycleOutcome::Failed {
                    cycle,
                    error,
                    elapsed,
                }
            }
        };

        self.health.record(&outcome);
        outcome
    }

    async fn collect_and_export(&mut self) -> Result<usize, AppError> {
        let snapshot = self.snapshot().await?;
        self.sink.write(&snapshot).await?;
        Ok(snapshot.len())
    }

    /// Scrapes with the held session, logging in first if there is none
    ///
    /// An expired session is replaced once within the cycle.
    async fn snapshot(&mut self) -> Result<StatsSnapshot, AppError> {
        let session = match self.session.take() {
            Some(session) => session,
            None => self.source.authenticate().await?,
        };

        match self.source.scrape(&session).await {
            Ok(snapshot) => {
                self.session = Some(session);
                Ok(snapshot)
            }
            Err(ScrapeError::SessionExpired) => {
                drop(session);
                tracing::debug!("Session expired, logging in again");
                let session = self.source.authenticate().await?;
                let result = self.source.scrape(&session).await;
                if !matches!(result, Err(ScrapeError::SessionExpired)) {
                    self.session = Some(session);
                }
                result.map_err(AppError::from)
            }
            Err(e) => {
                self.session = Some(session);
                Err(e.into())
            }
        }
    }

    /// Runs cycles until shutdown is signalled
    ///
    /// Each cycle is followed by a full `interval` sleep, so cycle N's write
    /// always finishes before cycle N+1 starts.
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) -> CollectorHealth {
        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            self.run_cycle().await;

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {},
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Stopping collection loop");
        self.health
    }
}

/// Starts the background metrics collection loop
///
/// The returned handle resolves to the collector's health once shutdown is
/// signalled.
pub fn start_collection_loop<S, K>(
    shutdown_rx: watch::Receiver<bool>,
    collector: Collector<S, K>,
) -> JoinHandle<CollectorHealth>
where
    S: StatsSource + 'static,
    K: SnapshotSink + 'static,
{
    tracing::info!(
        "Starting background collection loop every {}s",
        collector.interval().as_secs()
    );
    tokio::spawn(collector.run(shutdown_rx))
}

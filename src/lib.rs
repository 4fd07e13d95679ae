// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! # Plusnet Exporter
//!
//! Collects line statistics from a Plusnet Hub One router and writes them to
//! InfluxDB.
//!
//! The router has no API, so the exporter logs in through the admin web form
//! and scrapes the connection information page on a fixed interval.
//!
//! ## Main modules
//! - `collector`: the login/scrape/export loop
//! - `config`: command line and environment configuration
//! - `error`: error types
//! - `hub`: Hub One web UI client
//! - `influx`: InfluxDB line protocol and write client
//! - `metrics`: snapshots and value parsing
//! - `prelude`: commonly used types and traits

mod collector;
mod config;
mod error;
mod hub;
mod influx;
mod metrics;
pub mod prelude;

// Re-export commonly used types
/// Application configuration
pub use config::{Config, defaults, env_vars};

/// Application error and result type
pub use error::{AppError, AuthError, ExportError, Result, ScrapeError};

/// Collection loop
pub use collector::{
    Collector, CollectorHealth, CycleOutcome, SnapshotSink, StatsSource, start_collection_loop,
};

/// Hub One client
pub use hub::{HubClient, HubStats, SESSION_COOKIE, Session, parse_status_page};

/// InfluxDB client
pub use influx::{InfluxClient, Point};

/// Snapshot types
pub use metrics::{FieldValue, StatsSnapshot, parse_human_bytes};

// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for convenient use.
//! Users of the library can import everything they need with:
//!
//! ```rust
//! use plusnet_exporter::prelude::*;
//! ```

// Core types
pub use crate::config::Config;
pub use crate::error::{AppError, AuthError, ExportError, Result, ScrapeError};

// Collection loop
pub use crate::collector::{
    Collector, CollectorHealth, CycleOutcome, SnapshotSink, StatsSource, start_collection_loop,
};

// Clients
pub use crate::hub::{HubClient, Session};
pub use crate::influx::{InfluxClient, Point};

// Metrics types
pub use crate::metrics::{FieldValue, StatsSnapshot};

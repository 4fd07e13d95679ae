// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Metric values and helpers for turning router output into them

mod parsers;
mod snapshot;

/// Human readable size parsing
pub use parsers::parse_human_bytes;

/// Snapshot of one collection cycle
pub use snapshot::{FieldValue, StatsSnapshot};

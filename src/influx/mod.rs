// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! InfluxDB export module
//!
//! Encodes snapshots as line protocol points and writes them over the
//! InfluxDB 1.x HTTP API.

mod client;
mod point;

pub use client::InfluxClient;
pub use point::Point;

// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Type definitions for Hub One statistics

use serde::Serialize;

/// Line statistics read from the Hub One connection information page
///
/// `_tx` is upstream, `_rx` is downstream. Field names are the ones
/// written to InfluxDB.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HubStats {
    pub total_tx: u64,
    pub total_rx: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<String>,
    pub firmware_update_datetime: i64,
    pub reboot_datetime: i64,
    pub uptime_seconds: u64,

    pub data_rate_tx: u64,
    pub data_rate_rx: u64,

    pub max_data_rate_tx: u64,
    pub max_data_rate_rx: u64,

    pub noise_margin_tx: f64,
    pub noise_margin_rx: f64,

    pub line_attenuation_tx: f64,
    pub line_attenuation_rx: f64,

    pub signal_attenuation_tx: f64,
    pub signal_attenuation_rx: f64,
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Hub One status page parsing helpers

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use regex::Regex;

use crate::error::ScrapeError;
use crate::hub::types::HubStats;
use crate::metrics::parse_human_bytes;

const FIRMWARE_VERSION: &str = "3. Firmware version:";
const DATA_RATE: &str = "6. Data rate:";
const MAX_DATA_RATE: &str = "7. Maximum data rate:";
const NOISE_MARGIN: &str = "8. Noise margin:";
const LINE_ATTENUATION: &str = "9. Line attenuation:";
const SIGNAL_ATTENUATION: &str = "10. Signal attenuation:";
const DATA_TRANSFERRED: &str = "11. Data sent/received:";

/// Marker text of the login page, served instead of the status page once the session is gone
const PASSWORD_PROTECTED: &str = "password protected";

/// A label cell immediately followed by its value cell
///
/// The label may carry inline markup such as `<b>`, but never a table tag.
static TABLE_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)<td[^>]*>((?:[^<]|<(?:[^/t][^>]*|/[^t][^>]*)?>)*)</td>\s*<td[^>]*>(.*?)</td>",
    )
    .expect("valid row pattern")
});

static MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid markup pattern"));

/// Seconds since the last reboot, from the page's refresh script
static REBOOT_WAIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"wait\s*=\s*(\d+)\s*;").expect("valid wait pattern"));

static SOFTWARE_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)version\s+(\d+(?:\.\d+)+)").expect("valid version pattern")
});

static LAST_UPDATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)last updated\s+(\d{1,2}/\d{1,2}/\d{2})").expect("valid date pattern")
});

pub(crate) fn is_password_protected(page: &str) -> bool {
    page.contains(PASSWORD_PROTECTED)
}

/// Collects `label -> value` pairs from every two-cell table row
pub(crate) fn parse_status_table(page: &str) -> HashMap<String, String> {
    let mut table = HashMap::new();
    for caps in TABLE_ROW.captures_iter(page) {
        let label = clean_text(&caps[1]);
        if label.is_empty() {
            continue;
        }
        table.insert(label, clean_text(&caps[2]));
    }
    table
}

/// Parses the connection information page
///
/// `collected_at` anchors the reboot time, which the page only reports as
/// seconds since boot.
pub fn parse_status_page(
    page: &str,
    collected_at: DateTime<Utc>,
) -> Result<HubStats, ScrapeError> {
    let table = parse_status_table(page);
    tracing::trace!("Status page table has {} rows", table.len());

    let (total_tx, total_rx) = {
        let (tx, rx) = split_pair("data_sent_received", row(&table, DATA_TRANSFERRED)?)?;
        (
            parse_bytes("total_tx", tx)?,
            parse_bytes("total_rx", rx)?,
        )
    };

    let firmware = row(&table, FIRMWARE_VERSION)?;
    let firmware_version = SOFTWARE_VERSION
        .captures(firmware)
        .map(|caps| caps[1].to_string());
    let firmware_update_datetime = parse_last_updated(firmware)?;

    let uptime_seconds: u64 = REBOOT_WAIT
        .captures(page)
        .and_then(|caps| caps[1].parse().ok())
        .ok_or(ScrapeError::MissingField("wait"))?;
    let reboot_datetime = i64::try_from(uptime_seconds)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|uptime| collected_at.checked_sub_signed(uptime))
        .map(|rebooted| rebooted.timestamp())
        .ok_or_else(|| ScrapeError::Malformed {
            field: "uptime_seconds",
            value: uptime_seconds.to_string(),
        })?;

    let (data_rate_tx, data_rate_rx) = parse_pair(&table, DATA_RATE, "data_rate")?;
    let (max_data_rate_tx, max_data_rate_rx) =
        parse_pair(&table, MAX_DATA_RATE, "max_data_rate")?;
    let (noise_margin_tx, noise_margin_rx) = parse_pair(&table, NOISE_MARGIN, "noise_margin")?;
    let (line_attenuation_tx, line_attenuation_rx) =
        parse_pair(&table, LINE_ATTENUATION, "line_attenuation")?;
    let (signal_attenuation_tx, signal_attenuation_rx) =
        parse_pair(&table, SIGNAL_ATTENUATION, "signal_attenuation")?;

    Ok(HubStats {
        total_tx,
        total_rx,
        firmware_version,
        firmware_update_datetime,
        reboot_datetime,
        uptime_seconds,
        data_rate_tx,
        data_rate_rx,
        max_data_rate_tx,
        max_data_rate_rx,
        noise_margin_tx,
        noise_margin_rx,
        line_attenuation_tx,
        line_attenuation_rx,
        signal_attenuation_tx,
        signal_attenuation_rx,
    })
}

fn clean_text(raw: &str) -> String {
    let text = MARKUP.replace_all(raw, "");
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn row<'a>(
    table: &'a HashMap<String, String>,
    label: &'static str,
) -> Result<&'a str, ScrapeError> {
    table
        .get(label)
        .map(String::as_str)
        .ok_or(ScrapeError::MissingField(label))
}

/// Splits an `upstream / downstream` cell
fn split_pair<'a>(field: &'static str, value: &'a str) -> Result<(&'a str, &'a str), ScrapeError> {
    value
        .split_once('/')
        .map(|(tx, rx)| (tx.trim(), rx.trim()))
        .ok_or_else(|| ScrapeError::Malformed {
            field,
            value: value.to_string(),
        })
}

fn parse_pair<T: FromStr>(
    table: &HashMap<String, String>,
    label: &'static str,
    field: &'static str,
) -> Result<(T, T), ScrapeError> {
    let value = row(table, label)?;
    let (tx, rx) = split_pair(field, value)?;
    let malformed = || ScrapeError::Malformed {
        field,
        value: value.to_string(),
    };
    Ok((
        tx.parse().map_err(|_| malformed())?,
        rx.parse().map_err(|_| malformed())?,
    ))
}

fn parse_bytes(field: &'static str, value: &str) -> Result<u64, ScrapeError> {
    parse_human_bytes(value).ok_or_else(|| ScrapeError::Malformed {
        field,
        value: value.to_string(),
    })
}

/// Unix time of the `Last updated dd/mm/yy` date, taken as UTC midnight
fn parse_last_updated(firmware: &str) -> Result<i64, ScrapeError> {
    let malformed = || ScrapeError::Malformed {
        field: "firmware_update_datetime",
        value: firmware.to_string(),
    };
    let caps = LAST_UPDATED.captures(firmware).ok_or_else(malformed)?;
    let date = NaiveDate::parse_from_str(&caps[1], "%d/%m/%y").map_err(|_| malformed())?;
    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(malformed)?;
    Ok(midnight.and_utc().timestamp())
}

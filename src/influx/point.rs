// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! InfluxDB line protocol encoding

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::metrics::{FieldValue, StatsSnapshot};

/// A measurement point
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    measurement: String,
    tags: BTreeMap<String, String>,
    fields: BTreeMap<String, FieldValue>,
    timestamp: DateTime<Utc>,
}

impl Point {
    #[must_use]
    pub fn new(measurement: impl Into<String>) -> Self {
        Self {
            measurement: measurement.into(),
            tags: BTreeMap::new(),
            fields: BTreeMap::new(),
            timestamp: Utc::now(),
        }
    }

    /// Builds a point carrying every field of the snapshot, stamped with its collection time
    #[must_use]
    pub fn from_snapshot(
        measurement: impl Into<String>,
        tags: &BTreeMap<String, String>,
        snapshot: &StatsSnapshot,
    ) -> Self {
        Self {
            measurement: measurement.into(),
            tags: tags.clone(),
            fields: snapshot.fields().clone(),
            timestamp: snapshot.collected_at(),
        }
    }

    #[must_use]
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn measurement(&self) -> &str {
        &self.measurement
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Encodes the point as one line, nanosecond precision
    ///
    /// Non-finite floats cannot be represented and are left out, so the line
    /// may carry fewer fields than the point.
    pub fn to_line_protocol(&self) -> String {
        let mut line = escape(&self.measurement, &[',', ' ']);

        for (key, value) in &self.tags {
            if value.is_empty() {
                continue;
            }
            let _ = write!(
                line,
                ",{}={}",
                escape(key, &[',', '=', ' ']),
                escape(value, &[',', '=', ' '])
            );
        }

        let mut separator = ' ';
        for (key, value) in &self.fields {
            let encoded = match value {
                FieldValue::Integer(v) => format!("{v}i"),
                FieldValue::Float(v) if v.is_finite() => format!("{v}"),
                FieldValue::Float(v) => {
                    tracing::debug!("Skipping non-finite field {}={}", key, v);
                    continue;
                }
                FieldValue::Text(v) => format!("\"{}\"", escape(v, &['"', '\\'])),
                FieldValue::Boolean(v) => v.to_string(),
            };
            let _ = write!(
                line,
                "{}{}={}",
                separator,
                escape(key, &[',', '=', ' ']),
                encoded
            );
            separator = ',';
        }

        let nanos = self.timestamp.timestamp_nanos_opt().unwrap_or_default();
        let _ = write!(line, " {nanos}");
        line
    }

    /// Number of fields that survive encoding
    pub(crate) fn encodable_fields(&self) -> usize {
        self.fields
            .values()
            .filter(|v| !matches!(v, FieldValue::Float(f) if !f.is_finite()))
            .count()
    }
}

fn escape(raw: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if special.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

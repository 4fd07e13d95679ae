// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Point-in-time collection of metric values

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single metric value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
            Self::Boolean(v) => write!(f, "{v}"),
        }
    }
}

/// One cycle's collected metric values
///
/// Immutable once built; the exporter consumes it and the collector drops it.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSnapshot {
    collected_at: DateTime<Utc>,
    fields: BTreeMap<String, FieldValue>,
}

impl StatsSnapshot {
    /// Creates a snapshot stamped with the current time
    #[must_use]
    pub fn new(fields: BTreeMap<String, FieldValue>) -> Self {
        Self::at(Utc::now(), fields)
    }

    #[must_use]
    pub fn at(collected_at: DateTime<Utc>, fields: BTreeMap<String, FieldValue>) -> Self {
        Self {
            collected_at,
            fields,
        }
    }

    /// Flattens a serializable stats struct into snapshot fields
    ///
    /// Every top-level member becomes a field; `None` members and nested
    /// values are left out.
    #[must_use]
    pub fn from_stats<T: Serialize>(stats: &T, collected_at: DateTime<Utc>) -> Self {
        let mut fields = BTreeMap::new();
        if let Ok(serde_json::Value::Object(map)) = serde_json::to_value(stats) {
            for (name, value) in map {
                if let Some(field) = field_from_json(&value) {
                    fields.insert(name, field);
                }
            }
        }
        Self::at(collected_at, fields)
    }

    pub fn collected_at(&self) -> DateTime<Utc> {
        self.collected_at
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn field_from_json(value: &serde_json::Value) -> Option<FieldValue> {
    match value {
        serde_json::Value::Bool(b) => Some(FieldValue::Boolean(*b)),
        serde_json::Value::Number(n) if n.is_f64() => n.as_f64().map(FieldValue::Float),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(FieldValue::Integer)
            .or_else(|| n.as_f64().map(FieldValue::Float)),
        serde_json::Value::String(s) => Some(FieldValue::Text(s.clone())),
        _ => None,
    }
}

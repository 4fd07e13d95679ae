// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! InfluxDB 1.x HTTP write client

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::Url;

use super::point::Point;
use crate::config::Config;
use crate::error::{AppError, ExportError};
use crate::metrics::StatsSnapshot;

/// Client for the `/write` and `/ping` endpoints
#[derive(Debug, Clone)]
pub struct InfluxClient {
    http: reqwest::Client,
    base_url: Url,
    write_url: Url,
    ping_url: Url,
    database: String,
    measurement: String,
    tags: BTreeMap<String, String>,
    credentials: Option<(String, String)>,
}

impl InfluxClient {
    /// Creates a client; `base_url` must end with `/`
    pub fn new(
        base_url: Url,
        database: impl Into<String>,
        measurement: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {e}")))?;

        let endpoint = |path: &str| {
            base_url.join(path).map_err(|e| {
                AppError::Config(format!("Invalid InfluxDB URL '{base_url}': {e}"))
            })
        };
        let write_url = endpoint("write")?;
        let ping_url = endpoint("ping")?;

        Ok(Self {
            http,
            base_url,
            write_url,
            ping_url,
            database: database.into(),
            measurement: measurement.into(),
            tags: BTreeMap::new(),
            credentials: None,
        })
    }

    /// Creates a client tagging every point with the router address
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let client = Self::new(
            config.influxdb_base_url()?,
            config.influxdb_database.clone(),
            config.influxdb_measurement.clone(),
            config.request_timeout(),
        )?
        .with_tag("router", config.router_ip.clone());

        Ok(
            match (&config.influxdb_username, &config.influxdb_password) {
                (Some(user), Some(pass)) => client.with_credentials(user.clone(), pass.clone()),
                _ => client,
            },
        )
    }

    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_credentials(mut self, username: String, password: String) -> Self {
        self.credentials = Some((username, password));
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Some((user, pass)) => request.basic_auth(user, Some(pass)),
            None => request,
        }
    }

    /// Checks that the server answers
    pub async fn ping(&self) -> Result<(), ExportError> {
        let response = self
            .authorize(self.http.get(self.ping_url.clone()))
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            tracing::debug!("InfluxDB ping answered with {}", status);
            Ok(())
        } else {
            Err(ExportError::Rejected {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }

    /// Writes one point
    pub async fn write_point(&self, point: &Point) -> Result<(), ExportError> {
        if point.encodable_fields() == 0 {
            return Err(ExportError::EmptyPoint(point.measurement().to_string()));
        }

        let line = point.to_line_protocol();
        tracing::trace!("Writing line: {}", line);

        let response = self
            .authorize(self.http.post(self.write_url.clone()))
            .query(&[("db", self.database.as_str()), ("precision", "ns")])
            .body(line)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(
                "Wrote {} fields to {}/{}",
                point.encodable_fields(),
                self.database,
                point.measurement()
            );
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ExportError::Rejected {
                status: status.as_u16(),
                body: body.trim().to_string(),
            })
        }
    }

    /// Writes the snapshot as a single point of the configured measurement
    pub async fn write_snapshot(&self, snapshot: &StatsSnapshot) -> Result<(), ExportError> {
        let point = Point::from_snapshot(self.measurement.clone(), &self.tags, snapshot);
        self.write_point(&point).await
    }
}

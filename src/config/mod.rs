// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Configuration module for Plusnet Exporter application
//!
//! Loads configuration from command line flags, falling back to environment
//! variables (and a `.env` file loaded by the binary).

use std::time::Duration;

use clap::{ArgAction, Parser};
use reqwest::Url;

use crate::error::AppError;


/// Default configuration values
pub mod defaults {
    pub const ROUTER_IP: &str = "192.168.1.254";
    pub const INFLUXDB_DATABASE: &str = "plusnet_router";
    pub const INFLUXDB_MEASUREMENT: &str = "data_stats";
    pub const INFLUXDB_PORT: u16 = 8086;
    pub const INTERVAL_SECS: u64 = 15;
    pub const REQUEST_TIMEOUT_SECS: u64 = 3;
}

/// Environment variable names used by the application
pub mod env_vars {
    pub const ROUTER_IP: &str = "PLUSNET_ROUTER_IP";
    pub const ROUTER_PASSWORD: &str = "PLUSNET_ROUTER_PASSWORD";
    pub const INFLUXDB_URL: &str = "PLUSNET_INFLUXDB_URL";
    pub const INFLUXDB_DATABASE: &str = "PLUSNET_INFLUXDB_DATABASE";
    pub const INFLUXDB_MEASUREMENT: &str = "PLUSNET_INFLUXDB_MEASUREMENT";
    pub const INFLUXDB_USERNAME: &str = "PLUSNET_INFLUXDB_USERNAME";
    pub const INFLUXDB_PASSWORD: &str = "PLUSNET_INFLUXDB_PASSWORD";
    pub const INTERVAL: &str = "PLUSNET_INTERVAL";
    pub const REQUEST_TIMEOUT: &str = "PLUSNET_REQUEST_TIMEOUT";
}

/// Application-wide configuration
#[derive(Debug, Clone, Parser)]
#[command(name = "plusnet-exporter", version)]
#[command(about = "Collect stats from a Plusnet Hub One router, and send them to InfluxDB")]
pub struct Config {
    /// Router IP address
    #[arg(long, env = env_vars::ROUTER_IP, default_value = defaults::ROUTER_IP)]
    pub router_ip: String,

    /// Router admin password
    #[arg(long, env = env_vars::ROUTER_PASSWORD, hide_env_values = true)]
    pub router_password: String,

    /// InfluxDB URL
    #[arg(long, env = env_vars::INFLUXDB_URL)]
    pub influxdb_url: String,

    /// InfluxDB database to write to
    #[arg(long, env = env_vars::INFLUXDB_DATABASE, default_value = defaults::INFLUXDB_DATABASE)]
    pub influxdb_database: String,

    /// Measurement name for the written points
    #[arg(long, env = env_vars::INFLUXDB_MEASUREMENT, default_value = defaults::INFLUXDB_MEASUREMENT)]
    pub influxdb_measurement: String,

    /// InfluxDB username
    #[arg(long, env = env_vars::INFLUXDB_USERNAME, requires = "influxdb_password")]
    pub influxdb_username: Option<String>,

    /// InfluxDB password
    #[arg(long, env = env_vars::INFLUXDB_PASSWORD, hide_env_values = true)]
    pub influxdb_password: Option<String>,

    /// Stats collection interval in seconds
    #[arg(long, env = env_vars::INTERVAL, default_value_t = defaults::INTERVAL_SECS)]
    pub interval: u64,

    /// Timeout for each HTTP request in seconds
    #[arg(long, env = env_vars::REQUEST_TIMEOUT, default_value_t = defaults::REQUEST_TIMEOUT_SECS)]
    pub request_timeout: u64,

    /// Be verbose (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    /// Validates values clap cannot check on its own
    pub fn validate(&self) -> Result<(), AppError> {
        if self.router_password.is_empty() {
            return Err(AppError::Config(
                "Router password cannot be empty".to_string(),
            ));
        }

        if self.interval == 0 {
            return Err(AppError::Config(
                "Interval must be at least 1 second".to_string(),
            ));
        }

        if self.request_timeout == 0 {
            return Err(AppError::Config(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }

        if self.influxdb_database.trim().is_empty() {
            return Err(AppError::Config(
                "InfluxDB database name cannot be empty".to_string(),
            ));
        }

        if self.influxdb_measurement.trim().is_empty() {
            return Err(AppError::Config(
                "InfluxDB measurement name cannot be empty".to_string(),
            ));
        }

        self.router_base_url()?;
        self.influxdb_base_url()?;

        Ok(())
    }

    /// Address of the router's CGI entry point
    pub fn router_base_url(&self) -> Result<Url, AppError> {
        let host = self.router_ip.trim();
        if host.is_empty() || host.contains('/') {
            return Err(AppError::Config(format!(
                "Invalid router address '{}': expected 'host' or 'host:port'",
                self.router_ip
            )));
        }

        Url::parse(&format!("http://{host}/index.cgi")).map_err(|e| {
            AppError::Config(format!("Invalid router address '{}': {}", self.router_ip, e))
        })
    }

    /// InfluxDB base URL, always ending with `/`
    ///
    /// A bare host such as `localhost` becomes `http://localhost:8086/`.
    pub fn influxdb_base_url(&self) -> Result<Url, AppError> {
        let raw = self.influxdb_url.trim();
        let has_scheme = raw.contains("://");
        let candidate = if has_scheme {
            raw.to_string()
        } else {
            format!("http://{raw}")
        };

        let mut url = Url::parse(&candidate)
            .map_err(|e| AppError::Config(format!("Invalid InfluxDB URL '{}': {}", raw, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "Invalid InfluxDB URL '{}': scheme must be http or https",
                raw
            )));
        }

        if !has_scheme && url.port().is_none() {
            url.set_port(Some(defaults::INFLUXDB_PORT)).map_err(|()| {
                AppError::Config(format!("Invalid InfluxDB URL '{}': cannot set port", raw))
            })?;
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(url)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Password rendered as asterisks for log output
    pub fn masked_password(&self) -> String {
        "*".repeat(self.router_password.chars().count())
    }
}

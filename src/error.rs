// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Error types for Plusnet Exporter application

use thiserror::Error;

/// Failure to obtain a router session
#[derive(Debug, Error)]
pub enum AuthError {
    /// Router did not answer or the request timed out
    #[error("router unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// Router refuses new sessions until old ones expire
    #[error("too many sessions open on the router, please wait")]
    TooManySessions,

    /// Login page layout did not match
    #[error("login page has no '{0}' field")]
    MissingFormField(&'static str),

    /// Router served the login form again after the password was posted
    #[error("router rejected the admin password")]
    Rejected,

    /// Router did not issue a session cookie
    #[error("router did not set a session cookie")]
    NoSessionCookie,
}

/// Failure to read statistics from the router
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Network or HTTP error
    #[error("status page request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Router answered with the login page
    #[error("router session expired")]
    SessionExpired,

    /// Status page lacks an expected row
    #[error("status page has no '{0}' entry")]
    MissingField(&'static str),

    /// Row present but its value could not be parsed
    #[error("cannot parse {field} from '{value}'")]
    Malformed { field: &'static str, value: String },
}

/// Failure to write a point to InfluxDB
#[derive(Debug, Error)]
pub enum ExportError {
    /// Network or HTTP error
    #[error("InfluxDB request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// InfluxDB answered with a non-success status
    #[error("InfluxDB rejected the write ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// Line protocol requires at least one field
    #[error("point '{0}' has no fields")]
    EmptyPoint(String),
}

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error, fatal at startup
    #[error("Configuration error: {0}")]
    Config(String),

    /// Router login failed
    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthError),

    /// Router statistics could not be collected
    #[error("Scrape error: {0}")]
    Scrape(#[from] ScrapeError),

    /// Point could not be written
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Collection task panicked or was cancelled
    #[error("Collection task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Convenient alias for Result with application error
pub type Result<T> = std::result::Result<T, AppError>;

// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! High-level Hub One client

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::Url;
use reqwest::cookie::{CookieStore, Jar};

use super::auth::LoginForm;
use super::parse::{is_password_protected, parse_status_page};
use super::session::{Session, session_id_from_cookies};
use crate::config::Config;
use crate::error::{AppError, AuthError, ScrapeError};
use crate::metrics::StatsSnapshot;

/// `active_page` of the connection information page
const STATUS_ACTIVE_PAGE: &str = "9143";

/// Plusnet Hub One web UI client
///
/// Logs in through the admin form and scrapes the connection information
/// page. Holds no session itself; callers keep the [`Session`] returned by
/// [`HubClient::login`].
#[derive(Debug, Clone)]
pub struct HubClient {
    base_url: Url,
    password: String,
    timeout: Duration,
}

impl HubClient {
    /// Creates a client for the CGI entry point, e.g. `http://192.168.1.254/index.cgi`
    #[must_use]
    pub fn new(base_url: Url, password: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url,
            password: password.into(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Ok(Self::new(
            config.router_base_url()?,
            config.router_password.clone(),
            config.request_timeout(),
        ))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn status_url(&self) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("active_page", STATUS_ACTIVE_PAGE);
        url
    }

    /// Logs in with the admin password
    ///
    /// Every call starts from an empty cookie jar, so no earlier session is
    /// needed or reused.
    ///
    /// # Errors
    ///
    /// Returns an error if the router is unreachable, refuses new sessions,
    /// serves an unexpected login page, or rejects the password.
    pub async fn login(&self) -> Result<Session, AuthError> {
        let jar = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(jar.clone())
            .timeout(self.timeout)
            .build()
            .map_err(AuthError::Unreachable)?;

        tracing::trace!("Requesting login page from {}", self.base_url);
        // Unauthenticated requests for the status page are answered with the login form
        let login_page = http
            .get(self.status_url())
            .send()
            .await
            .map_err(AuthError::Unreachable)?
            .text()
            .await
            .map_err(AuthError::Unreachable)?;

        let form = LoginForm::parse(&login_page)?;

        let response = http
            .post(self.base_url.clone())
            .form(&form.submission(&self.password))
            .send()
            .await
            .map_err(AuthError::Unreachable)?
            .text()
            .await
            .map_err(AuthError::Unreachable)?;

        if is_password_protected(&response) {
            tracing::trace!("Login page served again after posting the password");
            return Err(AuthError::Rejected);
        }

        let id = jar
            .cookies(&self.base_url)
            .and_then(|header| header.to_str().ok().and_then(session_id_from_cookies))
            .ok_or(AuthError::NoSessionCookie)?;

        tracing::info!("Authorized successfully with cookie: {}", id);
        Ok(Session::new(http, id))
    }

    /// Reads the connection information page with an authorised session
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::SessionExpired`] when the router answers with the
    /// login page; the caller should log in again. Layout changes surface as
    /// [`ScrapeError::MissingField`] or [`ScrapeError::Malformed`].
    pub async fn fetch_stats(&self, session: &Session) -> Result<StatsSnapshot, ScrapeError> {
        let page = session
            .http()
            .get(self.status_url())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        if is_password_protected(&page) {
            tracing::warn!("Cookie expired, must login again: {}", session.id());
            return Err(ScrapeError::SessionExpired);
        }

        let collected_at = Utc::now();
        let stats = parse_status_page(&page, collected_at)?;
        tracing::info!(
            "Transmitted: {} bytes, received: {} bytes",
            stats.total_tx,
            stats.total_rx
        );
        tracing::debug!("Parsed router stats: {:?}", stats);

        Ok(StatsSnapshot::from_stats(&stats, collected_at))
    }
}

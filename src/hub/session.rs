// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Authenticated router session

use tokio::time::Instant;

/// Name of the cookie the Hub One uses to identify a logged-in client
pub const SESSION_COOKIE: &str = "rg_cookie_session_id";

/// Router login state
///
/// Owns the HTTP client whose cookie jar carries the authorised session
/// cookie. Dropping the session forgets the cookie.
#[derive(Debug)]
pub struct Session {
    http: reqwest::Client,
    id: String,
    established_at: Instant,
}

impl Session {
    pub(crate) fn new(http: reqwest::Client, id: String) -> Self {
        Self {
            http,
            id,
            established_at: Instant::now(),
        }
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Value of the session cookie
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn established_at(&self) -> Instant {
        self.established_at
    }
}

/// Finds the session cookie in a `Cookie` header value
pub(crate) fn session_id_from_cookies(header: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}

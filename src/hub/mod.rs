// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Plusnet Hub One web UI client module
//!
//! Logs in through the router's admin form and reads line statistics from
//! the connection information page.

mod auth;
mod client;
mod parse;
mod session;
mod types;

// Re-export public types and functions
pub use client::HubClient;
pub use parse::parse_status_page;
pub use session::{SESSION_COOKIE, Session};
pub use types::HubStats;

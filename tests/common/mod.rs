// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Fake Hub One and InfluxDB servers for integration tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Form, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;

pub const STATUS_PAGE: &str = include_str!("../fixtures/hub_one_status.html");
pub const LOGIN_PAGE: &str = include_str!("../fixtures/hub_one_login.html");

/// `auth_key` embedded in the login page fixture
pub const AUTH_KEY: &str = "1234567890";
pub const PASSWORD: &str = "hunter2";

/// Page after a successful login; carries its own `auth_key` for later forms
const HOME_PAGE: &str = r#"<html><body><p>Hub One home</p>
<form method="post"><input type="hidden" name="auth_key" value="987654321"></form>
</body></html>"#;

const TOO_MANY_SESSIONS: &str =
    "No more than 100 sessions at a time are allowed. Please wait until open sessions expire.";

pub async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Address nothing listens on
pub async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == "rg_cookie_session_id").then(|| value.to_string())
        })
}

#[derive(Default)]
pub struct HubState {
    next_session: u32,
    authorized: HashSet<String>,
    pub logins: u32,
    pub status_requests: u32,
    pub too_many_sessions: bool,
    pub broken_login_page: bool,
    pub without_cookies: bool,
}

/// Minimal Hub One: cookie sessions, md5 login form, status page
#[derive(Clone, Default)]
pub struct FakeHub {
    pub state: Arc<Mutex<HubState>>,
}

impl FakeHub {
    pub async fn start() -> (Self, SocketAddr) {
        let hub = Self::default();
        let app = Router::new()
            .route("/index.cgi", get(status_page).post(login))
            .with_state(hub.clone());
        let addr = serve(app).await;
        (hub, addr)
    }

    pub fn expire_sessions(&self) {
        self.state.lock().unwrap().authorized.clear();
    }

    pub fn logins(&self) -> u32 {
        self.state.lock().unwrap().logins
    }

    pub fn set_too_many_sessions(&self) {
        self.state.lock().unwrap().too_many_sessions = true;
    }

    pub fn set_broken_login_page(&self) {
        self.state.lock().unwrap().broken_login_page = true;
    }

    /// Serves pages and accepts logins without ever setting a session cookie
    pub fn set_without_cookies(&self) {
        self.state.lock().unwrap().without_cookies = true;
    }
}

async fn status_page(State(hub): State<FakeHub>, headers: HeaderMap) -> Response {
    let mut state = hub.state.lock().unwrap();
    state.status_requests += 1;

    if state.too_many_sessions {
        return Html(format!("<html><body><p>{TOO_MANY_SESSIONS}</p></body></html>"))
            .into_response();
    }
    if state.broken_login_page {
        return Html("<html><body>Maintenance</body></html>").into_response();
    }

    if state.without_cookies {
        return Html(LOGIN_PAGE).into_response();
    }

    match session_cookie(&headers) {
        Some(id) if state.authorized.contains(&id) => Html(STATUS_PAGE).into_response(),
        Some(_) => Html(LOGIN_PAGE).into_response(),
        None => {
            state.next_session += 1;
            let cookie = format!("rg_cookie_session_id={}; path=/", state.next_session);
            ([(header::SET_COOKIE, cookie)], Html(LOGIN_PAGE)).into_response()
        }
    }
}

async fn login(
    State(hub): State<FakeHub>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let expected = hex::encode(md5::compute(format!("{PASSWORD}{AUTH_KEY}")).0);
    let mut state = hub.state.lock().unwrap();
    state.logins += 1;

    let valid = form.get("active_page").map(String::as_str) == Some("9148")
        && form.get("auth_key").map(String::as_str) == Some(AUTH_KEY)
        && form.get("post_token").is_some()
        && form.get("md5_pass") == Some(&expected);

    match (valid, session_cookie(&headers)) {
        (true, Some(id)) => {
            state.authorized.insert(id);
            Html(HOME_PAGE).into_response()
        }
        (true, None) if state.without_cookies => Html(HOME_PAGE).into_response(),
        _ => Html(LOGIN_PAGE).into_response(),
    }
}

/// One request received by the fake `/write` endpoint
#[derive(Debug, Clone)]
pub struct Write {
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub body: String,
}

#[derive(Default)]
pub struct InfluxState {
    pub writes: Vec<Write>,
    pub pings: u32,
    pub reject: Option<(StatusCode, String)>,
}

/// Minimal InfluxDB 1.x HTTP API
#[derive(Clone, Default)]
pub struct FakeInflux {
    pub state: Arc<Mutex<InfluxState>>,
}

impl FakeInflux {
    pub async fn start() -> (Self, SocketAddr) {
        let influx = Self::default();
        let app = Router::new()
            .route("/write", axum::routing::post(write))
            .route("/ping", get(ping))
            .with_state(influx.clone());
        let addr = serve(app).await;
        (influx, addr)
    }

    pub fn writes(&self) -> Vec<Write> {
        self.state.lock().unwrap().writes.clone()
    }

    pub fn reject_with(&self, status: StatusCode, body: &str) {
        self.state.lock().unwrap().reject = Some((status, body.to_string()));
    }
}

async fn write(
    State(influx): State<FakeInflux>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let mut state = influx.state.lock().unwrap();
    if let Some((status, message)) = state.reject.clone() {
        return (status, message).into_response();
    }
    state.writes.push(Write {
        query,
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    StatusCode::NO_CONTENT.into_response()
}

async fn ping(State(influx): State<FakeInflux>) -> Response {
    let mut state = influx.state.lock().unwrap();
    state.pings += 1;
    if let Some((status, message)) = state.reject.clone() {
        return (status, message).into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

/// Splits a line protocol line into series, fields and timestamp
pub fn parse_line(line: &str) -> (String, HashMap<String, String>, i64) {
    let mut parts = line.trim().split(' ');
    let series = parts.next().unwrap().to_string();
    let fields = parts
        .next()
        .unwrap()
        .split(',')
        .map(|kv| {
            let (k, v) = kv.split_once('=').unwrap();
            (k.to_string(), v.to_string())
        })
        .collect();
    let timestamp = parts.next().unwrap().parse().unwrap();
    (series, fields, timestamp)
}

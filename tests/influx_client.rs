// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

mod common;

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use common::FakeInflux;
use plusnet_exporter::{ExportError, FieldValue, InfluxClient, Point, StatsSnapshot};
use reqwest::Url;

fn client(addr: SocketAddr) -> InfluxClient {
    InfluxClient::new(
        Url::parse(&format!("http://{addr}/")).unwrap(),
        "plusnet_router",
        "data_stats",
        Duration::from_secs(3),
    )
    .unwrap()
    .with_tag("router", "192.168.1.254")
}

fn example_snapshot() -> StatsSnapshot {
    StatsSnapshot::at(
        Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        BTreeMap::from([
            ("uptime_seconds".to_string(), FieldValue::Integer(12345)),
            ("downstream_rate".to_string(), FieldValue::Float(80.5)),
        ]),
    )
}

#[tokio::test]
async fn write_snapshot_sends_exactly_one_point() {
    let (influx, addr) = FakeInflux::start().await;

    client(addr).write_snapshot(&example_snapshot()).await.unwrap();

    let writes = influx.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].query.get("db").unwrap(), "plusnet_router");
    assert_eq!(writes[0].query.get("precision").unwrap(), "ns");
    assert!(writes[0].authorization.is_none());
    assert_eq!(
        writes[0].body,
        "data_stats,router=192.168.1.254 downstream_rate=80.5,uptime_seconds=12345i 1700000000000000000"
    );

    let (_, fields, timestamp) = common::parse_line(&writes[0].body);
    assert_eq!(fields.len(), 2);
    assert_eq!(timestamp, 1_700_000_000_000_000_000);
}

#[tokio::test]
async fn rejected_write_reports_status_and_body() {
    let (influx, addr) = FakeInflux::start().await;
    influx.reject_with(StatusCode::NOT_FOUND, "database not found: \"plusnet_router\"\n");

    let err = client(addr)
        .write_snapshot(&example_snapshot())
        .await
        .unwrap_err();

    match err {
        ExportError::Rejected { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "database not found: \"plusnet_router\"");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn credentials_are_sent_as_basic_auth() {
    let (influx, addr) = FakeInflux::start().await;
    let client = client(addr).with_credentials("admin".to_string(), "secret".to_string());

    client
        .write_point(&Point::new("data_stats").field("uptime_seconds", 1i64))
        .await
        .unwrap();

    assert_eq!(
        influx.writes()[0].authorization.as_deref(),
        Some("Basic YWRtaW46c2VjcmV0")
    );
}

#[tokio::test]
async fn ping_reaches_the_server() {
    let (influx, addr) = FakeInflux::start().await;

    client(addr).ping().await.unwrap();

    assert_eq!(influx.state.lock().unwrap().pings, 1);
}

#[tokio::test]
async fn failing_ping_reports_status_and_body() {
    let (influx, addr) = FakeInflux::start().await;
    influx.reject_with(StatusCode::SERVICE_UNAVAILABLE, "starting up\n");

    let err = client(addr).ping().await.unwrap_err();

    match err {
        ExportError::Rejected { status, body } => {
            assert_eq!(status, 503);
            assert!(body.starts_with("starting up"), "got {body:?}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(influx.state.lock().unwrap().pings, 1);
}

#[tokio::test]
async fn unreachable_database_is_reported() {
    let addr = common::closed_addr().await;

    let err = client(addr)
        .write_snapshot(&example_snapshot())
        .await
        .unwrap_err();

    assert!(matches!(err, ExportError::Http(_)), "got {err:?}");
}

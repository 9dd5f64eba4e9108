// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use thermolog_core::{Reading, ReadingService, SeriesAggregator};
use thermolog_server::chart::HtmlChartRenderer;
use thermolog_server::db::SqliteStore;
use thermolog_server::routes::{self, AppState, NO_DATA, Service};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

struct TestServer {
    port: u16,
    service: Arc<Service>,
    client: reqwest::Client,
}

impl TestServer {
    async fn start() -> Self {
        let store = Arc::new(
            SqliteStore::open(":memory:", Duration::from_secs(2))
                .expect("Failed to open in-memory database"),
        );
        Self::start_with(store, Duration::from_secs(5)).await
    }

    async fn start_with(store: Arc<SqliteStore>, request_timeout: Duration) -> Self {
        let service = Arc::new(ReadingService::new(
            store,
            HtmlChartRenderer::new("Test chart"),
            SeriesAggregator::default(),
        ));
        let app = routes::router(AppState {
            service: Arc::clone(&service),
            request_timeout,
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let port = listener.local_addr().expect("No local addr").port();

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        Self {
            port,
            service,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request")
    }

    async fn get_text(&self, path: &str) -> (u16, String) {
        let resp = self.get(path).await;
        let status = resp.status().as_u16();
        (status, resp.text().await.expect("Failed to read body"))
    }

    async fn push(&self, inside: &str, outside: &str, humidity: &str) -> (u16, String) {
        self.get_text(&format!(
            "/pushtemp?inside={inside}&outside={outside}&humidity={humidity}"
        ))
        .await
    }

    /// Stores a reading with an explicit timestamp, bypassing the clock.
    fn seed(&self, at: DateTime<Utc>, inside: f64, outside: f64, humidity: f64) {
        self.service
            .append(&Reading::new(at, inside, outside, humidity))
            .expect("Failed to seed reading");
    }
}

fn base() -> DateTime<Utc> {
    DateTime::from_timestamp(1_741_946_400, 0).unwrap()
}

// ---------------------------------------------------------------------------
// Ingest
// ---------------------------------------------------------------------------

#[tokio::test]
async fn push_stores_reading() {
    let server = TestServer::start().await;
    let (status, body) = server.push("21.5", "8.25", "47").await;

    assert_eq!(status, 200);
    assert_eq!(body, "Data added");
    assert_eq!(server.service.pipeline().store().reading_count().unwrap(), 1);
}

#[tokio::test]
async fn push_accepts_post() {
    let server = TestServer::start().await;
    let resp = server
        .client
        .post(server.url("/pushtemp?inside=20&outside=10&humidity=50"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(server.service.pipeline().store().reading_count().unwrap(), 1);
}

#[tokio::test]
async fn push_with_unparsable_value_returns_400() {
    let server = TestServer::start().await;
    let (status, body) = server.push("warm", "10", "50").await;

    assert_eq!(status, 400);
    assert!(body.contains("\"inside\""));
    assert_eq!(server.service.pipeline().store().reading_count().unwrap(), 0);
}

#[tokio::test]
async fn push_with_missing_value_returns_400() {
    let server = TestServer::start().await;
    let (status, body) = server.get_text("/pushtemp?inside=20&outside=10").await;

    assert_eq!(status, 400);
    assert!(body.contains("humidity"));
}

// ---------------------------------------------------------------------------
// Chart
// ---------------------------------------------------------------------------

#[tokio::test]
async fn chart_without_readings_reports_no_data() {
    let server = TestServer::start().await;
    assert_eq!(server.get_text("/").await, (200, NO_DATA.to_owned()));
}

#[tokio::test]
async fn chart_renders_aligned_series() {
    let server = TestServer::start().await;
    server.seed(base(), 20.0, 10.0, 50.0);
    server.seed(base() + TimeDelta::seconds(10), 22.0, 12.0, 55.0);

    let resp = server.get("/").await;
    assert_eq!(resp.status(), 200);
    let content_type = resp.headers()["content-type"].to_str().unwrap().to_owned();
    assert!(content_type.starts_with("text/html"));

    let html = resp.text().await.unwrap();
    assert!(html.contains(r#"["10:00:00","10:00:10"]"#));
    assert!(html.contains("[20.0,22.0]"));
    assert!(html.contains("min: 19.8,"));
    assert!(html.contains("max: 22.2\n"));
}

#[tokio::test]
async fn repeated_chart_requests_are_identical() {
    let server = TestServer::start().await;
    server.push("20", "10", "50").await;

    let (_, first) = server.get_text("/").await;
    let (_, second) = server.get_text("/").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn push_after_cached_chart_is_reflected() {
    let server = TestServer::start().await;
    server.seed(base(), 20.0, 10.0, 50.0);
    let (_, before) = server.get_text("/").await;
    assert!(before.contains("(1 readings)"));
    assert!(server.service.pipeline().cache().get().is_some());

    let (status, _) = server.push("22", "12", "55").await;
    assert_eq!(status, 200);

    let (_, after) = server.get_text("/").await;
    assert!(after.contains("(2 readings)"));
}

#[tokio::test]
async fn implausible_only_reading_gives_no_data() {
    let server = TestServer::start().await;
    server.push("45", "10", "50").await;

    assert_eq!(server.get_text("/").await, (200, NO_DATA.to_owned()));
    assert_eq!(server.get_text("/gettemp").await, (200, NO_DATA.to_owned()));
}

// ---------------------------------------------------------------------------
// Dump, reset, last update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dump_lists_raw_series() {
    let server = TestServer::start().await;
    server.seed(base(), 20.0, 10.0, 50.0);
    server.seed(base() + TimeDelta::seconds(5), 3.0, 41.0, 50.0);
    server.seed(base() + TimeDelta::seconds(10), 22.0, 12.0, 55.0);

    let (status, body) = server.get_text("/gettemp").await;
    assert_eq!(status, 200);
    assert_eq!(body, " 20.00 22.00\n 10.00 12.00\n 50.00 55.00");
}

#[tokio::test]
async fn reset_clears_chart_and_allows_fresh_start() {
    let server = TestServer::start().await;
    server.push("20", "10", "50").await;
    server.get_text("/").await;

    assert_eq!(server.get_text("/resettemp").await, (200, "Drop ok".to_owned()));
    assert_eq!(server.get_text("/").await, (200, NO_DATA.to_owned()));
    assert_eq!(server.get_text("/lastupdate").await, (200, NO_DATA.to_owned()));

    server.push("21", "9", "52").await;
    let (status, html) = server.get_text("/").await;
    assert_eq!(status, 200);
    assert!(html.contains("(1 readings)"));
}

#[tokio::test]
async fn reset_accepts_post() {
    let server = TestServer::start().await;
    server.push("20", "10", "50").await;

    let resp = server
        .client
        .post(server.url("/resettemp"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(server.service.pipeline().store().reading_count().unwrap(), 0);
}

#[tokio::test]
async fn last_update_reports_age_of_newest_reading() {
    let server = TestServer::start().await;
    server.seed(Utc::now() - TimeDelta::seconds(3725), 20.0, 10.0, 50.0);

    let (status, body) = server.get_text("/lastupdate").await;
    assert_eq!(status, 200);
    assert!(
        body.starts_with("Last update was 01:02:0"),
        "unexpected body: {body}"
    );
}

#[tokio::test]
async fn health_is_ok() {
    let server = TestServer::start().await;
    assert_eq!(server.get_text("/health").await, (200, "ok".to_owned()));
}

// ---------------------------------------------------------------------------
// Deadlines
// ---------------------------------------------------------------------------

#[tokio::test]
async fn write_stuck_behind_a_locked_database_times_out_without_touching_cache() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("thermolog.db");
    let path = path.to_str().unwrap();
    let store = Arc::new(SqliteStore::open(path, Duration::from_secs(5)).unwrap());
    let server = TestServer::start_with(Arc::clone(&store), Duration::from_millis(200)).await;

    server.seed(base(), 20.0, 10.0, 50.0);
    let (_, before) = server.get_text("/").await;
    assert!(before.contains("(1 readings)"));
    let cache = server.service.pipeline().cache();
    let generation = cache.generation();

    let blocker = rusqlite::Connection::open(path).unwrap();
    blocker.execute_batch("BEGIN EXCLUSIVE").unwrap();

    let (status, body) = server.push("22", "12", "55").await;
    assert_eq!(status, 500);
    assert!(body.contains("timed out"), "unexpected body: {body}");
    assert_eq!(cache.generation(), generation);
    assert_eq!(server.get_text("/").await.1, before);

    // The abandoned insert is still waiting on SQLite and lands once the
    // lock is gone; its invalidation follows the commit.
    blocker.execute_batch("ROLLBACK").unwrap();
    for _ in 0..50 {
        if store.reading_count().unwrap() == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(store.reading_count().unwrap(), 2);
    assert!(cache.generation() > generation);
    assert!(server.get_text("/").await.1.contains("(2 readings)"));
}

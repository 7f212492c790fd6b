//! API integration tests against the in-process router.

mod common;

use axum::http::StatusCode;
use common::TestFixture;
use transit_pulse_core::{testing::ScriptedStatusSource, Status, CATALOG};

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/health").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");

    let response = fixture.get("/healthz").await;
    assert_status!(response, StatusCode::OK);
}

#[tokio::test]
async fn test_config_is_sanitized() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/config").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["cache"]["backend"], "memory");
    assert_eq!(response.body["cache"]["redis_url_configured"], false);
    assert!(response.body["cache"].get("redis_url").is_none());
    assert_eq!(response.body["cache"]["ttl_secs"], 180);
    assert_eq!(response.body["forecast"]["horizon_minutes"], 15);
}

#[tokio::test]
async fn test_lines_sorted() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/lines").await;
    assert_status!(response, StatusCode::OK);

    let lines: Vec<String> = serde_json::from_value(response.body).unwrap();
    assert_eq!(lines.len(), CATALOG.len());
    let mut sorted = lines.clone();
    sorted.sort();
    assert_eq!(lines, sorted);
    assert!(lines.contains(&"SIR".to_string()));
}

#[tokio::test]
async fn test_status_empty_before_first_cycle() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/status").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body, serde_json::json!([]));
}

#[tokio::test]
async fn test_status_after_cycle() {
    let fixture = TestFixture::new();
    assert!(fixture.run_cycle().await.is_complete());

    let response = fixture.get("/api/v1/status").await;
    assert_status!(response, StatusCode::OK);

    let entries = response.body.as_array().unwrap();
    assert_eq!(entries.len(), CATALOG.len());
    assert_eq!(entries[0]["line"], CATALOG[0]);

    let l = entries.iter().find(|e| e["line"] == "L").unwrap();
    assert_eq!(l["status"], "DELAYS");
    assert_eq!(l["message"], "Signal issues near Bedford Ave");
    assert!(l["updated_at"].is_string());

    let a = entries.iter().find(|e| e["line"] == "A").unwrap();
    assert_eq!(a["status"], "GOOD");
    assert!(a["message"].is_null());
}

#[tokio::test]
async fn test_status_cache_failure_is_503() {
    let fixture = TestFixture::new();
    fixture.run_cycle().await;
    fixture.kv.set_failing(true);

    let response = fixture.get("/api/v1/status").await;
    assert_status!(response, StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn test_history_for_forced_delay() {
    let fixture = TestFixture::new();
    fixture.run_cycle().await;

    let response = fixture.get("/api/v1/history?line=l&limit=1").await;
    assert_status!(response, StatusCode::OK);

    let events = response.body.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["line"], "L");
    assert_eq!(events[0]["status"], "DELAYS");
    assert_eq!(events[0]["severity"], 2);
    assert!(events[0]["observed_at"].is_string());
    assert!(events[0]["id"].is_number());
}

#[tokio::test]
async fn test_history_limit_clamped() {
    let fixture = TestFixture::new();
    for _ in 0..3 {
        fixture.run_cycle().await;
    }

    let response = fixture.get("/api/v1/history?line=A&limit=0").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body.as_array().unwrap().len(), 1);

    let response = fixture.get("/api/v1/history?line=A&limit=99999").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body.as_array().unwrap().len(), 3);

    let response = fixture.get("/api/v1/history?line=A").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_history_rejects_bad_line() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/history?line=X").await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].is_string());

    let response = fixture.get("/api/v1/history?line=%20").await;
    assert_status!(response, StatusCode::BAD_REQUEST);

    let response = fixture.get("/api/v1/history").await;
    assert_status!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_history_store_failure_is_503() {
    let fixture = TestFixture::new();
    fixture.store.set_failing(true);

    let response = fixture.get("/api/v1/history?line=L").await;
    assert_status!(response, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_forecast_delayed_line() {
    let fixture = TestFixture::new();
    fixture.run_cycle().await;

    let response = fixture.get("/api/v1/forecast?line=L").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["line"], "L");
    assert_eq!(response.body["horizon_minutes"], 15);
    assert_eq!(response.body["prob_delay"], 0.75);
    assert_eq!(response.body["risk"], "HIGH");
}

#[tokio::test]
async fn test_forecast_horizon_echoed() {
    let fixture = TestFixture::with_source(ScriptedStatusSource::uniform(Status::Planned));
    fixture.run_cycle().await;

    let response = fixture.get("/api/v1/forecast?line=q&horizon_minutes=60").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["line"], "Q");
    assert_eq!(response.body["horizon_minutes"], 60);
    assert_eq!(response.body["prob_delay"], 0.45);
    assert_eq!(response.body["risk"], "MED");
}

#[tokio::test]
async fn test_forecast_cold_cache_is_low() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/forecast?line=L").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["prob_delay"], 0.12);
    assert_eq!(response.body["risk"], "LOW");
}

#[tokio::test]
async fn test_forecast_errors() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/forecast?line=nope").await;
    assert_status!(response, StatusCode::BAD_REQUEST);

    fixture.kv.set_failing(true);
    let response = fixture.get("/api/v1/forecast?line=L").await;
    assert_status!(response, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_scheduler_status() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/scheduler").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["running"], false);
    assert_eq!(response.body["in_flight"], false);
    assert_eq!(response.body["interval_secs"], 30);
    assert_eq!(response.body["cycles_started"], 0);

    fixture.scheduler.trigger().wait().await;

    let response = fixture.get("/api/v1/scheduler").await;
    assert_eq!(response.body["cycles_started"], 1);
    assert_eq!(fixture.store.all_events().len(), CATALOG.len());
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new();
    fixture.run_cycle().await;
    fixture.get("/api/v1/status").await;

    let (status, body) = fixture.get_raw("/api/v1/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("pulse_ingest_cycles_total"));
    assert!(body.contains("pulse_cache_reads_total"));
    assert!(body.contains("pulse_http_requests_total"));
    assert!(body.contains("pulse_scheduler_running"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/does-not-exist").await;
    assert_status!(response, StatusCode::NOT_FOUND);
}

//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process router
//! with mock backends injected, enabling end-to-end API testing without a
//! Redis server or a long-running scheduler.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use transit_pulse_core::{
    testing::{MockEventStore, MockKvStore, ScriptedStatusSource},
    CacheConfig, Config, CycleOutcome, DatabaseConfig, ForecastConfig, GeneratorConfig,
    IngestScheduler, SchedulerConfig, ServerConfig, Status, TransitPulse,
};

/// Re-export fixtures for test convenience
pub use transit_pulse_core::testing::fixtures;

/// Test fixture for API testing with mock backends.
///
/// Provides an in-process router with fully controllable mocks for:
/// - Snapshot cache (MockKvStore)
/// - Event store (MockEventStore)
/// - Status draws (ScriptedStatusSource)
///
/// The scheduler is constructed but not started; tests run cycles explicitly.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_status_after_cycle() {
///     let fixture = TestFixture::new();
///     fixture.run_cycle().await;
///
///     let response = fixture.get("/api/v1/status").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Pipeline behind the router
    pub pulse: Arc<TransitPulse>,
    /// Scheduler behind the router (not started)
    pub scheduler: Arc<IngestScheduler>,
    /// Mock cache backend - toggle failures
    pub kv: Arc<MockKvStore>,
    /// Mock event store - toggle failures, inspect rows
    pub store: Arc<MockEventStore>,
    /// Temporary directory backing the configured database path
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Fixture whose source pins line L to DELAYS and everything else to GOOD.
    pub fn new() -> Self {
        Self::with_source(ScriptedStatusSource::all_good().with_line("L", Status::Delays, 3))
    }

    /// Fixture driven by a custom status source.
    pub fn with_source(source: ScriptedStatusSource) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            database: DatabaseConfig::new(db_path),
            cache: CacheConfig::default(),
            scheduler: SchedulerConfig::default(),
            generator: GeneratorConfig::default(),
            forecast: ForecastConfig::default(),
        };

        let kv = Arc::new(MockKvStore::new());
        let store = Arc::new(MockEventStore::new());

        let pulse = Arc::new(fixtures::pulse(source, kv.clone(), store.clone()));
        let scheduler = Arc::new(IngestScheduler::new(
            config.scheduler.clone(),
            pulse.clone(),
        ));

        let state = Arc::new(transit_pulse_server::state::AppState::new(
            config,
            Arc::clone(&pulse),
            Arc::clone(&scheduler),
        ));

        let router = transit_pulse_server::api::create_router(state);

        Self {
            router,
            pulse,
            scheduler,
            kv,
            store,
            temp_dir,
        }
    }

    /// Run one ingest cycle directly.
    pub async fn run_cycle(&self) -> CycleOutcome {
        self.pulse.run_ingest_cycle().await
    }

    /// Send a GET request to the test router.
    pub async fn get(&self, path: &str) -> TestResponse {
        let (status, body) = self.get_raw(path).await;
        let body: Value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }

    /// Send a GET request and return the body as text.
    pub async fn get_raw(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, String::from_utf8_lossy(&body_bytes).into_owned())
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

//! Health check handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::api::state::AppState;
use crate::error::ErrorCode;

/// Liveness probe - always returns 200 if the service is running.
pub async fn health() -> Json<Value> {
    Json(json!({
        "code": 0,
        "message": "success",
        "data": {
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION")
        }
    }))
}

/// Readiness probe - not ready while the clock is behind the last allocation.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let clock_ok = state.generator.is_clock_sane();

    let status_code = if clock_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = Json(json!({
        "code": if clock_ok { 0 } else { ErrorCode::SERVICE_UNAVAILABLE.as_i32() },
        "message": if clock_ok { "success" } else { "service unavailable" },
        "data": {
            "ready": clock_ok,
            "components": {
                "clock": clock_ok
            }
        }
    }));

    (status_code, response)
}

/// Prometheus metrics endpoint.
pub async fn metrics(State(state): State<AppState>) -> String {
    let mut output = String::new();

    output.push_str("# HELP timeline_up Whether the service is up\n");
    output.push_str("# TYPE timeline_up gauge\n");
    output.push_str("timeline_up 1\n");

    if let Some(handle) = &state.metrics {
        output.push_str(&handle.render());
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::AppConfig;
    use crate::domain::EPOCH;
    use crate::service::SharedGenerator;
    use crate::service::clock::manual::ManualClock;

    fn test_state() -> AppState {
        AppState::new(
            Arc::new(AppConfig::default()),
            Arc::new(SharedGenerator::system(1).unwrap()),
        )
    }

    #[tokio::test]
    async fn test_health() {
        let Json(body) = health().await;
        assert_eq!(body["code"], 0);
        assert_eq!(body["data"]["status"], "healthy");
    }

    #[tokio::test]
    async fn test_ready_with_sane_clock() {
        let state = test_state();
        state.generator.next_id().unwrap();

        let (status, Json(body)) = ready(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["ready"], true);
        assert_eq!(body["data"]["components"]["clock"], true);
    }

    #[tokio::test]
    async fn test_ready_while_clock_lags() {
        let clock = Arc::new(ManualClock::new(EPOCH + 100));
        let generator = Arc::new(SharedGenerator::with_clock(1, clock.clone()).unwrap());
        let state = AppState::new(Arc::new(AppConfig::default()), generator);
        state.generator.next_id().unwrap();

        clock.set(EPOCH + 95);
        let (status, Json(body)) = ready(State(state.clone())).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], 5003);
        assert_eq!(body["data"]["ready"], false);
        assert_eq!(body["data"]["components"]["clock"], false);

        clock.set(EPOCH + 100);
        let (status, Json(body)) = ready(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 0);
    }

    #[tokio::test]
    async fn test_metrics_without_recorder() {
        let output = metrics(State(test_state())).await;
        assert!(output.contains("timeline_up 1"));
    }
}

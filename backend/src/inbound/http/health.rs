//! Health endpoints: liveness and readiness probes for orchestration, plus
//! the public `GET /api/health` status document.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Message reported by `GET /api/health`.
pub const HEALTH_MESSAGE: &str = "Foodies API is running!";

/// Shared health state for readiness and liveness checks.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Create a new health state starting as not ready but live.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Flag the service as unhealthy so liveness checks fail fast during
    /// shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Return readiness state.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Return liveness state.
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn probe_response(probe_ok: bool) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };

        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish()
    }
}

/// Body of `GET /api/health`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    #[schema(example = "OK")]
    pub status: &'static str,
    #[schema(example = "Foodies API is running!")]
    pub message: &'static str,
    /// RFC 3339 time of the response.
    pub timestamp: String,
}

/// Readiness probe. Return 200 once the server can handle traffic and 503
/// otherwise.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is not ready")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_ready())
}

/// Liveness probe. Return 200 while the process is marked alive and 503 once
/// draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_alive())
}

/// Public API status.
#[utoipa::path(
    get,
    path = "/api/health",
    tags = ["health"],
    responses((status = 200, description = "API is running", body = HealthStatus))
)]
#[get("/health")]
pub async fn api_health() -> HttpResponse {
    HttpResponse::Ok().json(HealthStatus {
        status: "OK",
        message: HEALTH_MESSAGE,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use actix_web::{App, http::StatusCode, test};
    use rstest::rstest;
    use serde_json::Value;

    fn get_request(uri: &str) -> actix_http::Request {
        test::TestRequest::get().uri(uri).to_request()
    }

    #[rstest]
    #[actix_web::test]
    async fn probes_follow_state() {
        let state = web::Data::new(HealthState::new());
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(ready)
                .service(live),
        )
        .await;

        let res = test::call_service(&app, get_request("/health/ready")).await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

        state.mark_ready();
        let res = test::call_service(&app, get_request("/health/ready")).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers()
                .get(header::CACHE_CONTROL)
                .and_then(|v| v.to_str().ok()),
            Some("no-store")
        );

        state.mark_unhealthy();
        let res = test::call_service(&app, get_request("/health/live")).await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[rstest]
    #[actix_web::test]
    async fn api_health_reports_running() {
        let app =
            test::init_service(App::new().service(web::scope("/api").service(api_health))).await;
        let body: Value = test::call_and_read_body_json(&app, get_request("/api/health")).await;

        assert_eq!(body["status"], "OK");
        assert_eq!(body["message"], HEALTH_MESSAGE);
        let timestamp = body["timestamp"].as_str().expect("timestamp string");
        chrono::DateTime::parse_from_rfc3339(timestamp).expect("RFC 3339 timestamp");
    }
}

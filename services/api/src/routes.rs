use crate::infra::{log_snapshot, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use fleetcare::fleet::report::views::{DashboardReport, FleetHighlights};
use fleetcare::fleet::{FleetReport, FleetSnapshot, IntervalOrdering};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// The three list-endpoint payloads plus report options.
#[derive(Debug, Deserialize)]
pub(crate) struct FleetReportRequest {
    #[serde(flatten)]
    pub(crate) snapshot: FleetSnapshot,
    /// Overrides the configured interval ordering when present.
    #[serde(default)]
    pub(crate) sort_intervals_by_date: Option<bool>,
}

impl FleetReportRequest {
    fn ordering(&self, fallback: IntervalOrdering) -> IntervalOrdering {
        self.sort_intervals_by_date
            .map(IntervalOrdering::from_sort_flag)
            .unwrap_or(fallback)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct FleetReportResponse {
    #[serde(flatten)]
    pub(crate) report: FleetReport,
    pub(crate) highlights: FleetHighlights,
}

pub(crate) fn fleet_router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/reports/fleet", post(fleet_report_endpoint))
        .route("/api/v1/reports/dashboard", post(dashboard_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn fleet_report_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<FleetReportRequest>,
) -> Json<FleetReportResponse> {
    let ordering = payload.ordering(state.interval_ordering);
    log_snapshot(&payload.snapshot, ordering);

    let report = payload.snapshot.report(ordering);
    let highlights = report.highlights();
    Json(FleetReportResponse { report, highlights })
}

pub(crate) async fn dashboard_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<FleetReportRequest>,
) -> Json<DashboardReport> {
    let ordering = payload.ordering(state.interval_ordering);
    log_snapshot(&payload.snapshot, ordering);

    Json(payload.snapshot.report(ordering).dashboard())
}

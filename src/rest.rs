//! HTTP JSON API over the analysis pipeline.
//!
//! One analyzer shared across requests (the model bundle is immutable
//! after load), plus a host-side cache of the last report so exports
//! do not re-run the analysis. Pipeline failures map to structured
//! error bodies and appropriate status codes; the server process never
//! crashes on a failed run.

use crate::error::AnalysisError;
use crate::pipeline::Analyzer;
use crate::render::{charts, csv, BAR_CHART_FILE, CSV_FILE, PIE_CHART_FILE};
use crate::report::AnalysisReport;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    analyzer: Arc<Analyzer>,
    last: Arc<RwLock<Option<AnalysisReport>>>,
}

impl AppState {
    pub fn new(analyzer: Arc<Analyzer>) -> Self {
        Self {
            analyzer,
            last: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build the axum router with all endpoints.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/v1/analyze", post(handle_analyze))
        .route("/api/v1/report", get(handle_report))
        .route("/api/v1/export", get(handle_export))
        .layer(cors)
        .with_state(state)
}

/// Start the API server on the given port.
pub async fn start(port: u16, analyzer: Arc<Analyzer>) -> anyhow::Result<()> {
    let app = router(AppState::new(analyzer));
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!("linkscope API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

#[derive(Debug, Deserialize)]
struct AnalyzeParams {
    url: String,
    #[serde(default)]
    extended: bool,
}

async fn handle_analyze(
    State(state): State<AppState>,
    Json(params): Json<AnalyzeParams>,
) -> axum::response::Response {
    let input = params.url.trim();
    if input.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "invalid_target", "no URL provided");
    }

    match state.analyzer.analyze_input(input, params.extended).await {
        Ok(report) => {
            // Embed the charts base64 so a browser client can show
            // them without a second round trip.
            let pie = charts::pie_chart_svg(&report.distribution);
            let bar = charts::bar_chart_svg(&report.distribution);
            let body = json!({
                "report": report,
                "charts": {
                    "pie_svg": BASE64.encode(pie.as_bytes()),
                    "bar_svg": BASE64.encode(bar.as_bytes()),
                },
            });
            *state.last.write().await = Some(report);
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            tracing::warn!(input, error = %e, "analysis failed");
            error_response(status_for(&e), e.code(), &e.to_string())
        }
    }
}

async fn handle_report(State(state): State<AppState>) -> axum::response::Response {
    match state.last.read().await.as_ref() {
        Some(report) => (StatusCode::OK, Json(json!({ "report": report }))).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "no_report", "no analysis has run yet"),
    }
}

#[derive(Debug, Deserialize)]
struct ExportQuery {
    /// csv | json | pie | bar
    #[serde(default = "default_format")]
    format: String,
}

fn default_format() -> String {
    "csv".to_string()
}

async fn handle_export(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> axum::response::Response {
    let guard = state.last.read().await;
    let Some(report) = guard.as_ref() else {
        return error_response(StatusCode::NOT_FOUND, "no_report", "no analysis has run yet");
    };

    let (name, body, content_type) = match query.format.as_str() {
        "json" => (
            "report.json",
            serde_json::to_string_pretty(report).unwrap_or_default(),
            "application/json",
        ),
        "pie" => (
            PIE_CHART_FILE,
            charts::pie_chart_svg(&report.distribution),
            "image/svg+xml",
        ),
        "bar" => (
            BAR_CHART_FILE,
            charts::bar_chart_svg(&report.distribution),
            "image/svg+xml",
        ),
        _ => (CSV_FILE, csv::classification_csv(&report.links), "text/csv"),
    };

    let mut headers = HeaderMap::new();
    if let Ok(value) = content_type.parse() {
        headers.insert(header::CONTENT_TYPE, value);
    }
    if let Ok(value) = format!("attachment; filename=\"{name}\"").parse() {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    (StatusCode::OK, headers, body).into_response()
}

fn status_for(e: &AnalysisError) -> StatusCode {
    match e {
        AnalysisError::InvalidTarget(_) => StatusCode::BAD_REQUEST,
        AnalysisError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        AnalysisError::Network { .. } | AnalysisError::Http { .. } => StatusCode::BAD_GATEWAY,
    }
}

fn error_response(status: StatusCode, code: &str, message: &str) -> axum::response::Response {
    (
        status,
        Json(json!({ "error": { "code": code, "message": message } })),
    )
        .into_response()
}

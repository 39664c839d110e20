//! HTTP service module for fraudscope
//!
//! Axum-based server exposing the form page, the multipart prediction
//! endpoint, and plain-JSON health, info, and metrics.

use crate::config::Config;
use crate::error::Result;
use crate::model::ModelPackage;
use crate::render;
use crate::submit::PREDICT_PATH;
use axum::{
    Router,
    body::Body,
    extract::{Multipart, State},
    http::{StatusCode, header},
    middleware,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use std::{cmp::Ordering, collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

/// Shared state for the HTTP service
#[derive(Clone)]
pub struct HttpState {
    pub config: Arc<Config>,
    pub model: Arc<ModelPackage>,
    pub metrics: Arc<Mutex<HttpMetrics>>,
}

impl HttpState {
    pub fn new(config: Arc<Config>, model: Arc<ModelPackage>) -> Self {
        Self {
            config,
            model,
            metrics: Arc::new(Mutex::new(HttpMetrics::new())),
        }
    }
}

/// Metrics for the prediction endpoint
#[derive(Debug, Clone)]
pub struct HttpMetrics {
    pub total_requests: u64,
    pub last_request_unix: u64,
    pub errors_total: u64,
    pub latencies: Vec<f64>, // ring buffer for p95
    pub outcomes: HashMap<String, u64>,
}

impl HttpMetrics {
    fn new() -> Self {
        Self {
            total_requests: 0,
            last_request_unix: std::time::SystemTime::UNIX_EPOCH
                .elapsed()
                .unwrap_or_default()
                .as_secs(),
            errors_total: 0,
            latencies: Vec::with_capacity(256),
            outcomes: HashMap::new(),
        }
    }
}

/// Form page endpoint
pub async fn index_handler(State(state): State<HttpState>) -> Result<Html<String>> {
    Ok(Html(render::render_index(&state.model.features, None)?))
}

/// Prediction endpoint: score the submitted form and re-render the page
/// with the result block present.
pub async fn predict_handler(
    State(state): State<HttpState>,
    mut multipart: Multipart,
) -> Result<Html<String>> {
    let mut fields: HashMap<String, String> = HashMap::new();
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let value = field.text().await?;
        fields.insert(name, value);
    }

    let values = state.model.ordered_values(&fields)?;
    let prediction = state.model.predict(&values);

    {
        let mut metrics = state.metrics.lock().await;
        *metrics
            .outcomes
            .entry(prediction.label().to_string())
            .or_insert(0) += 1;
    }

    tracing::info!(
        probability = prediction.probability,
        is_fraud = prediction.is_fraud,
        "prediction served"
    );

    Ok(Html(render::render_index(
        &state.model.features,
        Some(&prediction),
    )?))
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    "ok"
}

/// Info endpoint
pub async fn info_handler(State(state): State<HttpState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        serde_json::json!({
            "model": {
                "path": state.config.system.model_path,
                "features": state.model.features.len(),
                "threshold": state.model.threshold
            },
            "server": {
                "bind": state.config.runtime.http_bind.to_string(),
                "predict_path": PREDICT_PATH
            }
        })
        .to_string(),
    )
}

/// Metrics endpoint
pub async fn metrics_handler(State(state): State<HttpState>) -> impl IntoResponse {
    let metrics = state.metrics.lock().await.clone();

    let (avg_latency_ms, p95_latency_ms) = if metrics.latencies.is_empty() {
        (None, None)
    } else {
        let sum: f64 = metrics.latencies.iter().sum();
        let avg = sum / metrics.latencies.len() as f64;
        let mut sorted = metrics.latencies.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let p95_idx = (sorted.len() as f64 * 0.95) as usize;
        let p95 = sorted.get(p95_idx).copied();
        (Some(avg), p95)
    };

    let outcomes: Vec<_> = metrics
        .outcomes
        .iter()
        .map(|(label, count)| serde_json::json!({ "label": label, "count": count }))
        .collect();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        serde_json::json!({
            "metrics_version": "1",
            "total_requests": metrics.total_requests,
            "last_request_unix": metrics.last_request_unix,
            "errors_total": metrics.errors_total,
            "avg_latency_ms": avg_latency_ms,
            "p95_latency_ms": p95_latency_ms,
            "outcomes": outcomes
        })
        .to_string(),
    )
}

/// Request-tracking middleware for the prediction endpoint
async fn track_requests(
    State(metrics): State<Arc<Mutex<HttpMetrics>>>,
    req: axum::http::Request<Body>,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let is_predict = req.uri().path() == PREDICT_PATH;
    let start = if is_predict {
        Some(std::time::Instant::now())
    } else {
        None
    };
    let resp = next.run(req).await;
    if let Some(start_time) = start {
        let latency_ms = start_time.elapsed().as_millis() as f64;
        let mut m = metrics.lock().await;
        if latency_ms > 0.0 {
            m.latencies.push(latency_ms);
            if m.latencies.len() > 256 {
                m.latencies.remove(0);
            }
        }
        if !resp.status().is_success() {
            m.errors_total = m.errors_total.saturating_add(1);
        }
        m.total_requests = m.total_requests.saturating_add(1);
        m.last_request_unix = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
    }
    resp
}

/// Build the service router
pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route(PREDICT_PATH, post(predict_handler))
        .route("/health", get(health_handler))
        .route("/info", get(info_handler))
        .route("/metrics", get(metrics_handler))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
        .layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            track_requests,
        ))
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_http_server(config: Arc<Config>, model: Arc<ModelPackage>) -> Result<()> {
    let bind = config.runtime.http_bind;
    let state = HttpState::new(config, model);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind HTTP listener: {}", e))?;

    tracing::info!("Starting HTTP server on {} (predict at {})", bind, PREDICT_PATH);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

    Ok(())
}

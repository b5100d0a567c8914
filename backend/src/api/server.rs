//! HTTP Server for the transformer API.
//!
//! Accepts already-fetched platform payloads and returns normalized records.
//! A failed transform is a regular `200` response with `success: false`.
//!
//! # API Endpoints
//!
//! | Method | Path                     | Description                      |
//! |--------|--------------------------|----------------------------------|
//! | GET    | `/health`                | Health check                     |
//! | GET    | `/api/platforms`         | Registered platforms             |
//! | POST   | `/api/transform/profile` | Normalize one profile payload    |
//! | POST   | `/api/transform/video`   | Normalize one video payload      |
//! | POST   | `/api/transform/batch`   | Normalize a list of payloads     |
//! | GET    | `/api/logs`              | SSE stream for real-time logs    |

use axum::{
    extract::State,
    http::{header, Method},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, log_info, log_info_with, LOG_BROADCASTER};
use super::types::{
    error_response, BatchRequest, BatchResponse, ProfileRequest, TransformResponse, VideoRequest,
};
use crate::error::ServerResult;
use crate::models::{ProfileData, VideoData};
use crate::transform::{transform_profiles, transform_videos, DataTransformer, TransformResult};

type AppState = Arc<DataTransformer>;

/// Build the API router
pub fn router(transformer: DataTransformer) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/platforms", get(platforms))
        .route("/api/transform/profile", post(transform_profile))
        .route("/api/transform/video", post(transform_video))
        .route("/api/transform/batch", post(transform_batch))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
        .with_state(Arc::new(transformer))
}

/// Start the HTTP server
pub async fn start_server(port: u16, transformer: DataTransformer) -> ServerResult<()> {
    let platforms = transformer.registry().platforms().join(", ");
    let app = router(transformer);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    log_info(format!("🚀 Creator analytics API running on http://localhost:{}", port));
    log_info(format!("Platforms: {}", platforms));
    log_info("POST /api/transform/{profile,video,batch} - Normalize payloads");
    log_info("GET  /api/logs - SSE log stream");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "creator-analytics",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn platforms(State(transformer): State<AppState>) -> Json<Value> {
    Json(json!({ "platforms": transformer.registry().platforms() }))
}

async fn transform_profile(
    State(transformer): State<AppState>,
    Json(request): Json<ProfileRequest>,
) -> Json<TransformResponse<TransformResult<ProfileData>>> {
    let result = transformer.transform_profile(
        &request.platform,
        &request.data,
        &request.username,
        &request.profile_url,
    );
    log_result(&request.platform, "profile", result.errors().len());
    Json(TransformResponse::new(result))
}

async fn transform_video(
    State(transformer): State<AppState>,
    Json(request): Json<VideoRequest>,
) -> Json<TransformResponse<TransformResult<VideoData>>> {
    let result = transformer.transform_video(&request.platform, &request.data);
    log_result(&request.platform, "video", result.errors().len());
    Json(TransformResponse::new(result))
}

async fn transform_batch(
    State(transformer): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> Json<Value> {
    let body = match request {
        BatchRequest::Profile { platform, items } => {
            let response = BatchResponse::from(transform_profiles(&transformer, &platform, &items));
            serde_json::to_value(TransformResponse::new(response))
        }
        BatchRequest::Video { platform, items } => {
            let response = BatchResponse::from(transform_videos(&transformer, &platform, &items));
            serde_json::to_value(TransformResponse::new(response))
        }
    };
    Json(body.unwrap_or_else(|e| {
        log_error(format!("Failed to serialize batch response: {}", e));
        error_response(&e.to_string())
    }))
}

fn log_result(platform: &str, kind: &str, error_count: usize) {
    log_info_with(
        format!("{} transform: {} error(s)", kind, error_count),
        json!({ "platform": platform, "kind": kind }),
    );
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

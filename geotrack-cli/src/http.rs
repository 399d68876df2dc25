//! HTTP boundary: routing and error mapping for the track service.
//!
//! The transport layer is deliberately thin. It delivers a validated
//! request object to the service and maps the service's error taxonomy to
//! status codes: invalid bounding boxes are the client's fault (400), store
//! faults are ours (500). Cache faults never appear here; the service
//! swallows them.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use geotrack::{BoundingBox, FeatureCollection, QueryError, TrackService};

/// Bind and serve until ctrl-c.
pub async fn serve(service: TrackService, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(Arc::new(service));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Build the application router.
pub fn router(service: Arc<TrackService>) -> Router {
    Router::new()
        .route("/gps-points", post(gps_points))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn gps_points(
    State(service): State<Arc<TrackService>>,
    Json(bbox): Json<BoundingBox>,
) -> Result<Json<FeatureCollection>, ApiError> {
    let collection = service.gps_points(&bbox).await?;
    Ok(Json(collection))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install ctrl-c handler");
    }
}

/// Query error wrapped for response mapping.
struct ApiError(QueryError);

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            QueryError::InvalidBoundingBox(_) => StatusCode::BAD_REQUEST,
            QueryError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({ "detail": self.0.to_string() }));
        (status, body).into_response()
    }
}

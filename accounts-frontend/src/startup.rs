use axum::{
    middleware::from_fn,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{
    access::{navigation, permissions},
    app::{health_check, index},
    metrics::metrics,
    session::current_session,
    units::{create_record, delete_record, unit_page, update_record},
};
use crate::middleware::{metrics_middleware, request_id_middleware, RequestId};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/api/session", get(current_session))
        .route("/api/permissions", get(permissions))
        .route("/api/navigation", get(navigation))
        .route("/units/:slug", get(unit_page))
        .route("/units/:slug/records", post(create_record))
        .route(
            "/units/:slug/records/:id",
            put(update_record).delete(delete_record),
        )
        .route_layer(from_fn(metrics_middleware))
        // Add tracing layer
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .extensions()
                    .get::<RequestId>()
                    .map(|id| id.0.as_str())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

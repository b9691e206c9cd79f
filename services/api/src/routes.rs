use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use property_search::accommodations::{
    accommodation_router, AccommodationMapper, AccommodationRepository, AccommodationService,
    UserLookup,
};
use property_search::identity::{identity_router, IdentityService, UserAccountRepository};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Identity and accommodation routes plus the operational endpoints.
pub(crate) fn application_routes<R, S, U, M>(
    identity: Arc<IdentityService<R>>,
    accommodations: Arc<AccommodationService<S, U, M>>,
    shutdown: CancellationToken,
) -> Router
where
    R: UserAccountRepository + 'static,
    S: AccommodationRepository + 'static,
    U: UserLookup + 'static,
    M: AccommodationMapper + 'static,
{
    let sessions = identity.sessions();

    identity_router(identity)
        .merge(accommodation_router(accommodations, sessions, shutdown))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    if state.readiness.load(Ordering::Relaxed) {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "initializing" })),
        )
    }
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

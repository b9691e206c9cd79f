use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{LoginForm, RegistrationForm};
use super::repository::UserAccountRepository;
use super::service::{IdentityError, IdentityService};
use super::session::bearer_token;

/// Router builder exposing registration, login, logout and the current account.
pub fn identity_router<R>(service: Arc<IdentityService<R>>) -> Router
where
    R: UserAccountRepository + 'static,
{
    Router::new()
        .route("/api/v1/identity/register", post(register_handler::<R>))
        .route("/api/v1/identity/login", post(login_handler::<R>))
        .route("/api/v1/identity/logout", post(logout_handler::<R>))
        .route("/api/v1/identity/me", get(me_handler::<R>))
        .with_state(service)
}

pub(crate) async fn register_handler<R>(
    State(service): State<Arc<IdentityService<R>>>,
    Json(form): Json<RegistrationForm>,
) -> Response
where
    R: UserAccountRepository + 'static,
{
    match service.register(form).await {
        Ok(account) => (StatusCode::CREATED, Json(account)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn login_handler<R>(
    State(service): State<Arc<IdentityService<R>>>,
    Json(form): Json<LoginForm>,
) -> Response
where
    R: UserAccountRepository + 'static,
{
    match service.login(form).await {
        Ok(session) => (StatusCode::OK, Json(session)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn logout_handler<R>(
    State(service): State<Arc<IdentityService<R>>>,
    headers: HeaderMap,
) -> Response
where
    R: UserAccountRepository + 'static,
{
    match bearer_token(&headers) {
        Some(token) => {
            service.sign_out(token);
            StatusCode::NO_CONTENT.into_response()
        }
        None => unauthorized(),
    }
}

pub(crate) async fn me_handler<R>(
    State(service): State<Arc<IdentityService<R>>>,
    headers: HeaderMap,
) -> Response
where
    R: UserAccountRepository + 'static,
{
    let Some(token) = bearer_token(&headers) else {
        return unauthorized();
    };
    match service.current_account(token).await {
        Ok(Some(account)) => (StatusCode::OK, Json(account)).into_response(),
        Ok(None) => unauthorized(),
        Err(error) => error_response(error),
    }
}

fn unauthorized() -> Response {
    let payload = json!({ "error": "authentication required" });
    (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
}

/// Form errors go back to the client; anything else is an unhandled fault.
fn error_response(error: IdentityError) -> Response {
    match error.errors() {
        Some(errors) => {
            let payload = json!({ "errors": errors });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        None => {
            tracing::error!(%error, "identity operation failed");
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

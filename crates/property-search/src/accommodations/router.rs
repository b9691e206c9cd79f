use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::domain::{Accommodation, AccommodationId, UserId};
use super::error::AccommodationServiceError;
use super::mapper::AccommodationMapper;
use super::repository::{AccommodationRepository, RepositoryError, UserLookup};
use super::service::AccommodationService;
use crate::identity::session::{bearer_token, SessionStore};

/// Listing fields accepted from clients. The owner always comes from the session.
#[derive(Debug, Clone, Deserialize)]
pub struct AccommodationForm {
    pub title: String,
    pub description: String,
    pub price: i32,
}

/// Shared state for the accommodation routes.
pub struct AccommodationRoutes<S, U, M> {
    pub(crate) service: Arc<AccommodationService<S, U, M>>,
    pub(crate) sessions: Arc<SessionStore>,
    pub(crate) shutdown: CancellationToken,
}

impl<S, U, M> Clone for AccommodationRoutes<S, U, M> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            sessions: Arc::clone(&self.sessions),
            shutdown: self.shutdown.clone(),
        }
    }
}

/// Router builder exposing browse and landlord management endpoints.
///
/// Requests observe a child of `shutdown`, so cancelling it aborts in-flight storage calls.
pub fn accommodation_router<S, U, M>(
    service: Arc<AccommodationService<S, U, M>>,
    sessions: Arc<SessionStore>,
    shutdown: CancellationToken,
) -> Router
where
    S: AccommodationRepository + 'static,
    U: UserLookup + 'static,
    M: AccommodationMapper + 'static,
{
    let state = AccommodationRoutes {
        service,
        sessions,
        shutdown,
    };

    Router::new()
        .route(
            "/api/v1/accommodations",
            get(list_handler::<S, U, M>).post(create_handler::<S, U, M>),
        )
        .route(
            "/api/v1/accommodations/:accommodation_id",
            get(get_handler::<S, U, M>)
                .put(update_handler::<S, U, M>)
                .delete(delete_handler::<S, U, M>),
        )
        .with_state(state)
}

pub(crate) async fn list_handler<S, U, M>(
    State(routes): State<AccommodationRoutes<S, U, M>>,
) -> Response
where
    S: AccommodationRepository + 'static,
    U: UserLookup + 'static,
    M: AccommodationMapper + 'static,
{
    let cancel = routes.shutdown.child_token();
    match routes.service.list_accommodations(&cancel).await {
        Ok(accommodations) => (StatusCode::OK, Json(accommodations)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<S, U, M>(
    State(routes): State<AccommodationRoutes<S, U, M>>,
    Path(accommodation_id): Path<Uuid>,
) -> Response
where
    S: AccommodationRepository + 'static,
    U: UserLookup + 'static,
    M: AccommodationMapper + 'static,
{
    let cancel = routes.shutdown.child_token();
    let id = AccommodationId(accommodation_id);
    match routes.service.get_accommodation(id, &cancel).await {
        Ok(Some(accommodation)) => (StatusCode::OK, Json(accommodation)).into_response(),
        Ok(None) => not_found(id),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_handler<S, U, M>(
    State(routes): State<AccommodationRoutes<S, U, M>>,
    headers: HeaderMap,
    Json(form): Json<AccommodationForm>,
) -> Response
where
    S: AccommodationRepository + 'static,
    U: UserLookup + 'static,
    M: AccommodationMapper + 'static,
{
    let user_id = match authenticated_user(&routes.sessions, &headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };

    let accommodation = form.into_accommodation(AccommodationId::new(), user_id);
    let cancel = routes.shutdown.child_token();
    match routes
        .service
        .create_accommodation(&accommodation, &cancel)
        .await
    {
        Ok(true) => (StatusCode::CREATED, Json(accommodation)).into_response(),
        Ok(false) => {
            let payload = json!({ "error": "accommodation was not stored" });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<S, U, M>(
    State(routes): State<AccommodationRoutes<S, U, M>>,
    Path(accommodation_id): Path<Uuid>,
    headers: HeaderMap,
    Json(form): Json<AccommodationForm>,
) -> Response
where
    S: AccommodationRepository + 'static,
    U: UserLookup + 'static,
    M: AccommodationMapper + 'static,
{
    let user_id = match authenticated_user(&routes.sessions, &headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };

    let id = AccommodationId(accommodation_id);
    let accommodation = form.into_accommodation(id, user_id);
    let cancel = routes.shutdown.child_token();
    match routes
        .service
        .update_accommodation(&accommodation, &cancel)
        .await
    {
        Ok(true) => (StatusCode::OK, Json(accommodation)).into_response(),
        Ok(false) => not_found(id),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<S, U, M>(
    State(routes): State<AccommodationRoutes<S, U, M>>,
    Path(accommodation_id): Path<Uuid>,
    headers: HeaderMap,
) -> Response
where
    S: AccommodationRepository + 'static,
    U: UserLookup + 'static,
    M: AccommodationMapper + 'static,
{
    let user_id = match authenticated_user(&routes.sessions, &headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };

    let id = AccommodationId(accommodation_id);
    let cancel = routes.shutdown.child_token();
    match routes
        .service
        .delete_accommodation(user_id, id, &cancel)
        .await
    {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found(id),
        Err(error) => error_response(error),
    }
}

impl AccommodationForm {
    fn into_accommodation(self, id: AccommodationId, user_id: UserId) -> Accommodation {
        Accommodation {
            id,
            title: self.title,
            description: self.description,
            user_id,
            price: self.price,
        }
    }
}

fn authenticated_user(sessions: &SessionStore, headers: &HeaderMap) -> Result<UserId, Response> {
    bearer_token(headers)
        .and_then(|token| sessions.resolve(token))
        .ok_or_else(|| {
            let payload = json!({ "error": "authentication required" });
            (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
        })
}

fn not_found(id: AccommodationId) -> Response {
    let payload = json!({
        "error": "accommodation not found",
        "accommodation_id": id,
    });
    (StatusCode::NOT_FOUND, Json(payload)).into_response()
}

pub(crate) fn error_response(error: AccommodationServiceError) -> Response {
    let status = match &error {
        AccommodationServiceError::Validation(validation) => {
            let payload = json!({
                "error": error.to_string(),
                "errors": validation.messages(),
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
        AccommodationServiceError::UserNotFound(_) => StatusCode::NOT_FOUND,
        AccommodationServiceError::UserValidation(_) => StatusCode::FORBIDDEN,
        AccommodationServiceError::Repository(RepositoryError::Cancelled) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        AccommodationServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AccommodationServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

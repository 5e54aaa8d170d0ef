//! Registration endpoint.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{debug, error, instrument};

use super::flow::{self, RegisterFields, RegisterOutcome};
use super::session::session_cookie;
use super::state::AuthState;
use super::store::PgStore;
use super::types::{FieldError, RegisterRequest, SessionResponse};

pub(super) const DUPLICATE_EMAIL_MESSAGE: &str =
    "That email is already in use. Please try again using another.";

#[utoipa::path(
    post,
    path = "/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created and session started", body = SessionResponse),
        (status = 400, description = "Invalid input", body = [FieldError]),
        (status = 409, description = "Email already in use"),
        (status = 500, description = "Registration failed")
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn register(
    store: Extension<Arc<PgStore>>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<RegisterRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Invalid request body").into_response();
    };

    let fields = RegisterFields {
        first_name: request.first_name,
        last_name: request.last_name,
        email: request.email,
        password: request.password,
    };

    let store = store.0.as_ref();
    match flow::register(store, store, fields).await {
        RegisterOutcome::Success(session) => {
            let Ok(cookie) = session_cookie(auth_state.config(), &session.token) else {
                error!("Failed to build session cookie");
                return (StatusCode::INTERNAL_SERVER_ERROR, "Registration failed").into_response();
            };
            let mut headers = HeaderMap::new();
            headers.insert(SET_COOKIE, cookie);
            let response = SessionResponse {
                account_id: session.data.account_id,
                first_name: session.data.first_name,
            };
            (StatusCode::CREATED, headers, Json(response)).into_response()
        }
        RegisterOutcome::DuplicateEmail => {
            debug!("Registration rejected: email already in use");
            (StatusCode::CONFLICT, DUPLICATE_EMAIL_MESSAGE).into_response()
        }
        RegisterOutcome::ValidationFailed(errors) => {
            (StatusCode::BAD_REQUEST, Json(errors)).into_response()
        }
        RegisterOutcome::StoreError => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Registration failed").into_response()
        }
    }
}

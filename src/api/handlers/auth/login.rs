//! Login endpoint.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{debug, error, instrument};

use super::flow::{self, LoginCredentials, LoginOutcome};
use super::session::{clear_session_cookie, extract_session_token, session_cookie};
use super::state::AuthState;
use super::store::PgStore;
use super::types::{FieldError, LoginRequest, SessionResponse};

// Unknown email and wrong password collapse into one message so the response
// leaks nothing about which emails have accounts.
pub(super) const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session started", body = SessionResponse),
        (status = 400, description = "Invalid input", body = [FieldError]),
        (status = 401, description = "Invalid email or password"),
        (status = 500, description = "Login failed")
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    headers: HeaderMap,
    store: Extension<Arc<PgStore>>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Invalid request body").into_response();
    };

    let credentials = LoginCredentials {
        email: request.email,
        password: request.password,
    };
    let current_token = extract_session_token(&headers);

    let store = store.0.as_ref();
    match flow::login(store, store, current_token.as_deref(), credentials).await {
        LoginOutcome::Success(session) => {
            let Ok(cookie) = session_cookie(auth_state.config(), &session.token) else {
                error!("Failed to build session cookie");
                return (StatusCode::INTERNAL_SERVER_ERROR, "Login failed").into_response();
            };
            let mut headers = HeaderMap::new();
            headers.insert(SET_COOKIE, cookie);
            let response = SessionResponse {
                account_id: session.data.account_id,
                first_name: session.data.first_name,
            };
            (StatusCode::OK, headers, Json(response)).into_response()
        }
        LoginOutcome::ValidationFailed(errors) => {
            (StatusCode::BAD_REQUEST, Json(errors)).into_response()
        }
        LoginOutcome::UnknownEmail | LoginOutcome::WrongPassword => {
            debug!("Login rejected: invalid credentials");
            (StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS_MESSAGE).into_response()
        }
        LoginOutcome::StoreError => {
            // The flow already cleared the caller's session; drop the cookie too.
            let mut headers = HeaderMap::new();
            if let Ok(cookie) = clear_session_cookie(auth_state.config()) {
                headers.insert(SET_COOKIE, cookie);
            }
            (StatusCode::INTERNAL_SERVER_ERROR, headers, "Login failed").into_response()
        }
    }
}

//! The authenticated account view.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::instrument;

use super::flow::{self, AccountViewOutcome};
use super::session::{clear_session_cookie, extract_session_token};
use super::state::AuthState;
use super::store::PgStore;
use super::types::AccountViewResponse;

#[utoipa::path(
    get,
    path = "/v1/account",
    responses(
        (status = 200, description = "Account view for the session holder", body = AccountViewResponse),
        (status = 401, description = "No active session")
    ),
    tag = "account"
)]
#[instrument(skip_all)]
pub async fn account(
    headers: HeaderMap,
    store: Extension<Arc<PgStore>>,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    let token = extract_session_token(&headers);
    let store = store.0.as_ref();

    match flow::load_account_view(store, store, store, token.as_deref()).await {
        AccountViewOutcome::Authenticated(view) => {
            (StatusCode::OK, Json(AccountViewResponse::from(view))).into_response()
        }
        AccountViewOutcome::Unauthenticated => {
            // An invalid or expired token gets its record and cookie cleared.
            flow::logout(store, token.as_deref()).await;
            let mut response_headers = HeaderMap::new();
            if let Ok(cookie) = clear_session_cookie(auth_state.config()) {
                response_headers.insert(SET_COOKIE, cookie);
            }
            (StatusCode::UNAUTHORIZED, response_headers).into_response()
        }
    }
}

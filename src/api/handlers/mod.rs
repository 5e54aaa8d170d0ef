//! API handlers for soiree.

pub mod auth;
pub mod health;

use axum::response::IntoResponse;
use serde_json::json;

/// Root handler, a small landmark for anyone poking at the service.
pub async fn root() -> impl IntoResponse {
    axum::Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::root;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn root_returns_ok() {
        let response = root().await.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }
}

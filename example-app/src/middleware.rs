use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

pub const DEMO_TOKEN: &str = "Bearer trellis-demo";

/// Rejects requests without the demo bearer token.
pub async fn require_token(req: Request, next: Next) -> Response {
    let authorized = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == DEMO_TOKEN);
    if authorized {
        next.run(req).await
    } else {
        tracing::warn!(path = %req.uri().path(), "missing or invalid token");
        StatusCode::UNAUTHORIZED.into_response()
    }
}

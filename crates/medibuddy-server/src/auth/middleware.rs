//! Request gate for protected routes.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::token::TokenIssuer;
use crate::error::{AppError, AppResult};
use crate::result_ext::OptionResultExt;

/// Verify the bearer token and inject the caller's [`Identity`](super::Identity).
///
/// Requests without a valid token are answered with 401 before the handler
/// runs, so no store is touched on their behalf.
pub async fn require_identity(
    State(issuer): State<Arc<TokenIssuer>>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let identity = {
        let token = extract_bearer_token(request.headers())
            .log_none("bearer token on protected route")
            .ok_or_else(|| AppError::Auth("Missing authentication token".to_string()))?;
        issuer.verify(token)?
    };

    tracing::debug!(
        user_id = %identity,
        path = %request.uri().path(),
        "Authenticated request"
    );

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Token from `Authorization: Bearer <token>`.
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

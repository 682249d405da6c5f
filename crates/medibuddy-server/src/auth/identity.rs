//! Typed caller identity.

use axum::{extract::FromRequestParts, http::request::Parts};
use std::fmt;
use uuid::Uuid;

use crate::error::AppError;

/// The user id bound to a verified token.
///
/// Only [`require_identity`](super::middleware::require_identity) puts an
/// `Identity` into request extensions. Handlers take it as an extractor and
/// pass it explicitly to the services they call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity {
    user_id: Uuid,
}

impl Identity {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.user_id.fmt(f)
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .copied()
            .ok_or_else(|| AppError::Auth("Missing authentication token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn test_extracts_identity_from_extensions() {
        let identity = Identity::new(Uuid::new_v4());
        let mut request = Request::builder().body(()).unwrap();
        request.extensions_mut().insert(identity);
        let (mut parts, _) = request.into_parts();

        let extracted = Identity::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted, identity);
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthorized() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        let result = Identity::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Auth(_))));
    }
}

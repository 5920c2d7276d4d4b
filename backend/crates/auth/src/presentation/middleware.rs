//! Request Identity Gate
//!
//! `require_bearer_auth` resolves the `Authorization: Bearer` token to a
//! [`User`] and stores it in the request extensions. Handlers behind the
//! gate read it back with the [`CurrentUser`] extractor and pass it on to
//! their use case explicitly.

use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, Request, header};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

use crate::application::AuthorizeUseCase;
use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthMiddlewareState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }
}

/// The user resolved by the gate for this request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Token from `Authorization: Bearer <token>`; the scheme is case-insensitive.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Middleware that requires a valid access token.
///
/// Any failure short-circuits with 401 before the handler runs.
pub async fn require_bearer_auth<R>(
    State(state): State<AuthMiddlewareState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let token = extract_bearer_token(req.headers())
        .ok_or(AuthError::MissingBearerToken)?
        .to_owned();

    let use_case = AuthorizeUseCase::new(state.repo.clone(), state.config.clone());
    let user = use_case.execute(&token).await.map_err(|e| match e {
        // Unknown subject is still an authentication failure at this boundary
        AuthError::UserNotFound => AuthError::InvalidAccessToken,
        other => other,
    })?;

    tracing::debug!(user_id = %user.user_id, role = %user.user_role, "Request authorized");
    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::MissingBearerToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token(&headers_with("Bearer abc.def")), Some("abc.def"));
        assert_eq!(extract_bearer_token(&headers_with("bearer abc")), Some("abc"));
    }

    #[test]
    fn test_extract_bearer_token_rejects_other_shapes() {
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
        assert_eq!(extract_bearer_token(&headers_with("Basic dXNlcjpwdw==")), None);
        assert_eq!(extract_bearer_token(&headers_with("Bearer")), None);
        assert_eq!(extract_bearer_token(&headers_with("Bearer    ")), None);
        assert_eq!(extract_bearer_token(&headers_with("abc.def")), None);
    }
}

//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    LoginInput, LoginUseCase, RefreshTokenUseCase, RegisterInput, RegisterUseCase, TokenPair,
};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    LoginRequest, MessageResponse, RefreshTokenRequest, RegisterRequest, TokenResponse,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

/// Unwrap a JSON body, turning any extractor rejection into `IncorrectData`.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AuthResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AuthError::IncorrectData(rejection.body_text()))
}

fn bearer_header(pair: &TokenPair) -> [(header::HeaderName, String); 1] {
    [(header::AUTHORIZATION, format!("Bearer {}", pair.access_token))]
}

// ============================================================================
// Register
// ============================================================================

/// POST /auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let req = json_body(payload)?;
    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    let pair = use_case
        .execute(RegisterInput {
            email: req.email,
            password: req.password,
            role: req.role,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        bearer_header(&pair),
        Json(MessageResponse {
            message: pair.message.to_string(),
        }),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let req = json_body(payload)?;
    let use_case = LoginUseCase::new(state.repo.clone(), state.config.clone());

    let pair = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::OK,
        bearer_header(&pair),
        Json(TokenResponse {
            message: pair.message.to_string(),
            refresh_token: pair.refresh_token,
        }),
    ))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /auth/refresh-token
pub async fn refresh_token<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let req = json_body(payload)?;
    let use_case = RefreshTokenUseCase::new(state.repo.clone(), state.config.clone());

    let pair = use_case.execute(req.refresh_token).await?;

    Ok((
        StatusCode::OK,
        bearer_header(&pair),
        Json(TokenResponse {
            message: pair.message.to_string(),
            refresh_token: pair.refresh_token,
        }),
    ))
}

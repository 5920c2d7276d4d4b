//! Crate-level tests for the auth module

#[cfg(test)]
mod fixtures {
    use std::sync::Arc;

    use crate::application::config::AuthConfig;
    use crate::test_support::InMemoryUserRepository;

    pub const SECRET: &[u8] = b"auth-tests-signing-secret";
    pub const PASSWORD: &str = "Blue-Kettle-42";

    pub fn config() -> Arc<AuthConfig> {
        Arc::new(AuthConfig::new(SECRET.to_vec()))
    }

    pub fn repo() -> Arc<InMemoryUserRepository> {
        Arc::new(InMemoryUserRepository::new())
    }
}

#[cfg(test)]
mod use_case_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::fixtures::{PASSWORD, SECRET, config, repo};
    use crate::application::config::AuthConfig;
    use crate::application::{
        AuthorizeUseCase, LoginInput, LoginUseCase, RefreshTokenUseCase, RegisterInput,
        RegisterUseCase, TokenPair,
    };
    use crate::domain::value_object::user_role::UserRole;
    use crate::error::AuthError;
    use crate::test_support::InMemoryUserRepository;
    use platform::token::{TokenCodec, TokenError};

    async fn register(
        repo: &Arc<InMemoryUserRepository>,
        config: &Arc<AuthConfig>,
        email: &str,
        role: &str,
    ) -> Result<TokenPair, AuthError> {
        RegisterUseCase::new(repo.clone(), config.clone())
            .execute(RegisterInput {
                email: email.to_string(),
                password: PASSWORD.to_string(),
                role: role.to_string(),
            })
            .await
    }

    async fn login(
        repo: &Arc<InMemoryUserRepository>,
        config: &Arc<AuthConfig>,
        email: &str,
        password: &str,
    ) -> Result<TokenPair, AuthError> {
        LoginUseCase::new(repo.clone(), config.clone())
            .execute(LoginInput {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
    }

    #[tokio::test]
    async fn test_register_creates_user_and_tokens() {
        let (repo, config) = (repo(), config());

        let pair = register(&repo, &config, "A@X.com", "Author").await.unwrap();
        assert_eq!(pair.message, "Registered successfully");

        let codec = TokenCodec::new(SECRET);
        let refresh = codec.validate(&pair.refresh_token).unwrap();
        assert_eq!(refresh.subject.as_deref(), Some("a@x.com"));

        let access = codec.validate(&pair.access_token).unwrap();
        let user_id = access.subject.unwrap().parse().unwrap();
        let stored = repo.get(&user_id).await.unwrap();
        assert_eq!(stored.email.as_str(), "a@x.com");
        assert_eq!(stored.user_role, UserRole::Author);
        assert_eq!(stored.refresh_token, pair.refresh_token);
        assert_ne!(stored.password_hash.as_phc_string(), PASSWORD);
    }

    #[tokio::test]
    async fn test_register_stores_refresh_expiry_seven_days_out() {
        let (repo, config) = (repo(), config());
        let before = chrono::Utc::now();
        let pair = register(&repo, &config, "a@x.com", "Reader").await.unwrap();

        let access = TokenCodec::new(SECRET).validate(&pair.access_token).unwrap();
        let stored = repo
            .get(&access.subject.unwrap().parse().unwrap())
            .await
            .unwrap();
        let delta = stored.refresh_token_expires_at - before;
        assert!(delta >= chrono::Duration::days(7) - chrono::Duration::seconds(1));
        assert!(delta <= chrono::Duration::days(7) + chrono::Duration::seconds(5));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let (repo, config) = (repo(), config());
        register(&repo, &config, "a@x.com", "Author").await.unwrap();

        let err = register(&repo, &config, "A@x.com", "Reader").await.unwrap_err();
        assert!(matches!(err, AuthError::UserAlreadyExists));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_register_invalid_email_never_touches_directory() {
        let (repo, config) = (repo(), config());

        for bad in ["", "ax.com", "a@x", "a@"] {
            let err = register(&repo, &config, bad, "Author").await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidEmail(_)), "{bad:?}");
        }
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_register_invalid_role() {
        let (repo, config) = (repo(), config());

        for bad in ["Admin", "author", ""] {
            let err = register(&repo, &config, "a@x.com", bad).await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidRole(_)));
        }
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_register_weak_password() {
        let (repo, config) = (repo(), config());
        let err = RegisterUseCase::new(repo.clone(), config.clone())
            .execute(RegisterInput {
                email: "a@x.com".to_string(),
                password: "short".to_string(),
                role: "Author".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::PasswordPolicy(_)));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_login_roundtrip() {
        let (repo, config) = (repo(), config());
        register(&repo, &config, "a@x.com", "Author").await.unwrap();

        let pair = login(&repo, &config, "a@x.com", PASSWORD).await.unwrap();
        assert_eq!(pair.message, "Logged in successfully");

        let refreshed = RefreshTokenUseCase::new(repo.clone(), config.clone())
            .execute(pair.refresh_token.clone())
            .await
            .unwrap();
        assert_eq!(refreshed.refresh_token, pair.refresh_token);
        assert!(TokenCodec::new(SECRET).validate(&refreshed.access_token).is_ok());
    }

    #[tokio::test]
    async fn test_login_invalid_email_format() {
        let (repo, config) = (repo(), config());
        let err = login(&repo, &config, "not-an-email", PASSWORD).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidEmail(_)));
    }

    #[tokio::test]
    async fn test_login_never_reveals_registration() {
        let (repo, config) = (repo(), config());
        register(&repo, &config, "a@x.com", "Author").await.unwrap();

        let wrong_password = login(&repo, &config, "a@x.com", "Wrong-Kettle-42")
            .await
            .unwrap_err();
        let unknown_email = login(&repo, &config, "b@x.com", PASSWORD).await.unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidEmailOrPassword));
        assert!(matches!(unknown_email, AuthError::InvalidEmailOrPassword));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(wrong_password.code(), unknown_email.code());
    }

    #[tokio::test]
    async fn test_login_supersedes_previous_refresh_token() {
        let (repo, config) = (repo(), config());
        let registered = register(&repo, &config, "a@x.com", "Author").await.unwrap();
        let first = login(&repo, &config, "a@x.com", PASSWORD).await.unwrap();
        let second = login(&repo, &config, "a@x.com", PASSWORD).await.unwrap();

        let refresh = RefreshTokenUseCase::new(repo.clone(), config.clone());

        for stale in [registered.refresh_token, first.refresh_token] {
            let err = refresh.execute(stale).await.unwrap_err();
            assert!(matches!(err, AuthError::UserNotFound));
        }
        assert!(refresh.execute(second.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_rejects_bad_tokens_uniformly() {
        let (repo, config) = (repo(), config());
        let pair = register(&repo, &config, "a@x.com", "Author").await.unwrap();
        let refresh = RefreshTokenUseCase::new(repo.clone(), config.clone());

        let foreign = TokenCodec::new(b"another-secret")
            .issue("a@x.com", Duration::from_secs(60))
            .unwrap()
            .token;
        let tampered = format!("{}x", pair.refresh_token);

        for token in [foreign, tampered, "garbage".to_string()] {
            let err = refresh.execute(token).await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidRefreshToken));
        }
    }

    #[tokio::test]
    async fn test_refresh_rejects_expired_token() {
        let repo = repo();
        let mut expiring = AuthConfig::new(SECRET.to_vec());
        expiring.refresh_token_ttl = Duration::ZERO;
        let config = Arc::new(expiring);

        let pair = register(&repo, &config, "a@x.com", "Author").await.unwrap();
        let err = RefreshTokenUseCase::new(repo.clone(), config.clone())
            .execute(pair.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidRefreshToken));
    }

    #[tokio::test]
    async fn test_authorize_resolves_user() {
        let (repo, config) = (repo(), config());
        let pair = register(&repo, &config, "a@x.com", "Reader").await.unwrap();

        let user = AuthorizeUseCase::new(repo.clone(), config.clone())
            .execute(&pair.access_token)
            .await
            .unwrap();
        assert_eq!(user.email.as_str(), "a@x.com");
        assert_eq!(user.user_role, UserRole::Reader);
    }

    #[tokio::test]
    async fn test_authorize_rejects_refresh_token_subject() {
        let (repo, config) = (repo(), config());
        let pair = register(&repo, &config, "a@x.com", "Author").await.unwrap();

        // Refresh tokens carry the email, which is not a user id
        let err = AuthorizeUseCase::new(repo.clone(), config.clone())
            .execute(&pair.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidAccessToken));
    }

    #[tokio::test]
    async fn test_authorize_propagates_token_errors() {
        let (repo, config) = (repo(), config());
        let authorize = AuthorizeUseCase::new(repo.clone(), config.clone());

        let foreign = TokenCodec::new(b"another-secret")
            .issue(&kernel::id::UserId::new().to_string(), Duration::from_secs(60))
            .unwrap();
        assert!(matches!(
            authorize.execute(&foreign.token).await,
            Err(AuthError::Token(TokenError::Invalid(_)))
        ));

        let expired = config.codec().issue("whoever", Duration::ZERO).unwrap();
        assert!(matches!(
            authorize.execute(&expired.token).await,
            Err(AuthError::Token(TokenError::Expired))
        ));
    }

    #[tokio::test]
    async fn test_authorize_unknown_user() {
        let (repo, config) = (repo(), config());
        let token = config
            .codec()
            .issue(&kernel::id::UserId::new().to_string(), Duration::from_secs(60))
            .unwrap();

        let err = AuthorizeUseCase::new(repo.clone(), config.clone())
            .execute(&token.token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::*;
    use kernel::error::app_error::AppError;
    use axum::http::{StatusCode, header};
    use axum::response::IntoResponse;
    use platform::token::TokenError;

    #[test]
    fn test_error_into_response_status_codes() {
        let test_cases: Vec<(AuthError, StatusCode)> = vec![
            (AuthError::InvalidEmail("x".into()), StatusCode::BAD_REQUEST),
            (AuthError::InvalidRole("x".into()), StatusCode::BAD_REQUEST),
            (AuthError::PasswordPolicy("x".into()), StatusCode::BAD_REQUEST),
            (AuthError::IncorrectData("x".into()), StatusCode::BAD_REQUEST),
            (AuthError::InvalidEmailOrPassword, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidRefreshToken, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidAccessToken, StatusCode::UNAUTHORIZED),
            (AuthError::UserNotFound, StatusCode::UNAUTHORIZED),
            (AuthError::MissingBearerToken, StatusCode::UNAUTHORIZED),
            (AuthError::Token(TokenError::Expired), StatusCode::UNAUTHORIZED),
            (
                AuthError::Token(TokenError::Invalid("bad".into())),
                StatusCode::UNAUTHORIZED,
            ),
            (AuthError::UserAlreadyExists, StatusCode::CONFLICT),
            (
                AuthError::Token(TokenError::Signing("boom".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AuthError::PasswordHashing("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AuthError::Database(sqlx::Error::PoolClosed),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AuthError::Internal("test".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            let label = error.to_string();
            let response = error.into_response();
            assert_eq!(response.status(), expected_status, "{label}");
        }
    }

    #[test]
    fn test_unauthorized_carries_bearer_challenge() {
        let response = AuthError::MissingBearerToken.into_response();
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn test_status_code_matches_kind() {
        assert_eq!(
            AuthError::UserAlreadyExists.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(AuthError::InvalidRole("x".into()).code(), "INVALID_ROLE");
        assert_eq!(AuthError::Token(TokenError::Expired).code(), "TOKEN_EXPIRED");
    }

    #[test]
    fn test_app_error_conversion_keeps_code() {
        let app: AppError = AuthError::InvalidEmailOrPassword.into();
        assert_eq!(app.code(), Some("INVALID_EMAIL_OR_PASSWORD"));
        assert!(app.action().is_some());

        let app: AppError = AuthError::Internal("secret detail".into()).into();
        assert!(!app.public_message().contains("secret detail"));
    }
}

#[cfg(test)]
mod dto_tests {
    use crate::presentation::dto::*;

    #[test]
    fn test_register_request_deserialization() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"email":"a@x.com","password":"pw","role":"Author"}"#)
                .unwrap();
        assert_eq!(req.email, "a@x.com");
        assert_eq!(req.role, "Author");
    }

    #[test]
    fn test_refresh_request_is_camel_case() {
        let req: RefreshTokenRequest =
            serde_json::from_str(r#"{"refreshToken":"abc"}"#).unwrap();
        assert_eq!(req.refresh_token, "abc");
        assert!(serde_json::from_str::<RefreshTokenRequest>(r#"{"refresh_token":"abc"}"#).is_err());
    }

    #[test]
    fn test_token_response_serialization() {
        let json = serde_json::to_value(TokenResponse {
            message: "Logged in successfully".into(),
            refresh_token: "r".into(),
        })
        .unwrap();
        assert_eq!(json["refreshToken"], "r");
        assert_eq!(json["message"], "Logged in successfully");
        assert!(json.get("accessToken").is_none());
    }
}

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::fixtures::{PASSWORD, config};
    use crate::presentation::middleware::{AuthMiddlewareState, CurrentUser, require_bearer_auth};
    use crate::presentation::router::auth_router_shared;
    use crate::test_support::InMemoryUserRepository;

    fn app() -> Router {
        let repo = Arc::new(InMemoryUserRepository::new());
        let config = config();
        let gate = AuthMiddlewareState::new(repo.clone(), config.clone());

        let protected = Router::new()
            .route(
                "/me",
                get(|CurrentUser(user): CurrentUser| async move { user.email.to_string() }),
            )
            .route_layer(from_fn_with_state(
                gate,
                require_bearer_auth::<InMemoryUserRepository>,
            ));

        Router::new()
            .nest("/auth", auth_router_shared(repo, config))
            .merge(protected)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn bearer(response: &axum::response::Response) -> String {
        response
            .headers()
            .get(header::AUTHORIZATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    fn register_body(email: &str) -> Value {
        json!({ "email": email, "password": PASSWORD, "role": "Author" })
    }

    #[tokio::test]
    async fn test_register_returns_created_with_header_only() {
        let response = app()
            .oneshot(post_json("/auth/register", register_body("a@x.com")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(bearer(&response).starts_with("Bearer "));

        let body = body_json(response).await;
        assert_eq!(body["message"], "Registered successfully");
        assert!(body.get("refreshToken").is_none());
    }

    #[tokio::test]
    async fn test_register_conflict() {
        let app = app();
        app.clone()
            .oneshot(post_json("/auth/register", register_body("a@x.com")))
            .await
            .unwrap();

        let response = app
            .oneshot(post_json("/auth/register", register_body("a@x.com")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["code"], "USER_ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn test_malformed_json_is_incorrect_data() {
        let request = Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "INCORRECT_DATA");

        let response = app()
            .oneshot(post_json("/auth/register", json!({ "email": "a@x.com" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_refresh_and_gate() {
        let app = app();
        app.clone()
            .oneshot(post_json("/auth/register", register_body("a@x.com")))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(post_json(
                "/auth/login",
                json!({ "email": "a@x.com", "password": PASSWORD }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let access = bearer(&response);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Logged in successfully");
        let refresh_token = body["refreshToken"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(post_json(
                "/auth/refresh-token",
                json!({ "refreshToken": refresh_token }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let refreshed_access = bearer(&response);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Refresh tokens successfully");
        assert_eq!(body["refreshToken"], refresh_token.as_str());

        for token in [access, refreshed_access] {
            let request = Request::builder()
                .uri("/me")
                .header(header::AUTHORIZATION, token)
                .body(Body::empty())
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert_eq!(&bytes[..], b"a@x.com");
        }
    }

    #[tokio::test]
    async fn test_gate_rejects_missing_and_bad_tokens() {
        let app = app();

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));

        for value in ["Bearer not-a-jwt", "Basic abc", "Bearer "] {
            let request = Request::builder()
                .uri("/me")
                .header(header::AUTHORIZATION, value)
                .body(Body::empty())
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{value}");
        }
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_identical() {
        let app = app();
        app.clone()
            .oneshot(post_json("/auth/register", register_body("a@x.com")))
            .await
            .unwrap();

        let wrong = app
            .clone()
            .oneshot(post_json(
                "/auth/login",
                json!({ "email": "a@x.com", "password": "Wrong-Kettle-42" }),
            ))
            .await
            .unwrap();
        let unknown = app
            .oneshot(post_json(
                "/auth/login",
                json!({ "email": "nobody@x.com", "password": PASSWORD }),
            ))
            .await
            .unwrap();

        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(wrong).await, body_json(unknown).await);
    }
}

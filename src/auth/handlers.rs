use axum::{
    extract::State,
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{
            Ack, AuthResponse, FacebookLoginRequest, ForgotPasswordRequest, GoogleLoginRequest,
            LoginRequest, RegisterRequest, ResetPasswordRequest, SocialProfile,
        },
        errors::{AuthError, ErrorBody},
        extractors::{BearerToken, JsonBody},
        services::{self, SocialProvider},
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/login/google", post(google_login))
        .route("/login/facebook", post(facebook_login))
        .route("/register", post(register))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", put(reset_password))
}

type SocialError = (StatusCode, Json<ErrorBody>);

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let input = payload.validate()?;
    Ok(Json(services::login(&state, input).await?))
}

#[instrument(skip(state, payload))]
pub async fn google_login(
    State(state): State<AppState>,
    payload: Result<JsonBody<GoogleLoginRequest>, AuthError>,
) -> Result<Json<AuthResponse>, SocialError> {
    let profile = payload.and_then(|JsonBody(body)| body.validate());
    social(&state, SocialProvider::Google, profile).await
}

#[instrument(skip(state, payload))]
pub async fn facebook_login(
    State(state): State<AppState>,
    payload: Result<JsonBody<FacebookLoginRequest>, AuthError>,
) -> Result<Json<AuthResponse>, SocialError> {
    let profile = payload.and_then(|JsonBody(body)| body.validate());
    social(&state, SocialProvider::Facebook, profile).await
}

async fn social(
    state: &AppState,
    provider: SocialProvider,
    profile: Result<SocialProfile, AuthError>,
) -> Result<Json<AuthResponse>, SocialError> {
    let outcome = match profile {
        Ok(profile) => services::social_login(state, provider, profile).await,
        Err(e) => Err(e),
    };
    outcome
        .map(Json)
        .map_err(|e| e.into_response_with(StatusCode::BAD_REQUEST))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<Json<Ack>, AuthError> {
    let input = payload.validate()?;
    Ok(Json(services::register(&state, input).await?))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ForgotPasswordRequest>,
) -> Result<Json<Ack>, AuthError> {
    let email = payload.validate()?;
    Ok(Json(services::request_password_reset(&state, email).await?))
}

#[instrument(skip(state, bearer, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    BearerToken(bearer): BearerToken,
    JsonBody(payload): JsonBody<ResetPasswordRequest>,
) -> Result<Json<Ack>, AuthError> {
    let input = payload.validate(bearer)?;
    Ok(Json(services::confirm_password_reset(&state, input).await?))
}

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{SignInRequest, SignInResponse, SignUpRequest, SignUpResponse},
        error::AuthError,
        services,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/sign-up", post(sign_up))
        .route("/auth/sign-in", post(sign_in))
}

#[instrument(skip(state, payload))]
pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<Json<SignUpResponse>, AuthError> {
    let Json(payload) = payload?;
    services::register(state.users.as_ref(), payload).await?;
    Ok(Json(SignUpResponse { success: true }))
}

#[instrument(skip(state, payload))]
pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<Json<SignInResponse>, AuthError> {
    let Json(payload) = payload?;
    let user = services::authenticate(state.users.as_ref(), payload).await?;
    Ok(Json(SignInResponse {
        success: true,
        user: user.into(),
    }))
}

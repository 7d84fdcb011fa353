use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{LoginForm, SignUpForm, UserDto},
    extractors::AuthUser,
    jwt::JwtKeys,
    services,
};
use crate::{error::AppError, extract::FormPayload, state::AppState};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/user/SignUp", post(sign_up))
        .route("/api/user/signup", post(sign_up))
        .route("/api/user/login", post(login))
        .route("/api/user/me", get(get_me).delete(delete_me))
}

#[instrument(skip(state, form))]
pub async fn sign_up(
    State(state): State<AppState>,
    FormPayload(form): FormPayload<SignUpForm>,
) -> Result<String, AppError> {
    let keys = JwtKeys::from_ref(&state);
    services::sign_up(state.store.as_ref(), &keys, form).await
}

#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    FormPayload(form): FormPayload<LoginForm>,
) -> Result<String, AppError> {
    let keys = JwtKeys::from_ref(&state);
    services::login(state.store.as_ref(), &keys, form).await
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserDto>, AppError> {
    services::profile(state.store.as_ref(), user_id).await.map(Json)
}

#[instrument(skip(state))]
pub async fn delete_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<String, AppError> {
    let id = services::delete_account(state.store.as_ref(), user_id).await?;
    Ok(id.to_string())
}

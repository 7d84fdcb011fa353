use axum::{
    extract::{Path, State},
    http::header::CONTENT_TYPE,
    response::IntoResponse,
    routing::get,
    Router,
};
use tracing::{info, instrument};

use crate::{auth::AuthUser, error::AppError, state::AppState, validation};

pub fn avatar_routes() -> Router<AppState> {
    Router::new()
        .route("/api/user/avatar", get(missing_email))
        .route("/api/user/avatar/", get(missing_email))
        .route("/api/user/avatar/:email", get(get_avatar))
}

#[instrument(skip(state))]
pub async fn get_avatar(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::BadRequest("email is missing".into()));
    }
    if !validation::is_valid_email(email) {
        return Err(AppError::BadRequest("Email address is not correct".into()));
    }

    let body = state.avatars.lookup(email).await?;
    info!(%user_id, "avatar looked up");
    Ok(([(CONTENT_TYPE, "application/json")], body))
}

pub async fn missing_email(AuthUser(_): AuthUser) -> AppError {
    AppError::BadRequest("email is missing".into())
}

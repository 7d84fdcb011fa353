use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{CardDto, PutCardForm},
    services::{self, parse_card_id},
};
use crate::{
    auth::{AuthUser, MaybeAuthUser},
    error::AppError,
    extract::FormPayload,
    state::AppState,
};

pub fn card_routes() -> Router<AppState> {
    Router::new()
        .route("/api/card", post(create_card))
        .route("/api/card/cards", get(list_cards))
        .route("/api/card/main/:username", get(get_main_card))
        .route(
            "/api/card/:card_id",
            get(get_card).put(put_card).delete(delete_card),
        )
}

#[instrument(skip(state))]
pub async fn get_card(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(card_id): Path<String>,
) -> Result<Json<CardDto>, AppError> {
    let card_id = parse_card_id(&card_id)?;
    services::get_card(state.store.as_ref(), card_id, viewer)
        .await
        .map(Json)
}

#[instrument(skip(state))]
pub async fn list_cards(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<CardDto>>, AppError> {
    services::list_cards(state.store.as_ref(), user_id)
        .await
        .map(Json)
}

#[instrument(skip(state))]
pub async fn get_main_card(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(username): Path<String>,
) -> Result<Json<CardDto>, AppError> {
    services::get_main_card(state.store.as_ref(), &username, viewer)
        .await
        .map(Json)
}

#[instrument(skip(state))]
pub async fn create_card(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<String, AppError> {
    let id = services::create_card(state.store.as_ref(), user_id).await?;
    Ok(id.to_string())
}

#[instrument(skip(state, form))]
pub async fn put_card(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(card_id): Path<String>,
    FormPayload(form): FormPayload<PutCardForm>,
) -> Result<String, AppError> {
    let card_id = parse_card_id(&card_id)?;
    let id = services::update_card(state.store.as_ref(), user_id, card_id, form).await?;
    Ok(id.to_string())
}

#[instrument(skip(state))]
pub async fn delete_card(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(card_id): Path<String>,
) -> Result<String, AppError> {
    let card_id = parse_card_id(&card_id)?;
    let id = services::delete_card(state.store.as_ref(), user_id, card_id).await?;
    Ok(id.to_string())
}

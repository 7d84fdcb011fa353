use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{card_dto, CardDto, PutCardForm};
use crate::{
    error::AppError,
    extract::non_empty,
    store::{Card, Store, User},
    validation::{self, Errors, MAX_LEN, MAX_LINK_LEN, MAX_URL_LEN, MIN_LEN},
};

const CARD_NOT_FOUND: &str = "Card not found";

/// Card ids are opaque strings on the wire; anything that isn't one of ours
/// is simply not found.
pub fn parse_card_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::not_found(CARD_NOT_FOUND))
}

async fn load_user(store: &dyn Store, user_id: Uuid) -> Result<User, AppError> {
    store
        .user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))
}

/// Load a card the caller owns. Cards owned by someone else are reported
/// exactly like unknown ones.
async fn load_owned_card(store: &dyn Store, user_id: Uuid, card_id: Uuid) -> Result<Card, AppError> {
    match store.card_by_id(card_id).await? {
        Some(card) if card.owner_id == user_id => Ok(card),
        Some(_) => {
            warn!(%user_id, %card_id, "card access by non-owner");
            Err(AppError::not_found(CARD_NOT_FOUND))
        }
        None => Err(AppError::not_found(CARD_NOT_FOUND)),
    }
}

/// Public read of one card with its owner's profile.
pub async fn get_card(
    store: &dyn Store,
    card_id: Uuid,
    viewer: Option<Uuid>,
) -> Result<CardDto, AppError> {
    let card = store
        .card_by_id(card_id)
        .await?
        .ok_or_else(|| AppError::not_found(CARD_NOT_FOUND))?;
    let owner = load_user(store, card.owner_id).await?;
    Ok(card_dto(card, &owner, true, viewer))
}

/// Every card owned by the caller, oldest first.
pub async fn list_cards(store: &dyn Store, user_id: Uuid) -> Result<Vec<CardDto>, AppError> {
    let owner = load_user(store, user_id).await?;
    let cards = store.cards_by_owner(owner.id).await?;
    Ok(cards
        .into_iter()
        .map(|c| card_dto(c, &owner, true, Some(user_id)))
        .collect())
}

/// Resolve username → user → main card.
pub async fn get_main_card(
    store: &dyn Store,
    username: &str,
    viewer: Option<Uuid>,
) -> Result<CardDto, AppError> {
    let owner = store
        .user_by_username(username.trim())
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    let main_id = owner
        .main_card_id
        .ok_or_else(|| AppError::not_found("user has no main card"))?;
    let card = store
        .card_by_id(main_id)
        .await?
        .ok_or_else(|| AppError::not_found("user has no main card"))?;
    Ok(card_dto(card, &owner, true, viewer))
}

/// New card defaulted from the caller's profile; it becomes the main card
/// only if the caller had none.
pub async fn create_card(store: &dyn Store, user_id: Uuid) -> Result<Uuid, AppError> {
    let owner = load_user(store, user_id).await?;
    let card = Card::draft_for(&owner);
    let became_main = store.insert_card(&card).await?;
    info!(%user_id, card_id = %card.id, became_main, "card created");
    Ok(card.id)
}

fn validate_put(form: &PutCardForm) -> Result<(), AppError> {
    let mut errors = Errors::default();
    errors
        .check(validation::length("DisplayName", form.display_name.trim(), MIN_LEN, MAX_LEN))
        .check(validation::hex_color("BGColor", &form.bg_color))
        .check(validation::hex_color("TextColor", &form.text_color));
    if let Some(role) = non_empty(form.role_name.clone()) {
        errors.check(validation::length("RoleName", &role, MIN_LEN, MAX_LEN));
    }
    if let Some(email) = non_empty(form.email.clone()) {
        errors
            .check(validation::length("Email", &email, MIN_LEN, MAX_LEN))
            .check(
                (!validation::is_valid_email(&email))
                    .then(|| "Please enter a valid email address".to_string()),
            );
    }
    if let Some(phone) = non_empty(form.phone_number.clone()) {
        errors.check(validation::phone(&phone));
    }
    for (label, value) in [
        ("LinkedIn", &form.linked_in),
        ("X", &form.x),
        ("CustomURLName", &form.custom_url_name),
    ] {
        if let Some(v) = value {
            errors.check(validation::max_length(label, v.trim(), MAX_LINK_LEN));
        }
    }
    if let Some(url) = &form.custom_url {
        errors.check(validation::max_length("CustomURL", url.trim(), MAX_URL_LEN));
    }
    errors.into_result().map_err(AppError::BadRequest)
}

/// Full field replacement by the owner, optionally making the card the main one.
pub async fn update_card(
    store: &dyn Store,
    user_id: Uuid,
    card_id: Uuid,
    form: PutCardForm,
) -> Result<Uuid, AppError> {
    let existing = load_owned_card(store, user_id, card_id).await?;
    validate_put(&form)?;

    let updated = Card {
        display_name: form.display_name.trim().to_string(),
        role_name: non_empty(form.role_name),
        bg_color: form.bg_color.trim().to_string(),
        text_color: form.text_color.trim().to_string(),
        email: non_empty(form.email),
        phone_number: non_empty(form.phone_number),
        linked_in: non_empty(form.linked_in),
        x: non_empty(form.x),
        custom_url_name: non_empty(form.custom_url_name),
        custom_url: non_empty(form.custom_url),
        ..existing
    };

    if !store.update_card(&updated, form.is_main).await? {
        // deleted between the ownership check and the write
        return Err(AppError::not_found(CARD_NOT_FOUND));
    }
    info!(%user_id, %card_id, is_main = form.is_main, "card updated");
    Ok(card_id)
}

/// Delete one of the caller's cards.
pub async fn delete_card(store: &dyn Store, user_id: Uuid, card_id: Uuid) -> Result<Uuid, AppError> {
    load_owned_card(store, user_id, card_id).await?;
    if !store.delete_card(card_id).await? {
        return Err(AppError::not_found(CARD_NOT_FOUND));
    }
    info!(%user_id, %card_id, "card deleted");
    Ok(card_id)
}

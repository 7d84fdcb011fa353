use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{LoginForm, SignUpForm, UserDto},
    jwt::JwtKeys,
    password::{hash_password, verify_dummy, verify_password},
};
use crate::{
    cards::dto::card_dto,
    error::AppError,
    extract::non_empty,
    store::{Store, User},
    validation::{self, Errors},
};

fn validate_sign_up(form: &SignUpForm) -> Result<(), AppError> {
    let mut errors = Errors::default();
    errors
        .check(validation::username(&form.username))
        .check(validation::password(&form.password))
        .check(validation::confirm_password(&form.confirm_password, &form.password))
        .check(validation::email(&form.email))
        .check(validation::full_name(&form.full_name))
        .check(validation::role_name(&form.role_name));
    if let Some(phone) = non_empty(form.phone.clone()) {
        errors.check(validation::phone(&phone));
    }
    errors.into_result().map_err(AppError::BadRequest)
}

/// Create an account and return a token for it.
pub async fn sign_up(store: &dyn Store, keys: &JwtKeys, form: SignUpForm) -> Result<String, AppError> {
    validate_sign_up(&form)?;

    let password_hash = hash_password(&form.password)?;
    let user = User {
        id: Uuid::new_v4(),
        username: form.username.trim().to_string(),
        email: form.email.trim().to_lowercase(),
        full_name: form.full_name.trim().to_string(),
        role_name: form.role_name.trim().to_string(),
        phone_number: non_empty(form.phone),
        password_hash,
        main_card_id: None,
        created_at: OffsetDateTime::now_utc(),
    };

    if let Err(e) = store.create_user(&user).await {
        warn!(error = %e, username = %user.username, "sign-up rejected");
        return Err(e.into());
    }

    let token = keys.sign(user.id)?;
    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(token)
}

/// Check credentials and return a token. Unknown users and wrong passwords
/// fail identically.
pub async fn login(store: &dyn Store, keys: &JwtKeys, form: LoginForm) -> Result<String, AppError> {
    let mut errors = Errors::default();
    if form.username.trim().is_empty() {
        errors.check(Some("username is missing".into()));
    }
    if form.password.is_empty() {
        errors.check(Some("password is missing".into()));
    }
    errors.into_result().map_err(AppError::BadRequest)?;

    let Some(user) = store.user_by_username(form.username.trim()).await? else {
        verify_dummy(&form.password);
        warn!(username = %form.username, "login unknown username");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&form.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = keys.sign(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok(token)
}

/// Profile of the authenticated caller with every card and the main card.
pub async fn profile(store: &dyn Store, user_id: Uuid) -> Result<UserDto, AppError> {
    let user = store
        .user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    let cards = store.cards_by_owner(user.id).await?;

    let main_card = user
        .main_card_id
        .and_then(|id| cards.iter().find(|c| c.id == id).cloned())
        .map(|c| card_dto(c, &user, false, Some(user.id)));
    let cards = cards
        .into_iter()
        .map(|c| card_dto(c, &user, false, Some(user.id)))
        .collect();

    Ok(UserDto {
        id: user.id,
        user_name: user.username,
        email: user.email,
        full_name: user.full_name,
        role_name: user.role_name,
        phone_number: user.phone_number,
        main_card,
        cards,
    })
}

/// Delete the caller's account together with their cards.
pub async fn delete_account(store: &dyn Store, user_id: Uuid) -> Result<Uuid, AppError> {
    if !store.delete_user(user_id).await? {
        return Err(AppError::not_found("User not found"));
    }
    info!(user_id = %user_id, "user deleted");
    Ok(user_id)
}

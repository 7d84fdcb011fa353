use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extract::lenient_bool;
use crate::store::{Card, User};

/// Public part of a card owner's profile.
#[derive(Debug, Serialize)]
pub struct OwnerDto {
    pub id: Uuid,
    #[serde(rename = "userName")]
    pub user_name: String,
    pub email: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    #[serde(rename = "roleName")]
    pub role_name: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: Option<String>,
}

impl From<&User> for OwnerDto {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            user_name: u.username.clone(),
            email: u.email.clone(),
            full_name: u.full_name.clone(),
            role_name: u.role_name.clone(),
            phone_number: u.phone_number.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CardDto {
    pub id: Uuid,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "roleName")]
    pub role_name: Option<String>,
    #[serde(rename = "bgColor")]
    pub bg_color: String,
    #[serde(rename = "textColor")]
    pub text_color: String,
    pub email: Option<String>,
    #[serde(rename = "phoneNumber")]
    pub phone_number: Option<String>,
    #[serde(rename = "linkedIn")]
    pub linked_in: Option<String>,
    pub x: Option<String>,
    #[serde(rename = "customURLName")]
    pub custom_url_name: Option<String>,
    #[serde(rename = "customURL")]
    pub custom_url: Option<String>,
    #[serde(rename = "isMain")]
    pub is_main: bool,
    #[serde(rename = "isOwner")]
    pub is_owner: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerDto>,
}

/// Single card→DTO mapping used by every endpoint.
///
/// `owner` is the card's owner (its `main_card_id` decides `isMain`);
/// `include_owner` embeds the owner's public profile; `viewer` is the
/// authenticated caller, if any.
pub fn card_dto(card: Card, owner: &User, include_owner: bool, viewer: Option<Uuid>) -> CardDto {
    CardDto {
        is_main: owner.main_card_id == Some(card.id),
        is_owner: viewer == Some(card.owner_id),
        owner: include_owner.then(|| OwnerDto::from(owner)),
        id: card.id,
        display_name: card.display_name,
        role_name: card.role_name,
        bg_color: card.bg_color,
        text_color: card.text_color,
        email: card.email,
        phone_number: card.phone_number,
        linked_in: card.linked_in,
        x: card.x,
        custom_url_name: card.custom_url_name,
        custom_url: card.custom_url,
    }
}

/// Form body for `PUT /api/card/{cardId}`. Keys arrive lower-cased.
#[derive(Debug, Default, Deserialize)]
pub struct PutCardForm {
    #[serde(default, rename = "displayname")]
    pub display_name: String,
    #[serde(default, rename = "rolename")]
    pub role_name: Option<String>,
    #[serde(default, rename = "bgcolor")]
    pub bg_color: String,
    #[serde(default, rename = "textcolor")]
    pub text_color: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "phonenumber", alias = "phone")]
    pub phone_number: Option<String>,
    #[serde(default, rename = "linkedin")]
    pub linked_in: Option<String>,
    #[serde(default)]
    pub x: Option<String>,
    #[serde(default, rename = "customurlname")]
    pub custom_url_name: Option<String>,
    #[serde(default, rename = "customurl")]
    pub custom_url: Option<String>,
    #[serde(default, rename = "ismain", deserialize_with = "lenient_bool")]
    pub is_main: bool,
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Account record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role_name: String,
    pub phone_number: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,      // Argon2 hash, not exposed in JSON
    pub main_card_id: Option<Uuid>, // always one of this user's cards
    pub created_at: OffsetDateTime,
}

/// Business card record, owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Card {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub display_name: String,
    pub role_name: Option<String>,
    pub bg_color: String,
    pub text_color: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub linked_in: Option<String>,
    pub x: Option<String>,
    pub custom_url_name: Option<String>,
    pub custom_url: Option<String>,
    pub created_at: OffsetDateTime,
}

pub const DEFAULT_TEXT_COLOR: &str = "#000000";
pub const DEFAULT_BG_COLOR: &str = "#ffffff";

impl Card {
    /// Fresh card pre-filled from the owner's profile: black text on white.
    pub fn draft_for(owner: &User) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: owner.id,
            display_name: owner.full_name.clone(),
            role_name: Some(owner.role_name.clone()),
            bg_color: DEFAULT_BG_COLOR.into(),
            text_color: DEFAULT_TEXT_COLOR.into(),
            email: Some(owner.email.clone()),
            phone_number: owner.phone_number.clone(),
            linked_in: None,
            x: None,
            custom_url_name: None,
            custom_url: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

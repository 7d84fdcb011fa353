use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cards::dto::CardDto;

/// Form body for sign-up. Keys arrive lower-cased.
#[derive(Debug, Default, Deserialize)]
pub struct SignUpForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "confirmpassword")]
    pub confirm_password: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, rename = "phone", alias = "phonenumber")]
    pub phone: Option<String>,
    #[serde(default, rename = "fullname")]
    pub full_name: String,
    #[serde(default, rename = "rolename")]
    pub role_name: String,
}

/// Form body for login.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// The caller's own profile with every card and the main card.
#[derive(Debug, Serialize)]
pub struct UserDto {
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
    #[serde(rename = "mainCard")]
    pub main_card: Option<CardDto>,
    pub cards: Vec<CardDto>,
}

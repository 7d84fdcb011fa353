//! Persistence seam for users and cards.
//!
//! Every method that touches both the ownership relation and the main-card
//! pointer does so atomically, so the main card is always one of the owner's
//! cards.

mod memory;
mod postgres;
mod repo_types;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use repo_types::{Card, User, DEFAULT_BG_COLOR, DEFAULT_TEXT_COLOR};

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique field (`username` or `email`) is already in use.
    #[error("{0} is already taken")]
    Duplicate(&'static str),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a new account. Username and email are unique, case-insensitively.
    async fn create_user(&self, user: &User) -> StoreResult<()>;
    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    /// Remove an account and every card it owns. Returns false if unknown.
    async fn delete_user(&self, id: Uuid) -> StoreResult<bool>;

    async fn card_by_id(&self, id: Uuid) -> StoreResult<Option<Card>>;
    /// Cards owned by `owner_id`, oldest first.
    async fn cards_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Card>>;
    /// Insert a card and make it the owner's main card if they had none.
    /// Returns whether it became the main card.
    async fn insert_card(&self, card: &Card) -> StoreResult<bool>;
    /// Replace a card's fields, optionally re-pointing the owner's main card
    /// at it. Returns false if no card with that id and owner exists.
    async fn update_card(&self, card: &Card, make_main: bool) -> StoreResult<bool>;
    /// Delete a card, clearing the owner's main-card pointer if it referred to
    /// it. Returns false if unknown.
    async fn delete_card(&self, id: Uuid) -> StoreResult<bool>;
}

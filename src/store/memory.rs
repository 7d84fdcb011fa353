use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use super::{Card, Store, StoreError, StoreResult, User};

/// Process-local store. One lock guards both tables, so every operation is
/// atomic with respect to the others.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    cards: Vec<Card>, // insertion order == creation order
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Other(anyhow::anyhow!("memory store lock poisoned")))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: &User) -> StoreResult<()> {
        let mut t = self.lock()?;
        if t.users.iter().any(|u| u.username.to_lowercase() == user.username.to_lowercase()) {
            return Err(StoreError::Duplicate("username"));
        }
        if t.users.iter().any(|u| u.email.to_lowercase() == user.email.to_lowercase()) {
            return Err(StoreError::Duplicate("email"));
        }
        let mut user = user.clone();
        user.main_card_id = None;
        t.users.push(user);
        Ok(())
    }

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.lock()?.users.iter().find(|u| u.id == id).cloned())
    }

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let needle = username.to_lowercase();
        Ok(self
            .lock()?
            .users
            .iter()
            .find(|u| u.username.to_lowercase() == needle)
            .cloned())
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let mut t = self.lock()?;
        let before = t.users.len();
        t.users.retain(|u| u.id != id);
        if t.users.len() == before {
            return Ok(false);
        }
        t.cards.retain(|c| c.owner_id != id);
        Ok(true)
    }

    async fn card_by_id(&self, id: Uuid) -> StoreResult<Option<Card>> {
        Ok(self.lock()?.cards.iter().find(|c| c.id == id).cloned())
    }

    async fn cards_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Card>> {
        Ok(self
            .lock()?
            .cards
            .iter()
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn insert_card(&self, card: &Card) -> StoreResult<bool> {
        let mut t = self.lock()?;
        let Some(owner) = t.users.iter_mut().find(|u| u.id == card.owner_id) else {
            return Err(StoreError::Other(anyhow::anyhow!(
                "card owner {} does not exist",
                card.owner_id
            )));
        };
        let became_main = owner.main_card_id.is_none();
        if became_main {
            owner.main_card_id = Some(card.id);
        }
        t.cards.push(card.clone());
        Ok(became_main)
    }

    async fn update_card(&self, card: &Card, make_main: bool) -> StoreResult<bool> {
        let mut t = self.lock()?;
        let Some(existing) = t
            .cards
            .iter_mut()
            .find(|c| c.id == card.id && c.owner_id == card.owner_id)
        else {
            return Ok(false);
        };
        let created_at = existing.created_at;
        *existing = Card {
            created_at,
            ..card.clone()
        };
        if make_main {
            if let Some(owner) = t.users.iter_mut().find(|u| u.id == card.owner_id) {
                owner.main_card_id = Some(card.id);
            }
        }
        Ok(true)
    }

    async fn delete_card(&self, id: Uuid) -> StoreResult<bool> {
        let mut t = self.lock()?;
        for user in t.users.iter_mut().filter(|u| u.main_card_id == Some(id)) {
            user.main_card_id = None;
        }
        let before = t.cards.len();
        t.cards.retain(|c| c.id != id);
        Ok(t.cards.len() < before)
    }
}

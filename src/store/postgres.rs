use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use super::{Card, Store, StoreError, StoreResult, User};

const USER_COLUMNS: &str = "id, username, email, full_name, role_name, phone_number, \
                            password_hash, main_card_id, created_at";
const CARD_COLUMNS: &str = "id, owner_id, display_name, role_name, bg_color, text_color, \
                            email, phone_number, linked_in, x, custom_url_name, custom_url, \
                            created_at";

#[derive(Clone)]
pub struct PgStore {
    pub db: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("connect to database")?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }
        Ok(Self { db })
    }
}

/// Map a unique-index violation on `users` to the offending field.
fn map_unique_violation(e: sqlx::Error) -> StoreError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some("users_email_key") => return StoreError::Duplicate("email"),
                Some("users_username_key") => return StoreError::Duplicate("username"),
                _ => {}
            }
        }
    }
    StoreError::Database(e)
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, user: &User) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, full_name, role_name, phone_number,
                               password_hash, main_card_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NULL, $8)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.role_name)
        .bind(&user.phone_number)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.db)
        .await
        .map_err(map_unique_violation)?;
        Ok(())
    }

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(username) = lower($1)"
        ))
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        sqlx::query("UPDATE users SET main_card_id = NULL WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        // cards go with the owner via ON DELETE CASCADE
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tx.commit().await.context("commit tx")?;
        Ok(deleted > 0)
    }

    async fn card_by_id(&self, id: Uuid) -> StoreResult<Option<Card>> {
        let card = sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(card)
    }

    async fn cards_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Card>> {
        let cards = sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE owner_id = $1 ORDER BY created_at ASC, id ASC"
        ))
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;
        Ok(cards)
    }

    async fn insert_card(&self, card: &Card) -> StoreResult<bool> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        sqlx::query(
            r#"
            INSERT INTO cards (id, owner_id, display_name, role_name, bg_color, text_color,
                               email, phone_number, linked_in, x, custom_url_name, custom_url,
                               created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(card.id)
        .bind(card.owner_id)
        .bind(&card.display_name)
        .bind(&card.role_name)
        .bind(&card.bg_color)
        .bind(&card.text_color)
        .bind(&card.email)
        .bind(&card.phone_number)
        .bind(&card.linked_in)
        .bind(&card.x)
        .bind(&card.custom_url_name)
        .bind(&card.custom_url)
        .bind(card.created_at)
        .execute(&mut *tx)
        .await?;

        let became_main = sqlx::query(
            "UPDATE users SET main_card_id = $1 WHERE id = $2 AND main_card_id IS NULL",
        )
        .bind(card.id)
        .bind(card.owner_id)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        tx.commit().await.context("commit tx")?;
        Ok(became_main)
    }

    async fn update_card(&self, card: &Card, make_main: bool) -> StoreResult<bool> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        let updated = sqlx::query(
            r#"
            UPDATE cards
               SET display_name = $3, role_name = $4, bg_color = $5, text_color = $6,
                   email = $7, phone_number = $8, linked_in = $9, x = $10,
                   custom_url_name = $11, custom_url = $12
             WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(card.id)
        .bind(card.owner_id)
        .bind(&card.display_name)
        .bind(&card.role_name)
        .bind(&card.bg_color)
        .bind(&card.text_color)
        .bind(&card.email)
        .bind(&card.phone_number)
        .bind(&card.linked_in)
        .bind(&card.x)
        .bind(&card.custom_url_name)
        .bind(&card.custom_url)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            tx.rollback().await.context("rollback tx")?;
            return Ok(false);
        }

        if make_main {
            sqlx::query("UPDATE users SET main_card_id = $1 WHERE id = $2")
                .bind(card.id)
                .bind(card.owner_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await.context("commit tx")?;
        Ok(true)
    }

    async fn delete_card(&self, id: Uuid) -> StoreResult<bool> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        sqlx::query("UPDATE users SET main_card_id = NULL WHERE main_card_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tx.commit().await.context("commit tx")?;
        Ok(deleted > 0)
    }
}

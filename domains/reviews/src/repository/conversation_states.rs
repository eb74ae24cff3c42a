//! Conversation state repository

use super::transactions::{delete_state_tx, upsert_state_tx};
use crate::domain::entities::{ConversationState, ConversationStep};
use reviewline_common::Result;
use sqlx::PgPool;

pub(crate) const STATE_COLUMNS: &str = "contact_number, step, product_name, user_name, updated_at";

#[derive(Clone)]
pub struct ConversationStateRepository {
    pool: PgPool,
}

impl ConversationStateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the state for a contact
    pub async fn find(&self, contact: &str) -> Result<Option<ConversationState>> {
        let query = format!("SELECT {STATE_COLUMNS} FROM conversation_state WHERE contact_number = $1");
        let state = sqlx::query_as::<_, ConversationState>(&query)
            .bind(contact)
            .fetch_optional(&self.pool)
            .await?;

        Ok(state)
    }

    /// Create or update the state for a contact and commit immediately
    pub async fn upsert(
        &self,
        contact: &str,
        step: ConversationStep,
        product_name: Option<&str>,
        user_name: Option<&str>,
    ) -> Result<ConversationState> {
        let mut tx = self.pool.begin().await?;
        let state = upsert_state_tx(&mut tx, contact, step, product_name, user_name).await?;
        tx.commit().await?;

        Ok(state)
    }

    /// Delete the state for a contact
    pub async fn delete(&self, contact: &str) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        let deleted = delete_state_tx(&mut tx, contact).await?;
        tx.commit().await?;

        Ok(deleted > 0)
    }
}

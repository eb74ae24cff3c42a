//! Repository implementations for Reviews domain

pub mod conversation_states;
pub mod memory;
pub mod reviews;
pub mod store;
pub mod transactions;

use async_trait::async_trait;
use reviewline_common::Result;
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::entities::{ConversationState, ConversationStep, Review};
use transactions::{
    create_review_tx, delete_state_tx, find_state_tx, lock_contact_tx, upsert_state_tx,
};

pub use conversation_states::ConversationStateRepository;
pub use memory::MemoryConversationStore;
pub use reviews::ReviewRepository;
pub use store::{ContactTransaction, ConversationStore};

/// Combined repository access for the Reviews domain
#[derive(Clone)]
pub struct ReviewsRepositories {
    pool: PgPool,
    pub conversation_states: ConversationStateRepository,
    pub reviews: ReviewRepository,
}

impl ReviewsRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            conversation_states: ConversationStateRepository::new(pool.clone()),
            reviews: ReviewRepository::new(pool.clone()),
            pool,
        }
    }

    /// Get a reference to the underlying database pool (for migrations and test cleanup)
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ConversationStore for ReviewsRepositories {
    async fn begin(&self, contact: &str) -> Result<Box<dyn ContactTransaction>> {
        let mut tx = self.pool.begin().await?;
        lock_contact_tx(&mut tx, contact).await?;

        Ok(Box::new(PgContactTransaction {
            contact: contact.to_string(),
            tx,
        }))
    }

    async fn list_reviews(&self) -> Result<Vec<Review>> {
        self.reviews.list_all().await
    }
}

/// Postgres unit of work holding the contact's advisory lock until commit
/// or rollback
pub struct PgContactTransaction {
    contact: String,
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ContactTransaction for PgContactTransaction {
    async fn get_state(&mut self) -> Result<Option<ConversationState>> {
        Ok(find_state_tx(&mut self.tx, &self.contact).await?)
    }

    async fn upsert_state(
        &mut self,
        step: ConversationStep,
        product_name: Option<&str>,
        user_name: Option<&str>,
    ) -> Result<ConversationState> {
        Ok(upsert_state_tx(&mut self.tx, &self.contact, step, product_name, user_name).await?)
    }

    async fn delete_state(&mut self) -> Result<()> {
        delete_state_tx(&mut self.tx, &self.contact).await?;
        Ok(())
    }

    async fn create_review(
        &mut self,
        user_name: &str,
        product_name: &str,
        review_text: &str,
    ) -> Result<Review> {
        Ok(create_review_tx(
            &mut self.tx,
            &self.contact,
            user_name,
            product_name,
            review_text,
        )
        .await?)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

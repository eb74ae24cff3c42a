//! Storage contract used by the review engine
//!
//! The engine never sees storage types. It opens one `ContactTransaction`
//! per inbound message; the implementation guarantees that transactions for
//! the same contact never overlap and that nothing is visible to other
//! readers until `commit`. Dropping a transaction without committing
//! discards its writes.

use crate::domain::entities::{ConversationState, ConversationStep, Review};
use async_trait::async_trait;
use reviewline_common::Result;

/// Entry point to the conversation and review stores
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Open a unit of work for `contact`, waiting for any in-flight one
    async fn begin(&self, contact: &str) -> Result<Box<dyn ContactTransaction>>;

    /// All recorded reviews, newest first
    async fn list_reviews(&self) -> Result<Vec<Review>>;
}

/// Unit of work scoped to a single contact
#[async_trait]
pub trait ContactTransaction: Send {
    async fn get_state(&mut self) -> Result<Option<ConversationState>>;

    /// Create the state if absent, else set `step` and any supplied names
    async fn upsert_state(
        &mut self,
        step: ConversationStep,
        product_name: Option<&str>,
        user_name: Option<&str>,
    ) -> Result<ConversationState>;

    async fn delete_state(&mut self) -> Result<()>;

    /// Record a review for this contact; id and timestamp are assigned here
    async fn create_review(
        &mut self,
        user_name: &str,
        product_name: &str,
        review_text: &str,
    ) -> Result<Review>;

    async fn commit(self: Box<Self>) -> Result<()>;
}

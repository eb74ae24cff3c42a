//! In-memory conversation store
//!
//! Used by tests and local tooling in place of Postgres. Work for one
//! contact is serialized with a per-contact async mutex; writes are staged
//! on the transaction and applied together on commit.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use reviewline_common::Result;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use super::store::{ContactTransaction, ConversationStore};
use crate::domain::entities::{ConversationState, ConversationStep, Review};

#[derive(Debug, Default)]
struct MemoryData {
    states: HashMap<String, ConversationState>,
    reviews: Vec<Review>,
    next_review_id: i64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, Default)]
pub struct MemoryConversationStore {
    data: Arc<Mutex<MemoryData>>,
    contact_locks: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed state for a contact
    pub fn state(&self, contact: &str) -> Option<ConversationState> {
        lock(&self.data).states.get(contact).cloned()
    }

    /// Number of contacts with a flow in progress
    pub fn state_count(&self) -> usize {
        lock(&self.data).states.len()
    }

    /// Seed a state row directly, bypassing the flow
    pub fn insert_state(&self, state: ConversationState) {
        lock(&self.data)
            .states
            .insert(state.contact.clone(), state);
    }

    fn contact_lock(&self, contact: &str) -> Arc<AsyncMutex<()>> {
        lock(&self.contact_locks)
            .entry(contact.to_string())
            .or_default()
            .clone()
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn begin(&self, contact: &str) -> Result<Box<dyn ContactTransaction>> {
        let guard = self.contact_lock(contact).lock_owned().await;

        Ok(Box::new(MemoryContactTransaction {
            contact: contact.to_string(),
            data: Arc::clone(&self.data),
            staged: StagedState::Untouched,
            pending_reviews: Vec::new(),
            _guard: guard,
        }))
    }

    async fn list_reviews(&self) -> Result<Vec<Review>> {
        let mut reviews = lock(&self.data).reviews.clone();
        reviews.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(reviews)
    }
}

#[derive(Debug)]
enum StagedState {
    Untouched,
    Written(ConversationState),
    Deleted,
}

struct MemoryContactTransaction {
    contact: String,
    data: Arc<Mutex<MemoryData>>,
    staged: StagedState,
    pending_reviews: Vec<Review>,
    _guard: OwnedMutexGuard<()>,
}

#[async_trait]
impl ContactTransaction for MemoryContactTransaction {
    async fn get_state(&mut self) -> Result<Option<ConversationState>> {
        let state = match &self.staged {
            StagedState::Written(state) => Some(state.clone()),
            StagedState::Deleted => None,
            StagedState::Untouched => lock(&self.data).states.get(&self.contact).cloned(),
        };
        Ok(state)
    }

    async fn upsert_state(
        &mut self,
        step: ConversationStep,
        product_name: Option<&str>,
        user_name: Option<&str>,
    ) -> Result<ConversationState> {
        let mut state = self
            .get_state()
            .await?
            .unwrap_or_else(|| ConversationState::new(self.contact.clone()));
        state.apply(step, product_name, user_name);

        self.staged = StagedState::Written(state.clone());
        Ok(state)
    }

    async fn delete_state(&mut self) -> Result<()> {
        self.staged = StagedState::Deleted;
        Ok(())
    }

    async fn create_review(
        &mut self,
        user_name: &str,
        product_name: &str,
        review_text: &str,
    ) -> Result<Review> {
        let (id, created_at) = {
            let mut data = lock(&self.data);
            data.next_review_id += 1;
            (data.next_review_id, Utc::now())
        };

        let review = Review {
            id,
            contact_number: self.contact.clone(),
            user_name: user_name.to_string(),
            product_name: product_name.to_string(),
            product_review: review_text.to_string(),
            created_at,
        };
        self.pending_reviews.push(review.clone());
        Ok(review)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let MemoryContactTransaction {
            contact,
            data,
            staged,
            pending_reviews,
            _guard,
        } = *self;

        let mut committed = lock(&data);
        match staged {
            StagedState::Written(state) => {
                committed.states.insert(contact, state);
            }
            StagedState::Deleted => {
                committed.states.remove(&contact);
            }
            StagedState::Untouched => {}
        }
        committed.reviews.extend(pending_reviews);
        Ok(())
    }
}

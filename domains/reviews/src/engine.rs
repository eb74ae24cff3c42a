//! Review engine: runs the review flow against a conversation store
//!
//! One call handles one inbound message: open the contact's unit of work,
//! read its state, decide the transition, apply it, commit. Store failures
//! propagate unchanged and leave nothing committed.

use std::sync::Arc;

use reviewline_common::Result;
use tracing::{debug, info, warn};

use crate::domain::state::{ReviewFlow, StateChange, TransitionKind};
use crate::repository::ConversationStore;

/// Reply produced for one inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineReply {
    pub reply_text: String,
    /// True when this message recorded a review
    pub completed: bool,
}

#[derive(Clone)]
pub struct ReviewEngine {
    store: Arc<dyn ConversationStore>,
}

impl ReviewEngine {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }

    /// Process one inbound message from `contact`.
    ///
    /// `contact` must already be normalized; `raw_text` may be empty.
    pub async fn process_message(&self, contact: &str, raw_text: &str) -> Result<EngineReply> {
        let mut tx = self.store.begin(contact).await?;
        let current = tx.get_state().await?;

        let transition = ReviewFlow::transition(current.as_ref(), raw_text);

        match &transition.change {
            StateChange::Upsert {
                step,
                product_name,
                user_name,
            } => {
                tx.upsert_state(*step, product_name.as_deref(), user_name.as_deref())
                    .await?;
            }
            StateChange::Complete(review) => {
                tx.create_review(&review.user_name, &review.product_name, &review.review_text)
                    .await?;
                tx.delete_state().await?;
            }
        }

        tx.commit().await?;

        match transition.kind {
            TransitionKind::Completed => {
                info!(contact = %contact, "Review recorded");
            }
            TransitionKind::Fallback => {
                warn!(
                    contact = %contact,
                    step = ?current.as_ref().map(|s| s.step),
                    "Conversation state matched no rule, resetting to first question"
                );
            }
            kind => {
                debug!(contact = %contact, transition = %kind, "Conversation advanced");
            }
        }

        Ok(EngineReply {
            completed: transition.is_completed(),
            reply_text: transition.reply,
        })
    }
}

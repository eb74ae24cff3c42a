//! State machine for the review collection flow
//!
//! Flow: AskProduct → AskName → AskReview → (review recorded, state deleted).
//! A greeting restarts the flow from any step; an inconsistent state falls
//! back to AskProduct. Decisions here are pure: the engine applies them.

use super::entities::{ConversationState, ConversationStep};

/// Inbound texts that (re)start the flow, compared ASCII case-insensitively
pub const GREETINGS: [&str; 3] = ["hi", "hello", "start"];

pub const PRODUCT_PROMPT: &str = "Which product is this review for?";
pub const NAME_PROMPT: &str = "What's your name?";

/// Shown in replies when no product name was captured
pub const PRODUCT_FALLBACK: &str = "the product";
/// Recorded when no user name was captured
pub const USER_FALLBACK: &str = "Customer";

/// Which rule produced a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// No state, or the contact sent a greeting
    Restart,
    ProductCaptured,
    NameCaptured,
    /// Review recorded, state removed
    Completed,
    /// State matched no rule and was reset to AskProduct
    Fallback,
}

impl std::fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Restart => write!(f, "restart"),
            Self::ProductCaptured => write!(f, "product_captured"),
            Self::NameCaptured => write!(f, "name_captured"),
            Self::Completed => write!(f, "completed"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Review to record when the flow completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedReview {
    pub user_name: String,
    pub product_name: String,
    pub review_text: String,
}

/// Store mutation implied by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    /// Create or update the contact's state; `None` fields are left untouched
    Upsert {
        step: ConversationStep,
        product_name: Option<String>,
        user_name: Option<String>,
    },
    /// Record the review and delete the contact's state, atomically
    Complete(CompletedReview),
}

/// Outcome of feeding one inbound message to the flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub kind: TransitionKind,
    pub change: StateChange,
    pub reply: String,
}

impl Transition {
    pub fn is_completed(&self) -> bool {
        matches!(self.change, StateChange::Complete(_))
    }

    fn upsert(
        kind: TransitionKind,
        step: ConversationStep,
        product_name: Option<String>,
        user_name: Option<String>,
        reply: String,
    ) -> Self {
        Self {
            kind,
            change: StateChange::Upsert {
                step,
                product_name,
                user_name,
            },
            reply,
        }
    }

    fn reset(kind: TransitionKind) -> Self {
        Self::upsert(
            kind,
            ConversationStep::AskProduct,
            None,
            None,
            PRODUCT_PROMPT.to_string(),
        )
    }
}

/// Review flow state machine
pub struct ReviewFlow;

impl ReviewFlow {
    /// Whether `content` is one of the restart keywords
    pub fn is_greeting(content: &str) -> bool {
        GREETINGS
            .iter()
            .any(|greeting| content.eq_ignore_ascii_case(greeting))
    }

    /// Decide the next transition for a contact.
    ///
    /// `raw_text` is trimmed of surrounding whitespace and otherwise used
    /// verbatim. Rules are tried in priority order: restart, product,
    /// name, review, fallback.
    pub fn transition(current: Option<&ConversationState>, raw_text: &str) -> Transition {
        let content = raw_text.trim();

        let state = match current {
            Some(state) if !Self::is_greeting(content) => state,
            _ => return Transition::reset(TransitionKind::Restart),
        };

        match state.step {
            ConversationStep::AskProduct if state.product().is_none() => Transition::upsert(
                TransitionKind::ProductCaptured,
                ConversationStep::AskName,
                Some(content.to_string()),
                None,
                NAME_PROMPT.to_string(),
            ),
            ConversationStep::AskName if state.user().is_none() => Transition::upsert(
                TransitionKind::NameCaptured,
                ConversationStep::AskReview,
                None,
                Some(content.to_string()),
                format!(
                    "Please send your review for {}.",
                    state.product().unwrap_or(PRODUCT_FALLBACK)
                ),
            ),
            ConversationStep::AskReview => {
                let product_name = state.product().unwrap_or(PRODUCT_FALLBACK).to_string();
                let user_name = state.user().unwrap_or(USER_FALLBACK).to_string();
                let reply = format!(
                    "Thanks {} -- your review for {} has been recorded.",
                    user_name, product_name
                );

                Transition {
                    kind: TransitionKind::Completed,
                    change: StateChange::Complete(CompletedReview {
                        user_name,
                        product_name,
                        review_text: content.to_string(),
                    }),
                    reply,
                }
            }
            _ => Transition::reset(TransitionKind::Fallback),
        }
    }
}

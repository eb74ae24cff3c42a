//! Domain entities for the Reviews domain
//!
//! `ConversationState` tracks a contact's progress through the review flow;
//! `Review` is the append-only record produced when a flow completes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The next piece of information expected from a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStep {
    #[default]
    AskProduct,
    AskName,
    AskReview,
}

impl ConversationStep {
    /// Persisted text form (`conversation_state.step`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AskProduct => "ask_product",
            Self::AskName => "ask_name",
            Self::AskReview => "ask_review",
        }
    }
}

impl std::fmt::Display for ConversationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored step value outside the known set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown conversation step: {0}")]
pub struct UnknownStep(pub String);

impl FromStr for ConversationStep {
    type Err = UnknownStep;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ask_product" => Ok(Self::AskProduct),
            "ask_name" => Ok(Self::AskName),
            "ask_review" => Ok(Self::AskReview),
            other => Err(UnknownStep(other.to_string())),
        }
    }
}

impl TryFrom<String> for ConversationStep {
    type Error = UnknownStep;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// In-progress review collection for one contact
///
/// At most one row exists per contact. Its presence means a flow is in
/// progress; it is deleted in the same unit of work that records the review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ConversationState {
    #[sqlx(rename = "contact_number")]
    pub contact: String,
    #[sqlx(try_from = "String")]
    pub step: ConversationStep,
    pub product_name: Option<String>,
    pub user_name: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationState {
    /// A freshly started flow for `contact`
    pub fn new(contact: impl Into<String>) -> Self {
        Self {
            contact: contact.into(),
            step: ConversationStep::default(),
            product_name: None,
            user_name: None,
            updated_at: Utc::now(),
        }
    }

    /// Apply an upsert: the step always changes, names only when supplied
    pub fn apply(
        &mut self,
        step: ConversationStep,
        product_name: Option<&str>,
        user_name: Option<&str>,
    ) {
        self.step = step;
        if let Some(product) = product_name {
            self.product_name = Some(product.to_string());
        }
        if let Some(user) = user_name {
            self.user_name = Some(user.to_string());
        }
        self.updated_at = Utc::now();
    }

    /// Product name if one has been captured (empty counts as missing)
    pub fn product(&self) -> Option<&str> {
        self.product_name.as_deref().filter(|p| !p.is_empty())
    }

    /// User name if one has been captured (empty counts as missing)
    pub fn user(&self) -> Option<&str> {
        self.user_name.as_deref().filter(|u| !u.is_empty())
    }
}

/// A completed product review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: i64,
    pub contact_number: String,
    pub user_name: String,
    pub product_name: String,
    pub product_review: String,
    pub created_at: DateTime<Utc>,
}

//! Reviews domain: conversational review collection over messaging webhooks

pub mod api;
pub mod domain;
pub mod engine;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{ConversationState, ConversationStep, Review};
pub use domain::state::{ReviewFlow, StateChange, Transition, TransitionKind};
pub use engine::{EngineReply, ReviewEngine};

// Re-export repository types
pub use repository::{
    ContactTransaction, ConversationStore, MemoryConversationStore, ReviewsRepositories,
};

// Re-export API types
pub use api::routes;
pub use api::ReviewsState;

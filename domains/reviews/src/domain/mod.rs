//! Reviews domain layer: entities and the review flow state machine

pub mod entities;
pub mod state;

//! HTTP handlers for the Reviews domain

pub mod reviews;
pub mod webhook;

//! PostgreSQL-backed tests for the reviews domain
//!
//! Run with a reachable database:
//! `TEST_DATABASE_URL=postgres://... cargo test -p reviewline-integration-tests -- --ignored`

mod common;
mod reviews;

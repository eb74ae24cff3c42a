//! Transaction helpers for Reviews domain
//!
//! Every inbound message runs inside one transaction: lock the contact,
//! read its state, then write (upsert, or create review + delete state).

use super::conversation_states::STATE_COLUMNS;
use super::reviews::REVIEW_COLUMNS;
use crate::domain::entities::{ConversationState, ConversationStep, Review};
use sqlx::{Postgres, Transaction};

/// Serialize work for one contact until the transaction ends.
/// The advisory lock is keyed on the contact, so it also covers contacts
/// that have no state row yet.
pub async fn lock_contact_tx(
    tx: &mut Transaction<'_, Postgres>,
    contact: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(contact)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Fetch a contact's conversation state within a transaction
pub async fn find_state_tx(
    tx: &mut Transaction<'_, Postgres>,
    contact: &str,
) -> Result<Option<ConversationState>, sqlx::Error> {
    let query = format!("SELECT {STATE_COLUMNS} FROM conversation_state WHERE contact_number = $1");
    sqlx::query_as::<_, ConversationState>(&query)
        .bind(contact)
        .fetch_optional(&mut **tx)
        .await
}

/// Create or update a contact's state within a transaction.
/// The step is always written; names are only written when supplied.
pub async fn upsert_state_tx(
    tx: &mut Transaction<'_, Postgres>,
    contact: &str,
    step: ConversationStep,
    product_name: Option<&str>,
    user_name: Option<&str>,
) -> Result<ConversationState, sqlx::Error> {
    let query = format!(
        "INSERT INTO conversation_state (contact_number, step, product_name, user_name, updated_at) \
         VALUES ($1, $2, $3, $4, NOW()) \
         ON CONFLICT (contact_number) DO UPDATE SET \
            step = EXCLUDED.step, \
            product_name = COALESCE(EXCLUDED.product_name, conversation_state.product_name), \
            user_name = COALESCE(EXCLUDED.user_name, conversation_state.user_name), \
            updated_at = NOW() \
         RETURNING {STATE_COLUMNS}"
    );
    sqlx::query_as::<_, ConversationState>(&query)
        .bind(contact)
        .bind(step.as_str())
        .bind(product_name)
        .bind(user_name)
        .fetch_one(&mut **tx)
        .await
}

/// Delete a contact's state within a transaction
pub async fn delete_state_tx(
    tx: &mut Transaction<'_, Postgres>,
    contact: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM conversation_state WHERE contact_number = $1")
        .bind(contact)
        .execute(&mut **tx)
        .await?;
    Ok(result.rows_affected())
}

/// Create a review within a transaction
pub async fn create_review_tx(
    tx: &mut Transaction<'_, Postgres>,
    contact: &str,
    user_name: &str,
    product_name: &str,
    product_review: &str,
) -> Result<Review, sqlx::Error> {
    let query = format!(
        "INSERT INTO reviews (contact_number, user_name, product_name, product_review) \
         VALUES ($1, $2, $3, $4) \
         RETURNING {REVIEW_COLUMNS}"
    );
    sqlx::query_as::<_, Review>(&query)
        .bind(contact)
        .bind(user_name)
        .bind(product_name)
        .bind(product_review)
        .fetch_one(&mut **tx)
        .await
}

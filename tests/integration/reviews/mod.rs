//! Conversation state, review storage and engine tests against PostgreSQL

use std::sync::Arc;

use reviewline_reviews::domain::state::{NAME_PROMPT, PRODUCT_PROMPT};
use reviewline_reviews::{ConversationStep, ConversationStore, ReviewEngine};

use crate::common::TestApp;

fn engine(app: &TestApp) -> ReviewEngine {
    ReviewEngine::new(Arc::new(app.repos.clone()))
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_full_conversation_records_one_review() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let engine = engine(&app);
    let contact = app.contact();

    let mut replies = Vec::new();
    for text in ["hi", "Widget", "Ada", "Great product!"] {
        replies.push(engine.process_message(&contact, text).await?);
    }

    assert_eq!(replies[0].reply_text, PRODUCT_PROMPT);
    assert_eq!(replies[1].reply_text, NAME_PROMPT);
    assert_eq!(replies[2].reply_text, "Please send your review for Widget.");
    assert_eq!(
        replies[3].reply_text,
        "Thanks Ada -- your review for Widget has been recorded."
    );
    assert!(replies[3].completed);

    assert_eq!(app.review_count(&contact).await?, 1);
    assert_eq!(app.state_count(&contact).await?, 0);
    assert!(app.repos.conversation_states.find(&contact).await?.is_none());

    let reviews = app.repos.reviews.list_all().await?;
    let review = reviews
        .iter()
        .find(|r| r.contact_number == contact)
        .expect("review for contact");
    assert_eq!(review.user_name, "Ada");
    assert_eq!(review.product_name, "Widget");
    assert_eq!(review.product_review, "Great product!");

    app.cleanup().await
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_redelivered_review_after_completion_restarts() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let engine = engine(&app);
    let contact = app.contact();

    for text in ["hi", "Widget", "Ada", "Great product!"] {
        engine.process_message(&contact, text).await?;
    }
    let reply = engine.process_message(&contact, "Great product!").await?;

    assert_eq!(reply.reply_text, PRODUCT_PROMPT);
    assert!(!reply.completed);
    assert_eq!(app.review_count(&contact).await?, 1);

    let state = app.repos.conversation_states.find(&contact).await?;
    assert_eq!(state.map(|s| s.step), Some(ConversationStep::AskProduct));

    app.cleanup().await
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_upsert_twice_keeps_single_row() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let states = &app.repos.conversation_states;
    let contact = app.contact();

    let first = states
        .upsert(&contact, ConversationStep::AskName, Some("Widget"), None)
        .await?;
    assert_eq!(first.step, ConversationStep::AskName);

    let second = states
        .upsert(&contact, ConversationStep::AskReview, None, Some("Ada"))
        .await?;
    assert_eq!(second.step, ConversationStep::AskReview);
    assert_eq!(second.product_name.as_deref(), Some("Widget"));
    assert_eq!(second.user_name.as_deref(), Some("Ada"));
    assert!(second.updated_at >= first.updated_at);

    assert_eq!(app.state_count(&contact).await?, 1);

    app.cleanup().await
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_delete_state_reports_whether_row_existed() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let states = &app.repos.conversation_states;
    let contact = app.contact();

    assert!(!states.delete(&contact).await?);

    states
        .upsert(&contact, ConversationStep::AskProduct, None, None)
        .await?;
    assert!(states.delete(&contact).await?);
    assert!(states.find(&contact).await?.is_none());

    app.cleanup().await
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_list_reviews_newest_first() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let engine = engine(&app);

    let mut contacts = Vec::new();
    for product in ["Widget", "Gadget", "Doohickey"] {
        let contact = app.contact();
        for text in ["hi", product, "Ada", "Solid"] {
            engine.process_message(&contact, text).await?;
        }
        contacts.push(contact);
    }

    let ours: Vec<String> = app
        .repos
        .list_reviews()
        .await?
        .into_iter()
        .filter(|r| contacts.contains(&r.contact_number))
        .map(|r| r.product_name)
        .collect();
    assert_eq!(ours, vec!["Doohickey", "Gadget", "Widget"]);

    app.cleanup().await
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_uncommitted_transaction_is_rolled_back() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let contact = app.contact();

    {
        let mut tx = app.repos.begin(&contact).await?;
        tx.upsert_state(ConversationStep::AskName, Some("Widget"), None)
            .await?;
        tx.create_review("Ada", "Widget", "Solid").await?;
    }

    assert_eq!(app.state_count(&contact).await?, 0);
    assert_eq!(app.review_count(&contact).await?, 0);

    app.cleanup().await
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_concurrent_messages_for_one_contact_are_serialized() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let engine = engine(&app);
    let contact = app.contact();

    engine.process_message(&contact, "hi").await?;

    let handles: Vec<_> = ["Widget", "Gadget"]
        .into_iter()
        .map(|text| {
            let engine = engine.clone();
            let contact = contact.clone();
            tokio::spawn(async move { engine.process_message(&contact, text).await })
        })
        .collect();

    let mut replies = Vec::new();
    for handle in handles {
        replies.push(handle.await??.reply_text);
    }

    assert!(replies.contains(&NAME_PROMPT.to_string()));
    assert!(replies
        .iter()
        .any(|r| r.starts_with("Please send your review for")));

    let state = app
        .repos
        .conversation_states
        .find(&contact)
        .await?
        .expect("state row");
    assert_eq!(state.step, ConversationStep::AskReview);

    app.cleanup().await
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_schema_rejects_unknown_step() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let contact = app.contact();

    let result = sqlx::query(
        "INSERT INTO conversation_state (contact_number, step) VALUES ($1, 'ask_colour')",
    )
    .bind(&contact)
    .execute(app.repos.pool())
    .await;
    assert!(result.is_err());

    app.cleanup().await
}

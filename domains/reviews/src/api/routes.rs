//! Route definitions for Reviews domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{reviews, webhook};
use super::middleware::{require_twilio_signature, ReviewsState};

/// Create inbound messaging webhook routes
fn webhook_routes(state: &ReviewsState) -> Router<ReviewsState> {
    Router::new()
        .route("/webhook/twilio", post(webhook::twilio_webhook))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_twilio_signature,
        ))
}

/// Create review listing routes
fn review_routes() -> Router<ReviewsState> {
    Router::new().route("/api/reviews", get(reviews::list_reviews))
}

/// Create all Reviews domain API routes
pub fn routes(state: ReviewsState) -> Router {
    Router::new()
        .merge(webhook_routes(&state))
        .merge(review_routes())
        .with_state(state)
}

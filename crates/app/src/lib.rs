//! Reviewline application composition root
//!
//! Composes the reviews domain router with infrastructure routes.

use axum::{routing::get, Router};
use reviewline_common::{Config, TwilioConfig};
use reviewline_reviews::{ConversationStore, ReviewsRepositories, ReviewsState};
use sqlx::{migrate::Migrator, PgPool};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Schema migrations embedded at build time
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Create the main application router backed by PostgreSQL
pub async fn create_app(config: &Config, pool: PgPool) -> Result<Router, anyhow::Error> {
    MIGRATOR.run(&pool).await?;

    let repos = ReviewsRepositories::new(pool);

    Ok(build_router(Arc::new(repos), config.twilio.clone()))
}

/// Build the router over any conversation store
pub fn build_router(store: Arc<dyn ConversationStore>, twilio: TwilioConfig) -> Router {
    let reviews_state = ReviewsState::new(store, twilio);

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/",
            get(|| async { concat!("Reviewline API v", env!("CARGO_PKG_VERSION")) }),
        )
        .merge(reviewline_reviews::routes(reviews_state))
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

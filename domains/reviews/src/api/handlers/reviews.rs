//! Review listing API handler

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use reviewline_common::Result;
use serde::Serialize;

use crate::api::middleware::ReviewsState;
use crate::domain::entities::Review;

/// Review response DTO
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: i64,
    pub contact_number: String,
    pub user_name: String,
    pub product_name: String,
    pub product_review: String,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            contact_number: r.contact_number,
            user_name: r.user_name,
            product_name: r.product_name,
            product_review: r.product_review,
            created_at: r.created_at,
        }
    }
}

/// List all recorded reviews, newest first
pub async fn list_reviews(State(state): State<ReviewsState>) -> Result<Json<Vec<ReviewResponse>>> {
    let reviews = state.store.list_reviews().await?;

    let responses: Vec<ReviewResponse> = reviews.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}

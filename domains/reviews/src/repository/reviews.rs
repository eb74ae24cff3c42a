//! Review repository

use crate::domain::entities::Review;
use reviewline_common::Result;
use sqlx::PgPool;

pub(crate) const REVIEW_COLUMNS: &str =
    "id, contact_number, user_name, product_name, product_review, created_at";

#[derive(Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all reviews, newest first
    pub async fn list_all(&self) -> Result<Vec<Review>> {
        let query = format!("SELECT {REVIEW_COLUMNS} FROM reviews ORDER BY created_at DESC, id DESC");
        let reviews = sqlx::query_as::<_, Review>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(reviews)
    }
}

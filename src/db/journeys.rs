use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{JourneyStore, StoreError};
use crate::models::journey::Journey;

#[derive(Clone)]
pub struct PgJourneyStore {
    db: PgPool,
}

impl PgJourneyStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl JourneyStore for PgJourneyStore {
    async fn create(&self, device_key: Option<&str>) -> Result<Journey, StoreError> {
        let journey = sqlx::query_as::<_, Journey>(
            "INSERT INTO journeys (device_key) VALUES ($1)
             RETURNING id, device_key, frame, no_of_copies, created_at, updated_at",
        )
        .bind(device_key)
        .fetch_one(&self.db)
        .await?;
        Ok(journey)
    }

    async fn set_frame(&self, id: Uuid, frame: &str) -> Result<Option<Journey>, StoreError> {
        let journey = sqlx::query_as::<_, Journey>(
            "UPDATE journeys SET frame = $2, updated_at = NOW() WHERE id = $1
             RETURNING id, device_key, frame, no_of_copies, created_at, updated_at",
        )
        .bind(id)
        .bind(frame)
        .fetch_optional(&self.db)
        .await?;
        Ok(journey)
    }

    async fn set_copies(
        &self,
        id: Uuid,
        no_of_copies: i32,
    ) -> Result<Option<Journey>, StoreError> {
        let journey = sqlx::query_as::<_, Journey>(
            "UPDATE journeys SET no_of_copies = $2, updated_at = NOW() WHERE id = $1
             RETURNING id, device_key, frame, no_of_copies, created_at, updated_at",
        )
        .bind(id)
        .bind(no_of_copies)
        .fetch_optional(&self.db)
        .await?;
        Ok(journey)
    }
}

use std::sync::Arc;

use uuid::Uuid;

use crate::db::{DeviceStore, JourneyStore};
use crate::error::AppError;
use crate::models::journey::Journey;

/// Drives the customer flow at a kiosk: start, pick a frame, pick a copy count.
#[derive(Clone)]
pub struct JourneyService {
    journeys: Arc<dyn JourneyStore>,
    devices: Arc<dyn DeviceStore>,
}

fn journey_not_found() -> AppError {
    AppError::NotFound("User journey not found".to_string())
}

impl JourneyService {
    pub fn new(journeys: Arc<dyn JourneyStore>, devices: Arc<dyn DeviceStore>) -> Self {
        Self { journeys, devices }
    }

    #[tracing::instrument(skip(self))]
    pub async fn start(&self, device_key: Option<&str>) -> Result<Journey, AppError> {
        let device_key = device_key.filter(|k| !k.is_empty());
        if let Some(key) = device_key {
            if self.devices.find_by_key(key).await?.is_none() {
                return Err(AppError::device_not_found());
            }
        }
        let journey = self.journeys.create(device_key).await?;
        tracing::info!(journey_id = %journey.id, "user journey started");
        Ok(journey)
    }

    #[tracing::instrument(skip(self))]
    pub async fn select_frame(&self, id: Uuid, frame: Option<&str>) -> Result<Journey, AppError> {
        let frame = frame
            .filter(|f| !f.is_empty())
            .ok_or_else(|| AppError::validation("Frame is required"))?;
        self.journeys
            .set_frame(id, frame)
            .await?
            .ok_or_else(journey_not_found)
    }

    #[tracing::instrument(skip(self))]
    pub async fn select_number(
        &self,
        id: Uuid,
        no_of_copies: Option<i32>,
    ) -> Result<Journey, AppError> {
        let copies = no_of_copies
            .filter(|n| *n >= 1)
            .ok_or_else(|| AppError::validation("Number of copies must be at least 1"))?;
        self.journeys
            .set_copies(id, copies)
            .await?
            .ok_or_else(journey_not_found)
    }
}

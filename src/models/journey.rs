use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One customer session at a device: pick a frame, then a number of copies.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow, ToSchema)]
pub struct Journey {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub device_key: Option<String>,
    pub frame: Option<String>,
    pub no_of_copies: Option<i32>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StartJourneyRequest {
    /// Device the journey runs on, if known
    pub device_key: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SelectFrameRequest {
    pub frame: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SelectNumberRequest {
    /// Number of copies to print (at least 1)
    pub no_of_copies: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JourneyEnvelope {
    pub message: String,
    pub journey: Journey,
}

impl JourneyEnvelope {
    pub fn new(message: &str, journey: Journey) -> Self {
        Self {
            message: message.to_string(),
            journey,
        }
    }
}

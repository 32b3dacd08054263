use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

/// Flat row as stored in the `devices` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DeviceRow {
    pub id: Uuid,
    pub device_key: String,
    pub device_name: String,
    pub base_url: Option<String>,
    pub printer_name: Option<String>,
    pub country: String,
    pub city: String,
    pub state: String,
    pub latitude: f64,
    pub longitude: f64,
    pub background_image: Option<String>,
    pub no_of_rolls: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DeviceLocation {
    #[serde(rename = "Country")]
    pub country: String,
    /// Falls back to "Unknown" when the geocoder reports no locality
    #[serde(rename = "City")]
    pub city: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Device {
    /// Internal identifier, used by the remaining-copies lookup
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub device_key: String,
    pub device_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub printer_name: Option<String>,
    pub device_location: DeviceLocation,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_of_rolls: Option<i64>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<DeviceRow> for Device {
    fn from(r: DeviceRow) -> Self {
        Self {
            id: r.id,
            device_key: r.device_key,
            device_name: r.device_name,
            base_url: r.base_url,
            printer_name: r.printer_name,
            device_location: DeviceLocation {
                country: r.country,
                city: r.city,
                state: r.state,
            },
            latitude: r.latitude,
            longitude: r.longitude,
            background_image: r.background_image,
            no_of_rolls: r.no_of_rolls,
            created_at: r.created_at,
        }
    }
}

/// Everything needed to insert a device; id and timestamp come from the store.
#[derive(Debug, Clone)]
pub struct NewDevice {
    pub device_key: String,
    pub device_name: String,
    pub base_url: Option<String>,
    pub printer_name: Option<String>,
    pub location: DeviceLocation,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RegisterDeviceRequest {
    /// Caller-chosen unique key of the physical device
    pub device_key: Option<String>,
    pub device_name: Option<String>,
    /// Free-text postal address, resolved through the geocoder
    pub address: Option<String>,
    pub base_url: Option<String>,
    pub printer_name: Option<String>,
}

/// A registration request whose required fields are known to be present.
#[derive(Debug, Clone)]
pub struct Registration {
    pub device_key: String,
    pub device_name: String,
    pub address: String,
    pub base_url: Option<String>,
    pub printer_name: Option<String>,
}

impl RegisterDeviceRequest {
    pub fn validate(self) -> Result<Registration, AppError> {
        fn required(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.is_empty())
        }

        match (
            required(self.device_key),
            required(self.device_name),
            required(self.address),
        ) {
            (Some(device_key), Some(device_name), Some(address)) => Ok(Registration {
                device_key,
                device_name,
                address,
                base_url: self.base_url,
                printer_name: self.printer_name,
            }),
            _ => Err(AppError::validation("Missing required fields")),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUrlRequest {
    /// Written verbatim, empty strings included
    pub base_url: Option<String>,
}

/// JSON alternative to the multipart background upload.
#[derive(Debug, Default, Deserialize)]
pub struct RollCountRequest {
    pub no_of_rolls: Option<i64>,
}

/// Multipart form accepted by the background endpoint (documentation only).
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct BackgroundUpload {
    /// Image file; any part carrying a filename is accepted
    #[schema(value_type = Option<String>, format = Binary)]
    pub background_image: Option<Vec<u8>>,
    pub no_of_rolls: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeviceEnvelope {
    pub message: String,
    pub device: Device,
}

impl DeviceEnvelope {
    pub fn new(message: &str, device: Device) -> Self {
        Self {
            message: message.to_string(),
            device,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdatedFields {
    /// New image URL, or null when no file was uploaded
    pub background_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_of_rolls: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundUpdateResponse {
    pub message: String,
    pub device: Device,
    pub updated_fields: UpdatedFields,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemainingCopiesResponse {
    pub message: String,
    pub device: Device,
    /// The stored roll count, echoed as-is
    pub remaining_copies: Option<i64>,
}

pub mod devices;
pub mod journeys;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::device::{Device, NewDevice};
use crate::models::journey::Journey;

pub use devices::PgDeviceStore;
pub use journeys::PgJourneyStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("device key already registered: {0}")]
    DuplicateKey(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Persistence for device records. Every method is a single atomic statement.
#[async_trait]
pub trait DeviceStore: Send + Sync {
    async fn insert(&self, device: NewDevice) -> Result<Device, StoreError>;

    /// All devices, most recently created first.
    async fn list(&self) -> Result<Vec<Device>, StoreError>;

    async fn find_by_key(&self, device_key: &str) -> Result<Option<Device>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Device>, StoreError>;

    /// Overwrites whichever of the two fields is `Some`, leaving the other untouched.
    async fn update_media(
        &self,
        device_key: &str,
        background_image: Option<&str>,
        no_of_rolls: Option<i64>,
    ) -> Result<Option<Device>, StoreError>;

    async fn update_base_url(
        &self,
        device_key: &str,
        base_url: &str,
    ) -> Result<Option<Device>, StoreError>;

    /// Removes the device and returns it as it was.
    async fn delete_by_key(&self, device_key: &str) -> Result<Option<Device>, StoreError>;
}

#[async_trait]
pub trait JourneyStore: Send + Sync {
    async fn create(&self, device_key: Option<&str>) -> Result<Journey, StoreError>;

    async fn set_frame(&self, id: Uuid, frame: &str) -> Result<Option<Journey>, StoreError>;

    async fn set_copies(&self, id: Uuid, no_of_copies: i32)
        -> Result<Option<Journey>, StoreError>;
}
